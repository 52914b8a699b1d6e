//! Integration tests for country/city status cascades.

mod common;

use common::*;
use domain::error::DomainError;
use domain::models::{CityStatus, CountryStatus};
use persistence::repositories::{CityRepository, GovernorRepository};
use uuid::Uuid;

#[tokio::test]
async fn test_deprecating_country_cascades_to_cities_and_governors() {
    let pool = create_test_pool().await;
    let country_id = create_supported_country(&pool).await;
    let first_city = create_supported_city(&pool, country_id).await;
    let second_city = create_supported_city(&pool, country_id).await;

    let (_, first_token) = issue_invite(&pool, first_city, "mayor", Some(24)).await;
    let first_mayor = accept_as_new_user(&pool, &first_token).await;
    let (_, second_token) = issue_invite(&pool, second_city, "moderator", Some(24)).await;
    accept_as_new_user(&pool, &second_token).await;

    let (country, affected) = cascade_service(&pool)
        .set_country_status(operator(), country_id, CountryStatus::Deprecated)
        .await
        .expect("cascade should succeed");

    assert_eq!(country.status, "deprecated");
    assert_eq!(affected.len(), 2);
    assert!(affected.contains(&first_city));
    assert!(affected.contains(&second_city));

    // No city of the country remains supported.
    let city_repo = CityRepository::new(pool.clone());
    for city_id in [first_city, second_city] {
        let city = city_repo.find_by_id(city_id).await.unwrap().unwrap();
        assert_eq!(city.status, "unsupported");
        assert_eq!(count_city_governors(&pool, city_id).await, 0);
    }

    // Displaced governors are free to take a role elsewhere.
    assert!(GovernorRepository::new(pool.clone())
        .find_by_user(first_mayor)
        .await
        .unwrap()
        .is_none());

    // New invites for the cascaded cities are refused.
    let result = invite_service(&pool)
        .create(operator(), first_city, "mayor", Some(24))
        .await;
    assert!(matches!(result, Err(DomainError::CityNotSupported)));
}

#[tokio::test]
async fn test_supporting_country_does_not_touch_cities() {
    let pool = create_test_pool().await;
    let country_id = create_supported_country(&pool).await;
    let city_id = create_supported_city(&pool, country_id).await;

    let (_, token) = issue_invite(&pool, city_id, "mayor", Some(24)).await;
    accept_as_new_user(&pool, &token).await;

    // Any-to-any transitions are allowed; re-entering `supported` must not
    // cascade.
    let (_, affected) = cascade_service(&pool)
        .set_country_status(operator(), country_id, CountryStatus::Supported)
        .await
        .unwrap();

    assert!(affected.is_empty());
    assert_eq!(count_city_governors(&pool, city_id).await, 1);
}

#[tokio::test]
async fn test_suspending_city_deletes_its_governors() {
    let pool = create_test_pool().await;
    let country_id = create_supported_country(&pool).await;
    let city_id = create_supported_city(&pool, country_id).await;
    let untouched_city = create_supported_city(&pool, country_id).await;

    let (_, token) = issue_invite(&pool, city_id, "mayor", Some(24)).await;
    accept_as_new_user(&pool, &token).await;
    let (_, other_token) = issue_invite(&pool, untouched_city, "mayor", Some(24)).await;
    accept_as_new_user(&pool, &other_token).await;

    let city = cascade_service(&pool)
        .set_city_status(operator(), city_id, CityStatus::Suspended)
        .await
        .unwrap();

    assert_eq!(city.status, "suspended");
    assert_eq!(count_city_governors(&pool, city_id).await, 0);
    // Sibling cities are untouched.
    assert_eq!(count_city_governors(&pool, untouched_city).await, 1);
}

#[tokio::test]
async fn test_resupporting_city_does_not_restore_governors() {
    let pool = create_test_pool().await;
    let country_id = create_supported_country(&pool).await;
    let city_id = create_supported_city(&pool, country_id).await;

    let (_, token) = issue_invite(&pool, city_id, "mayor", Some(24)).await;
    accept_as_new_user(&pool, &token).await;

    cascade_service(&pool)
        .set_city_status(operator(), city_id, CityStatus::Unsupported)
        .await
        .unwrap();
    let city = cascade_service(&pool)
        .set_city_status(operator(), city_id, CityStatus::Supported)
        .await
        .unwrap();

    // A fresh invite cycle is required after re-supporting.
    assert_eq!(city.status, "supported");
    assert_eq!(count_city_governors(&pool, city_id).await, 0);

    let (_, new_token) = issue_invite(&pool, city_id, "mayor", Some(24)).await;
    accept_as_new_user(&pool, &new_token).await;
    assert_eq!(count_city_governors(&pool, city_id).await, 1);
}

#[tokio::test]
async fn test_status_changes_require_operator() {
    let pool = create_test_pool().await;
    let country_id = create_supported_country(&pool).await;
    let city_id = create_supported_city(&pool, country_id).await;

    let result = cascade_service(&pool)
        .set_country_status(user(Uuid::new_v4()), country_id, CountryStatus::Deprecated)
        .await;
    assert!(matches!(result, Err(DomainError::OperatorRequired)));

    let result = cascade_service(&pool)
        .set_city_status(user(Uuid::new_v4()), city_id, CityStatus::Suspended)
        .await;
    assert!(matches!(result, Err(DomainError::OperatorRequired)));
}

#[tokio::test]
async fn test_status_change_for_missing_rows() {
    let pool = create_test_pool().await;

    let result = cascade_service(&pool)
        .set_country_status(operator(), Uuid::new_v4(), CountryStatus::Supported)
        .await;
    assert!(matches!(result, Err(DomainError::CountryNotFound)));

    let result = cascade_service(&pool)
        .set_city_status(operator(), Uuid::new_v4(), CityStatus::Supported)
        .await;
    assert!(matches!(result, Err(DomainError::CityNotFound)));
}

#[tokio::test]
async fn test_country_scenario_end_to_end() {
    // Country -> city -> mayor invite -> accept -> displacement -> cascade.
    let pool = create_test_pool().await;
    let country_id = create_supported_country(&pool).await;
    let city_id = create_supported_city(&pool, country_id).await;

    let (_, first_token) = issue_invite(&pool, city_id, "mayor", Some(24)).await;
    let u1 = accept_as_new_user(&pool, &first_token).await;

    // U2 reusing U1's token is refused.
    let result = invite_service(&pool).accept(Uuid::new_v4(), &first_token).await;
    assert!(matches!(result, Err(DomainError::InviteAlreadyAnswered)));

    // A second mayor invite displaces U1.
    let (_, second_token) = issue_invite(&pool, city_id, "mayor", Some(24)).await;
    let u2 = accept_as_new_user(&pool, &second_token).await;

    let repo = GovernorRepository::new(pool.clone());
    assert!(repo.find_by_user(u1).await.unwrap().is_none());
    assert!(repo.find_by_user(u2).await.unwrap().is_some());
    assert_eq!(count_role_holders(&pool, city_id, "mayor").await, 1);

    // Deprecating the country clears the city and U2's governorship.
    cascade_service(&pool)
        .set_country_status(operator(), country_id, CountryStatus::Deprecated)
        .await
        .unwrap();

    assert!(repo.find_by_user(u2).await.unwrap().is_none());
    let result = invite_service(&pool)
        .create(operator(), city_id, "mayor", Some(24))
        .await;
    assert!(matches!(result, Err(DomainError::CityNotSupported)));
}
