//! Integration tests for the invitation lifecycle.

mod common;

use common::*;
use domain::error::DomainError;
use domain::models::GovRole;
use persistence::repositories::{GovernorRepository, InviteRepository};
use uuid::Uuid;

#[tokio::test]
async fn test_full_invite_flow_creates_governor() {
    let pool = create_test_pool().await;
    let country_id = create_supported_country(&pool).await;
    let city_id = create_supported_city(&pool, country_id).await;

    let (invite_id, token) = issue_invite(&pool, city_id, "mayor", Some(24)).await;

    let user_id = Uuid::new_v4();
    let governor = invite_service(&pool)
        .accept(user_id, &token)
        .await
        .expect("accept should succeed");

    assert_eq!(governor.user_id, user_id);
    assert_eq!(governor.city_id, city_id);
    assert_eq!(governor.role, "mayor");

    let invite = InviteRepository::new(pool.clone())
        .find_by_id(invite_id)
        .await
        .unwrap()
        .expect("invite row must remain");
    assert_eq!(invite.status, "accepted");
    assert_eq!(invite.answered_by, Some(user_id));
    assert!(invite.answered_at.is_some());
}

#[tokio::test]
async fn test_second_accept_of_same_token_conflicts() {
    let pool = create_test_pool().await;
    let country_id = create_supported_country(&pool).await;
    let city_id = create_supported_city(&pool, country_id).await;

    let (_, token) = issue_invite(&pool, city_id, "mayor", Some(24)).await;
    accept_as_new_user(&pool, &token).await;

    let result = invite_service(&pool).accept(Uuid::new_v4(), &token).await;
    assert!(matches!(result, Err(DomainError::InviteAlreadyAnswered)));
    assert_eq!(count_role_holders(&pool, city_id, "mayor").await, 1);
}

#[tokio::test]
async fn test_concurrent_accepts_create_one_governor() {
    let pool = create_test_pool().await;
    let country_id = create_supported_country(&pool).await;
    let city_id = create_supported_city(&pool, country_id).await;

    let (_, token) = issue_invite(&pool, city_id, "mayor", Some(24)).await;

    let service_a = invite_service(&pool);
    let service_b = invite_service(&pool);
    let token_a = token.clone();
    let token_b = token.clone();

    let (result_a, result_b) = tokio::join!(
        service_a.accept(Uuid::new_v4(), &token_a),
        service_b.accept(Uuid::new_v4(), &token_b),
    );

    let successes = [&result_a, &result_b]
        .iter()
        .filter(|r| r.is_ok())
        .count();
    assert_eq!(successes, 1, "exactly one concurrent accept may win");
    assert_eq!(count_role_holders(&pool, city_id, "mayor").await, 1);
}

#[tokio::test]
async fn test_singleton_role_displaces_previous_holder() {
    let pool = create_test_pool().await;
    let country_id = create_supported_country(&pool).await;
    let city_id = create_supported_city(&pool, country_id).await;

    let (_, first_token) = issue_invite(&pool, city_id, "mayor", Some(24)).await;
    let first_mayor = accept_as_new_user(&pool, &first_token).await;

    let (_, second_token) = issue_invite(&pool, city_id, "mayor", Some(24)).await;
    let second_mayor = accept_as_new_user(&pool, &second_token).await;

    let repo = GovernorRepository::new(pool.clone());
    assert!(repo.find_by_user(first_mayor).await.unwrap().is_none());
    assert!(repo.find_by_user(second_mayor).await.unwrap().is_some());
    assert_eq!(count_role_holders(&pool, city_id, "mayor").await, 1);
}

#[tokio::test]
async fn test_sequential_mayor_accepts_keep_one_holder() {
    let pool = create_test_pool().await;
    let country_id = create_supported_country(&pool).await;
    let city_id = create_supported_city(&pool, country_id).await;

    for _ in 0..4 {
        let (_, token) = issue_invite(&pool, city_id, "mayor", Some(24)).await;
        accept_as_new_user(&pool, &token).await;
    }

    assert_eq!(count_role_holders(&pool, city_id, "mayor").await, 1);
}

#[tokio::test]
async fn test_expired_invite_is_never_acceptable() {
    let pool = create_test_pool().await;
    let country_id = create_supported_country(&pool).await;
    let city_id = create_supported_city(&pool, country_id).await;

    let (invite_id, token) = issue_invite(&pool, city_id, "deputy", Some(24)).await;
    expire_invite(&pool, invite_id).await;

    // The token signature still verifies and the record still says `sent`;
    // the stored deadline alone must reject the accept.
    let result = invite_service(&pool).accept(Uuid::new_v4(), &token).await;
    assert!(matches!(result, Err(DomainError::InviteExpired)));

    let invite = InviteRepository::new(pool.clone())
        .find_by_id(invite_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(invite.status, "sent", "expiry is computed, not stored");
}

#[tokio::test]
async fn test_garbage_token_rejected() {
    let pool = create_test_pool().await;

    let result = invite_service(&pool)
        .accept(Uuid::new_v4(), "definitely.not.a-token")
        .await;
    assert!(matches!(result, Err(DomainError::InvalidInviteToken)));
}

#[tokio::test]
async fn test_foreign_signature_rejected() {
    let pool = create_test_pool().await;
    let country_id = create_supported_country(&pool).await;
    let city_id = create_supported_city(&pool, country_id).await;

    let (invite_id, _) = issue_invite(&pool, city_id, "mayor", Some(24)).await;

    // A token signed with a different secret for the same invite id.
    let forged = shared::invite_token::InviteTokenCodec::new("attacker-secret")
        .issue(
            invite_id,
            city_id,
            "mayor",
            chrono::Utc::now() + chrono::Duration::hours(24),
        )
        .unwrap();

    let result = invite_service(&pool).accept(Uuid::new_v4(), &forged).await;
    assert!(matches!(result, Err(DomainError::InvalidInviteToken)));
}

#[tokio::test]
async fn test_decline_is_terminal() {
    let pool = create_test_pool().await;
    let country_id = create_supported_country(&pool).await;
    let city_id = create_supported_city(&pool, country_id).await;

    let (invite_id, token) = issue_invite(&pool, city_id, "moderator", Some(24)).await;

    let user_id = Uuid::new_v4();
    let declined = invite_service(&pool)
        .decline(user_id, invite_id)
        .await
        .expect("decline should succeed");
    assert_eq!(declined.status, "declined");
    assert_eq!(declined.answered_by, Some(user_id));

    // The validly signed token can no longer be redeemed.
    let result = invite_service(&pool).accept(Uuid::new_v4(), &token).await;
    assert!(matches!(result, Err(DomainError::InviteAlreadyAnswered)));
    assert_eq!(count_city_governors(&pool, city_id).await, 0);

    let result = invite_service(&pool).decline(Uuid::new_v4(), invite_id).await;
    assert!(matches!(result, Err(DomainError::InviteAlreadyAnswered)));
}

#[tokio::test]
async fn test_accept_requires_supported_city() {
    let pool = create_test_pool().await;
    let country_id = create_supported_country(&pool).await;
    let city_id = create_supported_city(&pool, country_id).await;

    let (_, token) = issue_invite(&pool, city_id, "deputy", Some(24)).await;

    cascade_service(&pool)
        .set_city_status(operator(), city_id, domain::models::CityStatus::Suspended)
        .await
        .unwrap();

    let result = invite_service(&pool).accept(Uuid::new_v4(), &token).await;
    assert!(matches!(result, Err(DomainError::CityNotSupported)));
}

#[tokio::test]
async fn test_create_invite_requires_supported_city() {
    let pool = create_test_pool().await;
    let country_id = create_supported_country(&pool).await;
    let city_id = create_supported_city(&pool, country_id).await;

    cascade_service(&pool)
        .set_city_status(operator(), city_id, domain::models::CityStatus::Unsupported)
        .await
        .unwrap();

    let result = invite_service(&pool)
        .create(operator(), city_id, "mayor", Some(24))
        .await;
    assert!(matches!(result, Err(DomainError::CityNotSupported)));
}

#[tokio::test]
async fn test_create_invite_rejects_unknown_role() {
    let pool = create_test_pool().await;
    let country_id = create_supported_country(&pool).await;
    let city_id = create_supported_city(&pool, country_id).await;

    let result = invite_service(&pool)
        .create(operator(), city_id, "king", Some(24))
        .await;
    assert!(matches!(result, Err(DomainError::InvalidRole(_))));
}

#[tokio::test]
async fn test_user_cannot_hold_two_governorships() {
    let pool = create_test_pool().await;
    let country_id = create_supported_country(&pool).await;
    let first_city = create_supported_city(&pool, country_id).await;
    let second_city = create_supported_city(&pool, country_id).await;

    let (_, first_token) = issue_invite(&pool, first_city, "moderator", Some(24)).await;
    let user_id = Uuid::new_v4();
    invite_service(&pool)
        .accept(user_id, &first_token)
        .await
        .unwrap();

    let (_, second_token) = issue_invite(&pool, second_city, "moderator", Some(24)).await;
    let result = invite_service(&pool).accept(user_id, &second_token).await;
    assert!(matches!(result, Err(DomainError::UserAlreadyGovernor)));
}

#[tokio::test]
async fn test_grant_authority_is_enforced() {
    let pool = create_test_pool().await;
    let country_id = create_supported_country(&pool).await;
    let city_id = create_supported_city(&pool, country_id).await;

    let (_, token) = issue_invite(&pool, city_id, "moderator", Some(24)).await;
    let moderator = accept_as_new_user(&pool, &token).await;

    // A moderator may invite peers but not the mayor.
    let result = invite_service(&pool)
        .create(user(moderator), city_id, "mayor", Some(24))
        .await;
    assert!(matches!(result, Err(DomainError::NotEnoughRights)));

    let result = invite_service(&pool)
        .create(user(moderator), city_id, "moderator", Some(24))
        .await;
    assert!(result.is_ok());

    // A user with no governorship cannot invite at all.
    let result = invite_service(&pool)
        .create(user(Uuid::new_v4()), city_id, "moderator", Some(24))
        .await;
    assert!(matches!(result, Err(DomainError::NotCityGovernor)));
}

#[tokio::test]
async fn test_granting_is_scoped_to_own_city() {
    let pool = create_test_pool().await;
    let country_id = create_supported_country(&pool).await;
    let home_city = create_supported_city(&pool, country_id).await;
    let other_city = create_supported_city(&pool, country_id).await;

    let (_, token) = issue_invite(&pool, home_city, "mayor", Some(24)).await;
    let mayor = accept_as_new_user(&pool, &token).await;

    let result = invite_service(&pool)
        .create(user(mayor), other_city, "moderator", Some(24))
        .await;
    assert!(matches!(result, Err(DomainError::NotCityGovernor)));
}

#[tokio::test]
async fn test_accepted_governor_role_matches_claims() {
    let pool = create_test_pool().await;
    let country_id = create_supported_country(&pool).await;
    let city_id = create_supported_city(&pool, country_id).await;

    let (_, token) = issue_invite(&pool, city_id, "deputy", Some(24)).await;
    let claims = codec().verify(&token).unwrap();
    assert_eq!(claims.city_id(), city_id);
    assert_eq!(GovRole::parse(&claims.role).unwrap(), GovRole::Deputy);

    let governor = invite_service(&pool)
        .accept(Uuid::new_v4(), &token)
        .await
        .unwrap();
    assert_eq!(governor.role, claims.role);
}
