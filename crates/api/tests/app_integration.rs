//! Integration tests for the HTTP surface: identity extraction and the
//! error-to-status contract.

mod common;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use city_gov_api::{app::create_app, config::Config};
use common::*;
use tower::util::ServiceExt;
use uuid::Uuid;

fn test_config() -> Config {
    Config::load_for_test(&[("invite.secret", TEST_INVITE_SECRET)])
        .expect("Failed to load test config")
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("parse body")
}

#[tokio::test]
async fn test_liveness_probe() {
    let pool = create_test_pool().await;
    let app = create_app(test_config(), pool);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/health/live")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_identity_is_required() {
    let pool = create_test_pool().await;
    let app = create_app(test_config(), pool);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/governors/me")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["error"], "unauthorized");
}

#[tokio::test]
async fn test_invalid_role_maps_to_bad_request() {
    let pool = create_test_pool().await;
    let app = create_app(test_config(), pool);

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(format!("/api/v1/cities/{}/invites", Uuid::new_v4()))
                .header("x-user-id", Uuid::new_v4().to_string())
                .header("x-user-role", "operator")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"role": "king"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "invalid_role");
}

#[tokio::test]
async fn test_garbage_token_maps_to_forbidden() {
    let pool = create_test_pool().await;
    let app = create_app(test_config(), pool);

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/invites/accept")
                .header("x-user-id", Uuid::new_v4().to_string())
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"token": "not.a.token"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = body_json(response).await;
    assert_eq!(body["error"], "invalid_invite_token");
}

#[tokio::test]
async fn test_missing_city_maps_to_not_found() {
    let pool = create_test_pool().await;
    let app = create_app(test_config(), pool);

    let response = app
        .oneshot(
            Request::builder()
                .uri(format!("/api/v1/cities/{}", Uuid::new_v4()))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["error"], "city_not_found");
}

#[tokio::test]
async fn test_non_operator_cannot_create_country() {
    let pool = create_test_pool().await;
    let app = create_app(test_config(), pool);

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/countries")
                .header("x-user-id", Uuid::new_v4().to_string())
                .header("x-user-role", "user")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"name": "Ukraine"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = body_json(response).await;
    assert_eq!(body["error"], "operator_required");
}

#[tokio::test]
async fn test_expired_invite_maps_to_gone() {
    let pool = create_test_pool().await;
    let country_id = create_supported_country(&pool).await;
    let city_id = create_supported_city(&pool, country_id).await;
    let (invite_id, token) = issue_invite(&pool, city_id, "deputy", Some(24)).await;
    expire_invite(&pool, invite_id).await;

    let app = create_app(test_config(), pool);
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/invites/accept")
                .header("x-user-id", Uuid::new_v4().to_string())
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(format!(r#"{{"token": "{token}"}}"#)))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::GONE);
    let body = body_json(response).await;
    assert_eq!(body["error"], "invite_expired");
}
