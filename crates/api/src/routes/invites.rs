//! Invite route handlers.
//!
//! Creation returns the bearer token exactly once; listing and getting
//! never expose it.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use domain::error::DomainError;
use domain::models::{
    AcceptInviteRequest, CreateInviteRequest, CreateInviteResponse, ListInvitesQuery,
};
use persistence::repositories::{CityRepository, InviteRepository};
use shared::pagination::Page;
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::Identity;
use crate::routes::{governor_response, invite_response};
use crate::services::invites::parse_stored_role;

/// POST /api/v1/cities/:city_id/invites
///
/// Create an invite for a role in the city. The returned token is shown
/// only once and cannot be recovered.
pub async fn create_invite(
    State(state): State<AppState>,
    identity: Identity,
    Path(city_id): Path<Uuid>,
    Json(request): Json<CreateInviteRequest>,
) -> Result<impl IntoResponse, ApiError> {
    request.validate()?;

    let (invite, token) = state
        .invite_service()
        .create(identity, city_id, &request.role, request.ttl_hours)
        .await?;

    let role = parse_stored_role(&invite.role)?;
    let response = CreateInviteResponse {
        id: invite.id,
        city_id: invite.city_id,
        role,
        token,
        expires_at: invite.expires_at,
        created_at: invite.created_at,
    };

    Ok((StatusCode::CREATED, Json(response)))
}

/// GET /api/v1/cities/:city_id/invites
///
/// List a city's invites with a status filter and pagination.
pub async fn list_invites(
    State(state): State<AppState>,
    Path(city_id): Path<Uuid>,
    Query(query): Query<ListInvitesQuery>,
) -> Result<impl IntoResponse, ApiError> {
    CityRepository::new(state.pool.clone())
        .find_by_id(city_id)
        .await?
        .ok_or(DomainError::CityNotFound)?;

    let repo = InviteRepository::new(state.pool.clone());
    let page_query = query.page_query();
    let status = query.status.as_deref();

    let entities = repo
        .list_by_city_with_status(city_id, status, page_query.size(), page_query.offset())
        .await?;
    let total = repo.count_by_city_with_status(city_id, status).await?;

    let data = entities
        .into_iter()
        .map(invite_response)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Json(Page::new(data, &page_query, total)))
}

/// GET /api/v1/invites/:invite_id
pub async fn get_invite(
    State(state): State<AppState>,
    Path(invite_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let entity = InviteRepository::new(state.pool.clone())
        .find_by_id(invite_id)
        .await?
        .ok_or(DomainError::InviteNotFound)?;

    Ok(Json(invite_response(entity)?))
}

/// POST /api/v1/invites/accept
///
/// Redeem an invite token, becoming a governor of the invited city.
pub async fn accept_invite(
    State(state): State<AppState>,
    identity: Identity,
    Json(request): Json<AcceptInviteRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let governor = state
        .invite_service()
        .accept(identity.user_id, &request.token)
        .await?;

    Ok((StatusCode::CREATED, Json(governor_response(governor)?)))
}

/// POST /api/v1/invites/:invite_id/decline
///
/// Decline an invite. Terminal; the invite can never be answered again.
pub async fn decline_invite(
    State(state): State<AppState>,
    identity: Identity,
    Path(invite_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let invite = state
        .invite_service()
        .decline(identity.user_id, invite_id)
        .await?;

    Ok(Json(invite_response(invite)?))
}
