//! Governor route handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use domain::error::DomainError;
use domain::models::UpdateLabelRequest;
use persistence::repositories::{CityRepository, GovernorRepository};
use shared::pagination::{Page, PageQuery};
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::Identity;
use crate::routes::governor_response;

/// GET /api/v1/governors/me
///
/// The caller's own governorship.
pub async fn get_own_governor(
    State(state): State<AppState>,
    identity: Identity,
) -> Result<impl IntoResponse, ApiError> {
    let governor = state.governance_service().get_own(identity.user_id).await?;
    Ok(Json(governor_response(governor)?))
}

/// DELETE /api/v1/governors/me
///
/// Resign the caller's own governorship. The mayor must be reassigned
/// first.
pub async fn refuse_own(
    State(state): State<AppState>,
    identity: Identity,
) -> Result<impl IntoResponse, ApiError> {
    state.governance_service().refuse_own(identity.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/cities/:city_id/governors
///
/// List a city's governors with pagination.
pub async fn list_city_governors(
    State(state): State<AppState>,
    Path(city_id): Path<Uuid>,
    Query(query): Query<PageQuery>,
) -> Result<impl IntoResponse, ApiError> {
    CityRepository::new(state.pool.clone())
        .find_by_id(city_id)
        .await?
        .ok_or(DomainError::CityNotFound)?;

    let repo = GovernorRepository::new(state.pool.clone());
    let entities = repo
        .list_by_city(city_id, query.size(), query.offset())
        .await?;
    let total = repo.count_by_city(city_id).await?;

    let data = entities
        .into_iter()
        .map(governor_response)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Json(Page::new(data, &query, total)))
}

/// PATCH /api/v1/governors/:user_id/label
///
/// Update a governor's label: self-service, or by an outranking governor
/// of the same city / an operator.
pub async fn update_governor_label(
    State(state): State<AppState>,
    identity: Identity,
    Path(user_id): Path<Uuid>,
    Json(request): Json<UpdateLabelRequest>,
) -> Result<impl IntoResponse, ApiError> {
    request.validate()?;

    let governor = state
        .governance_service()
        .update_label(identity, user_id, request.label.as_deref())
        .await?;

    Ok(Json(governor_response(governor)?))
}

/// DELETE /api/v1/cities/:city_id/governors/:user_id
///
/// Remove another user's governorship; requires strictly higher rank or
/// operator access.
pub async fn delete_governor(
    State(state): State<AppState>,
    identity: Identity,
    Path((city_id, user_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .governance_service()
        .delete_other(identity, city_id, user_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
