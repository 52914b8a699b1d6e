//! City route handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use domain::error::DomainError;
use domain::models::{
    CreateCityRequest, ListCitiesQuery, SetCityStatusRequest, UpdateCityRequest,
};
use persistence::repositories::{
    city::CityInput, unique_constraint, CityRepository, CountryRepository,
};
use shared::pagination::Page;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::Identity;
use crate::routes::city_response;

/// Maps a city insert/update failure; the only unique index is the slug.
fn map_city_write_error(err: sqlx::Error) -> DomainError {
    match unique_constraint(&err) {
        Some(_) => DomainError::SlugAlreadyTaken,
        None => DomainError::Database(err),
    }
}

/// POST /api/v1/cities
///
/// Create a city under a country. Operator only; the status starts as
/// `unsupported`.
pub async fn create_city(
    State(state): State<AppState>,
    identity: Identity,
    Json(request): Json<CreateCityRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if !identity.operator {
        return Err(DomainError::OperatorRequired.into());
    }
    request.validate()?;

    CountryRepository::new(state.pool.clone())
        .find_by_id(request.country_id)
        .await?
        .ok_or(DomainError::CountryNotFound)?;

    let entity = CityRepository::new(state.pool.clone())
        .create(CityInput {
            country_id: request.country_id,
            name: request.name.trim(),
            lon: request.lon,
            lat: request.lat,
            timezone: &request.timezone,
            slug: request.slug.as_deref(),
            icon: request.icon.as_deref(),
        })
        .await
        .map_err(map_city_write_error)?;

    info!(city_id = %entity.id, country_id = %entity.country_id, name = %entity.name, "Created city");

    Ok((StatusCode::CREATED, Json(city_response(entity)?)))
}

/// GET /api/v1/cities
///
/// List cities with optional country/status filters and pagination.
pub async fn list_cities(
    State(state): State<AppState>,
    Query(query): Query<ListCitiesQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = CityRepository::new(state.pool.clone());
    let page_query = query.page_query();
    let status = query.status.map(|s| s.as_str());

    let entities = repo
        .list(
            query.country_id,
            status,
            page_query.size(),
            page_query.offset(),
        )
        .await?;
    let total = repo.count(query.country_id, status).await?;

    let data = entities
        .into_iter()
        .map(city_response)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Json(Page::new(data, &page_query, total)))
}

/// GET /api/v1/cities/:city_id
pub async fn get_city(
    State(state): State<AppState>,
    Path(city_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let entity = CityRepository::new(state.pool.clone())
        .find_by_id(city_id)
        .await?
        .ok_or(DomainError::CityNotFound)?;

    Ok(Json(city_response(entity)?))
}

/// PATCH /api/v1/cities/:city_id
///
/// Edit city fields. Operator only; absent fields are left unchanged.
pub async fn update_city(
    State(state): State<AppState>,
    identity: Identity,
    Path(city_id): Path<Uuid>,
    Json(request): Json<UpdateCityRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if !identity.operator {
        return Err(DomainError::OperatorRequired.into());
    }
    request.validate()?;
    if request.is_empty() {
        return Err(ApiError::Validation("No fields to update".to_string()));
    }

    let entity = CityRepository::new(state.pool.clone())
        .update(
            city_id,
            request.name.as_deref().map(str::trim),
            request.lon,
            request.lat,
            request.timezone.as_deref(),
            request.slug.as_deref(),
            request.icon.as_deref(),
        )
        .await
        .map_err(map_city_write_error)?
        .ok_or(DomainError::CityNotFound)?;

    info!(city_id = %entity.id, "Updated city");

    Ok(Json(city_response(entity)?))
}

/// PUT /api/v1/cities/:city_id/status
///
/// Change a city's status. Any status other than `supported` removes the
/// city's governors in the same transaction.
pub async fn set_city_status(
    State(state): State<AppState>,
    identity: Identity,
    Path(city_id): Path<Uuid>,
    Json(request): Json<SetCityStatusRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let entity = state
        .cascade_service()
        .set_city_status(identity, city_id, request.status)
        .await?;

    Ok(Json(city_response(entity)?))
}
