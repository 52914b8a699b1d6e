//! Country route handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use domain::error::DomainError;
use domain::models::{CountryResponse, CreateCountryRequest, SetCountryStatusRequest};
use persistence::repositories::{unique_constraint, CountryRepository};
use serde::Serialize;
use shared::pagination::{Page, PageQuery};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::Identity;
use crate::routes::country_response;

/// Response for a country status change, naming the cascaded cities.
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct CountryStatusResponse {
    pub country: CountryResponse,
    pub affected_city_ids: Vec<Uuid>,
}

/// POST /api/v1/countries
///
/// Create a country. Operator only; the name is unique and the status
/// starts as `unsupported`.
pub async fn create_country(
    State(state): State<AppState>,
    identity: Identity,
    Json(request): Json<CreateCountryRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if !identity.operator {
        return Err(DomainError::OperatorRequired.into());
    }
    request.validate()?;

    let entity = CountryRepository::new(state.pool.clone())
        .create(request.name.trim())
        .await
        .map_err(|e| match unique_constraint(&e) {
            Some(_) => DomainError::CountryAlreadyExists,
            None => DomainError::Database(e),
        })?;

    info!(country_id = %entity.id, name = %entity.name, "Created country");

    Ok((StatusCode::CREATED, Json(country_response(entity)?)))
}

/// GET /api/v1/countries
///
/// List countries with pagination.
pub async fn list_countries(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = CountryRepository::new(state.pool.clone());

    let entities = repo.list(query.size(), query.offset()).await?;
    let total = repo.count().await?;

    let data = entities
        .into_iter()
        .map(country_response)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Json(Page::new(data, &query, total)))
}

/// GET /api/v1/countries/:country_id
pub async fn get_country(
    State(state): State<AppState>,
    Path(country_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let entity = CountryRepository::new(state.pool.clone())
        .find_by_id(country_id)
        .await?
        .ok_or(DomainError::CountryNotFound)?;

    Ok(Json(country_response(entity)?))
}

/// PUT /api/v1/countries/:country_id/status
///
/// Change a country's support status. Leaving `supported` cascades to the
/// country's cities and their governors.
pub async fn set_country_status(
    State(state): State<AppState>,
    identity: Identity,
    Path(country_id): Path<Uuid>,
    Json(request): Json<SetCountryStatusRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let (country, affected_city_ids) = state
        .cascade_service()
        .set_country_status(identity, country_id, request.status)
        .await?;

    Ok(Json(CountryStatusResponse {
        country: country_response(country)?,
        affected_city_ids,
    }))
}
