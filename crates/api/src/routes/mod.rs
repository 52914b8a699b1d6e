//! HTTP route handlers.

pub mod cities;
pub mod countries;
pub mod governors;
pub mod health;
pub mod invites;

use domain::error::DomainError;
use domain::models::{
    CityResponse, CityStatus, CountryResponse, CountryStatus, GovernorResponse, InviteResponse,
    InviteStatus,
};
use persistence::entities::{CityEntity, CountryEntity, GovernorEntity, InviteEntity};

use crate::error::ApiError;
use crate::services::invites::parse_stored_role;

// Entity-to-response converters shared across handlers. Stored enum values
// are constrained by CHECK clauses, so a parse failure here is corrupted
// storage and surfaces as internal.

pub(crate) fn country_response(entity: CountryEntity) -> Result<CountryResponse, ApiError> {
    let status = CountryStatus::parse(&entity.status).map_err(|_| {
        DomainError::Internal(format!("corrupt stored country status: {}", entity.status))
    })?;
    Ok(CountryResponse {
        id: entity.id,
        name: entity.name,
        status,
        created_at: entity.created_at,
        updated_at: entity.updated_at,
    })
}

pub(crate) fn city_response(entity: CityEntity) -> Result<CityResponse, ApiError> {
    let status = CityStatus::parse(&entity.status).map_err(|_| {
        DomainError::Internal(format!("corrupt stored city status: {}", entity.status))
    })?;
    Ok(CityResponse {
        id: entity.id,
        country_id: entity.country_id,
        name: entity.name,
        lon: entity.lon,
        lat: entity.lat,
        timezone: entity.timezone,
        status,
        slug: entity.slug,
        icon: entity.icon,
        created_at: entity.created_at,
        updated_at: entity.updated_at,
    })
}

pub(crate) fn governor_response(entity: GovernorEntity) -> Result<GovernorResponse, ApiError> {
    let role = parse_stored_role(&entity.role)?;
    Ok(GovernorResponse {
        user_id: entity.user_id,
        city_id: entity.city_id,
        role,
        label: entity.label,
        created_at: entity.created_at,
        updated_at: entity.updated_at,
    })
}

pub(crate) fn invite_response(entity: InviteEntity) -> Result<InviteResponse, ApiError> {
    let role = parse_stored_role(&entity.role)?;
    let status = InviteStatus::parse(&entity.status).map_err(|_| {
        DomainError::Internal(format!("corrupt stored invite status: {}", entity.status))
    })?;
    let expired = entity.is_sent() && entity.is_expired();
    Ok(InviteResponse {
        id: entity.id,
        city_id: entity.city_id,
        role,
        status,
        expired,
        expires_at: entity.expires_at,
        created_at: entity.created_at,
        answered_at: entity.answered_at,
        answered_by: entity.answered_by,
    })
}
