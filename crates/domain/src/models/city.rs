//! City domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::pagination::PageQuery;
use shared::validation::{
    validate_latitude, validate_longitude, validate_name, validate_slug, validate_timezone,
};
use uuid::Uuid;
use validator::Validate;

use crate::error::DomainError;

/// Accessibility status of a city.
///
/// Call sites in older clients use varying spellings; these three are
/// canonical.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CityStatus {
    Supported,
    Suspended,
    Unsupported,
}

impl CityStatus {
    /// Canonical storage representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            CityStatus::Supported => "supported",
            CityStatus::Suspended => "suspended",
            CityStatus::Unsupported => "unsupported",
        }
    }

    /// Parses a stored status value.
    pub fn parse(s: &str) -> Result<Self, DomainError> {
        match s {
            "supported" => Ok(CityStatus::Supported),
            "suspended" => Ok(CityStatus::Suspended),
            "unsupported" => Ok(CityStatus::Unsupported),
            other => Err(DomainError::InvalidInput(format!(
                "unknown city status: {other}"
            ))),
        }
    }

    pub fn is_supported(&self) -> bool {
        matches!(self, CityStatus::Supported)
    }
}

impl std::fmt::Display for CityStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request to create a new city under a country.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateCityRequest {
    pub country_id: Uuid,

    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    #[validate(custom(function = "validate_name"))]
    pub name: String,

    #[validate(custom(function = "validate_longitude"))]
    pub lon: f64,

    #[validate(custom(function = "validate_latitude"))]
    pub lat: f64,

    #[validate(custom(function = "validate_timezone"))]
    pub timezone: String,

    #[validate(custom(function = "validate_slug"))]
    pub slug: Option<String>,

    #[validate(length(max = 255, message = "Icon must be at most 255 characters"))]
    pub icon: Option<String>,
}

/// Request to edit a city. Absent fields are left unchanged.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct UpdateCityRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: Option<String>,

    #[validate(custom(function = "validate_longitude"))]
    pub lon: Option<f64>,

    #[validate(custom(function = "validate_latitude"))]
    pub lat: Option<f64>,

    #[validate(custom(function = "validate_timezone"))]
    pub timezone: Option<String>,

    #[validate(custom(function = "validate_slug"))]
    pub slug: Option<String>,

    #[validate(length(max = 255, message = "Icon must be at most 255 characters"))]
    pub icon: Option<String>,
}

impl UpdateCityRequest {
    /// True when the request carries no changes at all.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.lon.is_none()
            && self.lat.is_none()
            && self.timezone.is_none()
            && self.slug.is_none()
            && self.icon.is_none()
    }
}

/// Request to change a city's status directly.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SetCityStatusRequest {
    pub status: CityStatus,
}

/// Query parameters for listing cities.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub struct ListCitiesQuery {
    pub country_id: Option<Uuid>,
    pub status: Option<CityStatus>,
    pub page: Option<i64>,
    pub size: Option<i64>,
}

impl ListCitiesQuery {
    pub fn page_query(&self) -> PageQuery {
        PageQuery {
            page: self.page,
            size: self.size,
        }
    }
}

/// City response payload.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct CityResponse {
    pub id: Uuid,
    pub country_id: Uuid,
    pub name: String,
    pub lon: f64,
    pub lat: f64,
    pub timezone: String,
    pub status: CityStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
