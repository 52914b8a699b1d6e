//! Country domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::validation::validate_name;
use uuid::Uuid;
use validator::Validate;

use crate::error::DomainError;

/// Support status of a country.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CountryStatus {
    Unsupported,
    Supported,
    Deprecated,
}

impl CountryStatus {
    /// Canonical storage representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            CountryStatus::Unsupported => "unsupported",
            CountryStatus::Supported => "supported",
            CountryStatus::Deprecated => "deprecated",
        }
    }

    /// Parses a stored status value.
    pub fn parse(s: &str) -> Result<Self, DomainError> {
        match s {
            "unsupported" => Ok(CountryStatus::Unsupported),
            "supported" => Ok(CountryStatus::Supported),
            "deprecated" => Ok(CountryStatus::Deprecated),
            other => Err(DomainError::InvalidInput(format!(
                "unknown country status: {other}"
            ))),
        }
    }

    pub fn is_supported(&self) -> bool {
        matches!(self, CountryStatus::Supported)
    }
}

impl std::fmt::Display for CountryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request to create a new country.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateCountryRequest {
    #[validate(length(min = 2, max = 100, message = "Name must be 2-100 characters"))]
    #[validate(custom(function = "validate_name"))]
    pub name: String,
}

/// Request to change a country's support status.
///
/// All status transitions are allowed; moving away from `supported`
/// cascades to the country's cities and their governors.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SetCountryStatusRequest {
    pub status: CountryStatus,
}

/// Country response payload.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct CountryResponse {
    pub id: Uuid,
    pub name: String,
    pub status: CountryStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
