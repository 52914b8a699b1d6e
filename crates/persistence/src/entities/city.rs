//! City entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the cities table.
#[derive(Debug, Clone, FromRow)]
pub struct CityEntity {
    pub id: Uuid,
    pub country_id: Uuid,
    pub name: String,
    pub lon: f64,
    pub lat: f64,
    pub timezone: String,
    pub status: String,
    pub slug: Option<String>,
    pub icon: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CityEntity {
    /// Check if this city currently accepts governance activity.
    ///
    /// A city outside `supported` can neither acquire new governors nor
    /// retain existing ones.
    pub fn is_supported(&self) -> bool {
        self.status == "supported"
    }
}
