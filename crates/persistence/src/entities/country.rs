//! Country entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the countries table.
#[derive(Debug, Clone, FromRow)]
pub struct CountryEntity {
    pub id: Uuid,
    pub name: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CountryEntity {
    /// Check if this country currently accepts city activity.
    pub fn is_supported(&self) -> bool {
        self.status == "supported"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_country(status: &str) -> CountryEntity {
        CountryEntity {
            id: Uuid::new_v4(),
            name: "Ukraine".to_string(),
            status: status.to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_is_supported() {
        assert!(create_test_country("supported").is_supported());
        assert!(!create_test_country("unsupported").is_supported());
        assert!(!create_test_country("deprecated").is_supported());
    }
}
