//! Governor entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the governors table.
///
/// `user_id` is the primary key: a user holds at most one governorship
/// system-wide.
#[derive(Debug, Clone, FromRow)]
pub struct GovernorEntity {
    pub user_id: Uuid,
    pub city_id: Uuid,
    pub role: String,
    pub label: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
