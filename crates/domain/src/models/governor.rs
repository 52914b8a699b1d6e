//! Governor domain models.
//!
//! A governor record grants a user an active administrative role over one
//! city. Records are created only by accepting an invite; a user holds at
//! most one governorship at any time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::role::GovRole;

/// Request to change a governor's display label.
///
/// A `null` label clears it.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct UpdateLabelRequest {
    #[validate(length(max = 100, message = "Label must be at most 100 characters"))]
    pub label: Option<String>,
}

/// Governor response payload.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct GovernorResponse {
    pub user_id: Uuid,
    pub city_id: Uuid,
    pub role: GovRole,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
