//! Invite domain models.
//!
//! An invite is a persisted offer of a specific role in a specific city,
//! answerable exactly once before `expires_at`. "Expired" is never stored;
//! it is computed from `expires_at` when an answer is attempted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::error::DomainError;
use crate::models::role::GovRole;

/// Minimum invite lifetime in hours.
pub const MIN_INVITE_TTL_HOURS: i64 = 1;

/// Maximum invite lifetime in hours (30 days).
pub const MAX_INVITE_TTL_HOURS: i64 = 720;

/// Default invite lifetime in hours.
pub const DEFAULT_INVITE_TTL_HOURS: i64 = 24;

/// Lifecycle status of an invite. Terminal once answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InviteStatus {
    Sent,
    Accepted,
    Declined,
}

impl InviteStatus {
    /// Canonical storage representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            InviteStatus::Sent => "sent",
            InviteStatus::Accepted => "accepted",
            InviteStatus::Declined => "declined",
        }
    }

    /// Parses a stored status value.
    pub fn parse(s: &str) -> Result<Self, DomainError> {
        match s {
            "sent" => Ok(InviteStatus::Sent),
            "accepted" => Ok(InviteStatus::Accepted),
            "declined" => Ok(InviteStatus::Declined),
            other => Err(DomainError::InvalidInput(format!(
                "unknown invite status: {other}"
            ))),
        }
    }
}

impl std::fmt::Display for InviteStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request to create a new invite for a city.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateInviteRequest {
    /// Role to grant when accepted.
    pub role: String,

    /// Hours until expiration (1-720; default: 24).
    #[validate(range(min = 1, max = 720, message = "TTL must be between 1 and 720 hours"))]
    pub ttl_hours: Option<i64>,
}

/// Request to accept an invite by presenting its bearer token.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct AcceptInviteRequest {
    pub token: String,
}

/// Invite response payload (listing/getting; never carries the token).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct InviteResponse {
    pub id: Uuid,
    pub city_id: Uuid,
    pub role: GovRole,
    pub status: InviteStatus,
    /// Computed: still `sent` but past its deadline.
    pub expired: bool,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answered_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answered_by: Option<Uuid>,
}

/// Response after creating an invite.
///
/// The token is shown exactly once; the server keeps only a hash of it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct CreateInviteResponse {
    pub id: Uuid,
    pub city_id: Uuid,
    pub role: GovRole,
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// Query parameters for listing a city's invites.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub struct ListInvitesQuery {
    /// Filter: "sent", "accepted", "declined", "expired", "all" (default: "all").
    pub status: Option<String>,
    pub page: Option<i64>,
    pub size: Option<i64>,
}

impl ListInvitesQuery {
    pub fn page_query(&self) -> shared::pagination::PageQuery {
        shared::pagination::PageQuery {
            page: self.page,
            size: self.size,
        }
    }
}
