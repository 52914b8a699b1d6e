//! Invite entity (database row mapping).
//!
//! Invites are never deleted; answered rows remain as an audit trail.

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the invites table.
#[derive(Debug, Clone, FromRow)]
pub struct InviteEntity {
    pub id: Uuid,
    pub city_id: Uuid,
    pub role: String,
    /// SHA-256 hex of the issued token. The plaintext token is never stored.
    pub token_hash: String,
    pub status: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub answered_at: Option<DateTime<Utc>>,
    pub answered_by: Option<Uuid>,
}

impl InviteEntity {
    /// Check if this invite is still unanswered.
    pub fn is_sent(&self) -> bool {
        self.status == "sent"
    }

    /// Check if this invite is past its stored deadline.
    ///
    /// Expiry is never persisted as a status; it is computed here, at the
    /// moment an answer is attempted.
    pub fn is_expired(&self) -> bool {
        self.expires_at < Utc::now()
    }

    /// Check if this invite can still be answered.
    pub fn is_answerable(&self) -> bool {
        self.is_sent() && !self.is_expired()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn create_test_invite(status: &str, expires_at: DateTime<Utc>) -> InviteEntity {
        InviteEntity {
            id: Uuid::new_v4(),
            city_id: Uuid::new_v4(),
            role: "mayor".to_string(),
            token_hash: "a".repeat(64),
            status: status.to_string(),
            expires_at,
            created_at: Utc::now(),
            answered_at: None,
            answered_by: None,
        }
    }

    #[test]
    fn test_is_answerable_sent_not_expired() {
        let invite = create_test_invite("sent", Utc::now() + Duration::hours(24));
        assert!(invite.is_answerable());
    }

    #[test]
    fn test_is_answerable_accepted() {
        let invite = create_test_invite("accepted", Utc::now() + Duration::hours(24));
        assert!(!invite.is_answerable());
    }

    #[test]
    fn test_is_answerable_expired() {
        let invite = create_test_invite("sent", Utc::now() - Duration::hours(1));
        assert!(invite.is_sent());
        assert!(invite.is_expired());
        assert!(!invite.is_answerable());
    }

    #[test]
    fn test_declined_is_not_sent() {
        let invite = create_test_invite("declined", Utc::now() + Duration::hours(24));
        assert!(!invite.is_sent());
    }
}
