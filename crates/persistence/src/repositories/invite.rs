//! Repository for invite database operations.

use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::entities::InviteEntity;
use crate::metrics::QueryTimer;

const INVITE_COLUMNS: &str =
    "id, city_id, role, token_hash, status, expires_at, created_at, answered_at, answered_by";

/// Repository for invite operations.
#[derive(Clone)]
pub struct InviteRepository {
    pool: PgPool,
}

impl InviteRepository {
    /// Creates a new invite repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Persists a new invite with status `sent`.
    ///
    /// `token_hash` is the only trace of the issued token the server keeps.
    pub async fn create(
        &self,
        id: Uuid,
        city_id: Uuid,
        role: &str,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<InviteEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_invite");
        let result = sqlx::query_as::<_, InviteEntity>(&format!(
            r#"
            INSERT INTO invites (id, city_id, role, token_hash, expires_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {INVITE_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(city_id)
        .bind(role)
        .bind(token_hash)
        .bind(expires_at)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Finds an invite by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<InviteEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_invite_by_id");
        let result = sqlx::query_as::<_, InviteEntity>(&format!(
            r#"
            SELECT {INVITE_COLUMNS}
            FROM invites
            WHERE id = $1
            "#
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Finds an invite by ID inside a transaction, taking a row lock.
    ///
    /// Concurrent answer attempts serialize on this lock; the loser then
    /// observes the winner's terminal status.
    pub async fn find_by_id_for_update(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        id: Uuid,
    ) -> Result<Option<InviteEntity>, sqlx::Error> {
        sqlx::query_as::<_, InviteEntity>(&format!(
            r#"
            SELECT {INVITE_COLUMNS}
            FROM invites
            WHERE id = $1
            FOR UPDATE
            "#
        ))
        .bind(id)
        .fetch_optional(&mut **tx)
        .await
    }

    /// Marks a `sent` invite as answered. Terminal; never reversed.
    ///
    /// Returns `None` if the invite was already answered (race lost).
    pub async fn mark_answered(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        id: Uuid,
        status: &str,
        answered_by: Uuid,
    ) -> Result<Option<InviteEntity>, sqlx::Error> {
        sqlx::query_as::<_, InviteEntity>(&format!(
            r#"
            UPDATE invites
            SET status = $2, answered_at = NOW(), answered_by = $3
            WHERE id = $1 AND status = 'sent'
            RETURNING {INVITE_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(status)
        .bind(answered_by)
        .fetch_optional(&mut **tx)
        .await
    }

    /// Lists invites for a city with a status filter.
    ///
    /// Filter options:
    /// - "sent": unanswered and not past expiry
    /// - "accepted" / "declined": answered terminally
    /// - "expired": unanswered but past expiry
    /// - "all" or None: everything
    pub async fn list_by_city_with_status(
        &self,
        city_id: Uuid,
        status: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<InviteEntity>, sqlx::Error> {
        let predicate = Self::status_predicate(status);
        let timer = QueryTimer::new("list_invites_by_city");
        let result = sqlx::query_as::<_, InviteEntity>(&format!(
            r#"
            SELECT {INVITE_COLUMNS}
            FROM invites
            WHERE city_id = $1 AND {predicate}
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#
        ))
        .bind(city_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Counts invites for a city with the same status filter as listing.
    pub async fn count_by_city_with_status(
        &self,
        city_id: Uuid,
        status: Option<&str>,
    ) -> Result<i64, sqlx::Error> {
        let predicate = Self::status_predicate(status);
        let result: (i64,) = sqlx::query_as(&format!(
            r#"
            SELECT COUNT(*)
            FROM invites
            WHERE city_id = $1 AND {predicate}
            "#
        ))
        .bind(city_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(result.0)
    }

    /// SQL predicate for a status filter. "expired" is computed from
    /// `expires_at`, never read from the status column.
    fn status_predicate(status: Option<&str>) -> &'static str {
        match status {
            Some("sent") => "status = 'sent' AND expires_at > NOW()",
            Some("accepted") => "status = 'accepted'",
            Some("declined") => "status = 'declined'",
            Some("expired") => "status = 'sent' AND expires_at <= NOW()",
            _ => "TRUE",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_predicate_expired_is_computed() {
        let predicate = InviteRepository::status_predicate(Some("expired"));
        assert!(predicate.contains("expires_at"));
        assert!(predicate.contains("status = 'sent'"));
    }

    #[test]
    fn test_status_predicate_default_matches_all() {
        assert_eq!(InviteRepository::status_predicate(None), "TRUE");
        assert_eq!(InviteRepository::status_predicate(Some("all")), "TRUE");
    }
}
