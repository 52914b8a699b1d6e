//! Invitation lifecycle service.
//!
//! Creation issues a signed one-time token alongside a persisted invite
//! record; redemption validates both and creates the governor row inside a
//! single transaction. Expiry is enforced lazily at answer time; there is
//! no background reaper, so an expired unanswered invite simply stays
//! `sent` and unusable.

use std::sync::Arc;

use chrono::{Duration, Utc};
use domain::error::DomainError;
use domain::models::{GovRole, InviteStatus};
use domain::services::role_policy;
use domain::services::{EventKind, EventPublisher, GovernorEvent, InviteEvent};
use persistence::entities::{GovernorEntity, InviteEntity};
use persistence::repositories::{
    unique_constraint, CityRepository, GovernorRepository, InviteRepository,
};
use shared::crypto::sha256_hex;
use shared::invite_token::InviteTokenCodec;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::extractors::Identity;

/// Service for creating and answering invites.
pub struct InviteService {
    pool: PgPool,
    codec: InviteTokenCodec,
    publisher: Arc<dyn EventPublisher>,
    default_ttl_hours: i64,
}

impl InviteService {
    /// Creates a new invite service.
    pub fn new(
        pool: PgPool,
        codec: InviteTokenCodec,
        publisher: Arc<dyn EventPublisher>,
        default_ttl_hours: i64,
    ) -> Self {
        Self {
            pool,
            codec,
            publisher,
            default_ttl_hours,
        }
    }

    /// Creates an invite for a role in a city.
    ///
    /// Returns the persisted invite and the one-time plaintext token. The
    /// token is unrecoverable afterwards: only its hash is stored.
    pub async fn create(
        &self,
        actor: Identity,
        city_id: Uuid,
        role: &str,
        ttl_hours: Option<i64>,
    ) -> Result<(InviteEntity, String), DomainError> {
        let role = GovRole::parse(role)?;

        let city = CityRepository::new(self.pool.clone())
            .find_by_id(city_id)
            .await?
            .ok_or(DomainError::CityNotFound)?;
        if !city.is_supported() {
            return Err(DomainError::CityNotSupported);
        }

        // Non-operators must hold a governorship in the target city and be
        // allowed to hand out the requested role.
        if !actor.operator {
            let governor = GovernorRepository::new(self.pool.clone())
                .find_by_user(actor.user_id)
                .await?
                .ok_or(DomainError::NotCityGovernor)?;
            if governor.city_id != city_id {
                return Err(DomainError::NotCityGovernor);
            }
            let actor_role = parse_stored_role(&governor.role)?;
            if !role_policy::can_grant(actor_role, role) {
                return Err(DomainError::NotEnoughRights);
            }
        }

        let invite_id = Uuid::new_v4();
        let ttl = ttl_hours.unwrap_or(self.default_ttl_hours);
        let expires_at = Utc::now() + Duration::hours(ttl);
        let token = self.codec.issue(invite_id, city_id, role.as_str(), expires_at)?;

        let invite = InviteRepository::new(self.pool.clone())
            .create(
                invite_id,
                city_id,
                role.as_str(),
                &sha256_hex(&token),
                expires_at,
            )
            .await?;

        info!(
            invite_id = %invite.id,
            city_id = %city_id,
            role = %role,
            "Created invite"
        );

        self.publisher
            .publish_invite(
                InviteEvent {
                    kind: EventKind::InviteCreated,
                    invite_id: invite.id,
                    city_id,
                    role,
                    timestamp: Utc::now(),
                },
                &[],
            )
            .await;

        Ok((invite, token))
    }

    /// Redeems a presented token, creating the governor row.
    ///
    /// All gating reads and mutations run inside one transaction; the row
    /// lock on the invite serializes concurrent accept attempts, so the
    /// loser observes the winner's terminal status.
    pub async fn accept(
        &self,
        user_id: Uuid,
        token: &str,
    ) -> Result<GovernorEntity, DomainError> {
        let claims = self.codec.verify(token)?;

        let invite_repo = InviteRepository::new(self.pool.clone());
        let city_repo = CityRepository::new(self.pool.clone());
        let governor_repo = GovernorRepository::new(self.pool.clone());

        let mut tx = self.pool.begin().await?;

        let invite = invite_repo
            .find_by_id_for_update(&mut tx, claims.invite_id())
            .await?
            .ok_or(DomainError::InviteNotFound)?;

        // A validly signed token can still be stale; the stored record is
        // authoritative for hash, city and role.
        if invite.token_hash != sha256_hex(token)
            || invite.city_id != claims.city_id()
            || invite.role != claims.role
        {
            return Err(DomainError::InvalidInviteToken);
        }
        if !invite.is_sent() {
            return Err(DomainError::InviteAlreadyAnswered);
        }
        if invite.is_expired() {
            return Err(DomainError::InviteExpired);
        }

        // One governorship per user, system-wide.
        if governor_repo
            .find_by_user_for_update(&mut tx, user_id)
            .await?
            .is_some()
        {
            return Err(DomainError::UserAlreadyGovernor);
        }

        let city = city_repo
            .find_by_id_for_update(&mut tx, invite.city_id)
            .await?
            .ok_or(DomainError::CityNotFound)?;
        if !city.is_supported() {
            return Err(DomainError::CityNotSupported);
        }

        let role = parse_stored_role(&invite.role)?;

        // A singleton role displaces its current holder in the same
        // transaction; the partial unique index backs this up if two
        // accepts race past the read.
        let mut displaced = None;
        if role_policy::is_singleton(role) {
            if let Some(holder) = governor_repo
                .find_by_city_and_role_for_update(&mut tx, invite.city_id, role.as_str())
                .await?
            {
                governor_repo.delete_by_user(&mut tx, holder.user_id).await?;
                displaced = Some(holder);
            }
        }

        let governor = governor_repo
            .insert(&mut tx, user_id, invite.city_id, role.as_str(), None)
            .await
            .map_err(map_governor_insert_error)?;

        invite_repo
            .mark_answered(&mut tx, invite.id, InviteStatus::Accepted.as_str(), user_id)
            .await?
            .ok_or(DomainError::InviteAlreadyAnswered)?;

        tx.commit().await?;

        info!(
            invite_id = %invite.id,
            user_id = %user_id,
            city_id = %invite.city_id,
            role = %role,
            "Invite accepted"
        );

        let now = Utc::now();
        if let Some(holder) = displaced {
            self.publisher
                .publish_governor(
                    GovernorEvent {
                        kind: EventKind::GovernorDeleted,
                        user_id: holder.user_id,
                        city_id: holder.city_id,
                        role,
                        timestamp: now,
                    },
                    &[holder.user_id],
                )
                .await;
        }
        self.publisher
            .publish_invite(
                InviteEvent {
                    kind: EventKind::InviteAccepted,
                    invite_id: invite.id,
                    city_id: invite.city_id,
                    role,
                    timestamp: now,
                },
                &[user_id],
            )
            .await;
        self.publisher
            .publish_governor(
                GovernorEvent {
                    kind: EventKind::GovernorCreated,
                    user_id,
                    city_id: invite.city_id,
                    role,
                    timestamp: now,
                },
                &[user_id],
            )
            .await;

        Ok(governor)
    }

    /// Declines an invite by ID. Terminal; same guards as accepting, but
    /// no governor row is created.
    pub async fn decline(
        &self,
        user_id: Uuid,
        invite_id: Uuid,
    ) -> Result<InviteEntity, DomainError> {
        let invite_repo = InviteRepository::new(self.pool.clone());

        let mut tx = self.pool.begin().await?;

        let invite = invite_repo
            .find_by_id_for_update(&mut tx, invite_id)
            .await?
            .ok_or(DomainError::InviteNotFound)?;
        if !invite.is_sent() {
            return Err(DomainError::InviteAlreadyAnswered);
        }
        if invite.is_expired() {
            return Err(DomainError::InviteExpired);
        }

        let invite = invite_repo
            .mark_answered(&mut tx, invite_id, InviteStatus::Declined.as_str(), user_id)
            .await?
            .ok_or(DomainError::InviteAlreadyAnswered)?;

        tx.commit().await?;

        info!(invite_id = %invite.id, user_id = %user_id, "Invite declined");

        let role = parse_stored_role(&invite.role)?;
        self.publisher
            .publish_invite(
                InviteEvent {
                    kind: EventKind::InviteDeclined,
                    invite_id: invite.id,
                    city_id: invite.city_id,
                    role,
                    timestamp: Utc::now(),
                },
                &[user_id],
            )
            .await;

        Ok(invite)
    }
}

/// Parses a role read back from storage.
///
/// The column carries a CHECK constraint, so a mismatch means corrupted
/// storage and must surface as internal, not as a caller error.
pub(crate) fn parse_stored_role(role: &str) -> Result<GovRole, DomainError> {
    GovRole::parse(role)
        .map_err(|_| DomainError::Internal(format!("corrupt stored role: {role}")))
}

/// Maps a governor insert failure to the matching conflict.
pub(crate) fn map_governor_insert_error(err: sqlx::Error) -> DomainError {
    match unique_constraint(&err).as_deref() {
        Some("governors_pkey") => DomainError::UserAlreadyGovernor,
        Some(_) => DomainError::GovernorAlreadyExists,
        None => DomainError::Database(err),
    }
}
