//! Governance service over existing governor records.
//!
//! Enforces the structural invariants shared by resignation, demotion and
//! label edits: the singleton top role can only leave office by
//! displacement or cascade, and managing another governor requires
//! strictly higher rank (or operator access).

use std::sync::Arc;

use chrono::Utc;
use domain::error::DomainError;
use domain::services::role_policy;
use domain::services::{EventKind, EventPublisher, GovernorEvent};
use persistence::entities::GovernorEntity;
use persistence::repositories::GovernorRepository;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::extractors::Identity;
use crate::services::invites::parse_stored_role;

/// Service for mutating governor records.
pub struct GovernanceService {
    pool: PgPool,
    publisher: Arc<dyn EventPublisher>,
}

impl GovernanceService {
    /// Creates a new governance service.
    pub fn new(pool: PgPool, publisher: Arc<dyn EventPublisher>) -> Self {
        Self { pool, publisher }
    }

    /// Loads the caller's own governorship.
    pub async fn get_own(&self, user_id: Uuid) -> Result<GovernorEntity, DomainError> {
        GovernorRepository::new(self.pool.clone())
            .find_by_user(user_id)
            .await?
            .ok_or(DomainError::GovernorNotFound)
    }

    /// Self-service resignation.
    ///
    /// The mayor cannot step down directly: the role must first be
    /// reassigned through a fresh invite cycle.
    pub async fn refuse_own(&self, user_id: Uuid) -> Result<(), DomainError> {
        let governor_repo = GovernorRepository::new(self.pool.clone());

        let mut tx = self.pool.begin().await?;

        let governor = governor_repo
            .find_by_user_for_update(&mut tx, user_id)
            .await?
            .ok_or(DomainError::GovernorNotFound)?;
        let role = parse_stored_role(&governor.role)?;
        if role_policy::is_singleton(role) {
            return Err(DomainError::CannotRefuseMayor);
        }

        governor_repo.delete_by_user(&mut tx, user_id).await?;
        tx.commit().await?;

        info!(user_id = %user_id, city_id = %governor.city_id, "Governor resigned");

        self.publisher
            .publish_governor(
                GovernorEvent {
                    kind: EventKind::GovernorDeleted,
                    user_id,
                    city_id: governor.city_id,
                    role,
                    timestamp: Utc::now(),
                },
                &[user_id],
            )
            .await;

        Ok(())
    }

    /// Removes another user's governorship in a city.
    ///
    /// Operators bypass rank checks; any other actor must govern the same
    /// city with strictly higher rank than the target. The singleton guard
    /// applies the same way as for resignation.
    pub async fn delete_other(
        &self,
        actor: Identity,
        city_id: Uuid,
        target_user_id: Uuid,
    ) -> Result<(), DomainError> {
        if actor.user_id == target_user_id {
            return self.refuse_own(actor.user_id).await;
        }

        let governor_repo = GovernorRepository::new(self.pool.clone());

        let mut tx = self.pool.begin().await?;

        let target = governor_repo
            .find_by_user_for_update(&mut tx, target_user_id)
            .await?
            .filter(|g| g.city_id == city_id)
            .ok_or(DomainError::GovernorNotFound)?;
        let target_role = parse_stored_role(&target.role)?;

        if !actor.operator {
            let actor_gov = governor_repo
                .find_by_user_for_update(&mut tx, actor.user_id)
                .await?
                .filter(|g| g.city_id == city_id)
                .ok_or(DomainError::NotCityGovernor)?;
            let actor_role = parse_stored_role(&actor_gov.role)?;
            if !role_policy::outranks(actor_role, target_role) {
                return Err(DomainError::NotEnoughRights);
            }
        }

        if role_policy::is_singleton(target_role) {
            return Err(DomainError::CannotRefuseMayor);
        }

        governor_repo.delete_by_user(&mut tx, target_user_id).await?;
        tx.commit().await?;

        info!(
            actor = %actor.user_id,
            target = %target_user_id,
            city_id = %city_id,
            "Governor removed"
        );

        self.publisher
            .publish_governor(
                GovernorEvent {
                    kind: EventKind::GovernorDeleted,
                    user_id: target_user_id,
                    city_id,
                    role: target_role,
                    timestamp: Utc::now(),
                },
                &[target_user_id],
            )
            .await;

        Ok(())
    }

    /// Updates a governor's display label.
    ///
    /// Self-service for one's own row; editing another's requires operator
    /// access or an outranking governorship in the same city.
    pub async fn update_label(
        &self,
        actor: Identity,
        target_user_id: Uuid,
        label: Option<&str>,
    ) -> Result<GovernorEntity, DomainError> {
        let governor_repo = GovernorRepository::new(self.pool.clone());

        let target = governor_repo
            .find_by_user(target_user_id)
            .await?
            .ok_or(DomainError::GovernorNotFound)?;

        if actor.user_id != target_user_id && !actor.operator {
            let actor_gov = governor_repo
                .find_by_user(actor.user_id)
                .await?
                .filter(|g| g.city_id == target.city_id)
                .ok_or(DomainError::NotCityGovernor)?;
            let actor_role = parse_stored_role(&actor_gov.role)?;
            let target_role = parse_stored_role(&target.role)?;
            if !role_policy::outranks(actor_role, target_role) {
                return Err(DomainError::NotEnoughRights);
            }
        }

        let updated = governor_repo
            .update_label(target_user_id, label)
            .await?
            .ok_or(DomainError::GovernorNotFound)?;

        let role = parse_stored_role(&updated.role)?;
        self.publisher
            .publish_governor(
                GovernorEvent {
                    kind: EventKind::GovernorUpdated,
                    user_id: updated.user_id,
                    city_id: updated.city_id,
                    role,
                    timestamp: Utc::now(),
                },
                &[target_user_id],
            )
            .await;

        Ok(updated)
    }
}
