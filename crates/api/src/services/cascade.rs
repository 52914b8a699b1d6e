//! Status cascade coordinator.
//!
//! Country and city status transitions are operator actions; leaving
//! `supported` cascades downward in the same transaction, so a failure
//! anywhere leaves the pre-cascade state fully intact.

use std::sync::Arc;

use chrono::Utc;
use domain::error::DomainError;
use domain::models::{CityStatus, CountryStatus};
use domain::services::{CityEvent, CountryCascadeEvent, EventKind, EventPublisher};
use persistence::entities::{CityEntity, CountryEntity};
use persistence::repositories::{CityRepository, CountryRepository, GovernorRepository};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::extractors::Identity;

/// Service applying status transitions and their cascades.
pub struct CascadeService {
    pool: PgPool,
    publisher: Arc<dyn EventPublisher>,
}

impl CascadeService {
    /// Creates a new cascade service.
    pub fn new(pool: PgPool, publisher: Arc<dyn EventPublisher>) -> Self {
        Self { pool, publisher }
    }

    /// Sets a country's status.
    ///
    /// Moving away from `supported` forces every supported city of the
    /// country out of `supported` and deletes all governors attached to
    /// its cities, atomically. Returns the country and the affected city
    /// IDs.
    pub async fn set_country_status(
        &self,
        actor: Identity,
        country_id: Uuid,
        status: CountryStatus,
    ) -> Result<(CountryEntity, Vec<Uuid>), DomainError> {
        if !actor.operator {
            return Err(DomainError::OperatorRequired);
        }

        let country_repo = CountryRepository::new(self.pool.clone());
        let city_repo = CityRepository::new(self.pool.clone());
        let governor_repo = GovernorRepository::new(self.pool.clone());

        let mut tx = self.pool.begin().await?;

        let country = country_repo
            .update_status(&mut tx, country_id, status.as_str())
            .await?
            .ok_or(DomainError::CountryNotFound)?;

        let mut affected_cities = Vec::new();
        if !status.is_supported() {
            affected_cities = city_repo
                .demote_supported_by_country(&mut tx, country_id, CityStatus::Unsupported.as_str())
                .await?;
            let removed = governor_repo.delete_by_country(&mut tx, country_id).await?;
            info!(
                country_id = %country_id,
                status = %status,
                cities = affected_cities.len(),
                governors = removed.len(),
                "Cascaded country status change"
            );
        }

        tx.commit().await?;

        self.publisher
            .publish_country(CountryCascadeEvent {
                kind: EventKind::CountryUpdated,
                country_id,
                status,
                affected_city_ids: affected_cities.clone(),
                timestamp: Utc::now(),
            })
            .await;

        Ok((country, affected_cities))
    }

    /// Sets a city's status.
    ///
    /// Any status other than `supported` deletes the city's governors in
    /// the same transaction. Transitioning into `supported` never
    /// auto-creates governors; a fresh invite cycle is required.
    pub async fn set_city_status(
        &self,
        actor: Identity,
        city_id: Uuid,
        status: CityStatus,
    ) -> Result<CityEntity, DomainError> {
        if !actor.operator {
            return Err(DomainError::OperatorRequired);
        }

        let city_repo = CityRepository::new(self.pool.clone());
        let governor_repo = GovernorRepository::new(self.pool.clone());

        let mut tx = self.pool.begin().await?;

        let city = city_repo
            .update_status(&mut tx, city_id, status.as_str())
            .await?
            .ok_or(DomainError::CityNotFound)?;

        let mut removed = Vec::new();
        if !status.is_supported() {
            removed = governor_repo.delete_by_city(&mut tx, city_id).await?;
        }

        tx.commit().await?;

        info!(
            city_id = %city_id,
            status = %status,
            governors_removed = removed.len(),
            "City status changed"
        );

        self.publisher
            .publish_city(
                CityEvent {
                    kind: EventKind::CityStatusChanged,
                    city_id,
                    country_id: city.country_id,
                    status,
                    timestamp: Utc::now(),
                },
                &removed,
            )
            .await;

        Ok(city)
    }
}
