//! Repository for governor database operations.

use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::entities::GovernorEntity;
use crate::metrics::QueryTimer;

const GOVERNOR_COLUMNS: &str = "user_id, city_id, role, label, created_at, updated_at";

/// Repository for governor operations.
#[derive(Clone)]
pub struct GovernorRepository {
    pool: PgPool,
}

impl GovernorRepository {
    /// Creates a new governor repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Finds a user's governorship, if any.
    pub async fn find_by_user(&self, user_id: Uuid) -> Result<Option<GovernorEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_governor_by_user");
        let result = sqlx::query_as::<_, GovernorEntity>(&format!(
            r#"
            SELECT {GOVERNOR_COLUMNS}
            FROM governors
            WHERE user_id = $1
            "#
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Finds a user's governorship inside a transaction, taking a row lock.
    pub async fn find_by_user_for_update(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user_id: Uuid,
    ) -> Result<Option<GovernorEntity>, sqlx::Error> {
        sqlx::query_as::<_, GovernorEntity>(&format!(
            r#"
            SELECT {GOVERNOR_COLUMNS}
            FROM governors
            WHERE user_id = $1
            FOR UPDATE
            "#
        ))
        .bind(user_id)
        .fetch_optional(&mut **tx)
        .await
    }

    /// Finds the holder of a role in a city inside a transaction, taking a
    /// row lock. Used for singleton-role displacement.
    pub async fn find_by_city_and_role_for_update(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        city_id: Uuid,
        role: &str,
    ) -> Result<Option<GovernorEntity>, sqlx::Error> {
        sqlx::query_as::<_, GovernorEntity>(&format!(
            r#"
            SELECT {GOVERNOR_COLUMNS}
            FROM governors
            WHERE city_id = $1 AND role = $2
            FOR UPDATE
            "#
        ))
        .bind(city_id)
        .bind(role)
        .fetch_optional(&mut **tx)
        .await
    }

    /// Inserts a governor row inside a transaction.
    ///
    /// A unique violation here means a concurrent accept won the race;
    /// callers map it to a distinct conflict error.
    pub async fn insert(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user_id: Uuid,
        city_id: Uuid,
        role: &str,
        label: Option<&str>,
    ) -> Result<GovernorEntity, sqlx::Error> {
        sqlx::query_as::<_, GovernorEntity>(&format!(
            r#"
            INSERT INTO governors (user_id, city_id, role, label)
            VALUES ($1, $2, $3, $4)
            RETURNING {GOVERNOR_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(city_id)
        .bind(role)
        .bind(label)
        .fetch_one(&mut **tx)
        .await
    }

    /// Deletes a user's governorship inside a transaction.
    pub async fn delete_by_user(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user_id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM governors WHERE user_id = $1")
            .bind(user_id)
            .execute(&mut **tx)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Deletes all governors of a city. Returns the affected user IDs.
    pub async fn delete_by_city(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        city_id: Uuid,
    ) -> Result<Vec<Uuid>, sqlx::Error> {
        let rows: Vec<(Uuid,)> =
            sqlx::query_as("DELETE FROM governors WHERE city_id = $1 RETURNING user_id")
                .bind(city_id)
                .fetch_all(&mut **tx)
                .await?;
        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    /// Deletes all governors attached to any city of a country.
    /// Returns the affected user IDs. Used by the country status cascade.
    pub async fn delete_by_country(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        country_id: Uuid,
    ) -> Result<Vec<Uuid>, sqlx::Error> {
        let rows: Vec<(Uuid,)> = sqlx::query_as(
            r#"
            DELETE FROM governors
            WHERE city_id IN (SELECT id FROM cities WHERE country_id = $1)
            RETURNING user_id
            "#,
        )
        .bind(country_id)
        .fetch_all(&mut **tx)
        .await?;
        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    /// Lists governors of a city ordered by seniority.
    pub async fn list_by_city(
        &self,
        city_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<GovernorEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_governors_by_city");
        let result = sqlx::query_as::<_, GovernorEntity>(&format!(
            r#"
            SELECT {GOVERNOR_COLUMNS}
            FROM governors
            WHERE city_id = $1
            ORDER BY created_at
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

    /// Counts governors of a city.
    pub async fn count_by_city(&self, city_id: Uuid) -> Result<i64, sqlx::Error> {
        let result: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM governors WHERE city_id = $1")
            .bind(city_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(result.0)
    }

    /// Updates a governor's label. `None` clears it.
    pub async fn update_label(
        &self,
        user_id: Uuid,
        label: Option<&str>,
    ) -> Result<Option<GovernorEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_governor_label");
        let result = sqlx::query_as::<_, GovernorEntity>(&format!(
            r#"
            UPDATE governors
            SET label = $2, updated_at = NOW()
            WHERE user_id = $1
            RETURNING {GOVERNOR_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(label)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }
}
