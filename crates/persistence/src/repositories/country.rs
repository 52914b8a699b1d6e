//! Repository for country database operations.

use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::entities::CountryEntity;
use crate::metrics::QueryTimer;

/// Repository for country operations.
#[derive(Clone)]
pub struct CountryRepository {
    pool: PgPool,
}

impl CountryRepository {
    /// Creates a new country repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates a new country. Status starts as `unsupported`.
    ///
    /// The unique index on the name converts a duplicate create into a
    /// distinct constraint violation.
    pub async fn create(&self, name: &str) -> Result<CountryEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_country");
        let result = sqlx::query_as::<_, CountryEntity>(
            r#"
            INSERT INTO countries (name)
            VALUES ($1)
            RETURNING id, name, status, created_at, updated_at
            "#,
        )
        .bind(name)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Finds a country by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<CountryEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_country_by_id");
        let result = sqlx::query_as::<_, CountryEntity>(
            r#"
            SELECT id, name, status, created_at, updated_at
            FROM countries
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Lists countries ordered by name.
    pub async fn list(&self, limit: i64, offset: i64) -> Result<Vec<CountryEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_countries");
        let result = sqlx::query_as::<_, CountryEntity>(
            r#"
            SELECT id, name, status, created_at, updated_at
            FROM countries
            ORDER BY name
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Counts all countries.
    pub async fn count(&self) -> Result<i64, sqlx::Error> {
        let result: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM countries")
            .fetch_one(&self.pool)
            .await?;
        Ok(result.0)
    }

    /// Updates a country's status inside a transaction.
    pub async fn update_status(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        id: Uuid,
        status: &str,
    ) -> Result<Option<CountryEntity>, sqlx::Error> {
        sqlx::query_as::<_, CountryEntity>(
            r#"
            UPDATE countries
            SET status = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, status, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(status)
        .fetch_optional(&mut **tx)
        .await
    }
}
