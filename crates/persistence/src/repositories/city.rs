//! Repository for city database operations.

use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::entities::CityEntity;
use crate::metrics::QueryTimer;

const CITY_COLUMNS: &str =
    "id, country_id, name, lon, lat, timezone, status, slug, icon, created_at, updated_at";

/// Input for creating a city.
#[derive(Debug, Clone)]
pub struct CityInput<'a> {
    pub country_id: Uuid,
    pub name: &'a str,
    pub lon: f64,
    pub lat: f64,
    pub timezone: &'a str,
    pub slug: Option<&'a str>,
    pub icon: Option<&'a str>,
}

/// Repository for city operations.
#[derive(Clone)]
pub struct CityRepository {
    pool: PgPool,
}

impl CityRepository {
    /// Creates a new city repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates a new city. Status starts as `unsupported`.
    pub async fn create(&self, input: CityInput<'_>) -> Result<CityEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_city");
        let result = sqlx::query_as::<_, CityEntity>(&format!(
            r#"
            INSERT INTO cities (country_id, name, lon, lat, timezone, slug, icon)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {CITY_COLUMNS}
            "#
        ))
        .bind(input.country_id)
        .bind(input.name)
        .bind(input.lon)
        .bind(input.lat)
        .bind(input.timezone)
        .bind(input.slug)
        .bind(input.icon)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Finds a city by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<CityEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_city_by_id");
        let result = sqlx::query_as::<_, CityEntity>(&format!(
            r#"
            SELECT {CITY_COLUMNS}
            FROM cities
            WHERE id = $1
            "#
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Finds a city by ID inside a transaction, taking a row lock.
    ///
    /// Gating reads (e.g. "is the city still supported") must run inside
    /// the same transaction as the write they gate.
    pub async fn find_by_id_for_update(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        id: Uuid,
    ) -> Result<Option<CityEntity>, sqlx::Error> {
        sqlx::query_as::<_, CityEntity>(&format!(
            r#"
            SELECT {CITY_COLUMNS}
            FROM cities
            WHERE id = $1
            FOR UPDATE
            "#
        ))
        .bind(id)
        .fetch_optional(&mut **tx)
        .await
    }

    /// Lists cities with optional country and status filters.
    pub async fn list(
        &self,
        country_id: Option<Uuid>,
        status: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<CityEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_cities");
        let result = sqlx::query_as::<_, CityEntity>(&format!(
            r#"
            SELECT {CITY_COLUMNS}
            FROM cities
            WHERE ($1::uuid IS NULL OR country_id = $1)
              AND ($2::text IS NULL OR status = $2)
            ORDER BY name
            LIMIT $3 OFFSET $4
            "#
        ))
        .bind(country_id)
        .bind(status)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Counts cities matching the list filters.
    pub async fn count(
        &self,
        country_id: Option<Uuid>,
        status: Option<&str>,
    ) -> Result<i64, sqlx::Error> {
        let result: (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*)
            FROM cities
            WHERE ($1::uuid IS NULL OR country_id = $1)
              AND ($2::text IS NULL OR status = $2)
            "#,
        )
        .bind(country_id)
        .bind(status)
        .fetch_one(&self.pool)
        .await?;
        Ok(result.0)
    }

    /// Applies a partial edit. Absent fields keep their current value.
    #[allow(clippy::too_many_arguments)]
    pub async fn update(
        &self,
        id: Uuid,
        name: Option<&str>,
        lon: Option<f64>,
        lat: Option<f64>,
        timezone: Option<&str>,
        slug: Option<&str>,
        icon: Option<&str>,
    ) -> Result<Option<CityEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_city");
        let result = sqlx::query_as::<_, CityEntity>(&format!(
            r#"
            UPDATE cities
            SET name = COALESCE($2, name),
                lon = COALESCE($3, lon),
                lat = COALESCE($4, lat),
                timezone = COALESCE($5, timezone),
                slug = COALESCE($6, slug),
                icon = COALESCE($7, icon),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {CITY_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(name)
        .bind(lon)
        .bind(lat)
        .bind(timezone)
        .bind(slug)
        .bind(icon)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Updates a city's status inside a transaction.
    pub async fn update_status(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        id: Uuid,
        status: &str,
    ) -> Result<Option<CityEntity>, sqlx::Error> {
        sqlx::query_as::<_, CityEntity>(&format!(
            r#"
            UPDATE cities
            SET status = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING {CITY_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(status)
        .fetch_optional(&mut **tx)
        .await
    }

    /// Forces every `supported` city of a country to the given status.
    ///
    /// Returns the IDs of the cities that changed. Used by the country
    /// status cascade.
    pub async fn demote_supported_by_country(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        country_id: Uuid,
        status: &str,
    ) -> Result<Vec<Uuid>, sqlx::Error> {
        let rows: Vec<(Uuid,)> = sqlx::query_as(
            r#"
            UPDATE cities
            SET status = $2, updated_at = NOW()
            WHERE country_id = $1 AND status = 'supported'
            RETURNING id
            "#,
        )
        .bind(country_id)
        .bind(status)
        .fetch_all(&mut **tx)
        .await?;
        Ok(rows.into_iter().map(|(id,)| id).collect())
    }
}
