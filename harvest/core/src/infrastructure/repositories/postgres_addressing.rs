// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # PostgreSQL Addressing Repositories
//!
//! `CountryRepository` over `countries` + `states` and `ZoneRepository` over
//! `zones` + `zone_members`. Zone creation and membership rely on the unique
//! constraints (`zones.name`, `zone_members` primary key) so repeated calls
//! never duplicate rows.

use crate::domain::addressing::{Country, CountryId, State, Zone, ZoneId};
use crate::domain::repository::{CountryRepository, RepositoryError, ZoneRepository};
use async_trait::async_trait;
use sqlx::postgres::PgPool;
use sqlx::Row;
use uuid::Uuid;

pub struct PostgresCountryRepository {
    pool: PgPool,
}

impl PostgresCountryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CountryRepository for PostgresCountryRepository {
    async fn save(&self, country: &Country) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO countries (id, iso, name)
            VALUES ($1, $2, $3)
            ON CONFLICT (id) DO UPDATE SET iso = EXCLUDED.iso, name = EXCLUDED.name
            "#,
        )
        .bind(country.id.0)
        .bind(&country.iso)
        .bind(&country.name)
        .execute(&mut *tx)
        .await
        .map_err(|e| RepositoryError::Database(format!("Failed to save country: {}", e)))?;

        sqlx::query("DELETE FROM states WHERE country_id = $1")
            .bind(country.id.0)
            .execute(&mut *tx)
            .await?;

        for (position, state) in country.states.iter().enumerate() {
            sqlx::query("INSERT INTO states (country_id, position, name, abbr) VALUES ($1, $2, $3, $4)")
                .bind(country.id.0)
                .bind(position as i32)
                .bind(&state.name)
                .bind(&state.abbr)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn find_by_iso(&self, iso: &str) -> Result<Option<Country>, RepositoryError> {
        let row = sqlx::query("SELECT id, iso, name FROM countries WHERE upper(iso) = upper($1)")
            .bind(iso.trim())
            .fetch_optional(&self.pool)
            .await?;

        let Some(row) = row else {
            return Ok(None);
        };
        let id: Uuid = row.try_get("id")?;

        let states = sqlx::query("SELECT name, abbr FROM states WHERE country_id = $1 ORDER BY position")
            .bind(id)
            .fetch_all(&self.pool)
            .await?
            .iter()
            .map(|s| -> Result<State, sqlx::Error> {
                Ok(State {
                    name: s.try_get("name")?,
                    abbr: s.try_get("abbr")?,
                })
            })
            .collect::<Result<Vec<_>, sqlx::Error>>()?;

        Ok(Some(Country {
            id: CountryId(id),
            iso: row.try_get("iso")?,
            name: row.try_get("name")?,
            states,
        }))
    }
}

pub struct PostgresZoneRepository {
    pool: PgPool,
}

impl PostgresZoneRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn load(&self, zone_id: Uuid, name: String) -> Result<Zone, RepositoryError> {
        let members = sqlx::query("SELECT country_id FROM zone_members WHERE zone_id = $1 ORDER BY position")
            .bind(zone_id)
            .fetch_all(&self.pool)
            .await?
            .iter()
            .map(|m| m.try_get::<Uuid, _>("country_id").map(CountryId))
            .collect::<Result<Vec<_>, sqlx::Error>>()?;

        Ok(Zone {
            id: ZoneId(zone_id),
            name,
            members,
        })
    }
}

#[async_trait]
impl ZoneRepository for PostgresZoneRepository {
    async fn find_by_name(&self, name: &str) -> Result<Option<Zone>, RepositoryError> {
        let row = sqlx::query("SELECT id, name FROM zones WHERE name = $1")
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(Some(self.load(row.try_get("id")?, row.try_get("name")?).await?)),
            None => Ok(None),
        }
    }

    async fn find_or_create_by_name(&self, name: &str) -> Result<Zone, RepositoryError> {
        sqlx::query("INSERT INTO zones (id, name) VALUES ($1, $2) ON CONFLICT (name) DO NOTHING")
            .bind(Uuid::new_v4())
            .bind(name)
            .execute(&self.pool)
            .await
            .map_err(|e| RepositoryError::Database(format!("Failed to create zone: {}", e)))?;

        self.find_by_name(name)
            .await?
            .ok_or_else(|| RepositoryError::NotFound(format!("Zone {}", name)))
    }

    async fn add_member(&self, zone: &Zone, country_id: CountryId) -> Result<Zone, RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO zone_members (zone_id, country_id)
            VALUES ($1, $2)
            ON CONFLICT (zone_id, country_id) DO NOTHING
            "#,
        )
        .bind(zone.id.0)
        .bind(country_id.0)
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::Database(format!("Failed to add zone member: {}", e)))?;

        self.load(zone.id.0, zone.name.clone()).await
    }
}
