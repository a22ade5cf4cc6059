// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # PostgreSQL Enterprise Repository
//!
//! `EnterpriseRepository` backed by the `enterprises` table. Contact and owner
//! are stored as flat columns.

use crate::domain::enterprise::{Contact, Enterprise, EnterpriseId, Owner};
use crate::domain::repository::{EnterpriseRepository, RepositoryError};
use async_trait::async_trait;
use sqlx::postgres::PgPool;
use sqlx::Row;

pub struct PostgresEnterpriseRepository {
    pool: PgPool,
}

impl PostgresEnterpriseRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EnterpriseRepository for PostgresEnterpriseRepository {
    async fn save(&self, enterprise: &Enterprise) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO enterprises (
                id, name, contact_name, contact_email,
                owner_email, owner_locale, next_collection_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (id) DO UPDATE SET
                name = EXCLUDED.name,
                contact_name = EXCLUDED.contact_name,
                contact_email = EXCLUDED.contact_email,
                owner_email = EXCLUDED.owner_email,
                owner_locale = EXCLUDED.owner_locale,
                next_collection_at = EXCLUDED.next_collection_at
            "#,
        )
        .bind(enterprise.id.0)
        .bind(&enterprise.name)
        .bind(enterprise.contact.as_ref().and_then(|c| c.name.clone()))
        .bind(enterprise.contact.as_ref().map(|c| c.email.clone()))
        .bind(&enterprise.owner.email)
        .bind(&enterprise.owner.locale)
        .bind(&enterprise.next_collection_at)
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::Database(format!("Failed to save enterprise: {}", e)))?;

        Ok(())
    }

    async fn find_by_id(&self, id: EnterpriseId) -> Result<Option<Enterprise>, RepositoryError> {
        let row = sqlx::query(
            r#"
            SELECT id, name, contact_name, contact_email,
                   owner_email, owner_locale, next_collection_at
            FROM enterprises
            WHERE id = $1
            "#,
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let contact_email: Option<String> = row.try_get("contact_email")?;
        let contact = match contact_email {
            Some(email) => Some(Contact {
                name: row.try_get("contact_name")?,
                email,
            }),
            None => None,
        };

        Ok(Some(Enterprise {
            id: EnterpriseId(row.try_get("id")?),
            name: row.try_get("name")?,
            contact,
            owner: Owner {
                email: row.try_get("owner_email")?,
                locale: row.try_get("owner_locale")?,
            },
            next_collection_at: row.try_get("next_collection_at")?,
        }))
    }
}
