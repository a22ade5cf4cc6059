// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # PostgreSQL Order Cycle Repository
//!
//! `OrderCycleRepository` over `order_cycles` and `order_cycle_exchanges`.
//! Outgoing exchanges are joined to `enterprises` for the distributor name and
//! its `next_collection_at` fallback.

use crate::domain::enterprise::EnterpriseId;
use crate::domain::order_cycle::{IncomingExchange, OrderCycle, OrderCycleId, OutgoingExchange};
use crate::domain::repository::{OrderCycleRepository, RepositoryError};
use async_trait::async_trait;
use sqlx::postgres::PgPool;
use sqlx::Row;

pub struct PostgresOrderCycleRepository {
    pool: PgPool,
}

impl PostgresOrderCycleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OrderCycleRepository for PostgresOrderCycleRepository {
    async fn save(&self, order_cycle: &OrderCycle) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO order_cycles (id, name, coordinator_id)
            VALUES ($1, $2, $3)
            ON CONFLICT (id) DO UPDATE SET
                name = EXCLUDED.name,
                coordinator_id = EXCLUDED.coordinator_id
            "#,
        )
        .bind(order_cycle.id.0)
        .bind(&order_cycle.name)
        .bind(order_cycle.coordinator_id.0)
        .execute(&mut *tx)
        .await
        .map_err(|e| RepositoryError::Database(format!("Failed to save order cycle: {}", e)))?;

        sqlx::query("DELETE FROM order_cycle_exchanges WHERE order_cycle_id = $1")
            .bind(order_cycle.id.0)
            .execute(&mut *tx)
            .await?;

        for (position, exchange) in order_cycle.incoming.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO order_cycle_exchanges
                    (order_cycle_id, enterprise_id, incoming, position, receival_instructions)
                VALUES ($1, $2, TRUE, $3, $4)
                "#,
            )
            .bind(order_cycle.id.0)
            .bind(exchange.supplier_id.0)
            .bind(position as i32)
            .bind(&exchange.receival_instructions)
            .execute(&mut *tx)
            .await?;
        }

        for (position, exchange) in order_cycle.outgoing.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO order_cycle_exchanges
                    (order_cycle_id, enterprise_id, incoming, position, pickup_time)
                VALUES ($1, $2, FALSE, $3, $4)
                "#,
            )
            .bind(order_cycle.id.0)
            .bind(exchange.distributor_id.0)
            .bind(position as i32)
            .bind(&exchange.pickup_time)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn find_by_id(&self, id: OrderCycleId) -> Result<Option<OrderCycle>, RepositoryError> {
        let row = sqlx::query("SELECT id, name, coordinator_id FROM order_cycles WHERE id = $1")
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let exchanges = sqlx::query(
            r#"
            SELECT x.enterprise_id, x.incoming, x.pickup_time, x.receival_instructions,
                   e.name AS enterprise_name, e.next_collection_at
            FROM order_cycle_exchanges x
            JOIN enterprises e ON e.id = x.enterprise_id
            WHERE x.order_cycle_id = $1
            ORDER BY x.incoming DESC, x.position ASC
            "#,
        )
        .bind(id.0)
        .fetch_all(&self.pool)
        .await?;

        let mut incoming = Vec::new();
        let mut outgoing = Vec::new();
        for exchange in exchanges {
            let enterprise_id = EnterpriseId(exchange.try_get("enterprise_id")?);
            if exchange.try_get::<bool, _>("incoming")? {
                incoming.push(IncomingExchange {
                    supplier_id: enterprise_id,
                    receival_instructions: exchange.try_get("receival_instructions")?,
                });
            } else {
                outgoing.push(OutgoingExchange {
                    distributor_id: enterprise_id,
                    distributor_name: exchange.try_get("enterprise_name")?,
                    pickup_time: exchange.try_get("pickup_time")?,
                    next_collection_at: exchange.try_get("next_collection_at")?,
                });
            }
        }

        Ok(Some(OrderCycle {
            id: OrderCycleId(row.try_get("id")?),
            name: row.try_get("name")?,
            coordinator_id: EnterpriseId(row.try_get("coordinator_id")?),
            incoming,
            outgoing,
        }))
    }
}
