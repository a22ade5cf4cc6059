// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # PostgreSQL Order Repository
//!
//! `OrderRepository` and `LineItemRepository` over the `orders` and
//! `line_items` tables. Line items store a denormalised variant snapshot;
//! selected option values are kept as JSONB.

use crate::domain::enterprise::EnterpriseId;
use crate::domain::order::{
    LineItem, LineItemId, OptionValue, Order, OrderId, OrderState, VariantSnapshot,
};
use crate::domain::order_cycle::OrderCycleId;
use crate::domain::repository::{LineItemRepository, OrderRepository, RepositoryError};
use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::postgres::{PgPool, PgRow};
use sqlx::Row;
use std::collections::HashMap;
use uuid::Uuid;

const LINE_ITEM_COLUMNS: &str = r#"
    li.id, li.order_id, li.supplier_id, li.product_name, li.sku, li.unit_value,
    li.display_name, li.unit_presentation, li.option_values,
    li.quantity, li.price, li.adjustment_total, li.included_tax
"#;

pub struct PostgresOrderRepository {
    pool: PgPool,
}

impl PostgresOrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn line_item_from_row(row: &PgRow) -> Result<LineItem, RepositoryError> {
    let option_values: serde_json::Value = row.try_get("option_values")?;
    let option_values: Vec<OptionValue> = serde_json::from_value(option_values)?;
    let quantity: i32 = row.try_get("quantity")?;

    Ok(LineItem {
        id: LineItemId(row.try_get("id")?),
        order_id: OrderId(row.try_get("order_id")?),
        variant: VariantSnapshot {
            product_name: row.try_get("product_name")?,
            supplier_id: EnterpriseId(row.try_get("supplier_id")?),
            sku: row.try_get("sku")?,
            unit_value: row.try_get("unit_value")?,
            display_name: row.try_get("display_name")?,
            unit_presentation: row.try_get("unit_presentation")?,
            option_values,
        },
        quantity: u32::try_from(quantity)
            .map_err(|_| RepositoryError::Serialization(format!("Negative quantity: {}", quantity)))?,
        price: row.try_get::<Decimal, _>("price")?,
        adjustment_total: row.try_get::<Decimal, _>("adjustment_total")?,
        included_tax: row.try_get::<Decimal, _>("included_tax")?,
    })
}

#[async_trait]
impl OrderRepository for PostgresOrderRepository {
    async fn save(&self, order: &Order) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO orders (id, number, state, order_cycle_id, distributor_id)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (id) DO UPDATE SET
                number = EXCLUDED.number,
                state = EXCLUDED.state,
                order_cycle_id = EXCLUDED.order_cycle_id,
                distributor_id = EXCLUDED.distributor_id
            "#,
        )
        .bind(order.id.0)
        .bind(&order.number)
        .bind(order.state.as_str())
        .bind(order.order_cycle_id.0)
        .bind(order.distributor_id.0)
        .execute(&mut *tx)
        .await
        .map_err(|e| RepositoryError::Database(format!("Failed to save order: {}", e)))?;

        sqlx::query("DELETE FROM line_items WHERE order_id = $1")
            .bind(order.id.0)
            .execute(&mut *tx)
            .await?;

        for item in &order.line_items {
            let option_values = serde_json::to_value(&item.variant.option_values)?;
            let quantity = i32::try_from(item.quantity)
                .map_err(|_| RepositoryError::Serialization(format!("Quantity too large: {}", item.quantity)))?;

            sqlx::query(
                r#"
                INSERT INTO line_items (
                    id, order_id, supplier_id, product_name, sku, unit_value,
                    display_name, unit_presentation, option_values,
                    quantity, price, adjustment_total, included_tax
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
                "#,
            )
            .bind(item.id.0)
            .bind(order.id.0)
            .bind(item.variant.supplier_id.0)
            .bind(&item.variant.product_name)
            .bind(&item.variant.sku)
            .bind(item.variant.unit_value)
            .bind(&item.variant.display_name)
            .bind(&item.variant.unit_presentation)
            .bind(option_values)
            .bind(quantity)
            .bind(item.price)
            .bind(item.adjustment_total)
            .bind(item.included_tax)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn find_by_ids(&self, ids: &[OrderId]) -> Result<Vec<Order>, RepositoryError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let uuids: Vec<Uuid> = ids.iter().map(|id| id.0).collect();

        let order_rows = sqlx::query(
            r#"
            SELECT id, number, state, order_cycle_id, distributor_id
            FROM orders
            WHERE id = ANY($1)
            "#,
        )
        .bind(&uuids)
        .fetch_all(&self.pool)
        .await?;

        let item_rows = sqlx::query(&format!(
            "SELECT {} FROM line_items li WHERE li.order_id = ANY($1) ORDER BY li.id",
            LINE_ITEM_COLUMNS
        ))
        .bind(&uuids)
        .fetch_all(&self.pool)
        .await?;

        let mut items_by_order: HashMap<OrderId, Vec<LineItem>> = HashMap::new();
        for row in &item_rows {
            let item = line_item_from_row(row)?;
            items_by_order.entry(item.order_id).or_default().push(item);
        }

        let mut orders: HashMap<OrderId, Order> = HashMap::new();
        for row in order_rows {
            let id = OrderId(row.try_get("id")?);
            let state: String = row.try_get("state")?;
            let state = OrderState::parse(&state)
                .ok_or_else(|| RepositoryError::Serialization(format!("Unknown order state: {}", state)))?;
            orders.insert(
                id,
                Order {
                    id,
                    number: row.try_get("number")?,
                    state,
                    order_cycle_id: OrderCycleId(row.try_get("order_cycle_id")?),
                    distributor_id: EnterpriseId(row.try_get("distributor_id")?),
                    line_items: items_by_order.remove(&id).unwrap_or_default(),
                },
            );
        }

        // Preserve the caller's id order
        Ok(ids.iter().filter_map(|id| orders.remove(id)).collect())
    }
}

#[async_trait]
impl LineItemRepository for PostgresOrderRepository {
    async fn find_complete_for_supplier(
        &self,
        order_cycle_id: OrderCycleId,
        supplier_id: EnterpriseId,
    ) -> Result<Vec<LineItem>, RepositoryError> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {}
            FROM line_items li
            JOIN orders o ON o.id = li.order_id
            WHERE o.order_cycle_id = $1
              AND o.state = $2
              AND li.supplier_id = $3
            ORDER BY lower(li.product_name) ASC, li.unit_value ASC NULLS LAST, li.id ASC
            "#,
            LINE_ITEM_COLUMNS
        ))
        .bind(order_cycle_id.0)
        .bind(OrderState::Complete.as_str())
        .bind(supplier_id.0)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(line_item_from_row).collect()
    }
}
