// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Repository Factory - Application Layer
//!
//! Creates concrete repository implementations based on storage backend
//! configuration, keeping the domain layer free of infrastructure types.
//!
//! # Architecture
//!
//! - **Layer:** Application Layer
//! - **Purpose:** Wire `StorageBackend` to in-memory or PostgreSQL adapters

use std::sync::Arc;

use anyhow::Result;
use sqlx::PgPool;
use tracing::info;

use crate::domain::repository::{
    CountryRepository, EnterpriseRepository, LineItemRepository, OrderCycleRepository,
    OrderRepository, StorageBackend, ZoneRepository,
};
use crate::infrastructure::db::Database;
use crate::infrastructure::repositories::postgres_addressing::{
    PostgresCountryRepository, PostgresZoneRepository,
};
use crate::infrastructure::repositories::postgres_enterprise::PostgresEnterpriseRepository;
use crate::infrastructure::repositories::postgres_order::PostgresOrderRepository;
use crate::infrastructure::repositories::postgres_order_cycle::PostgresOrderCycleRepository;
use crate::infrastructure::repositories::{
    InMemoryCountryRepository, InMemoryEnterpriseRepository, InMemoryOrderCycleRepository,
    InMemoryOrderRepository, InMemoryZoneRepository,
};

/// Every repository the use cases need, behind their domain ports
#[derive(Clone)]
pub struct Repositories {
    pub enterprises: Arc<dyn EnterpriseRepository>,
    pub order_cycles: Arc<dyn OrderCycleRepository>,
    pub orders: Arc<dyn OrderRepository>,
    pub line_items: Arc<dyn LineItemRepository>,
    pub countries: Arc<dyn CountryRepository>,
    pub zones: Arc<dyn ZoneRepository>,
}

impl Repositories {
    pub fn in_memory() -> Self {
        // One store answers both the order and the line-item queries
        let orders = InMemoryOrderRepository::new();
        Self {
            enterprises: Arc::new(InMemoryEnterpriseRepository::new()),
            order_cycles: Arc::new(InMemoryOrderCycleRepository::new()),
            orders: Arc::new(orders.clone()),
            line_items: Arc::new(orders),
            countries: Arc::new(InMemoryCountryRepository::new()),
            zones: Arc::new(InMemoryZoneRepository::new()),
        }
    }

    pub fn postgres(pool: PgPool) -> Self {
        Self {
            enterprises: Arc::new(PostgresEnterpriseRepository::new(pool.clone())),
            order_cycles: Arc::new(PostgresOrderCycleRepository::new(pool.clone())),
            orders: Arc::new(PostgresOrderRepository::new(pool.clone())),
            line_items: Arc::new(PostgresOrderRepository::new(pool.clone())),
            countries: Arc::new(PostgresCountryRepository::new(pool.clone())),
            zones: Arc::new(PostgresZoneRepository::new(pool)),
        }
    }
}

/// Creates the repository bundle for the configured backend.
///
/// PostgreSQL backends are connected and migrated before use.
pub async fn create_repositories(backend: &StorageBackend, max_connections: u32) -> Result<Repositories> {
    match backend {
        StorageBackend::InMemory => {
            info!("Using in-memory repositories");
            Ok(Repositories::in_memory())
        }
        StorageBackend::PostgreSQL(config) => {
            info!("Connecting to PostgreSQL repositories");
            let database = Database::new(&config.connection_string, max_connections).await?;
            database.migrate().await?;
            Ok(Repositories::postgres(database.get_pool().clone()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::enterprise::{Enterprise, Owner};
    use crate::domain::order::{Order, OrderState, VariantSnapshot};
    use crate::domain::order_cycle::OrderCycle;
    use rust_decimal::Decimal;

    #[tokio::test]
    async fn test_in_memory_bundle_shares_order_store() {
        let repos = create_repositories(&StorageBackend::InMemory, 1).await.unwrap();
        let farm = Enterprise::new("Green Farm", Owner { email: "owner@farm.test".into(), locale: None });
        repos.enterprises.save(&farm).await.unwrap();
        assert!(repos.enterprises.find_by_id(farm.id).await.unwrap().is_some());

        let cycle = OrderCycle::new("Week 1", farm.id);
        let mut order = Order::new("R1", OrderState::Complete, cycle.id, farm.id);
        order.add_line_item(VariantSnapshot::new("Apples", farm.id), 1, Decimal::ONE);
        repos.orders.save(&order).await.unwrap();

        let items = repos
            .line_items
            .find_complete_for_supplier(cycle.id, farm.id)
            .await
            .unwrap();
        assert_eq!(items.len(), 1);
    }
}
