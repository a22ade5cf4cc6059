// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Domain Repository Interfaces
//!
//! Persistence contracts for each aggregate root, following the DDD Repository
//! pattern: one repository per aggregate, interface defined in the domain layer,
//! implemented in `crate::infrastructure::repositories`.
//!
//! | Trait | Aggregate | Implementations |
//! |-------|-----------|----------------|
//! | `EnterpriseRepository` | `Enterprise` | `InMemoryEnterpriseRepository`, `PostgresEnterpriseRepository` |
//! | `OrderCycleRepository` | `OrderCycle` | `InMemoryOrderCycleRepository`, `PostgresOrderCycleRepository` |
//! | `OrderRepository` + `LineItemRepository` | `Order` | `InMemoryOrderRepository`, `PostgresOrderRepository` |
//! | `CountryRepository` | `Country` | `InMemoryCountryRepository`, `PostgresCountryRepository` |
//! | `ZoneRepository` | `Zone` | `InMemoryZoneRepository`, `PostgresZoneRepository` |
//!
//! ## Storage Backend Abstraction
//!
//! Concrete implementations are selected by the CLI from configuration. The
//! in-memory implementations back tests and `--in-memory` demo runs.

use crate::domain::addressing::{Country, CountryId, Zone};
use crate::domain::enterprise::{Enterprise, EnterpriseId};
use crate::domain::order::{LineItem, Order, OrderId};
use crate::domain::order_cycle::{OrderCycle, OrderCycleId};
use async_trait::async_trait;

/// Storage backend enum for pluggable persistence
#[derive(Debug, Clone)]
pub enum StorageBackend {
    InMemory,
    PostgreSQL(PostgresConfig),
}

#[derive(Debug, Clone)]
pub struct PostgresConfig {
    pub connection_string: String,
}

#[async_trait]
pub trait EnterpriseRepository: Send + Sync {
    /// Save enterprise (create or update)
    async fn save(&self, enterprise: &Enterprise) -> Result<(), RepositoryError>;

    async fn find_by_id(&self, id: EnterpriseId) -> Result<Option<Enterprise>, RepositoryError>;
}

#[async_trait]
pub trait OrderCycleRepository: Send + Sync {
    /// Save order cycle together with its exchanges
    async fn save(&self, order_cycle: &OrderCycle) -> Result<(), RepositoryError>;

    async fn find_by_id(&self, id: OrderCycleId) -> Result<Option<OrderCycle>, RepositoryError>;
}

#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Save order together with its line items
    async fn save(&self, order: &Order) -> Result<(), RepositoryError>;

    /// Find orders by id; unknown ids are skipped
    async fn find_by_ids(&self, ids: &[OrderId]) -> Result<Vec<Order>, RepositoryError>;
}

/// Read-side query over order line items
#[async_trait]
pub trait LineItemRepository: Send + Sync {
    /// Line items of complete orders in `order_cycle_id` whose product is
    /// supplied by `supplier_id`, sorted by product name then unit value.
    async fn find_complete_for_supplier(
        &self,
        order_cycle_id: OrderCycleId,
        supplier_id: EnterpriseId,
    ) -> Result<Vec<LineItem>, RepositoryError>;
}

#[async_trait]
pub trait CountryRepository: Send + Sync {
    async fn save(&self, country: &Country) -> Result<(), RepositoryError>;

    /// Find country by ISO code (case-insensitive)
    async fn find_by_iso(&self, iso: &str) -> Result<Option<Country>, RepositoryError>;
}

#[async_trait]
pub trait ZoneRepository: Send + Sync {
    async fn find_by_name(&self, name: &str) -> Result<Option<Zone>, RepositoryError>;

    /// Return the zone called `name`, creating it when absent
    async fn find_or_create_by_name(&self, name: &str) -> Result<Zone, RepositoryError>;

    /// Make `country_id` a member of the zone; no-op when already a member
    async fn add_member(&self, zone: &Zone, country_id: CountryId) -> Result<Zone, RepositoryError>;
}

/// Repository errors
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("Entity not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<sqlx::Error> for RepositoryError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => RepositoryError::NotFound("Row not found".to_string()),
            _ => RepositoryError::Database(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for RepositoryError {
    fn from(err: serde_json::Error) -> Self {
        RepositoryError::Serialization(err.to_string())
    }
}
