// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Repository Implementations
//!
//! This module provides infrastructure implementations of repository abstractions
//! defined in the domain layer, following the Repository pattern from DDD.
//!
//! # Architecture
//!
//! - **Layer:** Infrastructure
//! - **Purpose:** Persist and retrieve domain aggregates
//! - **Pattern:** Repository (DDD), Adapter (Hexagonal Architecture)
//!
//! # Available Implementations
//!
//! ## PostgreSQL Repositories
//!
//! - **PostgresEnterpriseRepository** - Enterprises with contact and owner
//! - **PostgresOrderCycleRepository** - Order cycles and their exchanges
//! - **PostgresOrderRepository** - Orders, line items and the report query
//! - **PostgresCountryRepository** / **PostgresZoneRepository** - Addressing
//!
//! ## In-Memory Repositories
//!
//! Lightweight implementations for testing and development, each a
//! thread-safe `HashMap` behind an `RwLock`.

pub mod postgres_addressing;
pub mod postgres_enterprise;
pub mod postgres_order;
pub mod postgres_order_cycle;

use crate::domain::addressing::{Country, CountryId, Zone, ZoneId};
use crate::domain::enterprise::{Enterprise, EnterpriseId};
use crate::domain::order::{LineItem, Order, OrderId};
use crate::domain::order_cycle::{OrderCycle, OrderCycleId};
use crate::domain::repository::{
    CountryRepository, EnterpriseRepository, LineItemRepository, OrderCycleRepository,
    OrderRepository, RepositoryError, ZoneRepository,
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

fn read<T>(lock: &RwLock<T>) -> Result<RwLockReadGuard<'_, T>, RepositoryError> {
    lock.read()
        .map_err(|_| RepositoryError::Unknown("Lock poisoned".to_string()))
}

fn write<T>(lock: &RwLock<T>) -> Result<RwLockWriteGuard<'_, T>, RepositoryError> {
    lock.write()
        .map_err(|_| RepositoryError::Unknown("Lock poisoned".to_string()))
}

#[derive(Clone, Default)]
pub struct InMemoryEnterpriseRepository {
    enterprises: Arc<RwLock<HashMap<EnterpriseId, Enterprise>>>,
}

impl InMemoryEnterpriseRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EnterpriseRepository for InMemoryEnterpriseRepository {
    async fn save(&self, enterprise: &Enterprise) -> Result<(), RepositoryError> {
        write(&self.enterprises)?.insert(enterprise.id, enterprise.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: EnterpriseId) -> Result<Option<Enterprise>, RepositoryError> {
        Ok(read(&self.enterprises)?.get(&id).cloned())
    }
}

#[derive(Clone, Default)]
pub struct InMemoryOrderCycleRepository {
    order_cycles: Arc<RwLock<HashMap<OrderCycleId, OrderCycle>>>,
}

impl InMemoryOrderCycleRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OrderCycleRepository for InMemoryOrderCycleRepository {
    async fn save(&self, order_cycle: &OrderCycle) -> Result<(), RepositoryError> {
        write(&self.order_cycles)?.insert(order_cycle.id, order_cycle.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: OrderCycleId) -> Result<Option<OrderCycle>, RepositoryError> {
        Ok(read(&self.order_cycles)?.get(&id).cloned())
    }
}

/// Orders with their line items; also answers the line-item report query
#[derive(Clone, Default)]
pub struct InMemoryOrderRepository {
    orders: Arc<RwLock<HashMap<OrderId, Order>>>,
}

impl InMemoryOrderRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OrderRepository for InMemoryOrderRepository {
    async fn save(&self, order: &Order) -> Result<(), RepositoryError> {
        write(&self.orders)?.insert(order.id, order.clone());
        Ok(())
    }

    async fn find_by_ids(&self, ids: &[OrderId]) -> Result<Vec<Order>, RepositoryError> {
        let orders = read(&self.orders)?;
        Ok(ids.iter().filter_map(|id| orders.get(id).cloned()).collect())
    }
}

#[async_trait]
impl LineItemRepository for InMemoryOrderRepository {
    async fn find_complete_for_supplier(
        &self,
        order_cycle_id: OrderCycleId,
        supplier_id: EnterpriseId,
    ) -> Result<Vec<LineItem>, RepositoryError> {
        let orders = read(&self.orders)?;
        let mut items: Vec<LineItem> = orders
            .values()
            .filter(|o| o.order_cycle_id == order_cycle_id && o.is_complete())
            .flat_map(|o| o.line_items.iter())
            .filter(|i| i.variant.supplier_id == supplier_id)
            .cloned()
            .collect();
        items.sort_by(LineItem::cmp_by_name_and_unit_value);
        Ok(items)
    }
}

#[derive(Clone, Default)]
pub struct InMemoryCountryRepository {
    countries: Arc<RwLock<HashMap<CountryId, Country>>>,
}

impl InMemoryCountryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CountryRepository for InMemoryCountryRepository {
    async fn save(&self, country: &Country) -> Result<(), RepositoryError> {
        write(&self.countries)?.insert(country.id, country.clone());
        Ok(())
    }

    async fn find_by_iso(&self, iso: &str) -> Result<Option<Country>, RepositoryError> {
        let iso = iso.trim();
        Ok(read(&self.countries)?
            .values()
            .find(|c| c.iso.eq_ignore_ascii_case(iso))
            .cloned())
    }
}

#[derive(Clone, Default)]
pub struct InMemoryZoneRepository {
    zones: Arc<RwLock<HashMap<ZoneId, Zone>>>,
}

impl InMemoryZoneRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> Result<usize, RepositoryError> {
        Ok(read(&self.zones)?.len())
    }
}

#[async_trait]
impl ZoneRepository for InMemoryZoneRepository {
    async fn find_by_name(&self, name: &str) -> Result<Option<Zone>, RepositoryError> {
        Ok(read(&self.zones)?.values().find(|z| z.name == name).cloned())
    }

    async fn find_or_create_by_name(&self, name: &str) -> Result<Zone, RepositoryError> {
        // Single write guard so concurrent callers cannot both create
        let mut zones = write(&self.zones)?;
        if let Some(zone) = zones.values().find(|z| z.name == name) {
            return Ok(zone.clone());
        }
        let zone = Zone::new(name);
        zones.insert(zone.id, zone.clone());
        Ok(zone)
    }

    async fn add_member(&self, zone: &Zone, country_id: CountryId) -> Result<Zone, RepositoryError> {
        let mut zones = write(&self.zones)?;
        let stored = zones
            .get_mut(&zone.id)
            .ok_or_else(|| RepositoryError::NotFound(format!("Zone {}", zone.name)))?;
        stored.add_member(country_id);
        Ok(stored.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::enterprise::Owner;
    use crate::domain::order::{OrderState, VariantSnapshot};
    use rust_decimal::Decimal;

    #[tokio::test]
    async fn test_enterprise_save_and_find() {
        let repo = InMemoryEnterpriseRepository::new();
        let farm = Enterprise::new("Green Farm", Owner { email: "owner@farm.test".into(), locale: None });
        repo.save(&farm).await.unwrap();

        assert_eq!(repo.find_by_id(farm.id).await.unwrap(), Some(farm));
        assert_eq!(repo.find_by_id(EnterpriseId::new()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_line_item_query_filters_and_sorts() {
        let repo = InMemoryOrderRepository::new();
        let supplier = EnterpriseId::new();
        let other_supplier = EnterpriseId::new();
        let distributor = EnterpriseId::new();
        let oc = OrderCycleId::new();

        let mut complete = Order::new("R100", OrderState::Complete, oc, distributor);
        complete.add_line_item(VariantSnapshot::new("zucchini", supplier), 1, Decimal::ONE);
        complete.add_line_item(VariantSnapshot::new("Apples", supplier), 1, Decimal::ONE);
        complete.add_line_item(VariantSnapshot::new("Bananas", other_supplier), 1, Decimal::ONE);

        let mut cart = Order::new("R101", OrderState::Cart, oc, distributor);
        cart.add_line_item(VariantSnapshot::new("Apples", supplier), 5, Decimal::ONE);

        let mut elsewhere = Order::new("R102", OrderState::Complete, OrderCycleId::new(), distributor);
        elsewhere.add_line_item(VariantSnapshot::new("Apples", supplier), 7, Decimal::ONE);

        for order in [&complete, &cart, &elsewhere] {
            repo.save(order).await.unwrap();
        }

        let items = repo.find_complete_for_supplier(oc, supplier).await.unwrap();
        let names: Vec<_> = items.iter().map(|i| i.variant.product_name.as_str()).collect();
        assert_eq!(names, vec!["Apples", "zucchini"]);
        assert!(items.iter().all(|i| i.order_id == complete.id));
    }

    #[tokio::test]
    async fn test_find_orders_by_ids_skips_unknown() {
        let repo = InMemoryOrderRepository::new();
        let order = Order::new("R1", OrderState::Complete, OrderCycleId::new(), EnterpriseId::new());
        repo.save(&order).await.unwrap();

        let found = repo.find_by_ids(&[order.id, OrderId::new()]).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].number, "R1");
    }

    #[tokio::test]
    async fn test_country_lookup_is_case_insensitive() {
        let repo = InMemoryCountryRepository::new();
        repo.save(&Country::new("AU", "Australia")).await.unwrap();

        assert!(repo.find_by_iso("au").await.unwrap().is_some());
        assert!(repo.find_by_iso("NZ").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_zone_find_or_create_and_membership() {
        let repo = InMemoryZoneRepository::new();
        let country = Country::new("AU", "Australia");

        let zone = repo.find_or_create_by_name("Australia").await.unwrap();
        let again = repo.find_or_create_by_name("Australia").await.unwrap();
        assert_eq!(zone.id, again.id);
        assert_eq!(repo.count().unwrap(), 1);

        let zone = repo.add_member(&zone, country.id).await.unwrap();
        let zone = repo.add_member(&zone, country.id).await.unwrap();
        assert_eq!(zone.members, vec![country.id]);

        let missing = repo.add_member(&Zone::new("Nowhere"), country.id).await;
        assert!(matches!(missing, Err(RepositoryError::NotFound(_))));
    }
}
