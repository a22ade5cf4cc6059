// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Order Cycle
//!
//! An order cycle links suppliers (incoming exchanges) and distributors
//! (outgoing exchanges) under a coordinating enterprise.
//!
//! # Architecture
//!
//! - **Layer:** Domain Layer
//! - **Purpose:** Pickup-time and receival-instruction lookups for reports

use crate::domain::enterprise::EnterpriseId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrderCycleId(pub Uuid);

impl OrderCycleId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_string(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

impl Default for OrderCycleId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for OrderCycleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Supplier → order cycle link
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncomingExchange {
    pub supplier_id: EnterpriseId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receival_instructions: Option<String>,
}

/// Order cycle → distributor link
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutgoingExchange {
    pub distributor_id: EnterpriseId,
    pub distributor_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pickup_time: Option<String>,
    /// Copy of the distributor's own `next_collection_at`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_collection_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderCycle {
    pub id: OrderCycleId,
    pub name: String,
    pub coordinator_id: EnterpriseId,
    #[serde(default)]
    pub incoming: Vec<IncomingExchange>,
    #[serde(default)]
    pub outgoing: Vec<OutgoingExchange>,
}

impl OrderCycle {
    pub fn new(name: impl Into<String>, coordinator_id: EnterpriseId) -> Self {
        Self {
            id: OrderCycleId::new(),
            name: name.into(),
            coordinator_id,
            incoming: Vec::new(),
            outgoing: Vec::new(),
        }
    }

    pub fn with_supplier(mut self, supplier_id: EnterpriseId, receival_instructions: Option<&str>) -> Self {
        self.incoming.push(IncomingExchange {
            supplier_id,
            receival_instructions: receival_instructions.map(str::to_string),
        });
        self
    }

    pub fn with_distributor(mut self, exchange: OutgoingExchange) -> Self {
        self.outgoing.push(exchange);
        self
    }

    /// Supplier ids in exchange order, without repeats
    pub fn suppliers(&self) -> Vec<EnterpriseId> {
        let mut ids = Vec::with_capacity(self.incoming.len());
        for exchange in &self.incoming {
            if !ids.contains(&exchange.supplier_id) {
                ids.push(exchange.supplier_id);
            }
        }
        ids
    }

    pub fn distributors(&self) -> impl Iterator<Item = &OutgoingExchange> {
        self.outgoing.iter()
    }

    pub fn pickup_time_for(&self, distributor_id: EnterpriseId) -> Option<String> {
        let exchange = self
            .outgoing
            .iter()
            .find(|e| e.distributor_id == distributor_id)?;
        exchange
            .pickup_time
            .clone()
            .filter(|t| !t.trim().is_empty())
            .or_else(|| exchange.next_collection_at.clone())
    }

    pub fn receival_instructions_for(&self, producer_id: EnterpriseId) -> Option<String> {
        self.incoming
            .iter()
            .find(|e| e.supplier_id == producer_id)
            .and_then(|e| e.receival_instructions.clone())
            .filter(|text| !text.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn distributor(name: &str, pickup: Option<&str>, fallback: Option<&str>) -> OutgoingExchange {
        OutgoingExchange {
            distributor_id: EnterpriseId::new(),
            distributor_name: name.to_string(),
            pickup_time: pickup.map(str::to_string),
            next_collection_at: fallback.map(str::to_string),
        }
    }

    #[test]
    fn test_pickup_time_prefers_exchange() {
        let hub = distributor("Hub", Some("Thursday 4pm"), Some("Friday"));
        let id = hub.distributor_id;
        let oc = OrderCycle::new("Week 1", EnterpriseId::new()).with_distributor(hub);
        assert_eq!(oc.pickup_time_for(id).as_deref(), Some("Thursday 4pm"));
    }

    #[test]
    fn test_pickup_time_falls_back_to_next_collection() {
        let hub = distributor("Hub", Some("  "), Some("Friday"));
        let id = hub.distributor_id;
        let oc = OrderCycle::new("Week 1", EnterpriseId::new()).with_distributor(hub);
        assert_eq!(oc.pickup_time_for(id).as_deref(), Some("Friday"));
        assert_eq!(oc.pickup_time_for(EnterpriseId::new()), None);
    }

    #[test]
    fn test_receival_instructions_for_supplier() {
        let farm = EnterpriseId::new();
        let orchard = EnterpriseId::new();
        let oc = OrderCycle::new("Week 1", EnterpriseId::new())
            .with_supplier(farm, Some("Back dock before 9am"))
            .with_supplier(orchard, None);

        assert_eq!(oc.receival_instructions_for(farm).as_deref(), Some("Back dock before 9am"));
        assert_eq!(oc.receival_instructions_for(orchard), None);
        assert_eq!(oc.suppliers(), vec![farm, orchard]);
    }
}
