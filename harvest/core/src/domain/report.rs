// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Producer Report
//!
//! Aggregated view of one producer's sales in one order cycle. Built from a
//! single, already sorted line-item set so grouping, pickup times and totals
//! always describe the same items.

use crate::domain::enterprise::EnterpriseId;
use crate::domain::money::Money;
use crate::domain::order::{LineItem, Order, OrderId};
use crate::domain::order_cycle::OrderCycle;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// Line items sharing a product and variant name
#[derive(Debug, Clone, Serialize)]
pub struct LineItemGroup {
    pub name: String,
    pub items: Vec<LineItem>,
}

impl LineItemGroup {
    pub fn sku(&self) -> Option<&str> {
        self.items.iter().find_map(|i| i.variant.sku.as_deref())
    }

    pub fn quantity(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.quantity)).sum()
    }

    pub fn unit_price(&self) -> Decimal {
        self.items.first().map(|i| i.price).unwrap_or(Decimal::ZERO)
    }

    pub fn total(&self) -> Decimal {
        self.items.iter().map(LineItem::total).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DistributorPickup {
    pub distributor_id: EnterpriseId,
    pub distributor_name: String,
    pub pickup_time: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProducerReport {
    pub groups: Vec<LineItemGroup>,
    pub pickup_times: Vec<DistributorPickup>,
    pub receival_instructions: Option<String>,
    pub total: Money,
    pub tax_total: Money,
}

impl ProducerReport {
    /// Builds the report, or `None` when there is nothing to report.
    ///
    /// `orders` must contain the orders referenced by `line_items`; extra
    /// orders are ignored.
    pub fn build(
        producer_id: EnterpriseId,
        order_cycle: &OrderCycle,
        line_items: Vec<LineItem>,
        orders: &[Order],
        currency: &str,
    ) -> Option<Self> {
        if line_items.is_empty() {
            return None;
        }

        let order_ids: HashSet<OrderId> = line_items.iter().map(|i| i.order_id).collect();
        let distributor_ids: HashSet<EnterpriseId> = orders
            .iter()
            .filter(|o| order_ids.contains(&o.id))
            .map(|o| o.distributor_id)
            .collect();

        let mut pickup_times = Vec::new();
        for exchange in order_cycle.distributors() {
            if !distributor_ids.contains(&exchange.distributor_id) {
                continue;
            }
            if pickup_times
                .iter()
                .any(|p: &DistributorPickup| p.distributor_id == exchange.distributor_id)
            {
                continue;
            }
            pickup_times.push(DistributorPickup {
                distributor_id: exchange.distributor_id,
                distributor_name: exchange.distributor_name.clone(),
                pickup_time: order_cycle.pickup_time_for(exchange.distributor_id),
            });
        }

        let total = Money::sum(line_items.iter().map(LineItem::total), currency);
        let tax_total = Money::sum(line_items.iter().map(|i| i.included_tax), currency);

        Some(Self {
            groups: group_line_items(line_items),
            pickup_times,
            receival_instructions: order_cycle.receival_instructions_for(producer_id),
            total,
            tax_total,
        })
    }

    pub fn line_item_count(&self) -> usize {
        self.groups.iter().map(|g| g.items.len()).sum()
    }
}

/// Groups by `product_and_full_name`, keeping first-seen group order and the
/// input order within each group.
pub fn group_line_items(line_items: Vec<LineItem>) -> Vec<LineItemGroup> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<LineItemGroup> = Vec::new();

    for item in line_items {
        let name = item.product_and_full_name();
        match index.get(&name) {
            Some(&i) => groups[i].items.push(item),
            None => {
                index.insert(name.clone(), groups.len());
                groups.push(LineItemGroup {
                    name,
                    items: vec![item],
                });
            }
        }
    }

    groups
}
