// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Order
//!
//! Customer orders and their line items. Each line item carries a snapshot of
//! the purchased variant so that reports can name and group it without
//! loading the product catalogue.
//!
//! # Architecture
//!
//! - **Layer:** Domain Layer
//! - **Purpose:** Order aggregate and variant naming rules

use crate::domain::enterprise::EnterpriseId;
use crate::domain::order_cycle::OrderCycleId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OrderId(pub Uuid);

impl OrderId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for OrderId {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LineItemId(pub Uuid);

impl LineItemId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for LineItemId {
    fn default() -> Self {
        Self::new()
    }
}

/// Checkout state of an order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderState {
    Cart,
    Address,
    Delivery,
    Payment,
    Confirmation,
    Complete,
    Canceled,
    AwaitingReturn,
    Returned,
    Resumed,
}

impl OrderState {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderState::Cart => "cart",
            OrderState::Address => "address",
            OrderState::Delivery => "delivery",
            OrderState::Payment => "payment",
            OrderState::Confirmation => "confirmation",
            OrderState::Complete => "complete",
            OrderState::Canceled => "canceled",
            OrderState::AwaitingReturn => "awaiting_return",
            OrderState::Returned => "returned",
            OrderState::Resumed => "resumed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        let state = match s {
            "cart" => OrderState::Cart,
            "address" => OrderState::Address,
            "delivery" => OrderState::Delivery,
            "payment" => OrderState::Payment,
            "confirmation" => OrderState::Confirmation,
            "complete" => OrderState::Complete,
            "canceled" => OrderState::Canceled,
            "awaiting_return" => OrderState::AwaitingReturn,
            "returned" => OrderState::Returned,
            "resumed" => OrderState::Resumed,
            _ => return None,
        };
        Some(state)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionValue {
    pub option_type: String,
    pub presentation: String,
}

/// Variant details captured on the line item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantSnapshot {
    pub product_name: String,
    pub supplier_id: EnterpriseId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_value: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_presentation: Option<String>,
    #[serde(default)]
    pub option_values: Vec<OptionValue>,
}

impl VariantSnapshot {
    pub fn new(product_name: impl Into<String>, supplier_id: EnterpriseId) -> Self {
        Self {
            product_name: product_name.into(),
            supplier_id,
            sku: None,
            unit_value: None,
            display_name: None,
            unit_presentation: None,
            option_values: Vec::new(),
        }
    }

    /// Unit text: the explicit unit presentation, else the option values
    pub fn unit_to_display(&self) -> String {
        match self.unit_presentation.as_deref().map(str::trim) {
            Some(unit) if !unit.is_empty() => unit.to_string(),
            _ => self
                .option_values
                .iter()
                .map(|v| v.presentation.as_str())
                .collect::<Vec<_>>()
                .join(", "),
        }
    }

    pub fn full_name(&self) -> String {
        let unit = self.unit_to_display();
        let display = match self.display_name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name,
            _ => return unit,
        };

        let display_lower = display.to_lowercase();
        let unit_lower = unit.to_lowercase();
        if display_lower.contains(&unit_lower) {
            return display.to_string();
        }
        if unit_lower.contains(&display_lower) {
            return unit;
        }
        format!("{} ({})", display, unit)
    }

    pub fn product_and_full_name(&self) -> String {
        let full_name = self.full_name();
        if full_name.starts_with(&self.product_name) {
            full_name
        } else {
            format!("{} - {}", self.product_name, full_name)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub id: LineItemId,
    pub order_id: OrderId,
    pub variant: VariantSnapshot,
    pub quantity: u32,
    pub price: Decimal,
    #[serde(default)]
    pub adjustment_total: Decimal,
    #[serde(default)]
    pub included_tax: Decimal,
}

impl LineItem {
    pub fn new(order_id: OrderId, variant: VariantSnapshot, quantity: u32, price: Decimal) -> Self {
        Self {
            id: LineItemId::new(),
            order_id,
            variant,
            quantity,
            price,
            adjustment_total: Decimal::ZERO,
            included_tax: Decimal::ZERO,
        }
    }

    pub fn amount(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }

    pub fn total(&self) -> Decimal {
        self.amount() + self.adjustment_total
    }

    pub fn product_and_full_name(&self) -> String {
        self.variant.product_and_full_name()
    }

    /// Report ordering: product name (case-insensitive), unit value with
    /// missing values last, then id.
    pub fn cmp_by_name_and_unit_value(&self, other: &Self) -> Ordering {
        self.variant
            .product_name
            .to_lowercase()
            .cmp(&other.variant.product_name.to_lowercase())
            .then_with(|| match (self.variant.unit_value, other.variant.unit_value) {
                (Some(a), Some(b)) => a.cmp(&b),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            })
            .then_with(|| self.id.cmp(&other.id))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub number: String,
    pub state: OrderState,
    pub order_cycle_id: OrderCycleId,
    pub distributor_id: EnterpriseId,
    #[serde(default)]
    pub line_items: Vec<LineItem>,
}

impl Order {
    pub fn new(
        number: impl Into<String>,
        state: OrderState,
        order_cycle_id: OrderCycleId,
        distributor_id: EnterpriseId,
    ) -> Self {
        Self {
            id: OrderId::new(),
            number: number.into(),
            state,
            order_cycle_id,
            distributor_id,
            line_items: Vec::new(),
        }
    }

    /// Adds a line item owned by this order and returns its id
    pub fn add_line_item(&mut self, variant: VariantSnapshot, quantity: u32, price: Decimal) -> LineItemId {
        let item = LineItem::new(self.id, variant, quantity, price);
        let id = item.id;
        self.line_items.push(item);
        id
    }

    pub fn is_complete(&self) -> bool {
        self.state == OrderState::Complete
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn variant(product: &str) -> VariantSnapshot {
        VariantSnapshot::new(product, EnterpriseId::new())
    }

    #[test]
    fn test_full_name_without_display_name_uses_unit() {
        let mut v = variant("Apples");
        v.unit_presentation = Some("1kg".to_string());
        assert_eq!(v.full_name(), "1kg");
        assert_eq!(v.product_and_full_name(), "Apples - 1kg");
    }

    #[test]
    fn test_full_name_uses_option_values_when_no_unit() {
        let mut v = variant("Honey");
        v.option_values = vec![
            OptionValue { option_type: "size".into(), presentation: "500g".into() },
            OptionValue { option_type: "jar".into(), presentation: "Glass".into() },
        ];
        assert_eq!(v.full_name(), "500g, Glass");
    }

    #[test]
    fn test_full_name_combines_display_and_unit() {
        let mut v = variant("Apples");
        v.display_name = Some("Pink Lady".to_string());
        v.unit_presentation = Some("1kg".to_string());
        assert_eq!(v.full_name(), "Pink Lady (1kg)");

        v.display_name = Some("Pink Lady 1KG bag".to_string());
        assert_eq!(v.full_name(), "Pink Lady 1KG bag");
    }

    #[test]
    fn test_product_prefix_not_repeated() {
        let mut v = variant("Apples");
        v.display_name = Some("Apples loose".to_string());
        v.unit_presentation = Some("1kg".to_string());
        assert_eq!(v.product_and_full_name(), "Apples loose (1kg)");
    }

    #[test]
    fn test_totals() {
        let order_id = OrderId::new();
        let mut item = LineItem::new(order_id, variant("Eggs"), 3, Decimal::from_str("4.50").unwrap());
        item.adjustment_total = Decimal::from_str("1.25").unwrap();
        assert_eq!(item.amount(), Decimal::from_str("13.50").unwrap());
        assert_eq!(item.total(), Decimal::from_str("14.75").unwrap());
    }

    #[test]
    fn test_sort_by_name_then_unit_value() {
        let order_id = OrderId::new();
        let mut big = variant("apples");
        big.unit_value = Some(Decimal::from(1000));
        let mut small = variant("Apples");
        small.unit_value = Some(Decimal::from(500));
        let bread = variant("Bread");
        let unitless = variant("Apples");

        let mut items = vec![
            LineItem::new(order_id, bread, 1, Decimal::ONE),
            LineItem::new(order_id, unitless, 1, Decimal::ONE),
            LineItem::new(order_id, big, 1, Decimal::ONE),
            LineItem::new(order_id, small, 1, Decimal::ONE),
        ];
        items.sort_by(LineItem::cmp_by_name_and_unit_value);

        let units: Vec<_> = items.iter().map(|i| (i.variant.product_name.clone(), i.variant.unit_value)).collect();
        assert_eq!(units[0].1, Some(Decimal::from(500)));
        assert_eq!(units[1].1, Some(Decimal::from(1000)));
        assert_eq!(units[2].1, None);
        assert_eq!(units[3].0, "Bread");
    }

    #[test]
    fn test_state_round_trip() {
        for state in [OrderState::Complete, OrderState::Cart, OrderState::AwaitingReturn] {
            assert_eq!(OrderState::parse(state.as_str()), Some(state));
        }
        assert_eq!(OrderState::parse("shipped"), None);
    }
}
