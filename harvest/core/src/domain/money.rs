// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Money
//!
//! Exact decimal amounts tagged with an ISO 4217 currency code.
//!
//! Amounts are never converted to floating point. Sums keep full precision;
//! only [`Money::rounded`] and the `Display` impl round, to the currency's two
//! minor-unit places using banker's rounding.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of minor-unit places used when displaying amounts.
pub const CURRENCY_PRECISION: u32 = 2;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    pub amount: Decimal,
    pub currency: String,
}

impl Money {
    pub fn new(amount: Decimal, currency: impl Into<String>) -> Self {
        Self {
            amount,
            currency: currency.into().to_uppercase(),
        }
    }

    pub fn zero(currency: impl Into<String>) -> Self {
        Self::new(Decimal::ZERO, currency)
    }

    /// Exact sum of `amounts` in `currency`.
    pub fn sum<I>(amounts: I, currency: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = Decimal>,
    {
        let total = amounts.into_iter().fold(Decimal::ZERO, |acc, a| acc + a);
        Self::new(total, currency)
    }

    /// Amount rounded to currency precision.
    pub fn rounded(&self) -> Decimal {
        self.amount
            .round_dp_with_strategy(CURRENCY_PRECISION, RoundingStrategy::MidpointNearestEven)
    }

    pub fn symbol(&self) -> Option<&'static str> {
        match self.currency.as_str() {
            "AUD" | "USD" | "CAD" | "NZD" => Some("$"),
            "EUR" => Some("€"),
            "GBP" => Some("£"),
            _ => None,
        }
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut rounded = self.rounded();
        rounded.rescale(CURRENCY_PRECISION);
        let negative = rounded.is_sign_negative() && !rounded.is_zero();
        let magnitude = rounded.abs();
        let sign = if negative { "-" } else { "" };
        match self.symbol() {
            Some(symbol) => write!(f, "{}{}{}", sign, symbol, magnitude),
            None => write!(f, "{}{} {}", sign, magnitude, self.currency),
        }
    }
}
