// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Email Template Engine
//!
//! Renders email bodies from Handlebars templates.
//!
//! # Architecture
//!
//! - **Layer:** Infrastructure
//! - **Purpose:** Turn a report view model into text and HTML bodies
//! - **Integration:** `ProducerReport` → `ReportView` → `EmailMessage` bodies
//!
//! The HTML registry escapes every substitution; the text registry does not.
//!
//! # Usage
//!
//! ```ignore
//! let engine = EmailTemplateEngine::new()?;
//! let body = engine.render(ORDER_CYCLE_REPORT, &view)?;
//! println!("{}", body.text);
//! ```

use crate::domain::locale::Locale;
use crate::domain::money::Money;
use crate::domain::report::ProducerReport;
use anyhow::{Context, Result};
use handlebars::Handlebars;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Template name for the producer order-cycle report
pub const ORDER_CYCLE_REPORT: &str = "order_cycle_report";

// ============================================================================
// View Model
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupView {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    pub quantity: u64,
    pub unit_price: String,
    pub total: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PickupView {
    pub distributor: String,
    pub time: String,
}

/// Everything the report templates can reference. Money is pre-formatted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportView {
    pub locale: String,
    pub producer: String,
    pub coordinator: String,
    pub order_cycle: String,
    pub labels: HashMap<String, String>,
    pub groups: Vec<GroupView>,
    pub pickup_times: Vec<PickupView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receival_instructions: Option<String>,
    pub total: String,
    pub tax_total: String,
}

impl ReportView {
    /// Project a report into template data.
    ///
    /// `labels` are already localised; `pickup_unknown` is shown for
    /// distributors without a pickup time.
    pub fn from_report(
        report: &ProducerReport,
        locale: &Locale,
        producer: &str,
        coordinator: &str,
        order_cycle: &str,
        labels: HashMap<String, String>,
    ) -> Self {
        let currency = report.total.currency.clone();
        let pickup_unknown = labels.get("pickup_unknown").cloned().unwrap_or_default();

        let groups = report
            .groups
            .iter()
            .map(|g| GroupView {
                name: g.name.clone(),
                sku: g.sku().map(str::to_string),
                quantity: g.quantity(),
                unit_price: Money::new(g.unit_price(), currency.as_str()).to_string(),
                total: Money::new(g.total(), currency.as_str()).to_string(),
            })
            .collect();

        let pickup_times = report
            .pickup_times
            .iter()
            .map(|p| PickupView {
                distributor: p.distributor_name.clone(),
                time: p.pickup_time.clone().unwrap_or_else(|| pickup_unknown.clone()),
            })
            .collect();

        Self {
            locale: locale.to_string(),
            producer: producer.to_string(),
            coordinator: coordinator.to_string(),
            order_cycle: order_cycle.to_string(),
            labels,
            groups,
            pickup_times,
            receival_instructions: report.receival_instructions.clone(),
            total: report.total.to_string(),
            tax_total: report.tax_total.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderedBody {
    pub text: String,
    pub html: String,
}

// ============================================================================
// Template Engine
// ============================================================================

pub struct EmailTemplateEngine {
    text: Handlebars<'static>,
    html: Handlebars<'static>,
}

impl EmailTemplateEngine {
    /// Create an engine with the bundled templates registered
    pub fn new() -> Result<Self> {
        let mut text = Handlebars::new();
        text.register_escape_fn(handlebars::no_escape);
        text.set_strict_mode(false);

        let mut html = Handlebars::new();
        html.set_strict_mode(false);

        let mut engine = Self { text, html };
        engine.register(
            ORDER_CYCLE_REPORT,
            include_str!("templates/order_cycle_report.txt.hbs"),
            include_str!("templates/order_cycle_report.html.hbs"),
        )?;
        Ok(engine)
    }

    /// Register (or replace) a text/HTML template pair under `name`
    pub fn register(&mut self, name: &str, text_source: &str, html_source: &str) -> Result<()> {
        self.text
            .register_template_string(name, text_source)
            .with_context(|| format!("Invalid text template '{}'", name))?;
        self.html
            .register_template_string(name, html_source)
            .with_context(|| format!("Invalid HTML template '{}'", name))?;
        Ok(())
    }

    pub fn render<T: Serialize>(&self, name: &str, data: &T) -> Result<RenderedBody> {
        let text = self
            .text
            .render(name, data)
            .with_context(|| format!("Failed to render text template '{}'", name))?;
        let html = self
            .html
            .render(name, data)
            .with_context(|| format!("Failed to render HTML template '{}'", name))?;
        Ok(RenderedBody { text, html })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn view() -> ReportView {
        ReportView {
            locale: "en".to_string(),
            producer: "Green Farm".to_string(),
            coordinator: "Hub Co-op".to_string(),
            order_cycle: "Week 12".to_string(),
            labels: HashMap::from([
                ("greeting".to_string(), "Dear Green Farm,".to_string()),
                ("orders_summary".to_string(), "Orders summary".to_string()),
                ("receival_heading".to_string(), "Delivery instructions".to_string()),
            ]),
            groups: vec![GroupView {
                name: "Apples - 1kg".to_string(),
                sku: Some("APL-1".to_string()),
                quantity: 3,
                unit_price: "$5.00".to_string(),
                total: "$15.00".to_string(),
            }],
            pickup_times: vec![PickupView {
                distributor: "North Hub".to_string(),
                time: "Thursday 4pm".to_string(),
            }],
            receival_instructions: Some("Use the <back> dock".to_string()),
            total: "$15.00".to_string(),
            tax_total: "$1.36".to_string(),
        }
    }

    #[test]
    fn test_renders_text_and_html() {
        let engine = EmailTemplateEngine::new().unwrap();
        let body = engine.render(ORDER_CYCLE_REPORT, &view()).unwrap();

        for rendered in [&body.text, &body.html] {
            assert!(rendered.contains("Dear Green Farm,"));
            assert!(rendered.contains("Apples - 1kg"));
            assert!(rendered.contains("North Hub"));
            assert!(rendered.contains("$15.00"));
            assert!(rendered.contains("$1.36"));
        }
    }

    #[test]
    fn test_html_is_escaped_text_is_not() {
        let engine = EmailTemplateEngine::new().unwrap();
        let body = engine.render(ORDER_CYCLE_REPORT, &view()).unwrap();

        assert!(body.text.contains("Use the <back> dock"));
        assert!(body.html.contains("Use the &lt;back&gt; dock"));
    }

    #[test]
    fn test_receival_section_omitted_when_absent() {
        let engine = EmailTemplateEngine::new().unwrap();
        let mut data = view();
        data.receival_instructions = None;
        let body = engine.render(ORDER_CYCLE_REPORT, &data).unwrap();
        assert!(!body.text.contains("Delivery instructions"));
    }

    #[test]
    fn test_register_rejects_invalid_template() {
        let mut engine = EmailTemplateEngine::new().unwrap();
        assert!(engine.register("broken", "{{#if x}}", "<p></p>").is_err());
        assert!(engine.render("missing", &view()).is_err());
    }
}
