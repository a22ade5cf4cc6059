// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Send Producer Report Use Case
//!
//! Application service that emails a producer the summary of complete orders
//! for their products in an order cycle.
//!
//! # DDD Pattern: Application Service
//!
//! - **Layer:** Application
//! - **Responsibility:** Orchestrate report aggregation, localisation and delivery
//! - **Collaborators:**
//!   - Domain: Enterprise, OrderCycle, ProducerReport, LocalePolicy
//!   - Infrastructure: repositories, Translations, EmailTemplateEngine, Mailer
//!
//! # Flow
//!
//! 1. Load the producer, the order cycle and its coordinator
//! 2. Fetch line items of complete orders in the cycle supplied by the producer
//! 3. Stop with `NoOrders` when there are none
//! 4. Aggregate into a `ProducerReport` (groups, pickup times, totals)
//! 5. Resolve the owner's locale and render subject and bodies
//! 6. Deliver to the producer contact, copying the coordinator
//!
//! # Error Handling
//!
//! Returns anyhow::Error with context:
//! - Lookup failures: producer, order cycle or coordinator missing, or no contact email
//! - Repository failures
//! - Rendering failures
//! - Delivery failures (no retry)

use crate::domain::config::HarvestConfig;
use crate::domain::enterprise::{Enterprise, EnterpriseId};
use crate::domain::locale::LocalePolicy;
use crate::domain::notification::{EmailMessage, Mailer};
use crate::domain::order::OrderId;
use crate::domain::order_cycle::{OrderCycle, OrderCycleId};
use crate::domain::report::ProducerReport;
use crate::domain::repository::{
    EnterpriseRepository, LineItemRepository, OrderCycleRepository, OrderRepository,
};
use crate::infrastructure::email_template_engine::{EmailTemplateEngine, ReportView, ORDER_CYCLE_REPORT};
use crate::infrastructure::i18n::Translations;
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, info, warn};

const TRANSLATION_SCOPE: &str = "producer_mailer.order_cycle";

/// Site-wide values that shape every report
#[derive(Debug, Clone)]
pub struct ReportSettings {
    pub site_name: String,
    pub mails_from: String,
    pub currency: String,
    pub locale_policy: LocalePolicy,
}

impl ReportSettings {
    pub fn from_config(config: &HarvestConfig) -> Result<Self> {
        Ok(Self {
            site_name: config.site_name.clone(),
            mails_from: config.mails_from.clone(),
            currency: config.currency.clone(),
            locale_policy: config.locale_policy()?,
        })
    }
}

/// Receipt for a delivered report
#[derive(Debug, Clone, serde::Serialize)]
pub struct DeliveredReport {
    pub producer_id: EnterpriseId,
    pub to: String,
    pub subject: String,
    pub locale: String,
    pub line_item_count: usize,
    pub delivered_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, serde::Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ReportOutcome {
    Sent(DeliveredReport),
    /// The producer had no complete orders in the cycle; nothing was sent
    NoOrders,
}

/// Result of one supplier within `send_all`
#[derive(Debug)]
pub struct SupplierOutcome {
    pub producer_id: EnterpriseId,
    pub result: Result<ReportOutcome>,
}

/// Send Producer Report Use Case
#[async_trait]
pub trait SendProducerReportUseCase: Send + Sync {
    /// Build the report email without delivering it.
    ///
    /// Returns `None` when the producer has no complete orders in the cycle.
    async fn compose(&self, producer_id: EnterpriseId, order_cycle_id: OrderCycleId) -> Result<Option<EmailMessage>>;

    /// Compose and deliver the report
    async fn send(&self, producer_id: EnterpriseId, order_cycle_id: OrderCycleId) -> Result<ReportOutcome>;

    /// Send a report to every supplier of the cycle.
    ///
    /// A failure for one supplier is recorded in its outcome and the
    /// remaining suppliers are still processed.
    async fn send_all(&self, order_cycle_id: OrderCycleId) -> Result<Vec<SupplierOutcome>>;
}

/// Standard implementation of SendProducerReportUseCase
pub struct StandardSendProducerReportUseCase {
    enterprise_repository: Arc<dyn EnterpriseRepository>,
    order_cycle_repository: Arc<dyn OrderCycleRepository>,
    order_repository: Arc<dyn OrderRepository>,
    line_item_repository: Arc<dyn LineItemRepository>,
    mailer: Arc<dyn Mailer>,
    translations: Arc<Translations>,
    template_engine: Arc<EmailTemplateEngine>,
    settings: ReportSettings,
}

impl StandardSendProducerReportUseCase {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        enterprise_repository: Arc<dyn EnterpriseRepository>,
        order_cycle_repository: Arc<dyn OrderCycleRepository>,
        order_repository: Arc<dyn OrderRepository>,
        line_item_repository: Arc<dyn LineItemRepository>,
        mailer: Arc<dyn Mailer>,
        translations: Arc<Translations>,
        template_engine: Arc<EmailTemplateEngine>,
        settings: ReportSettings,
    ) -> Self {
        Self {
            enterprise_repository,
            order_cycle_repository,
            order_repository,
            line_item_repository,
            mailer,
            translations,
            template_engine,
            settings,
        }
    }

    async fn load_enterprise(&self, id: EnterpriseId, role: &str) -> Result<Enterprise> {
        self.enterprise_repository
            .find_by_id(id)
            .await
            .with_context(|| format!("Failed to load {} {}", role, id))?
            .ok_or_else(|| anyhow!("{} {} not found", role, id))
    }

    async fn load_order_cycle(&self, id: OrderCycleId) -> Result<OrderCycle> {
        self.order_cycle_repository
            .find_by_id(id)
            .await
            .with_context(|| format!("Failed to load order cycle {}", id))?
            .ok_or_else(|| anyhow!("Order cycle {} not found", id))
    }

    fn build_message(
        &self,
        producer: &Enterprise,
        coordinator: &Enterprise,
        order_cycle: &OrderCycle,
        report: &ProducerReport,
    ) -> Result<EmailMessage> {
        let to = producer
            .contact_email()
            .ok_or_else(|| anyhow!("Producer {} has no contact email", producer.id))?;
        let coordinator_email = coordinator
            .contact_email()
            .ok_or_else(|| anyhow!("Coordinator {} has no contact email", coordinator.id))?;

        let locale = self
            .settings
            .locale_policy
            .resolve(producer.owner.locale.as_deref());
        if !self.translations.has_catalogue(&locale) {
            warn!(locale = %locale, "No catalogue for locale, falling back to default strings");
        }

        let params = json!({
            "producer": producer.name,
            "order_cycle": order_cycle.name,
            "coordinator": coordinator.name,
        });
        let subject = format!(
            "[{}] {}",
            self.settings.site_name,
            self.translations
                .translate(&locale, &format!("{}.subject", TRANSLATION_SCOPE), &params)
        );

        let labels = self.translations.section(&locale, TRANSLATION_SCOPE, &params);
        let view = ReportView::from_report(
            report,
            &locale,
            &producer.name,
            &coordinator.name,
            &order_cycle.name,
            labels,
        );
        let body = self
            .template_engine
            .render(ORDER_CYCLE_REPORT, &view)
            .context("Failed to render order cycle report")?;

        Ok(EmailMessage {
            from: self.settings.mails_from.clone(),
            to: vec![to.to_string()],
            cc: vec![coordinator_email.to_string()],
            reply_to: Some(coordinator_email.to_string()),
            subject,
            text_body: body.text,
            html_body: Some(body.html),
            locale: locale.to_string(),
        })
    }

    async fn compose_report(
        &self,
        producer_id: EnterpriseId,
        order_cycle_id: OrderCycleId,
    ) -> Result<Option<(EmailMessage, usize)>> {
        let producer = self.load_enterprise(producer_id, "Producer").await?;
        let order_cycle = self.load_order_cycle(order_cycle_id).await?;
        let coordinator = self
            .load_enterprise(order_cycle.coordinator_id, "Coordinator")
            .await?;

        let line_items = self
            .line_item_repository
            .find_complete_for_supplier(order_cycle_id, producer_id)
            .await
            .context("Failed to load line items")?;

        if line_items.is_empty() {
            debug!(
                producer_id = %producer_id,
                order_cycle_id = %order_cycle_id,
                "No complete orders for producer, skipping report"
            );
            return Ok(None);
        }

        let mut order_ids: Vec<OrderId> = line_items.iter().map(|i| i.order_id).collect();
        order_ids.sort_by_key(|id| id.0);
        order_ids.dedup();
        let orders = self
            .order_repository
            .find_by_ids(&order_ids)
            .await
            .context("Failed to load orders")?;

        let Some(report) = ProducerReport::build(
            producer_id,
            &order_cycle,
            line_items,
            &orders,
            &self.settings.currency,
        ) else {
            return Ok(None);
        };

        let message = self.build_message(&producer, &coordinator, &order_cycle, &report)?;
        Ok(Some((message, report.line_item_count())))
    }
}

#[async_trait]
impl SendProducerReportUseCase for StandardSendProducerReportUseCase {
    async fn compose(&self, producer_id: EnterpriseId, order_cycle_id: OrderCycleId) -> Result<Option<EmailMessage>> {
        Ok(self
            .compose_report(producer_id, order_cycle_id)
            .await?
            .map(|(message, _)| message))
    }

    async fn send(&self, producer_id: EnterpriseId, order_cycle_id: OrderCycleId) -> Result<ReportOutcome> {
        let Some((message, line_item_count)) = self.compose_report(producer_id, order_cycle_id).await? else {
            return Ok(ReportOutcome::NoOrders);
        };

        self.mailer
            .deliver(&message)
            .await
            .with_context(|| format!("Failed to deliver order cycle report to {:?}", message.to))?;

        info!(
            producer_id = %producer_id,
            order_cycle_id = %order_cycle_id,
            locale = %message.locale,
            line_items = line_item_count,
            "Order cycle report sent"
        );

        Ok(ReportOutcome::Sent(DeliveredReport {
            producer_id,
            to: message.to.join(", "),
            subject: message.subject,
            locale: message.locale,
            line_item_count,
            delivered_at: chrono::Utc::now(),
        }))
    }

    async fn send_all(&self, order_cycle_id: OrderCycleId) -> Result<Vec<SupplierOutcome>> {
        let order_cycle = self.load_order_cycle(order_cycle_id).await?;
        let suppliers = order_cycle.suppliers();
        info!(order_cycle_id = %order_cycle_id, suppliers = suppliers.len(), "Sending order cycle reports");

        let mut outcomes = Vec::with_capacity(suppliers.len());
        for producer_id in suppliers {
            let result = self.send(producer_id, order_cycle_id).await;
            if let Err(e) = &result {
                warn!(producer_id = %producer_id, error = %e, "Order cycle report failed");
            }
            outcomes.push(SupplierOutcome { producer_id, result });
        }
        Ok(outcomes)
    }
}
