// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Service wiring shared by the commands
//!
//! Builds repositories, the mailer and the use cases from a loaded
//! `HarvestConfig`.

use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

use harvest_core::application::producer_report::{ReportSettings, StandardSendProducerReportUseCase};
use harvest_core::application::repository_factory::{create_repositories, Repositories};
use harvest_core::application::sample_data::{SampleAddressing, SampleDataConfig};
use harvest_core::domain::config::{resolve_secret, HarvestConfig};
use harvest_core::domain::notification::Mailer;
use harvest_core::domain::repository::StorageBackend;
use harvest_core::infrastructure::email_template_engine::EmailTemplateEngine;
use harvest_core::infrastructure::i18n::Translations;
use harvest_core::infrastructure::mailer::{HttpMailRelay, InMemoryMailer};

pub struct Services {
    pub config: HarvestConfig,
    pub repositories: Repositories,
}

impl Services {
    pub async fn load(config_path: Option<PathBuf>) -> Result<Self> {
        let config = HarvestConfig::load_or_default(config_path).context("Failed to load configuration")?;
        config.validate().context("Configuration validation failed")?;

        let backend = config.storage_backend()?;
        if matches!(backend, StorageBackend::InMemory) {
            warn!("No database configured; running against an empty in-memory store");
        }
        let max_connections = config.database.as_ref().map(|d| d.max_connections).unwrap_or(1);
        let repositories = create_repositories(&backend, max_connections).await?;

        Ok(Self { config, repositories })
    }

    /// Relay described by `mail_relay`; required for delivery
    pub fn mail_relay(&self) -> Result<Arc<dyn Mailer>> {
        let relay = self
            .config
            .mail_relay
            .as_ref()
            .context("mail_relay is not configured; use `report preview` to render without sending")?;
        let api_key = relay.api_key.as_deref().map(resolve_secret).transpose()?;
        let mailer = HttpMailRelay::new(
            relay.endpoint.clone(),
            api_key,
            Duration::from_secs(relay.timeout_seconds),
        )?;
        Ok(Arc::new(mailer))
    }

    pub fn report_use_case(&self, mailer: Arc<dyn Mailer>) -> Result<StandardSendProducerReportUseCase> {
        let settings = ReportSettings::from_config(&self.config)?;
        let translations = Translations::embedded(settings.locale_policy.default_locale().clone())?;

        Ok(StandardSendProducerReportUseCase::new(
            self.repositories.enterprises.clone(),
            self.repositories.order_cycles.clone(),
            self.repositories.orders.clone(),
            self.repositories.line_items.clone(),
            mailer,
            Arc::new(translations),
            Arc::new(EmailTemplateEngine::new()?),
            settings,
        ))
    }

    /// Report use case that never delivers
    pub fn preview_use_case(&self) -> Result<StandardSendProducerReportUseCase> {
        self.report_use_case(Arc::new(InMemoryMailer::new()))
    }

    pub fn sample_addressing(&self, country_override: Option<String>) -> Result<SampleAddressing> {
        let config = match country_override {
            Some(code) => SampleDataConfig::new(code)?,
            None => SampleDataConfig::from_config(&self.config)?,
        };
        Ok(SampleAddressing::new(
            config,
            self.repositories.countries.clone(),
            self.repositories.zones.clone(),
        ))
    }
}
