// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Sample Data Addressing
//!
//! Helpers used by fixture and demo setup to build addresses and the default
//! shipping zone for the configured default country.
//!
//! The default country is passed in through [`SampleDataConfig`]; only
//! [`SampleDataConfig::from_env`] reads the process environment.

use crate::domain::addressing::{Address, Country, Zone};
use crate::domain::config::{HarvestConfig, DEFAULT_COUNTRY_CODE_VAR};
use crate::domain::repository::{CountryRepository, RepositoryError, ZoneRepository};
use std::env::VarError;
use std::sync::Arc;
use tracing::{debug, info};

/// Zone every sample country is placed in
pub const DEFAULT_ZONE_NAME: &str = "Australia";

#[derive(Debug, thiserror::Error)]
pub enum SampleDataError {
    #[error("{0} is not set")]
    MissingConfiguration(&'static str),

    #[error("Country not found for ISO code '{0}'")]
    CountryNotFound(String),

    #[error("Malformed address '{0}': expected \"address1, city, zipcode\"")]
    MalformedAddress(String),

    #[error("Country '{0}' has no states")]
    StateNotFound(String),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleDataConfig {
    default_country_code: String,
}

impl SampleDataConfig {
    pub fn new(default_country_code: impl Into<String>) -> Result<Self, SampleDataError> {
        let code = default_country_code.into().trim().to_string();
        if code.is_empty() {
            return Err(SampleDataError::MissingConfiguration(DEFAULT_COUNTRY_CODE_VAR));
        }
        Ok(Self {
            default_country_code: code,
        })
    }

    /// Reads `DEFAULT_COUNTRY_CODE`
    pub fn from_env() -> Result<Self, SampleDataError> {
        Self::from_var(std::env::var(DEFAULT_COUNTRY_CODE_VAR))
    }

    pub fn from_var(value: Result<String, VarError>) -> Result<Self, SampleDataError> {
        match value {
            Ok(code) => Self::new(code),
            Err(_) => Err(SampleDataError::MissingConfiguration(DEFAULT_COUNTRY_CODE_VAR)),
        }
    }

    /// Uses `sample_data.default_country_code` (environment overrides already applied)
    pub fn from_config(config: &HarvestConfig) -> Result<Self, SampleDataError> {
        match &config.sample_data.default_country_code {
            Some(code) => Self::new(code.as_str()),
            None => Err(SampleDataError::MissingConfiguration(DEFAULT_COUNTRY_CODE_VAR)),
        }
    }

    pub fn default_country_code(&self) -> &str {
        &self.default_country_code
    }
}

pub struct SampleAddressing {
    config: SampleDataConfig,
    countries: Arc<dyn CountryRepository>,
    zones: Arc<dyn ZoneRepository>,
}

impl SampleAddressing {
    pub fn new(
        config: SampleDataConfig,
        countries: Arc<dyn CountryRepository>,
        zones: Arc<dyn ZoneRepository>,
    ) -> Self {
        Self {
            config,
            countries,
            zones,
        }
    }

    /// The configured default country
    pub async fn country(&self) -> Result<Country, SampleDataError> {
        let code = self.config.default_country_code();
        self.countries
            .find_by_iso(code)
            .await?
            .ok_or_else(|| SampleDataError::CountryNotFound(code.to_string()))
    }

    /// Build an unsaved address from `"address1, city, zipcode"`.
    ///
    /// Segments after the third are ignored. The state is the first state of
    /// the default country.
    pub async fn address(&self, compact: &str) -> Result<Address, SampleDataError> {
        let parts: Vec<&str> = compact.split(',').map(str::trim).collect();
        let [address1, city, zipcode, ..] = parts.as_slice() else {
            return Err(SampleDataError::MalformedAddress(compact.to_string()));
        };

        let country = self.country().await?;
        let state = country
            .first_state()
            .cloned()
            .ok_or_else(|| SampleDataError::StateNotFound(country.iso.clone()))?;

        debug!(address = compact, state = %state.name, "Built sample address");
        Ok(Address {
            address1: address1.to_string(),
            city: city.to_string(),
            zipcode: zipcode.to_string(),
            state,
            country,
        })
    }

    /// Find or create the default zone and make the default country a member.
    ///
    /// Repeated calls leave one zone with one membership.
    pub async fn zone(&self) -> Result<Zone, SampleDataError> {
        let country = self.country().await?;
        let zone = self.zones.find_or_create_by_name(DEFAULT_ZONE_NAME).await?;
        if zone.contains(country.id) {
            return Ok(zone);
        }

        let zone = self.zones.add_member(&zone, country.id).await?;
        info!(zone = %zone.name, country = %country.iso, "Added country to sample zone");
        Ok(zone)
    }
}
