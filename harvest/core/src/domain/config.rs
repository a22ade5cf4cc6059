// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// Harvest Configuration
//
// YAML configuration document for the report mailer and the sample-data
// helpers:
// - Site identity (site name used in subjects, mails-from address)
// - Report currency
// - Locale policy (default + available locales)
// - Database connection
// - Mail relay endpoint and credentials
// - Sample-data default country
// - Logging

use crate::domain::locale::{Locale, LocalePolicy};
use crate::domain::repository::{PostgresConfig, StorageBackend};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable naming the sample-data default country ISO code
pub const DEFAULT_COUNTRY_CODE_VAR: &str = "DEFAULT_COUNTRY_CODE";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarvestConfig {
    /// Shown in square brackets at the start of every subject line
    pub site_name: String,

    /// Sender address for outbound mail
    pub mails_from: String,

    /// ISO 4217 currency for report totals
    #[serde(default = "default_currency")]
    pub currency: String,

    #[serde(default)]
    pub locales: LocaleConfig,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<DatabaseConfig>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub mail_relay: Option<MailRelayConfig>,

    #[serde(default)]
    pub sample_data: SampleDataSettings,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocaleConfig {
    #[serde(default = "default_locale")]
    pub default: String,

    #[serde(default = "default_available_locales")]
    pub available: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL (supports "env:VAR_NAME")
    pub url: String,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailRelayConfig {
    /// HTTP endpoint accepting JSON messages
    pub endpoint: String,

    /// API key (supports "env:VAR_NAME" for environment variables)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default = "default_relay_timeout")]
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SampleDataSettings {
    /// ISO code of the country used by address and zone fixtures
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_country_code: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (e.g., "info", "debug", "trace")
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format ("json" or "text")
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_currency() -> String {
    "AUD".to_string()
}

fn default_locale() -> String {
    "en".to_string()
}

fn default_available_locales() -> Vec<String> {
    vec!["en".to_string(), "fr".to_string(), "es".to_string()]
}

fn default_max_connections() -> u32 {
    5
}

fn default_relay_timeout() -> u64 {
    30
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

impl Default for LocaleConfig {
    fn default() -> Self {
        Self {
            default: default_locale(),
            available: default_available_locales(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            site_name: "Harvest".to_string(),
            mails_from: "no-reply@harvest.local".to_string(),
            currency: default_currency(),
            locales: LocaleConfig::default(),
            database: None,
            mail_relay: None,
            sample_data: SampleDataSettings::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Resolve a secret value (supports "env:VAR_NAME" syntax)
pub fn resolve_secret(value: &str) -> anyhow::Result<String> {
    match value.strip_prefix("env:") {
        Some(var_name) => std::env::var(var_name)
            .map_err(|_| anyhow::anyhow!("Environment variable not set: {}", var_name)),
        None => Ok(value.to_string()),
    }
}

impl HarvestConfig {
    /// Load configuration from YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to YAML file
    pub fn to_yaml_file(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let yaml = serde_yaml::to_string(self)?;
        std::fs::write(path, yaml)?;
        Ok(())
    }

    /// Parse configuration from YAML string
    pub fn from_yaml_str(yaml: &str) -> anyhow::Result<Self> {
        let config = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    /// Discover configuration file using precedence order
    /// 1. HARVEST_CONFIG_PATH environment variable
    /// 2. ./harvest-config.yaml (working directory)
    /// 3. ~/.harvest/config.yaml (user home)
    /// 4. /etc/harvest/config.yaml (system, Unix) or C:\ProgramData\Harvest\config.yaml (Windows)
    pub fn discover_config() -> Option<PathBuf> {
        Self::candidate_paths().into_iter().find(|p| p.exists())
    }

    /// Paths checked by `discover_config`, in order
    pub fn candidate_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        if let Ok(path) = std::env::var("HARVEST_CONFIG_PATH") {
            paths.push(PathBuf::from(path));
        }

        paths.push(PathBuf::from("./harvest-config.yaml"));

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".harvest").join("config.yaml"));
        }

        #[cfg(unix)]
        paths.push(PathBuf::from("/etc/harvest/config.yaml"));
        #[cfg(windows)]
        paths.push(PathBuf::from("C:\\ProgramData\\Harvest\\config.yaml"));

        paths
    }

    /// Load configuration with discovery, fallback to default
    pub fn load_or_default(cli_path: Option<PathBuf>) -> anyhow::Result<Self> {
        // Explicit CLI path (fail if missing/invalid)
        if let Some(path) = cli_path {
            tracing::info!("Loading configuration from explicit path: {:?}", path);
            let mut config = Self::from_yaml_file(&path)
                .map_err(|e| anyhow::anyhow!("Failed to load config at {:?}: {}", path, e))?;
            config.apply_env_overrides();
            return Ok(config);
        }

        if let Some(config_path) = Self::discover_config() {
            tracing::info!("Loading configuration from discovered path: {:?}", config_path);
            let mut config = Self::from_yaml_file(config_path)?;
            config.apply_env_overrides();
            Ok(config)
        } else {
            tracing::warn!("No configuration file found in standard locations. Using defaults.");
            let mut config = Self::default();
            config.apply_env_overrides();
            Ok(config)
        }
    }

    /// Apply environment variable overrides to configuration
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(val) = non_empty("HARVEST_SITE_NAME") {
            tracing::info!("Environment override: HARVEST_SITE_NAME");
            self.site_name = val;
        }
        if let Some(val) = non_empty("HARVEST_MAILS_FROM") {
            tracing::info!("Environment override: HARVEST_MAILS_FROM");
            self.mails_from = val;
        }
        if let Some(val) = non_empty("DATABASE_URL") {
            tracing::info!("Environment override: DATABASE_URL");
            match self.database.as_mut() {
                Some(database) => database.url = val,
                None => {
                    self.database = Some(DatabaseConfig {
                        url: val,
                        max_connections: default_max_connections(),
                    })
                }
            }
        }
        if let Some(val) = non_empty(DEFAULT_COUNTRY_CODE_VAR) {
            tracing::info!("Environment override: {}={}", DEFAULT_COUNTRY_CODE_VAR, val);
            self.sample_data.default_country_code = Some(val);
        }
    }

    /// Locale policy described by `locales`
    pub fn locale_policy(&self) -> anyhow::Result<LocalePolicy> {
        let default = Locale::parse(&self.locales.default)?;
        let available = self
            .locales
            .available
            .iter()
            .map(|tag| Locale::parse(tag))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(LocalePolicy::new(default, available)?)
    }

    /// Storage backend described by `database`
    pub fn storage_backend(&self) -> anyhow::Result<StorageBackend> {
        match &self.database {
            Some(database) => Ok(StorageBackend::PostgreSQL(PostgresConfig {
                connection_string: resolve_secret(&database.url)?,
            })),
            None => Ok(StorageBackend::InMemory),
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.site_name.trim().is_empty() {
            anyhow::bail!("site_name cannot be empty");
        }

        let mails_from = self.mails_from.trim();
        let well_formed = mails_from
            .split_once('@')
            .map(|(local, domain)| !local.is_empty() && domain.contains('.'))
            .unwrap_or(false);
        if !well_formed {
            anyhow::bail!("mails_from is not a valid email address: '{}'", self.mails_from);
        }

        if self.currency.len() != 3 || !self.currency.chars().all(|c| c.is_ascii_alphabetic()) {
            anyhow::bail!("currency must be a three-letter ISO code, got '{}'", self.currency);
        }

        self.locale_policy()?;

        if let Some(database) = &self.database {
            if database.url.trim().is_empty() {
                anyhow::bail!("database.url cannot be empty");
            }
            if database.max_connections == 0 {
                anyhow::bail!("database.max_connections must be at least 1");
            }
        }

        if let Some(relay) = &self.mail_relay {
            if !(relay.endpoint.starts_with("http://") || relay.endpoint.starts_with("https://")) {
                anyhow::bail!("mail_relay.endpoint must be an http(s) URL: '{}'", relay.endpoint);
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config_is_valid() {
        let config = HarvestConfig::default();
        assert!(config.validate().is_ok());
        assert!(matches!(config.storage_backend().unwrap(), StorageBackend::InMemory));
    }

    #[test]
    fn test_parse_minimal_yaml_applies_defaults() {
        let config = HarvestConfig::from_yaml_str(
            "site_name: Open Food Hub\nmails_from: hello@foodhub.example\n",
        )
        .unwrap();
        assert_eq!(config.currency, "AUD");
        assert_eq!(config.locales.default, "en");
        assert_eq!(config.logging.level, "info");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_yaml_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("harvest-config.yaml");

        let mut config = HarvestConfig::default();
        config.site_name = "Farm Gate".to_string();
        config.mail_relay = Some(MailRelayConfig {
            endpoint: "https://relay.example/v1/messages".to_string(),
            api_key: Some("env:RELAY_KEY".to_string()),
            timeout_seconds: 10,
        });
        config.to_yaml_file(&path).unwrap();

        let loaded = HarvestConfig::load_or_default(Some(path)).unwrap();
        assert_eq!(loaded.site_name, "Farm Gate");
        assert_eq!(loaded.mail_relay.unwrap().api_key.as_deref(), Some("env:RELAY_KEY"));
    }

    #[test]
    fn test_explicit_missing_path_fails() {
        let result = HarvestConfig::load_or_default(Some(PathBuf::from("/nonexistent/harvest.yaml")));
        assert!(result.is_err());
    }

    #[test]
    fn test_validation() {
        let mut config = HarvestConfig::default();

        config.site_name = "  ".to_string();
        assert!(config.validate().is_err());
        config.site_name = "Harvest".to_string();

        config.mails_from = "not-an-address".to_string();
        assert!(config.validate().is_err());
        config.mails_from = "team@harvest.example".to_string();

        config.locales.default = "de".to_string();
        assert!(config.validate().is_err());
        config.locales.default = "en".to_string();

        config.currency = "dollars".to_string();
        assert!(config.validate().is_err());
        config.currency = "AUD".to_string();

        config.mail_relay = Some(MailRelayConfig {
            endpoint: "relay.example".to_string(),
            api_key: None,
            timeout_seconds: 30,
        });
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_overrides() {
        let vars = HashMap::from([
            ("HARVEST_SITE_NAME", "Override Market"),
            ("DATABASE_URL", "postgres://localhost/harvest"),
            ("DEFAULT_COUNTRY_CODE", "AU"),
            ("HARVEST_MAILS_FROM", ""),
        ]);
        let mut config = HarvestConfig::default();
        config.apply_overrides(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.site_name, "Override Market");
        assert_eq!(config.mails_from, "no-reply@harvest.local");
        assert_eq!(config.database.as_ref().unwrap().url, "postgres://localhost/harvest");
        assert_eq!(config.sample_data.default_country_code.as_deref(), Some("AU"));
        assert!(matches!(config.storage_backend().unwrap(), StorageBackend::PostgreSQL(_)));
    }

    #[test]
    fn test_resolve_plain_secret() {
        assert_eq!(resolve_secret("plain-value").unwrap(), "plain-value");
        assert!(resolve_secret("env:HARVEST_TEST_SURELY_UNSET_VAR").is_err());
    }
}
