// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Configuration management commands
//!
//! Commands: show, validate, generate

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::Colorize;
use std::path::PathBuf;

use harvest_core::domain::config::{HarvestConfig, DEFAULT_COUNTRY_CODE_VAR};

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Show config file paths checked
        #[arg(long)]
        paths: bool,

        /// Print the effective configuration as YAML
        #[arg(long)]
        yaml: bool,
    },

    /// Validate configuration file
    Validate {
        /// Path to config file (default: discover)
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,
    },

    /// Generate sample configuration
    Generate {
        /// Output path (default: ./harvest-config.yaml)
        #[arg(short, long, default_value = "./harvest-config.yaml")]
        output: PathBuf,

        /// Include examples and comments
        #[arg(long)]
        examples: bool,
    },
}

pub async fn handle_command(command: ConfigCommand, config_override: Option<PathBuf>) -> Result<()> {
    match command {
        ConfigCommand::Show { paths, yaml } => show(config_override, paths, yaml).await,
        ConfigCommand::Validate { file } => validate(file.or(config_override)).await,
        ConfigCommand::Generate { output, examples } => generate(output, examples).await,
    }
}

async fn show(config_override: Option<PathBuf>, show_paths: bool, as_yaml: bool) -> Result<()> {
    let config = HarvestConfig::load_or_default(config_override.clone()).context("Failed to load configuration")?;

    if show_paths {
        println!("{}", "Configuration discovery paths:".bold());
        match &config_override {
            Some(path) => println!("  --config flag: {}", path.display()),
            None => println!("  --config flag: {}", "(not set)".dimmed()),
        }
        for (i, path) in HarvestConfig::candidate_paths().iter().enumerate() {
            let marker = if path.exists() { "found".green() } else { "missing".dimmed() };
            println!("  {}. {} [{}]", i + 1, path.display(), marker);
        }
        println!();
    }

    if as_yaml {
        print!("{}", serde_yaml::to_string(&config).context("Failed to serialize configuration")?);
        return Ok(());
    }

    println!("{}", "Current configuration:".bold());
    println!();

    println!("{}", "Site:".bold());
    println!("  Name: {}", config.site_name);
    println!("  Mails from: {}", config.mails_from);
    println!("  Currency: {}", config.currency);
    println!();

    println!("{}", "Locales:".bold());
    println!("  Default: {}", config.locales.default);
    println!("  Available: {}", config.locales.available.join(", "));
    println!();

    println!("{}", "Storage:".bold());
    match &config.database {
        // URLs may carry credentials
        Some(database) if database.url.starts_with("env:") => println!("  PostgreSQL ({})", database.url),
        Some(_) => println!("  PostgreSQL (url set)"),
        None => println!("  In-memory"),
    }
    println!();

    println!("{}", "Mail relay:".bold());
    match &config.mail_relay {
        Some(relay) => {
            println!("  Endpoint: {}", relay.endpoint);
            println!("  Timeout: {}s", relay.timeout_seconds);
        }
        None => println!("  {}", "(not configured)".dimmed()),
    }
    println!();

    println!("{}", "Sample data:".bold());
    println!(
        "  Default country: {}",
        config
            .sample_data
            .default_country_code
            .as_deref()
            .map(str::to_string)
            .unwrap_or_else(|| format!("(set {})", DEFAULT_COUNTRY_CODE_VAR))
    );

    Ok(())
}

async fn validate(config_path: Option<PathBuf>) -> Result<()> {
    println!("Validating configuration...");

    let config = HarvestConfig::load_or_default(config_path).context("Failed to load configuration")?;

    config.validate().context("Configuration validation failed")?;

    println!("{}", "✓ Configuration is valid".green());

    Ok(())
}

async fn generate(output: PathBuf, with_examples: bool) -> Result<()> {
    let sample = if with_examples {
        include_str!("../../templates/config-with-examples.yaml")
    } else {
        include_str!("../../templates/config-minimal.yaml")
    };

    std::fs::write(&output, sample).with_context(|| format!("Failed to write config to {:?}", output))?;

    println!("{}", format!("✓ Configuration generated: {}", output.display()).green());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_configs_are_valid() {
        for sample in [
            include_str!("../../templates/config-minimal.yaml"),
            include_str!("../../templates/config-with-examples.yaml"),
        ] {
            let config = HarvestConfig::from_yaml_str(sample).unwrap();
            config.validate().unwrap();
            assert!(config.mail_relay.is_some());
        }
    }

    #[tokio::test]
    async fn test_generate_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("harvest-config.yaml");
        generate(output.clone(), true).await.unwrap();

        let written = HarvestConfig::from_yaml_file(&output).unwrap();
        assert_eq!(written.sample_data.default_country_code.as_deref(), Some("AU"));
    }
}
