// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! # Harvest CLI
//!
//! The `harvest` binary drives the back-office jobs of the marketplace.
//!
//! ## Commands
//!
//! - `harvest report send|send-all|preview` - Producer order-cycle reports
//! - `harvest sample-data address|zone` - Fixture addressing helpers
//! - `harvest config show|validate|generate` - Configuration management
//!
//! Configuration is discovered the same way for every command; see
//! `harvest config show --paths`.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;

mod commands;
mod services;

use commands::{ConfigCommand, ReportCommand, SampleDataCommand};

/// Harvest - producer reports and sample data for the food marketplace
#[derive(Parser)]
#[command(name = "harvest")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to configuration file (overrides discovery)
    #[arg(
        short,
        long,
        global = true,
        env = "HARVEST_CONFIG_PATH",
        value_name = "FILE"
    )]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, env = "HARVEST_LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Log format (text or json)
    #[arg(long, global = true, env = "HARVEST_LOG_FORMAT", default_value = "text")]
    log_format: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Producer order-cycle reports
    #[command(name = "report")]
    Report {
        #[command(subcommand)]
        command: ReportCommand,
    },

    /// Sample data helpers
    #[command(name = "sample-data")]
    SampleData {
        #[command(subcommand)]
        command: SampleDataCommand,
    },

    /// Configuration management
    #[command(name = "config")]
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    init_logging(&cli.log_level, &cli.log_format)?;

    match cli.command {
        Some(Commands::Report { command }) => commands::report::handle_command(command, cli.config).await,
        Some(Commands::SampleData { command }) => {
            commands::sample_data::handle_command(command, cli.config).await
        }
        Some(Commands::Config { command }) => commands::config::handle_command(command, cli.config).await,
        None => {
            // No command provided - show help
            eprintln!("{}", "No command specified. Use --help for usage.".yellow());
            std::process::exit(1);
        }
    }
}

/// Initialize tracing subscriber for logging
fn init_logging(level: &str, format: &str) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(level))
        .context("Failed to create log filter")?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false);

    match format {
        "json" => builder.json().init(),
        _ => builder.compact().init(),
    }

    Ok(())
}
