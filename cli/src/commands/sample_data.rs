// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Sample data commands
//!
//! Commands: address, zone

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;
use std::path::PathBuf;

use crate::services::Services;

#[derive(Subcommand)]
pub enum SampleDataCommand {
    /// Build an address in the default country
    Address {
        /// "address1, city, zipcode"
        #[arg(value_name = "ADDRESS")]
        address: String,

        /// ISO code overriding DEFAULT_COUNTRY_CODE
        #[arg(long, value_name = "ISO")]
        country: Option<String>,
    },

    /// Ensure the default zone exists and contains the default country
    Zone {
        /// ISO code overriding DEFAULT_COUNTRY_CODE
        #[arg(long, value_name = "ISO")]
        country: Option<String>,
    },
}

pub async fn handle_command(command: SampleDataCommand, config_path: Option<PathBuf>) -> Result<()> {
    let services = Services::load(config_path).await?;

    match command {
        SampleDataCommand::Address { address, country } => {
            let helpers = services.sample_addressing(country)?;
            let address = helpers.address(&address).await?;

            println!("{}", "Address:".bold());
            println!("  Street: {}", address.address1);
            println!("  City: {}", address.city);
            println!("  Zipcode: {}", address.zipcode);
            println!("  State: {} ({})", address.state.name, address.state.abbr);
            println!("  Country: {} ({})", address.country.name, address.country.iso);
        }
        SampleDataCommand::Zone { country } => {
            let helpers = services.sample_addressing(country)?;
            let zone = helpers.zone().await?;

            println!("{}", format!("✓ Zone '{}' ready", zone.name).green());
            println!("  Members: {}", zone.members.len());
        }
    }

    Ok(())
}
