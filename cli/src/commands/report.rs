// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Producer report commands
//!
//! Commands: send, send-all, preview

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::Colorize;
use std::path::PathBuf;
use uuid::Uuid;

use harvest_core::application::producer_report::{ReportOutcome, SendProducerReportUseCase};
use harvest_core::domain::enterprise::EnterpriseId;
use harvest_core::domain::order_cycle::OrderCycleId;

use crate::services::Services;

#[derive(Subcommand)]
pub enum ReportCommand {
    /// Email one producer their order cycle report
    Send {
        /// Producer enterprise ID
        #[arg(long, value_name = "PRODUCER_ID")]
        producer: Uuid,

        /// Order cycle ID
        #[arg(long, value_name = "ORDER_CYCLE_ID")]
        order_cycle: Uuid,
    },

    /// Email every supplier of an order cycle
    SendAll {
        /// Order cycle ID
        #[arg(long, value_name = "ORDER_CYCLE_ID")]
        order_cycle: Uuid,
    },

    /// Render a report without sending it
    Preview {
        /// Producer enterprise ID
        #[arg(long, value_name = "PRODUCER_ID")]
        producer: Uuid,

        /// Order cycle ID
        #[arg(long, value_name = "ORDER_CYCLE_ID")]
        order_cycle: Uuid,

        /// Print the HTML body instead of the text body
        #[arg(long)]
        html: bool,

        /// Print the whole message as JSON
        #[arg(long, conflicts_with = "html")]
        json: bool,
    },
}

pub async fn handle_command(command: ReportCommand, config_path: Option<PathBuf>) -> Result<()> {
    let services = Services::load(config_path).await?;

    match command {
        ReportCommand::Send { producer, order_cycle } => {
            send(&services, EnterpriseId(producer), OrderCycleId(order_cycle)).await
        }
        ReportCommand::SendAll { order_cycle } => send_all(&services, OrderCycleId(order_cycle)).await,
        ReportCommand::Preview {
            producer,
            order_cycle,
            html,
            json,
        } => preview(&services, EnterpriseId(producer), OrderCycleId(order_cycle), html, json).await,
    }
}

async fn send(services: &Services, producer: EnterpriseId, order_cycle: OrderCycleId) -> Result<()> {
    let use_case = services.report_use_case(services.mail_relay()?)?;

    match use_case.send(producer, order_cycle).await? {
        ReportOutcome::Sent(receipt) => {
            println!("{}", format!("✓ Report sent to {}", receipt.to).green());
            println!("  Subject: {}", receipt.subject);
            println!("  Locale: {}", receipt.locale);
            println!("  Line items: {}", receipt.line_item_count);
        }
        ReportOutcome::NoOrders => {
            println!("{}", "No complete orders for this producer; nothing sent".yellow());
        }
    }

    Ok(())
}

async fn send_all(services: &Services, order_cycle: OrderCycleId) -> Result<()> {
    let use_case = services.report_use_case(services.mail_relay()?)?;
    let outcomes = use_case.send_all(order_cycle).await?;

    let mut failures = 0;
    for outcome in &outcomes {
        match &outcome.result {
            Ok(ReportOutcome::Sent(receipt)) => {
                println!("  {} {} → {}", "✓".green(), outcome.producer_id, receipt.to);
            }
            Ok(ReportOutcome::NoOrders) => {
                println!("  {} {} (no orders)", "-".dimmed(), outcome.producer_id);
            }
            Err(e) => {
                failures += 1;
                println!("  {} {}: {:#}", "✗".red(), outcome.producer_id, e);
            }
        }
    }

    println!();
    println!("{} suppliers, {} failed", outcomes.len(), failures);
    if failures > 0 {
        anyhow::bail!("{} report(s) could not be sent", failures);
    }
    Ok(())
}

async fn preview(
    services: &Services,
    producer: EnterpriseId,
    order_cycle: OrderCycleId,
    html: bool,
    json: bool,
) -> Result<()> {
    let use_case = services.preview_use_case()?;

    let Some(message) = use_case.compose(producer, order_cycle).await? else {
        println!("{}", "No complete orders for this producer; nothing would be sent".yellow());
        return Ok(());
    };

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&message).context("Failed to serialize message")?
        );
        return Ok(());
    }

    println!("{} {}", "To:".bold(), message.to.join(", "));
    println!("{} {}", "Cc:".bold(), message.cc.join(", "));
    println!("{} {}", "Subject:".bold(), message.subject);
    println!();
    if html {
        println!("{}", message.html_body.as_deref().unwrap_or_default());
    } else {
        println!("{}", message.text_body);
    }

    Ok(())
}
