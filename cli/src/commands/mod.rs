// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Command implementations for the Harvest CLI

pub mod config;
pub mod report;
pub mod sample_data;

pub use self::config::ConfigCommand;
pub use self::report::ReportCommand;
pub use self::sample_data::SampleDataCommand;
