// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Domain
//!
//! Aggregates, value objects and the ports implemented by infrastructure.
//!
//! # Architecture
//!
//! - **Layer:** Domain Layer
//! - **Purpose:** Marketplace model used by reporting and sample data

pub mod config;
pub mod enterprise;
pub mod locale;
pub mod money;
pub mod notification;
pub mod order;
pub mod order_cycle;
pub mod addressing;
pub mod report;
pub mod repository;
