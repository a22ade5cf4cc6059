// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Harvest core
//!
//! Domain model, use cases and adapters for producer order-cycle reports and
//! the sample-data addressing helpers.
//!
//! # Architecture
//!
//! - **Layer:** Core System
//! - **Purpose:** `domain` holds aggregates and ports, `application` holds use
//!   cases, `infrastructure` holds the adapters (in-memory, PostgreSQL, HTTP,
//!   Handlebars, translation catalogues).

pub mod domain;
pub mod application;
pub mod infrastructure;

pub use domain::*;
