// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

pub mod repositories;
pub mod db;
pub mod mailer;
pub mod i18n;
pub mod email_template_engine;

pub use email_template_engine::{EmailTemplateEngine, ReportView, RenderedBody};
pub use i18n::Translations;
pub use mailer::{HttpMailRelay, InMemoryMailer};
