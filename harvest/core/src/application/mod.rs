// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

pub mod producer_report;
pub mod sample_data;
pub mod repository_factory;

// Re-export use cases for convenience
pub use producer_report::{
    DeliveredReport, ReportOutcome, ReportSettings, SendProducerReportUseCase,
    StandardSendProducerReportUseCase, SupplierOutcome,
};
pub use sample_data::{SampleAddressing, SampleDataConfig, SampleDataError, DEFAULT_ZONE_NAME};
pub use repository_factory::Repositories;
