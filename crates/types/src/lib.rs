//! Shared types for the Power BI actions workspace
//!
//! This crate contains the error kinds, report records and the diagnostics
//! interface shared by the configuration, client and CLI crates.

pub mod diagnostics;
pub mod error;
pub mod report;
pub mod utils;

// Re-export commonly used types
pub use diagnostics::{
    DiagnosticRecord, Diagnostics, LogLevel, MemoryDiagnostics, TracingDiagnostics,
};
pub use error::{PowerBiError, Result};
pub use report::{ReportDetails, ReportSummary};
