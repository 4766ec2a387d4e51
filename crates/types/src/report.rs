//! Report records returned by the stubbed service actions

use serde::{Deserialize, Serialize};

/// Entry returned when listing the reports of a workspace
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSummary {
    /// Report identifier
    pub report_id: String,
    /// Display name
    pub name: String,
}

/// Details of a single report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportDetails {
    /// Report identifier
    pub report_id: String,
    /// Display name
    pub name: String,
    /// Owner recorded by the service
    pub created_by: String,
}

impl ReportSummary {
    pub fn new(report_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            report_id: report_id.into(),
            name: name.into(),
        }
    }
}

impl ReportDetails {
    /// Placeholder details for a report id
    pub fn sample(report_id: impl Into<String>) -> Self {
        Self {
            report_id: report_id.into(),
            name: "Sample Report".to_string(),
            created_by: "User".to_string(),
        }
    }
}
