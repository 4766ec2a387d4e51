//! Configuration validation utilities

use crate::schema::{EnvironmentConfig, REQUIRED_KEYS};
use std::path::Path;
use types::{Diagnostics, PowerBiError, Result};

/// Configuration validator
pub struct ConfigValidator;

impl ConfigValidator {
    /// Require every key of [`REQUIRED_KEYS`]
    pub fn validate(config: &EnvironmentConfig, diagnostics: &dyn Diagnostics) -> Result<()> {
        Self::require(config, &REQUIRED_KEYS)?;
        diagnostics.info("Configuration validated: all required keys are present");
        Ok(())
    }

    /// Require an arbitrary set of keys, reporting the missing ones in order
    pub fn require(config: &EnvironmentConfig, keys: &[&str]) -> Result<()> {
        let missing = config.missing_keys(keys);
        if missing.is_empty() {
            Ok(())
        } else {
            Err(PowerBiError::missing_keys(missing))
        }
    }

    /// Full check of a resolved configuration, collecting every problem
    ///
    /// Report paths are resolved against `base_dir`.
    pub fn report(config: &EnvironmentConfig, base_dir: &Path) -> ValidationReport {
        let mut report = ValidationReport {
            missing_keys: config.missing_keys(&REQUIRED_KEYS),
            ..Default::default()
        };

        if config.report_path("reports").is_none() {
            report.add_warning(
                "reports_path",
                "No reports path configured, publishing will fail".to_string(),
            );
        }

        for (field, path) in config.report_paths() {
            let full_path = base_dir.join(path);
            if !full_path.exists() {
                report.add_warning(
                    &field,
                    format!("Report path does not exist: {}", full_path.display()),
                );
            } else if !full_path.is_dir() {
                report.add_warning(
                    &field,
                    format!("Report path is not a directory: {}", full_path.display()),
                );
            }
        }

        if let Some(parameters) = &config.parameters {
            if parameters.is_empty() {
                report.add_warning("parameters", "Parameters object is empty".to_string());
            }
        }

        report
    }
}

/// Everything wrong with one environment block
///
/// Missing required keys are fatal; warnings only matter once an action
/// touches the field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    /// Required keys that are absent or empty, in declaration order
    pub missing_keys: Vec<&'static str>,
    pub warnings: Vec<ValidationIssue>,
}

/// A non-fatal problem with one field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    pub field: String,
    pub message: String,
}

impl ValidationReport {
    fn add_warning(&mut self, field: &str, message: String) {
        self.warnings.push(ValidationIssue {
            field: field.to_string(),
            message,
        });
    }

    pub fn is_valid(&self) -> bool {
        self.missing_keys.is_empty()
    }

    pub fn summary(&self) -> String {
        format!(
            "Validation: {} missing keys, {} warnings",
            self.missing_keys.len(),
            self.warnings.len()
        )
    }

    /// Emit every warning, then the summary
    pub fn emit(&self, diagnostics: &dyn Diagnostics) {
        for issue in &self.warnings {
            diagnostics.warning(&format!("{}: {}", issue.field, issue.message));
        }
        diagnostics.info(&self.summary());
    }

    /// Fail with the same error [`ConfigValidator::validate`] raises
    pub fn into_result(self) -> Result<Vec<ValidationIssue>> {
        if self.is_valid() {
            Ok(self.warnings)
        } else {
            Err(PowerBiError::missing_keys(self.missing_keys))
        }
    }
}
