//! Report, dataset and gateway actions
//!
//! None of these talk to the service yet. Each one resolves its inputs from
//! the arguments or the session configuration, reports what it would do and
//! returns a fixed result.

use crate::PowerBiSession;
use config::{ConfigValidator, EnvironmentConfig, DEFAULT_REPORT_TYPE};
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;
use tracing::info_span;
use types::{utils::generate_correlation_id, PowerBiError, ReportDetails, ReportSummary, Result};

impl PowerBiSession {
    /// Publish every artifact under the configured path for `report_type`
    ///
    /// An empty directory is not an error: one warning is emitted and
    /// nothing is published.
    pub fn publish_report(&self, report_type: Option<&str>) -> Result<()> {
        let report_type = report_type.unwrap_or(DEFAULT_REPORT_TYPE);
        let _span = self.action_span("publish_report");
        if report_type.trim().is_empty() {
            return Err(PowerBiError::InvalidArgument(
                "report type must not be empty".to_string(),
            ));
        }

        let path_field = EnvironmentConfig::path_field(report_type);
        ConfigValidator::require(self.config(), &[path_field.as_str(), "workspace"])?;
        let report_path = self.require_value(&path_field)?;
        let workspace_id = self.require_value("workspace")?;

        self.diagnostics.info(&format!(
            "Report path: {}, Workspace ID: {}",
            report_path, workspace_id
        ));

        let full_path = self.resolve_path(report_path);
        if !full_path.exists() {
            return Err(PowerBiError::ReportPathNotFound {
                path: full_path.display().to_string(),
            });
        }
        if !full_path.is_dir() {
            return Err(PowerBiError::ReportPathNotADirectory {
                path: full_path.display().to_string(),
            });
        }

        let artifacts = list_artifacts(&full_path)?;
        if artifacts.is_empty() {
            self.diagnostics.warning(&format!(
                "No {} found in {}, nothing to publish",
                report_type,
                full_path.display()
            ));
            return Ok(());
        }

        for artifact in &artifacts {
            self.diagnostics.debug(&format!("Found report artifact: {}", artifact));
        }
        self.diagnostics.info(&format!(
            "Publishing {} {} from {} to workspace {}",
            artifacts.len(),
            report_type,
            full_path.display(),
            workspace_id
        ));
        Ok(())
    }

    /// Refresh a dataset, defaulting to the configured one
    pub fn refresh_dataset(&self, dataset_id: Option<&str>) -> Result<()> {
        let _span = self.action_span("refresh_dataset");
        let dataset_id = self.id_or_config(dataset_id, "dataset_id")?;
        self.diagnostics
            .info(&format!("Refreshing dataset with ID {}", dataset_id));
        Ok(())
    }

    /// Fetch report details, defaulting to the configured report
    pub fn get_report_details(&self, report_id: Option<&str>) -> Result<ReportDetails> {
        let _span = self.action_span("get_report_details");
        let report_id = self.id_or_config(report_id, "report_id")?;
        self.diagnostics
            .info(&format!("Getting details for report with ID {}", report_id));
        Ok(ReportDetails::sample(report_id))
    }

    pub fn delete_report(&self, report_id: Option<&str>) -> Result<()> {
        let _span = self.action_span("delete_report");
        let report_id = self.id_or_config(report_id, "report_id")?;
        self.diagnostics
            .info(&format!("Deleting report with ID {}", report_id));
        Ok(())
    }

    /// Transfer a report to `new_owner`
    pub fn take_ownership(&self, report_id: Option<&str>, new_owner: &str) -> Result<()> {
        let _span = self.action_span("take_ownership");
        let report_id = self.id_or_config(report_id, "report_id")?;
        if new_owner.trim().is_empty() {
            return Err(PowerBiError::InvalidArgument(
                "new owner must be provided".to_string(),
            ));
        }
        self.diagnostics.info(&format!(
            "Taking ownership of report {} by {}",
            report_id, new_owner
        ));
        Ok(())
    }

    /// List the reports of the configured workspace
    pub fn list_reports(&self) -> Result<Vec<ReportSummary>> {
        let _span = self.action_span("list_reports");
        ConfigValidator::require(self.config(), &["workspace"])?;
        let workspace_id = self.require_value("workspace")?;
        self.diagnostics
            .info(&format!("Listing reports in workspace {}", workspace_id));
        Ok(vec![
            ReportSummary::new("1", "Report 1"),
            ReportSummary::new("2", "Report 2"),
        ])
    }

    /// Update report parameters, defaulting to the configured report and parameters
    pub fn update_parameters(
        &self,
        report_id: Option<&str>,
        parameters: Option<&Map<String, Value>>,
    ) -> Result<()> {
        let _span = self.action_span("update_parameters");
        let report_id = self.id_or_config(report_id, "report_id")?;
        let parameters = match parameters {
            Some(parameters) => parameters.clone(),
            None => self.config().parameters_or_default(),
        };
        self.diagnostics.info(&format!(
            "Updating parameters for report {} with {}",
            report_id,
            Value::Object(parameters)
        ));
        Ok(())
    }

    /// Push the configured gateway settings
    pub fn update_gateways(&self) -> Result<()> {
        let _span = self.action_span("update_gateways");
        ConfigValidator::require(self.config(), &["gateway_id"])?;
        let gateway_id = self.require_value("gateway_id")?;
        self.diagnostics
            .info(&format!("Updating gateway with ID {}", gateway_id));
        Ok(())
    }

    pub fn bind_to_gateway(&self, dataset_id: Option<&str>, gateway_id: Option<&str>) -> Result<()> {
        let _span = self.action_span("bind_to_gateway");
        let dataset_id = self.id_or_config(dataset_id, "dataset_id")?;
        let gateway_id = self.id_or_config(gateway_id, "gateway_id")?;
        self.diagnostics.info(&format!(
            "Binding dataset {} to gateway {}",
            dataset_id, gateway_id
        ));
        Ok(())
    }

    pub fn bind_to_datasource(&self, dataset_id: Option<&str>, datasource_id: &str) -> Result<()> {
        let _span = self.action_span("bind_to_datasource");
        let dataset_id = self.id_or_config(dataset_id, "dataset_id")?;
        if datasource_id.trim().is_empty() {
            return Err(PowerBiError::InvalidArgument(
                "datasource id must be provided".to_string(),
            ));
        }
        self.diagnostics.info(&format!(
            "Binding dataset {} to datasource {}",
            dataset_id, datasource_id
        ));
        Ok(())
    }

    fn action_span(&self, action: &'static str) -> tracing::span::EnteredSpan {
        let correlation_id = generate_correlation_id();
        info_span!(
            "action",
            action,
            environment = %self.environment(),
            correlation_id = %correlation_id
        )
        .entered()
    }

    /// Explicit non-empty argument, else the configured value
    fn id_or_config(&self, explicit: Option<&str>, key: &str) -> Result<String> {
        match explicit.filter(|id| !id.trim().is_empty()) {
            Some(id) => Ok(id.to_string()),
            None => self.require_value(key).map(str::to_string),
        }
    }

    fn require_value(&self, key: &str) -> Result<&str> {
        self.config()
            .value(key)
            .ok_or_else(|| PowerBiError::missing_keys([key]))
    }
}

/// Sorted names of the entries in a report directory
///
/// Any entry that cannot be read fails the whole listing.
fn list_artifacts(path: &Path) -> Result<Vec<String>> {
    let read_error = |e: std::io::Error| {
        PowerBiError::UnexpectedConfigError(format!(
            "failed to read report path {}: {}",
            path.display(),
            e
        ))
    };

    let entries = fs::read_dir(path)
        .map_err(read_error)?
        .collect::<std::io::Result<Vec<_>>>()
        .map_err(read_error)?;

    let mut artifacts: Vec<String> = entries
        .into_iter()
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .collect();
    artifacts.sort();
    Ok(artifacts)
}

#[cfg(test)]
mod tests {
    use super::list_artifacts;
    use crate::test_support::{fixture, CLIENT_ID, SECRET};
    use config::Credentials;
    use serde_json::json;
    use std::fs;
    use std::sync::Arc;
    use types::{LogLevel, MemoryDiagnostics, PowerBiError, ReportSummary};

    #[test]
    fn test_publish_empty_directory_warns_once() {
        let fx = fixture();
        let session = fx.session("dev").unwrap();
        fx.diagnostics.clear();

        session.publish_report(None).unwrap();

        let warnings = fx.diagnostics.messages_at(LogLevel::Warning);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("nothing to publish"));
        assert!(fx.diagnostics.contains("Report path: reports/dev, Workspace ID: ws-dev"));
    }

    #[test]
    fn test_publish_directory_with_reports() {
        let fx = fixture();
        fs::write(fx.dir.path().join("reports/dev/sales.pbix"), b"pbix").unwrap();
        fs::write(fx.dir.path().join("reports/dev/finance.pbix"), b"pbix").unwrap();
        let session = fx.session("dev").unwrap();
        fx.diagnostics.clear();

        session.publish_report(Some("reports")).unwrap();

        assert!(fx.diagnostics.messages_at(LogLevel::Warning).is_empty());
        assert!(fx.diagnostics.contains("Publishing 2 reports"));
        assert!(fx.diagnostics.contains("to workspace ws-dev"));
    }

    #[test]
    fn test_publish_announces_artifacts_in_debug_mode() {
        let fx = fixture();
        fs::write(fx.dir.path().join("reports/dev/sales.pbix"), b"pbix").unwrap();
        fs::write(fx.dir.path().join("reports/dev/finance.pbix"), b"pbix").unwrap();

        let verbose = Arc::new(MemoryDiagnostics::new(true));
        let session = fx
            .session_with("dev", Credentials::new(CLIENT_ID, SECRET), verbose.clone())
            .unwrap();
        verbose.clear();
        session.publish_report(None).unwrap();
        assert_eq!(
            verbose.messages_at(LogLevel::Debug),
            vec![
                "Found report artifact: finance.pbix".to_string(),
                "Found report artifact: sales.pbix".to_string(),
            ]
        );

        let quiet = Arc::new(MemoryDiagnostics::new(false));
        let session = fx
            .session_with("dev", Credentials::new(CLIENT_ID, SECRET), quiet.clone())
            .unwrap();
        session.publish_report(None).unwrap();
        assert!(quiet.messages_at(LogLevel::Debug).is_empty());
        assert!(quiet.contains("Publishing 2 reports"));
    }

    #[test]
    fn test_publish_rejects_empty_report_type() {
        let fx = fixture();
        let session = fx.session("dev").unwrap();

        for report_type in ["", "  "] {
            let err = session.publish_report(Some(report_type)).unwrap_err();
            assert!(matches!(err, PowerBiError::InvalidArgument(_)));
        }
    }

    #[test]
    fn test_list_artifacts_read_failure() {
        let fx = fixture();
        let file = fx.dir.path().join("dashboards/dev.pbix");

        match list_artifacts(&file).unwrap_err() {
            PowerBiError::UnexpectedConfigError(message) => {
                assert!(message.starts_with(&format!("failed to read report path {}:", file.display())))
            }
            err => panic!("unexpected error: {:?}", err),
        }

        let dir = fx.dir.path().join("reports/dev");
        fs::write(dir.join("b.pbix"), b"pbix").unwrap();
        fs::write(dir.join("a.pbix"), b"pbix").unwrap();
        assert_eq!(list_artifacts(&dir).unwrap(), vec!["a.pbix", "b.pbix"]);
    }

    #[test]
    fn test_publish_missing_path() {
        let fx = fixture();
        let session = fx.session("dev").unwrap();

        let err = session.publish_report(Some("paginated")).unwrap_err();
        match err {
            PowerBiError::ReportPathNotFound { path } => assert!(path.ends_with("paginated/missing")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_publish_file_path_is_not_a_directory() {
        let fx = fixture();
        let session = fx.session("dev").unwrap();

        let err = session.publish_report(Some("dashboards")).unwrap_err();
        assert!(matches!(err, PowerBiError::ReportPathNotADirectory { .. }));
    }

    #[test]
    fn test_publish_requires_path_and_workspace() {
        let fx = fixture();
        let session = fx.session("bare").unwrap();

        let err = session.publish_report(None).unwrap_err();
        assert_eq!(
            err,
            PowerBiError::MissingConfigKeys {
                keys: "reports_path, workspace".to_string()
            }
        );

        let dev = fx.session("dev").unwrap();
        let err = dev.publish_report(Some("unknown")).unwrap_err();
        assert_eq!(
            err,
            PowerBiError::MissingConfigKeys {
                keys: "unknown_path".to_string()
            }
        );
    }

    #[test]
    fn test_list_reports() {
        let fx = fixture();
        let session = fx.session("dev").unwrap();

        let reports = session.list_reports().unwrap();
        assert_eq!(
            reports,
            vec![ReportSummary::new("1", "Report 1"), ReportSummary::new("2", "Report 2")]
        );
        assert!(fx.diagnostics.contains("Listing reports in workspace ws-dev"));
    }

    #[test]
    fn test_list_reports_without_workspace_fails() {
        let fx = fixture();
        let session = fx.session("bare").unwrap();

        let err = session.list_reports().unwrap_err();
        assert_eq!(
            err,
            PowerBiError::MissingConfigKeys {
                keys: "workspace".to_string()
            }
        );
    }

    #[test]
    fn test_ids_fall_back_to_config() {
        let fx = fixture();
        let session = fx.session("dev").unwrap();

        session.refresh_dataset(None).unwrap();
        session.refresh_dataset(Some("dataset-override")).unwrap();
        session.delete_report(None).unwrap();
        session.bind_to_gateway(None, Some("gateway-override")).unwrap();
        session.update_gateways().unwrap();

        assert!(fx.diagnostics.contains("Refreshing dataset with ID dataset-dev"));
        assert!(fx.diagnostics.contains("Refreshing dataset with ID dataset-override"));
        assert!(fx.diagnostics.contains("Deleting report with ID report-dev"));
        assert!(fx.diagnostics.contains("Binding dataset dataset-dev to gateway gateway-override"));
        assert!(fx.diagnostics.contains("Updating gateway with ID gateway-dev"));
    }

    #[test]
    fn test_unresolvable_ids_fail() {
        let fx = fixture();
        let session = fx.session("bare").unwrap();

        let err = session.refresh_dataset(None).unwrap_err();
        assert_eq!(err, PowerBiError::MissingConfigKeys { keys: "dataset_id".to_string() });

        let err = session.update_gateways().unwrap_err();
        assert_eq!(err, PowerBiError::MissingConfigKeys { keys: "gateway_id".to_string() });

        // report_id is configured for "bare"
        session.delete_report(None).unwrap();
    }

    #[test]
    fn test_get_report_details() {
        let fx = fixture();
        let session = fx.session("dev").unwrap();

        let details = session.get_report_details(None).unwrap();
        assert_eq!(details.report_id, "report-dev");
        assert_eq!(details.name, "Sample Report");
        assert_eq!(details.created_by, "User");

        let details = session.get_report_details(Some("other")).unwrap();
        assert_eq!(details.report_id, "other");
    }

    #[test]
    fn test_take_ownership() {
        let fx = fixture();
        let session = fx.session("dev").unwrap();

        session.take_ownership(None, "svc-deploy").unwrap();
        assert!(fx.diagnostics.contains("Taking ownership of report report-dev by svc-deploy"));

        let err = session.take_ownership(None, " ").unwrap_err();
        assert!(matches!(err, PowerBiError::InvalidArgument(_)));
    }

    #[test]
    fn test_update_parameters() {
        let fx = fixture();
        let session = fx.session("dev").unwrap();

        session.update_parameters(None, None).unwrap();
        assert!(fx.diagnostics.contains(r#""Server":"sql-dev""#));

        let overrides = json!({"Server": "sql-hotfix"});
        session
            .update_parameters(Some("r-9"), overrides.as_object())
            .unwrap();
        assert!(fx
            .diagnostics
            .contains(r#"Updating parameters for report r-9 with {"Server":"sql-hotfix"}"#));
    }

    #[test]
    fn test_bind_to_datasource() {
        let fx = fixture();
        let session = fx.session("dev").unwrap();

        session.bind_to_datasource(None, "ds-42").unwrap();
        assert!(fx.diagnostics.contains("Binding dataset dataset-dev to datasource ds-42"));

        let err = session.bind_to_datasource(None, "").unwrap_err();
        assert!(matches!(err, PowerBiError::InvalidArgument(_)));
    }
}
