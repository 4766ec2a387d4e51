//! Shared fixtures for session and action tests

use crate::{PowerBiSession, SessionOptions};
use config::{ConfigResolver, Credentials};
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;
use types::{Diagnostics, MemoryDiagnostics, Result};

pub(crate) const CLIENT_ID: &str = "client-id-123";
pub(crate) const SECRET: &str = "sup3r-s3cret-value";

const CONFIG: &str = r#"{
    "dev": {
        "workspace": "ws-dev",
        "report_id": "report-dev",
        "dataset_id": "dataset-dev",
        "gateway_id": "gateway-dev",
        "reports_path": "reports/dev",
        "dashboards_path": "dashboards/dev.pbix",
        "paginated_path": "paginated/missing",
        "parameters": {"Server": "sql-dev", "Database": "sales"}
    },
    "bare": {
        "report_id": "report-bare"
    }
}"#;

pub(crate) struct Fixture {
    pub dir: TempDir,
    pub diagnostics: Arc<MemoryDiagnostics>,
}

/// Temp directory with a config file, an empty `reports/dev` directory and a
/// `dashboards/dev.pbix` file
pub(crate) fn fixture() -> Fixture {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("powerbi_config.json"), CONFIG).unwrap();
    fs::create_dir_all(dir.path().join("reports/dev")).unwrap();
    fs::create_dir_all(dir.path().join("dashboards")).unwrap();
    fs::write(dir.path().join("dashboards/dev.pbix"), b"pbix").unwrap();

    Fixture {
        dir,
        diagnostics: Arc::new(MemoryDiagnostics::default()),
    }
}

impl Fixture {
    pub fn options(&self) -> SessionOptions {
        SessionOptions::new(ConfigResolver::new(self.dir.path()), self.diagnostics.clone())
            .with_config_path("powerbi_config.json")
    }

    pub fn credentials(&self) -> Credentials {
        Credentials::new(CLIENT_ID, SECRET)
    }

    pub fn session(&self, environment: &str) -> Result<PowerBiSession> {
        PowerBiSession::new(environment, self.credentials(), self.options())
    }

    pub fn session_with(
        &self,
        environment: &str,
        credentials: Credentials,
        diagnostics: Arc<dyn Diagnostics>,
    ) -> Result<PowerBiSession> {
        PowerBiSession::new(
            environment,
            credentials,
            self.options().with_diagnostics(diagnostics),
        )
    }
}
