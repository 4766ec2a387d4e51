//! Configuration resolver implementation

use crate::schema::{ConfigDocument, EnvironmentConfig, DEFAULT_CONFIG_PATH};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use types::{Diagnostics, PowerBiError, Result};

/// Resolves the configuration block of one environment
///
/// Relative paths are joined onto a fixed base directory, so resolution does
/// not depend on the caller's working directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigResolver {
    base_dir: PathBuf,
}

impl ConfigResolver {
    /// Resolver rooted at `base_dir`
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Directory relative paths are resolved against
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Join a path onto the base directory; absolute paths pass through
    pub fn resolve_path(&self, path: impl AsRef<Path>) -> PathBuf {
        self.base_dir.join(path)
    }

    /// Path of the default configuration file
    pub fn default_config_path(&self) -> PathBuf {
        self.resolve_path(DEFAULT_CONFIG_PATH)
    }

    /// Load and parse the whole configuration document
    pub fn load_document(
        &self,
        config_path: Option<&Path>,
        diagnostics: &dyn Diagnostics,
    ) -> Result<ConfigDocument> {
        let config_path = match config_path {
            Some(path) if !path.as_os_str().is_empty() => path,
            _ => {
                return Err(PowerBiError::InvalidArgument(
                    "configuration path must be provided".to_string(),
                ))
            }
        };

        let full_path = self.resolve_path(config_path);
        diagnostics.info(&format!(
            "Reading configuration from {}",
            full_path.display()
        ));

        let content = std::fs::read_to_string(&full_path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => PowerBiError::ConfigNotFound {
                path: full_path.display().to_string(),
            },
            _ => PowerBiError::UnexpectedConfigError(format!("{}: {}", full_path.display(), e)),
        })?;

        ConfigDocument::from_json_str(&content)
    }

    /// Resolve the configuration for `environment`
    pub fn resolve(
        &self,
        config_path: Option<&Path>,
        environment: &str,
        diagnostics: &dyn Diagnostics,
    ) -> Result<EnvironmentConfig> {
        if environment.trim().is_empty() {
            return Err(PowerBiError::InvalidArgument(
                "environment name must be provided".to_string(),
            ));
        }

        let document = self.load_document(config_path, diagnostics)?;
        let config = document.environment(environment)?;

        diagnostics.info(&format!("Configuration loaded: {}", config));
        Ok(config)
    }

    /// Resolve from JSON text (for testing)
    pub fn resolve_from_str(
        content: &str,
        environment: &str,
        diagnostics: &dyn Diagnostics,
    ) -> Result<EnvironmentConfig> {
        if environment.trim().is_empty() {
            return Err(PowerBiError::InvalidArgument(
                "environment name must be provided".to_string(),
            ));
        }

        let config = ConfigDocument::from_json_str(content)?.environment(environment)?;
        diagnostics.info(&format!("Configuration loaded: {}", config));
        Ok(config)
    }
}

impl Default for ConfigResolver {
    /// Rooted at this crate's own directory
    fn default() -> Self {
        Self::new(env!("CARGO_MANIFEST_DIR"))
    }
}
