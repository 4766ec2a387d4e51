//! Session bootstrap: configuration, credentials and authentication

use chrono::{DateTime, Utc};
use config::{ConfigResolver, Credentials, EnvironmentConfig, DEFAULT_CONFIG_PATH};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use types::{Diagnostics, Result, TracingDiagnostics};

/// Where a session reads its configuration from and where it reports to
#[derive(Clone)]
pub struct SessionOptions {
    /// Resolver used for the configuration file and report paths
    pub resolver: ConfigResolver,
    /// Configuration file, relative to the resolver's base directory
    pub config_path: Option<PathBuf>,
    /// Diagnostics sink
    pub diagnostics: Arc<dyn Diagnostics>,
}

impl SessionOptions {
    pub fn new(resolver: ConfigResolver, diagnostics: Arc<dyn Diagnostics>) -> Self {
        Self {
            resolver,
            config_path: Some(PathBuf::from(DEFAULT_CONFIG_PATH)),
            diagnostics,
        }
    }

    pub fn with_config_path(mut self, config_path: impl Into<PathBuf>) -> Self {
        self.config_path = Some(config_path.into());
        self
    }

    /// Resolve report paths against `base_dir`
    ///
    /// A relative configuration path already set keeps naming the same file.
    pub fn with_base_dir(mut self, base_dir: impl Into<PathBuf>) -> Self {
        self.config_path = self.config_path.take().map(|path| {
            if path.as_os_str().is_empty() {
                path
            } else {
                self.resolver.resolve_path(path)
            }
        });
        self.resolver = ConfigResolver::new(base_dir);
        self
    }

    pub fn with_diagnostics(mut self, diagnostics: Arc<dyn Diagnostics>) -> Self {
        self.diagnostics = diagnostics;
        self
    }
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self::new(
            ConfigResolver::default(),
            Arc::new(TracingDiagnostics::from_env()),
        )
    }
}

impl fmt::Debug for SessionOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionOptions")
            .field("resolver", &self.resolver)
            .field("config_path", &self.config_path)
            .finish_non_exhaustive()
    }
}

/// An authenticated session bound to one environment
///
/// The resolved configuration is a snapshot taken at construction and never
/// written back.
pub struct PowerBiSession {
    environment: String,
    config: EnvironmentConfig,
    credentials: Credentials,
    resolver: ConfigResolver,
    pub(crate) diagnostics: Arc<dyn Diagnostics>,
    authenticated: bool,
    authenticated_at: Option<DateTime<Utc>>,
}

impl PowerBiSession {
    /// Resolve configuration, check credentials and authenticate
    ///
    /// Fails without building a session if any step fails.
    pub fn new(
        environment: impl Into<String>,
        credentials: Credentials,
        options: SessionOptions,
    ) -> Result<Self> {
        let environment = environment.into();
        let SessionOptions {
            resolver,
            config_path,
            diagnostics,
        } = options;

        let config = resolver.resolve(config_path.as_deref(), &environment, diagnostics.as_ref())?;

        credentials.validate()?;
        diagnostics.info(&format!("Client ID found: {}", credentials.client_id()));
        diagnostics.info(&format!("Client secret found: {}", credentials.masked_secret()));

        let mut session = Self {
            environment,
            config,
            credentials,
            resolver,
            diagnostics,
            authenticated: false,
            authenticated_at: None,
        };
        session.authenticate();
        Ok(session)
    }

    /// Mark the session authenticated; no handshake is performed
    fn authenticate(&mut self) {
        self.diagnostics.info(&format!(
            "Authenticating for environment: {}",
            self.environment
        ));
        self.authenticated = true;
        self.authenticated_at = Some(Utc::now());
        self.diagnostics.debug(&format!(
            "Authenticated client {} for environment {}",
            self.credentials.client_id(),
            self.environment
        ));
    }

    pub fn environment(&self) -> &str {
        &self.environment
    }

    /// Resolved configuration for the session's environment
    pub fn config(&self) -> &EnvironmentConfig {
        &self.config
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    pub fn authenticated_at(&self) -> Option<DateTime<Utc>> {
        self.authenticated_at
    }

    pub(crate) fn resolve_path(&self, path: &str) -> PathBuf {
        self.resolver.resolve_path(path)
    }
}

impl fmt::Debug for PowerBiSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PowerBiSession")
            .field("environment", &self.environment)
            .field("config", &self.config)
            .field("credentials", &self.credentials)
            .field("authenticated", &self.authenticated)
            .field("authenticated_at", &self.authenticated_at)
            .finish_non_exhaustive()
    }
}
