//! Error types for the Power BI actions workspace

use thiserror::Error;

/// Main error type for configuration resolution, session bootstrap and actions
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PowerBiError {
    /// A required argument was missing or empty
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The configuration file does not exist
    #[error("Configuration file not found at path: {path}")]
    ConfigNotFound { path: String },

    /// The configuration file could not be parsed
    #[error("Invalid JSON format in config file: {0}")]
    InvalidFormat(String),

    /// The configuration has no usable block for the environment
    #[error("No configuration found for environment: {environment}")]
    EnvironmentNotFound { environment: String },

    /// Required keys are absent or empty in the resolved configuration
    #[error("Missing required configuration keys: {keys}")]
    MissingConfigKeys { keys: String },

    /// Client id or client secret is absent or empty
    #[error("Missing credentials: {0}")]
    MissingCredentials(String),

    /// Any other failure while loading configuration
    #[error("Unexpected error while loading config: {0}")]
    UnexpectedConfigError(String),

    /// The configured report path does not exist
    #[error("Report path does not exist: {path}")]
    ReportPathNotFound { path: String },

    /// The configured report path exists but is not a directory
    #[error("Report path is not a directory: {path}")]
    ReportPathNotADirectory { path: String },
}

/// Result type alias for Power BI operations
pub type Result<T> = std::result::Result<T, PowerBiError>;

impl PowerBiError {
    /// Build a `MissingConfigKeys` error from keys in declaration order
    pub fn missing_keys<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let keys: Vec<String> = keys.into_iter().map(|k| k.as_ref().to_string()).collect();
        PowerBiError::MissingConfigKeys {
            keys: keys.join(", "),
        }
    }

    /// Short machine-readable name of the error kind
    pub fn kind(&self) -> &'static str {
        match self {
            PowerBiError::InvalidArgument(_) => "InvalidArgument",
            PowerBiError::ConfigNotFound { .. } => "ConfigNotFound",
            PowerBiError::InvalidFormat(_) => "InvalidFormat",
            PowerBiError::EnvironmentNotFound { .. } => "EnvironmentNotFound",
            PowerBiError::MissingConfigKeys { .. } => "MissingConfigKeys",
            PowerBiError::MissingCredentials(_) => "MissingCredentials",
            PowerBiError::UnexpectedConfigError(_) => "UnexpectedConfigError",
            PowerBiError::ReportPathNotFound { .. } => "ReportPathNotFound",
            PowerBiError::ReportPathNotADirectory { .. } => "ReportPathNotADirectory",
        }
    }
}
