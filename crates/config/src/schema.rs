//! Configuration schema definitions

use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use types::{utils::is_falsy, PowerBiError, Result};

/// Configuration file used when the caller does not name one,
/// relative to the resolver's base directory
pub const DEFAULT_CONFIG_PATH: &str = "../../configs/powerbi_config.json";

/// Keys every environment block must define before the session is usable
pub const REQUIRED_KEYS: [&str; 4] = ["workspace", "report_id", "dataset_id", "gateway_id"];

/// Report type published when none is given
pub const DEFAULT_REPORT_TYPE: &str = "reports";

/// Suffix of the per-report-type path fields (`reports_path`, `dashboards_path`, ...)
pub const PATH_FIELD_SUFFIX: &str = "_path";

/// Settings for one environment
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentConfig {
    /// Workspace identifier
    #[serde(
        default,
        deserialize_with = "id_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub workspace: Option<String>,
    /// Report identifier
    #[serde(
        default,
        deserialize_with = "id_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub report_id: Option<String>,
    /// Dataset identifier
    #[serde(
        default,
        deserialize_with = "id_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub dataset_id: Option<String>,
    /// Gateway identifier
    #[serde(
        default,
        deserialize_with = "id_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub gateway_id: Option<String>,
    /// Directory holding the report artifacts to publish
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reports_path: Option<String>,
    /// Report parameters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Map<String, Value>>,
    /// Any other fields, including other `<type>_path` entries
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl EnvironmentConfig {
    /// Non-empty string value of a field, known or extra
    pub fn value(&self, key: &str) -> Option<&str> {
        let value = match key {
            "workspace" => self.workspace.as_deref(),
            "report_id" => self.report_id.as_deref(),
            "dataset_id" => self.dataset_id.as_deref(),
            "gateway_id" => self.gateway_id.as_deref(),
            "reports_path" => self.reports_path.as_deref(),
            other => self.extra.get(other).and_then(Value::as_str),
        };
        value.filter(|v| !v.is_empty())
    }

    /// Whether a field holds a usable value
    pub fn has(&self, key: &str) -> bool {
        match key {
            "parameters" => self.parameters.as_ref().is_some_and(|p| !p.is_empty()),
            other => self.value(other).is_some(),
        }
    }

    /// Keys from `keys` that are absent or empty, in the given order
    pub fn missing_keys<'a>(&self, keys: &[&'a str]) -> Vec<&'a str> {
        keys.iter().copied().filter(|key| !self.has(key)).collect()
    }

    /// Name of the path field for a report type
    pub fn path_field(report_type: &str) -> String {
        if report_type.ends_with(PATH_FIELD_SUFFIX) {
            report_type.to_string()
        } else {
            format!("{}{}", report_type, PATH_FIELD_SUFFIX)
        }
    }

    /// Configured path for a report type
    pub fn report_path(&self, report_type: &str) -> Option<&str> {
        self.value(&Self::path_field(report_type))
    }

    /// Every configured `<type>_path` field as `(field, path)`
    pub fn report_paths(&self) -> Vec<(String, &str)> {
        let mut paths = Vec::new();
        if let Some(path) = self.value("reports_path") {
            paths.push(("reports_path".to_string(), path));
        }
        for (key, value) in &self.extra {
            if key.ends_with(PATH_FIELD_SUFFIX) {
                if let Some(path) = value.as_str().filter(|p| !p.is_empty()) {
                    paths.push((key.clone(), path));
                }
            }
        }
        paths
    }

    /// Configured parameters, or an empty map
    pub fn parameters_or_default(&self) -> Map<String, Value> {
        self.parameters.clone().unwrap_or_default()
    }
}

impl fmt::Display for EnvironmentConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match serde_json::to_string(self) {
            Ok(json) => f.write_str(&json),
            Err(_) => write!(f, "{:?}", self),
        }
    }
}

/// Parsed configuration file: environment name to settings
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigDocument {
    environments: Map<String, Value>,
}

impl ConfigDocument {
    /// Parse a document from JSON text
    pub fn from_json_str(content: &str) -> Result<Self> {
        let value: Value =
            serde_json::from_str(content).map_err(|e| PowerBiError::InvalidFormat(e.to_string()))?;
        Self::from_value(value)
    }

    /// Build a document from an already parsed value
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(environments) => Ok(Self { environments }),
            other => Err(PowerBiError::InvalidFormat(format!(
                "expected a JSON object keyed by environment name, found {}",
                json_type_name(&other)
            ))),
        }
    }

    /// Settings for an environment
    ///
    /// An absent key and a falsy value are both `EnvironmentNotFound`.
    pub fn environment(&self, name: &str) -> Result<EnvironmentConfig> {
        let value = self
            .environments
            .get(name)
            .filter(|v| !is_falsy(v))
            .ok_or_else(|| PowerBiError::EnvironmentNotFound {
                environment: name.to_string(),
            })?;

        if !value.is_object() {
            return Err(PowerBiError::InvalidFormat(format!(
                "configuration for environment '{}' must be an object, found {}",
                name,
                json_type_name(value)
            )));
        }

        serde_json::from_value(value.clone()).map_err(|e| {
            PowerBiError::InvalidFormat(format!("environment '{}': {}", name, e))
        })
    }
}

/// Identifiers may be written as JSON numbers; they are kept as text
fn id_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(id)) => Ok(Some(id)),
        Some(Value::Number(id)) => Ok(Some(id.to_string())),
        Some(other) => Err(de::Error::custom(format!(
            "expected a string or number identifier, found {}",
            json_type_name(&other)
        ))),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
