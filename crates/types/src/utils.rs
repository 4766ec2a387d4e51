//! Utility functions and helpers

/// Character used when masking secrets
pub const MASK_CHAR: char = '*';

/// Mask a secret with one mask character per character of the secret
pub fn mask_secret(secret: &str) -> String {
    std::iter::repeat(MASK_CHAR)
        .take(secret.chars().count())
        .collect()
}

/// Generate a correlation ID for request tracing
pub fn generate_correlation_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Whether a JSON value counts as "nothing configured"
///
/// `null`, `false`, zero, and empty strings, arrays or objects are falsy.
pub fn is_falsy(value: &serde_json::Value) -> bool {
    use serde_json::Value;

    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64().map(|f| f == 0.0).unwrap_or(false),
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}
