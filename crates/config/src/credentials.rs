//! Service principal credentials

use std::fmt;
use types::{utils::mask_secret, PowerBiError, Result};

/// Environment variable holding the client id
pub const CLIENT_ID_ENV: &str = "POWER_BI_CLIENT_ID";
/// Environment variable holding the client secret
pub const CLIENT_SECRET_ENV: &str = "POWER_BI_CLIENT_SECRET";

/// Client id and secret used to authenticate a session
///
/// `Debug` never prints the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    client_id: String,
    client_secret: String,
}

impl Credentials {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }

    /// Read credentials from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read credentials through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let credentials = Self::new(
            lookup(CLIENT_ID_ENV).unwrap_or_default(),
            lookup(CLIENT_SECRET_ENV).unwrap_or_default(),
        );
        credentials.validate()?;
        Ok(credentials)
    }

    /// Both values must be non-empty; whitespace is passed through untouched
    pub fn validate(&self) -> Result<()> {
        let mut missing = Vec::new();
        if self.client_id.is_empty() {
            missing.push(CLIENT_ID_ENV);
        }
        if self.client_secret.is_empty() {
            missing.push(CLIENT_SECRET_ENV);
        }

        if missing.is_empty() {
            Ok(())
        } else {
            Err(PowerBiError::MissingCredentials(format!(
                "{} must be set",
                missing.join(", ")
            )))
        }
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn client_secret(&self) -> &str {
        &self.client_secret
    }

    /// Secret masked character for character
    pub fn masked_secret(&self) -> String {
        mask_secret(&self.client_secret)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &self.masked_secret())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_from_lookup_success() {
        let creds = Credentials::from_lookup(lookup_from(&[
            (CLIENT_ID_ENV, "client-123"),
            (CLIENT_SECRET_ENV, "topsecret"),
        ]))
        .unwrap();
        assert_eq!(creds.client_id(), "client-123");
        assert_eq!(creds.client_secret(), "topsecret");
    }

    #[test]
    fn test_missing_either_value() {
        let err = Credentials::from_lookup(lookup_from(&[(CLIENT_ID_ENV, "client-123")])).unwrap_err();
        assert!(matches!(err, PowerBiError::MissingCredentials(ref m) if m.contains(CLIENT_SECRET_ENV)));

        let err = Credentials::from_lookup(lookup_from(&[(CLIENT_SECRET_ENV, "topsecret")])).unwrap_err();
        assert!(matches!(err, PowerBiError::MissingCredentials(ref m) if m.contains(CLIENT_ID_ENV)));

        let err = Credentials::from_lookup(lookup_from(&[
            (CLIENT_ID_ENV, ""),
            (CLIENT_SECRET_ENV, "topsecret"),
        ]))
        .unwrap_err();
        assert_eq!(err.kind(), "MissingCredentials");
    }

    #[test]
    fn test_only_empty_values_are_missing() {
        assert!(Credentials::new(" client ", "  ").validate().is_ok());
        assert!(Credentials::new("", "").validate().is_err());
    }

    #[test]
    #[serial]
    fn test_from_env() {
        std::env::set_var(CLIENT_ID_ENV, "env-client");
        std::env::set_var(CLIENT_SECRET_ENV, "env-secret");
        let creds = Credentials::from_env().unwrap();
        assert_eq!(creds.client_id(), "env-client");
        assert_eq!(creds.client_secret(), "env-secret");

        std::env::remove_var(CLIENT_SECRET_ENV);
        let err = Credentials::from_env().unwrap_err();
        assert!(matches!(err, PowerBiError::MissingCredentials(ref m) if m == "POWER_BI_CLIENT_SECRET must be set"));

        std::env::set_var(CLIENT_SECRET_ENV, "env-secret");
        std::env::remove_var(CLIENT_ID_ENV);
        let err = Credentials::from_env().unwrap_err();
        assert!(matches!(err, PowerBiError::MissingCredentials(ref m) if m == "POWER_BI_CLIENT_ID must be set"));

        std::env::remove_var(CLIENT_SECRET_ENV);
    }

    #[test]
    fn test_debug_masks_secret() {
        let creds = Credentials::new("client-123", "topsecret");
        let debug = format!("{:?}", creds);
        assert!(debug.contains("client-123"));
        assert!(!debug.contains("topsecret"));
        assert!(debug.contains("*********"));
        assert_eq!(creds.masked_secret().len(), "topsecret".len());
    }
}
