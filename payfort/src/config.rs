//! Merchant configuration.
//!
//! A flat serde document carrying the environment name and the credential
//! fields, suitable for loading from JSON or any other serde format.

use serde::{Deserialize, Serialize};

use crate::credential::Credential;
use crate::environment::Environment;

/// Configuration for a [`Merchant`](crate::Merchant).
///
/// # Example
///
/// ```rust
/// use payfort::{Environment, MerchantConfig};
///
/// let config: MerchantConfig = serde_json::from_str(r#"{
///     "environment": "sandbox",
///     "merchant_identifier": "merchant",
///     "access_code": "access",
///     "sha_request_phrase": "in-phrase",
///     "sha_response_phrase": "out-phrase"
/// }"#).unwrap();
///
/// assert_eq!(config.environment(), Environment::Sandbox);
/// assert_eq!(config.credential().sha_type(), "sha256");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerchantConfig {
    /// Target environment (`production` or `sandbox`).
    pub environment: Environment,

    /// Merchant identity and signing secrets.
    #[serde(flatten)]
    pub credential: Credential,
}

impl MerchantConfig {
    /// Creates a configuration.
    #[must_use]
    pub const fn new(environment: Environment, credential: Credential) -> Self {
        Self {
            environment,
            credential,
        }
    }

    /// Returns the environment.
    #[must_use]
    pub const fn environment(&self) -> Environment {
        self.environment
    }

    /// Returns the credential.
    #[must_use]
    pub const fn credential(&self) -> &Credential {
        &self.credential
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_flat_document() {
        let config: MerchantConfig = serde_json::from_value(json!({
            "environment": "production",
            "merchant_identifier": "merchant",
            "access_code": "access",
            "sha_request_phrase": "in",
            "sha_response_phrase": "out",
            "sha_type": "sha512",
        }))
        .unwrap();
        assert_eq!(config.environment(), Environment::Production);
        assert_eq!(config.credential().merchant_identifier(), "merchant");
        assert_eq!(config.credential().sha_request_phrase().expose(), "in");
        assert_eq!(config.credential().sha_type(), "sha512");
    }

    #[test]
    fn test_unknown_environment_fails() {
        let result = serde_json::from_value::<MerchantConfig>(json!({
            "environment": "staging",
            "merchant_identifier": "merchant",
            "access_code": "access",
            "sha_request_phrase": "in",
            "sha_response_phrase": "out",
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_serialize_round_trip() {
        let config = MerchantConfig::new(
            Environment::Sandbox,
            Credential::new("merchant", "access", "in", "out"),
        );
        let value = serde_json::to_value(&config).unwrap();
        assert_eq!(value["environment"], "sandbox");
        assert_eq!(value["sha_type"], "sha256");
        assert_eq!(serde_json::from_value::<MerchantConfig>(value).unwrap(), config);
    }
}
