//! Merchant credentials.
//!
//! A [`Credential`] bundles the merchant identity with the two SHA phrases
//! agreed with the gateway: one wraps outbound request signatures, the other
//! wraps inbound response signatures.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Default signature hash algorithm.
pub const DEFAULT_SHA_TYPE: &str = "sha256";

fn default_sha_type() -> String {
    DEFAULT_SHA_TYPE.to_owned()
}

/// A shared SHA phrase. Redacted in `Debug` output.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShaPhrase(String);

impl ShaPhrase {
    /// Wraps a phrase.
    #[must_use]
    pub fn new(phrase: impl Into<String>) -> Self {
        Self(phrase.into())
    }

    /// Returns the phrase in clear text.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ShaPhrase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ShaPhrase(***)")
    }
}

impl From<&str> for ShaPhrase {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ShaPhrase {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Which of the two credential phrases a signature uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PhraseKind {
    /// Phrase for signing outbound requests.
    Request,
    /// Phrase for verifying inbound responses.
    Response,
}

/// Merchant identity and signing secrets.
///
/// Values are taken as given; nothing is validated at construction.
///
/// # Example
///
/// ```rust
/// use payfort::Credential;
///
/// let credential = Credential::new("merchant", "access", "in-phrase", "out-phrase")
///     .with_sha_type("sha512");
/// assert_eq!(credential.sha_type(), "sha512");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    merchant_identifier: String,
    access_code: String,
    sha_request_phrase: ShaPhrase,
    sha_response_phrase: ShaPhrase,
    #[serde(default = "default_sha_type")]
    sha_type: String,
}

impl Credential {
    /// Creates a credential using the default `sha256` algorithm.
    #[must_use]
    pub fn new(
        merchant_identifier: impl Into<String>,
        access_code: impl Into<String>,
        sha_request_phrase: impl Into<ShaPhrase>,
        sha_response_phrase: impl Into<ShaPhrase>,
    ) -> Self {
        Self {
            merchant_identifier: merchant_identifier.into(),
            access_code: access_code.into(),
            sha_request_phrase: sha_request_phrase.into(),
            sha_response_phrase: sha_response_phrase.into(),
            sha_type: default_sha_type(),
        }
    }

    /// Sets the hash algorithm name (e.g. `"sha512"`).
    #[must_use]
    pub fn with_sha_type(mut self, sha_type: impl Into<String>) -> Self {
        self.sha_type = sha_type.into();
        self
    }

    /// Returns the merchant identifier.
    #[must_use]
    pub fn merchant_identifier(&self) -> &str {
        &self.merchant_identifier
    }

    /// Returns the access code.
    #[must_use]
    pub fn access_code(&self) -> &str {
        &self.access_code
    }

    /// Returns the request SHA phrase.
    #[must_use]
    pub const fn sha_request_phrase(&self) -> &ShaPhrase {
        &self.sha_request_phrase
    }

    /// Returns the response SHA phrase.
    #[must_use]
    pub const fn sha_response_phrase(&self) -> &ShaPhrase {
        &self.sha_response_phrase
    }

    /// Returns the phrase for the given direction.
    #[must_use]
    pub const fn phrase(&self, kind: PhraseKind) -> &ShaPhrase {
        match kind {
            PhraseKind::Request => &self.sha_request_phrase,
            PhraseKind::Response => &self.sha_response_phrase,
        }
    }

    /// Returns the hash algorithm name.
    #[must_use]
    pub fn sha_type(&self) -> &str {
        &self.sha_type
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors() {
        let credential = Credential::new("merchant", "access", "req", "resp");
        assert_eq!(credential.merchant_identifier(), "merchant");
        assert_eq!(credential.access_code(), "access");
        assert_eq!(credential.sha_request_phrase().expose(), "req");
        assert_eq!(credential.sha_response_phrase().expose(), "resp");
        assert_eq!(credential.sha_type(), DEFAULT_SHA_TYPE);
        assert_eq!(credential.phrase(PhraseKind::Response).expose(), "resp");
    }

    #[test]
    fn test_debug_redacts_phrases() {
        let credential = Credential::new("merchant", "access", "top-secret", "other-secret");
        let debug = format!("{credential:?}");
        assert!(!debug.contains("top-secret"));
        assert!(!debug.contains("other-secret"));
        assert!(debug.contains("merchant"));
    }

    #[test]
    fn test_deserialize_defaults_sha_type() {
        let credential: Credential = serde_json::from_value(serde_json::json!({
            "merchant_identifier": "m",
            "access_code": "a",
            "sha_request_phrase": "in",
            "sha_response_phrase": "out",
        }))
        .unwrap();
        assert_eq!(credential.sha_type(), "sha256");
        assert_eq!(credential.sha_request_phrase().expose(), "in");
    }
}
