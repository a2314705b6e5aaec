//! Payload signatures.
//!
//! The gateway signs a payload by sorting its top-level keys, concatenating
//! `key=value` pairs with no separator, wrapping the result in the shared SHA
//! phrase on both sides and hashing it. The remote side recomputes the same
//! string, so the rendering here has to be byte-exact.
//!
//! Two gateway quirks are reproduced as-is:
//!
//! - `installment_detail` is sent on the wire but never signed.
//! - `apple_header` and `apple_paymentMethod` hold nested objects whose
//!   entries are rendered in their original order as `k=v` joined by `", "`
//!   and wrapped in braces. They are not sorted.

use serde_json::Value;
use sha1::Sha1;
use sha2::{Digest, Sha224, Sha256, Sha384, Sha512, Sha512_224, Sha512_256};
use subtle::ConstantTimeEq;

use crate::credential::{Credential, PhraseKind, ShaPhrase};
use crate::error::{Error, Result};
use crate::payload::{Payload, SIGNATURE_FIELD};

/// Field excluded from the signable string.
pub const INSTALLMENT_DETAIL_FIELD: &str = "installment_detail";

/// Apple Pay header metadata, rendered positionally.
pub const APPLE_HEADER_FIELD: &str = "apple_header";

/// Apple Pay payment method metadata, rendered positionally.
pub const APPLE_PAYMENT_METHOD_FIELD: &str = "apple_paymentMethod";

/// Floats at or above this magnitude switch to exponent notation remotely.
const MAX_INTEGRAL_FLOAT: f64 = 1e15;

/// Hash algorithms accepted for signatures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HashAlgorithm {
    /// SHA-1, offered by the gateway as "SHA-128".
    Sha1,
    /// SHA-224.
    Sha224,
    /// SHA-256.
    Sha256,
    /// SHA-384.
    Sha384,
    /// SHA-512.
    Sha512,
    /// SHA-512/224.
    Sha512_224,
    /// SHA-512/256.
    Sha512_256,
}

impl HashAlgorithm {
    /// All supported algorithms.
    pub const ALL: [Self; 7] = [
        Self::Sha1,
        Self::Sha224,
        Self::Sha256,
        Self::Sha384,
        Self::Sha512,
        Self::Sha512_224,
        Self::Sha512_256,
    ];

    /// Canonical lowercase name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Sha1 => "sha1",
            Self::Sha224 => "sha224",
            Self::Sha256 => "sha256",
            Self::Sha384 => "sha384",
            Self::Sha512 => "sha512",
            Self::Sha512_224 => "sha512/224",
            Self::Sha512_256 => "sha512/256",
        }
    }

    /// Resolves an algorithm by name, ignoring ASCII case.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|algorithm| algorithm.name().eq_ignore_ascii_case(name))
    }

    /// Length of the hex digest in characters.
    #[must_use]
    pub const fn hex_len(self) -> usize {
        match self {
            Self::Sha1 => 40,
            Self::Sha224 | Self::Sha512_224 => 56,
            Self::Sha256 | Self::Sha512_256 => 64,
            Self::Sha384 => 96,
            Self::Sha512 => 128,
        }
    }

    /// Hashes `input` and returns the lowercase hex digest.
    #[must_use]
    pub fn digest_hex(self, input: &[u8]) -> String {
        match self {
            Self::Sha1 => hex::encode(Sha1::digest(input)),
            Self::Sha224 => hex::encode(Sha224::digest(input)),
            Self::Sha256 => hex::encode(Sha256::digest(input)),
            Self::Sha384 => hex::encode(Sha384::digest(input)),
            Self::Sha512 => hex::encode(Sha512::digest(input)),
            Self::Sha512_224 => hex::encode(Sha512_224::digest(input)),
            Self::Sha512_256 => hex::encode(Sha512_256::digest(input)),
        }
    }
}

/// Computes and verifies payload signatures for one SHA phrase.
///
/// # Example
///
/// ```rust
/// use payfort::Signature;
/// use serde_json::json;
///
/// let payload = json!({
///     "query_command": "CHECK_STATUS",
///     "language": "en",
///     "merchant_reference": "122333",
/// });
/// let digest = Signature::new("sha-request-phrase", "sha256")
///     .calculate(payload.as_object().unwrap())
///     .unwrap();
/// assert_eq!(digest, "9eb08299a5f9cda485e4967a25d4c8ff7ecfc98ae8f6d23fcb12457ea709fb26");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    phrase: ShaPhrase,
    sha_type: String,
}

impl Signature {
    /// Creates a signature helper from a phrase and an algorithm name.
    #[must_use]
    pub fn new(phrase: impl Into<ShaPhrase>, sha_type: impl Into<String>) -> Self {
        Self {
            phrase: phrase.into(),
            sha_type: sha_type.into(),
        }
    }

    /// Creates a signature helper from the credential's request or response phrase.
    #[must_use]
    pub fn from_credential(credential: &Credential, kind: PhraseKind) -> Self {
        Self::new(credential.phrase(kind).clone(), credential.sha_type())
    }

    /// Returns the configured algorithm name.
    #[must_use]
    pub fn sha_type(&self) -> &str {
        &self.sha_type
    }

    /// Builds the signable string (without the surrounding phrase).
    #[must_use]
    pub fn canonical_string(payload: &Payload) -> String {
        let mut keys: Vec<&String> = payload.keys().collect();
        keys.sort_unstable();

        let mut out = String::new();
        for key in keys {
            if key == INSTALLMENT_DETAIL_FIELD {
                continue;
            }
            let Some(value) = payload.get(key) else {
                continue;
            };
            out.push_str(key);
            out.push('=');
            if key == APPLE_HEADER_FIELD || key == APPLE_PAYMENT_METHOD_FIELD {
                out.push('{');
                push_positional(&mut out, value);
                out.push('}');
            } else {
                push_scalar(&mut out, value);
            }
        }
        out
    }

    /// Calculates the signature of `payload`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SignatureComputation`] if the algorithm name is not supported.
    pub fn calculate(&self, payload: &Payload) -> Result<String> {
        let algorithm =
            HashAlgorithm::from_name(&self.sha_type).ok_or_else(|| Error::SignatureComputation {
                payload: payload.clone(),
                phrase: self.phrase.clone(),
                sha_type: self.sha_type.clone(),
            })?;

        let phrase = self.phrase.expose();
        let canonical = Self::canonical_string(payload);
        let mut sha_string = String::with_capacity(canonical.len() + 2 * phrase.len());
        sha_string.push_str(phrase);
        sha_string.push_str(&canonical);
        sha_string.push_str(phrase);

        Ok(algorithm.digest_hex(sha_string.as_bytes()))
    }

    /// Verifies the `signature` field of `payload` against the rest of it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SignatureMissing`] if there is no signature,
    /// [`Error::SignatureMismatch`] if it does not match, or
    /// [`Error::SignatureComputation`] if the algorithm is not supported.
    pub fn verify(&self, payload: &Payload) -> Result<()> {
        let actual = match payload.get(SIGNATURE_FIELD) {
            None | Some(Value::Null) => {
                return Err(Error::SignatureMissing {
                    payload: payload.clone(),
                });
            }
            Some(Value::String(signature)) => signature.clone(),
            Some(other) => other.to_string(),
        };

        let mut unsigned = payload.clone();
        unsigned.remove(SIGNATURE_FIELD);
        let expected = self.calculate(&unsigned)?;

        if bool::from(expected.as_bytes().ct_eq(actual.as_bytes())) {
            Ok(())
        } else {
            Err(Error::SignatureMismatch {
                expected,
                actual,
                payload: unsigned,
            })
        }
    }
}

/// Renders a nested object as `k=v` pairs joined by `", "` in insertion order.
fn push_positional(out: &mut String, value: &Value) {
    let Value::Object(entries) = value else {
        push_scalar(out, value);
        return;
    };
    for (index, (key, value)) in entries.iter().enumerate() {
        if index > 0 {
            out.push_str(", ");
        }
        out.push_str(key);
        out.push('=');
        push_scalar(out, value);
    }
}

/// Renders a value the way the gateway stringifies it: `true` is `1`,
/// `false` and `null` are empty, integral floats drop their fraction.
#[allow(clippy::float_cmp)]
fn push_scalar(out: &mut String, value: &Value) {
    match value {
        Value::String(s) => out.push_str(s),
        Value::Null | Value::Bool(false) => {}
        Value::Bool(true) => out.push('1'),
        Value::Number(n) => match n.as_f64() {
            Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < MAX_INTEGRAL_FLOAT => {
                out.push_str(&format!("{f:.0}"));
            }
            _ => out.push_str(&n.to_string()),
        },
        Value::Array(_) | Value::Object(_) => out.push_str(&value.to_string()),
    }
}
