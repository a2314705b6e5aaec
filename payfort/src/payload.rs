//! Request and response payloads.
//!
//! A [`Payload`] is a flat JSON object. Insertion order is preserved so that
//! nested wallet metadata keeps the order it was supplied in; top-level keys
//! are sorted only when building the signable string.

use serde_json::Value;

/// A JSON object payload with insertion order preserved.
pub type Payload = serde_json::Map<String, Value>;

/// Field carrying the payload signature.
pub const SIGNATURE_FIELD: &str = "signature";

/// Field carrying the merchant access code.
pub const ACCESS_CODE_FIELD: &str = "access_code";

/// Field carrying the merchant identifier.
pub const MERCHANT_IDENTIFIER_FIELD: &str = "merchant_identifier";

/// Removes entries whose value is `null`.
#[must_use]
pub fn filter_payload(payload: Payload) -> Payload {
    payload.into_iter().filter(|(_, v)| !v.is_null()).collect()
}

/// Incremental builder for operation payloads.
///
/// ```rust
/// use payfort::payload::PayloadBuilder;
///
/// let payload = PayloadBuilder::new()
///     .field("query_command", "CHECK_STATUS")
///     .optional("fort_id", None::<String>)
///     .build();
/// assert_eq!(payload.len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct PayloadBuilder {
    payload: Payload,
}

impl PayloadBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a field, replacing any previous value under the same key.
    #[must_use]
    pub fn field(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.payload.insert(key.to_owned(), value.into());
        self
    }

    /// Sets a field only when `value` is `Some`.
    #[must_use]
    pub fn optional<V: Into<Value>>(self, key: &str, value: Option<V>) -> Self {
        match value {
            Some(value) => self.field(key, value),
            None => self,
        }
    }

    /// Merges caller-supplied fields, dropping `null` values.
    #[must_use]
    pub fn extend(mut self, extra: Payload) -> Self {
        self.payload.extend(filter_payload(extra));
        self
    }

    /// Returns the assembled payload.
    #[must_use]
    pub fn build(self) -> Payload {
        self.payload
    }
}
