//! Read-only gateway responses.
//!
//! A [`Response`] is built once from a transport response (by parsing its
//! JSON body) or from an attribute map, and never changes afterwards.

use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::operation::Operation;
use crate::payload::Payload;
use crate::status::{self, Status};
use crate::transport::TransportResponse;

/// Message part of a `response_code` for a declined transaction.
pub const TRANSACTION_DECLINED_MESSAGE: &str = "006";

/// The source a [`Response`] was built from.
#[derive(Debug, Clone, PartialEq)]
pub enum RawResponse {
    /// An HTTP response returned by the transport.
    Http(TransportResponse),
    /// An attribute map supplied directly.
    Attributes(Payload),
}

/// Immutable keyed view over a gateway response.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    attributes: Payload,
    raw: RawResponse,
}

impl Response {
    /// Parses the JSON object in a transport response body.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ResponseParse`] if the body is not a JSON object.
    pub fn parse(raw: &TransportResponse) -> Result<Payload> {
        let parse_error = |message: String| Error::ResponseParse {
            message,
            content: raw.body.clone(),
            status: raw.status,
        };
        match serde_json::from_str::<Value>(&raw.body) {
            Ok(Value::Object(attributes)) => Ok(attributes),
            Ok(other) => Err(parse_error(format!(
                "expected a JSON object, found {}",
                json_type_name(&other)
            ))),
            Err(e) => Err(parse_error(e.to_string())),
        }
    }

    /// Builds a response from a transport response.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ResponseParse`] if the body is not a JSON object.
    pub fn from_transport(raw: TransportResponse) -> Result<Self> {
        let attributes = Self::parse(&raw)?;
        Ok(Self {
            attributes,
            raw: RawResponse::Http(raw),
        })
    }

    /// Builds a response from an attribute map.
    #[must_use]
    pub fn from_attributes(attributes: Payload) -> Self {
        Self {
            raw: RawResponse::Attributes(attributes.clone()),
            attributes,
        }
    }

    /// Returns the value under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    /// Returns the value under `key` if it is a string.
    #[must_use]
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    /// Returns the value under `key` as an integer, accepting numeric strings.
    #[must_use]
    pub fn get_i64(&self, key: &str) -> Option<i64> {
        match self.get(key)? {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.parse().ok(),
            _ => None,
        }
    }

    /// Returns `true` if `key` is present and not `null`.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some_and(|v| !v.is_null())
    }

    /// Returns the parsed attributes.
    #[must_use]
    pub const fn attributes(&self) -> &Payload {
        &self.attributes
    }

    /// Returns a copy of the attributes, unchanged.
    #[must_use]
    pub fn to_map(&self) -> Payload {
        self.attributes.clone()
    }

    /// Returns the source this response was built from.
    #[must_use]
    pub const fn raw(&self) -> &RawResponse {
        &self.raw
    }

    /// Responses are read-only; this always fails.
    ///
    /// # Errors
    ///
    /// Always returns [`Error::ReadOnlyMutation`].
    pub fn try_set(&mut self, key: &str, _value: impl Into<Value>) -> Result<()> {
        Err(Error::ReadOnlyMutation {
            key: key.to_owned(),
        })
    }

    /// Responses are read-only; this always fails.
    ///
    /// # Errors
    ///
    /// Always returns [`Error::ReadOnlyMutation`].
    pub fn try_remove(&mut self, key: &str) -> Result<Value> {
        Err(Error::ReadOnlyMutation {
            key: key.to_owned(),
        })
    }

    /// Two-digit `status`.
    #[must_use]
    pub fn status(&self) -> Option<&str> {
        self.get_str("status")
    }

    /// `status` resolved to a known [`Status`].
    #[must_use]
    pub fn known_status(&self) -> Option<Status> {
        self.status().and_then(Status::from_code)
    }

    /// Five-digit `response_code`.
    #[must_use]
    pub fn response_code(&self) -> Option<&str> {
        self.get_str("response_code")
    }

    /// Human-readable `response_message`.
    #[must_use]
    pub fn response_message(&self) -> Option<&str> {
        self.get_str("response_message")
    }

    /// Gateway order identifier.
    #[must_use]
    pub fn fort_id(&self) -> Option<&str> {
        self.get_str("fort_id")
    }

    /// Merchant order reference.
    #[must_use]
    pub fn merchant_reference(&self) -> Option<&str> {
        self.get_str("merchant_reference")
    }

    /// Returns `true` if the gateway rejected the request as invalid.
    #[must_use]
    pub fn invalid_request(&self) -> bool {
        status::is_success(self, Status::InvalidRequest)
    }

    /// Returns `true` if `status` is the success status of `operation`.
    #[must_use]
    pub fn is_success(&self, operation: Operation) -> bool {
        status::is_success(self, operation.success_status())
    }

    /// Amount in minor units, as sent by the gateway.
    #[must_use]
    pub fn amount(&self) -> Option<&str> {
        self.get_str("amount")
    }

    /// Currency code.
    #[must_use]
    pub fn currency(&self) -> Option<&str> {
        self.get_str("currency")
    }

    /// Total authorized amount (check status).
    #[must_use]
    pub fn authorized_amount(&self) -> Option<&str> {
        self.get_str("authorized_amount")
    }

    /// Total captured amount (check status).
    #[must_use]
    pub fn captured_amount(&self) -> Option<&str> {
        self.get_str("captured_amount")
    }

    /// Total refunded amount (check status).
    #[must_use]
    pub fn refunded_amount(&self) -> Option<&str> {
        self.get_str("refunded_amount")
    }

    /// Whether a refund was declined by the acquirer.
    ///
    /// `None` when the response carries no `response_code`.
    #[must_use]
    pub fn refund_declined(&self) -> Option<bool> {
        let message = self
            .response_code()?
            .strip_prefix(Status::RefundFailed.code());
        Some(message == Some(TRANSACTION_DECLINED_MESSAGE))
    }

    /// Token name (token services, payments).
    #[must_use]
    pub fn token_name(&self) -> Option<&str> {
        self.get_str("token_name")
    }

    /// `ACTIVE` maps to `true`, `INACTIVE` to `false`; anything else is `None`.
    #[must_use]
    pub fn token_status(&self) -> Option<bool> {
        match self.get_str("token_status")? {
            "ACTIVE" => Some(true),
            "INACTIVE" => Some(false),
            _ => None,
        }
    }

    /// Masked card number.
    #[must_use]
    pub fn card_number(&self) -> Option<&str> {
        self.get_str("card_number")
    }

    /// Card expiry date (`YYMM`).
    #[must_use]
    pub fn expiry_date(&self) -> Option<&str> {
        self.get_str("expiry_date")
    }

    /// Card holder name.
    #[must_use]
    pub fn card_holder_name(&self) -> Option<&str> {
        self.get_str("card_holder_name")
    }

    /// Card brand (`VISA`, `MASTERCARD`, ...).
    #[must_use]
    pub fn card_brand(&self) -> Option<&str> {
        self.get_str("card_brand")
    }

    /// Card BIN.
    #[must_use]
    pub fn card_bin(&self) -> Option<&str> {
        self.get_str("card_bin")
    }

    /// Recurring agreement identifier.
    #[must_use]
    pub fn agreement_id(&self) -> Option<&str> {
        self.get_str("agreement_id")
    }

    /// Card issuer country.
    #[must_use]
    pub fn issuer_country(&self) -> Option<&str> {
        self.get_str("issuer_country")
    }

    /// Card issuer name.
    #[must_use]
    pub fn issuer_name(&self) -> Option<&str> {
        self.get_str("issuer_name")
    }
}

impl Serialize for Response {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.attributes.serialize(serializer)
    }
}

const fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::StatusCode;
    use serde_json::json;

    fn http_response(status: StatusCode, body: &str) -> TransportResponse {
        TransportResponse::new(status, body)
    }

    #[test]
    fn test_parses_valid_json() {
        let raw = http_response(StatusCode::OK, r#"{"status":"success","amount":100}"#);
        let response = Response::from_transport(raw.clone()).unwrap();
        assert_eq!(response.get_str("status"), Some("success"));
        assert_eq!(response.get_i64("amount"), Some(100));
        assert_eq!(response.raw(), &RawResponse::Http(raw));
    }

    #[test]
    fn test_invalid_json_carries_context() {
        let raw = http_response(StatusCode::BAD_REQUEST, "{invalid json");
        match Response::from_transport(raw).unwrap_err() {
            Error::ResponseParse {
                message,
                content,
                status,
            } => {
                assert!(!message.is_empty());
                assert_eq!(content, "{invalid json");
                assert_eq!(status, StatusCode::BAD_REQUEST);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_non_object_json_is_rejected() {
        let raw = http_response(StatusCode::OK, "[1,2,3]");
        assert!(matches!(
            Response::parse(&raw),
            Err(Error::ResponseParse { .. })
        ));
    }

    #[test]
    fn test_serializes_attributes_unchanged() {
        let attributes = json!({"foo": "bar", "n": 1});
        let response = Response::from_attributes(attributes.as_object().unwrap().clone());
        assert_eq!(serde_json::to_value(&response).unwrap(), attributes);
        assert_eq!(Value::Object(response.to_map()), attributes);
    }

    #[test]
    fn test_mutation_is_rejected() {
        let mut response = Response::from_attributes(Payload::new());
        assert!(matches!(
            response.try_set("status", "14"),
            Err(Error::ReadOnlyMutation { key }) if key == "status"
        ));
        assert!(matches!(
            response.try_remove("status"),
            Err(Error::ReadOnlyMutation { .. })
        ));
        assert!(response.attributes().is_empty());
    }

    #[test]
    fn test_success_predicates() {
        let response = Response::from_attributes(
            json!({"status": "14", "token_status": "INACTIVE"})
                .as_object()
                .unwrap()
                .clone(),
        );
        assert!(response.is_success(Operation::Purchase));
        assert!(response.is_success(Operation::Recurring));
        assert!(!response.is_success(Operation::Authorization));
        assert!(!response.invalid_request());
        assert_eq!(response.known_status(), Some(Status::PurchaseSuccess));
        assert_eq!(response.token_status(), Some(false));
    }

    #[test]
    fn test_refund_declined() {
        let declined = Response::from_attributes(
            json!({"status": "07", "response_code": "07006"}).as_object().unwrap().clone(),
        );
        assert_eq!(declined.refund_declined(), Some(true));

        let refunded = Response::from_attributes(
            json!({"status": "06", "response_code": "06000"}).as_object().unwrap().clone(),
        );
        assert_eq!(refunded.refund_declined(), Some(false));
        assert!(refunded.is_success(Operation::Refund));

        assert_eq!(Response::from_attributes(Payload::new()).refund_declined(), None);
    }

    #[test]
    fn test_missing_keys_are_absent() {
        let response = Response::from_attributes(Payload::new());
        assert_eq!(response.get("status"), None);
        assert_eq!(response.token_status(), None);
        assert!(!response.contains_key("status"));
    }
}
