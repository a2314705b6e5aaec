//! Error types for the Payfort client.
//!
//! Every failure in the sign, dispatch, parse and verify pipeline surfaces
//! as one [`Error`] variant carrying the context needed to diagnose it
//! (payloads, digests, URIs). Nothing is retried or swallowed.

use http::{Method, StatusCode};

use crate::payload::Payload;
use crate::transport::{RequestOptions, TransportError};

/// Convenience alias for results returned by this crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Boxed error returned by a response callback.
pub type CallbackError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that can occur while signing, sending or verifying a request.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The signature could not be computed because the hash algorithm is not supported.
    #[error("failed to calculate signature: unsupported hash algorithm `{sha_type}`")]
    SignatureComputation {
        /// The payload that was being signed.
        payload: Payload,
        /// The phrase used to wrap the signable string.
        phrase: crate::credential::ShaPhrase,
        /// The algorithm name that could not be resolved.
        sha_type: String,
    },

    /// The payload has no `signature` field.
    #[error("the signature is not provided")]
    SignatureMissing {
        /// The payload that was checked.
        payload: Payload,
    },

    /// The provided signature does not match the recomputed one.
    #[error("incorrect signature: expected `{expected}`, got `{actual}`")]
    SignatureMismatch {
        /// Digest recomputed from the payload.
        expected: String,
        /// Digest carried by the payload.
        actual: String,
        /// The payload without its `signature` field.
        payload: Payload,
    },

    /// The transport failed to complete the HTTP exchange.
    #[error("request failed: {method} {uri}: {source}")]
    RequestTransport {
        /// Target URI.
        uri: String,
        /// HTTP method.
        method: Method,
        /// Headers and body that were sent.
        options: RequestOptions,
        /// The underlying transport error.
        #[source]
        source: TransportError,
    },

    /// The response body is not a JSON object.
    #[error("failed to parse response (HTTP {status}): {message}")]
    ResponseParse {
        /// Parser error message.
        message: String,
        /// The raw response body.
        content: String,
        /// HTTP status of the response.
        status: StatusCode,
    },

    /// The gateway reported the request as invalid (status `00`).
    #[error(
        "invalid request: {} ({})",
        response_message.as_deref().unwrap_or("no message"),
        response_code.as_deref().unwrap_or("no code")
    )]
    InvalidRequest {
        /// The signed payload that was rejected.
        request: Payload,
        /// Gateway `response_code`, if any.
        response_code: Option<String>,
        /// Gateway `response_message`, if any.
        response_message: Option<String>,
    },

    /// Attempted to modify a response after construction.
    #[error("response attributes are read-only: cannot modify `{key}`")]
    ReadOnlyMutation {
        /// The key that was targeted.
        key: String,
    },

    /// A response callback returned an error.
    #[error("callback execution failed: {source}")]
    CallbackExecution {
        /// The error returned by the callback.
        #[source]
        source: CallbackError,
    },

    /// An environment name did not match `production` or `sandbox`.
    #[error("unknown environment `{0}`")]
    UnknownEnvironment(String),
}
