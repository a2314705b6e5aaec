//! The HTTP transport seam.
//!
//! The core never talks to the network directly. Callers inject a
//! [`Transport`]; `payfort-http` provides one backed by reqwest. Timeouts,
//! connection pooling and cancellation belong to the transport.

use http::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use http::{Method, StatusCode};

use crate::payload::Payload;

/// Error returned by a [`Transport`].
pub type TransportError = Box<dyn std::error::Error + Send + Sync>;

/// Headers and JSON body of an outbound request.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestOptions {
    /// Request headers.
    pub headers: HeaderMap,
    /// JSON body.
    pub json: Payload,
}

impl RequestOptions {
    /// Options for a JSON body with `Content-Type: application/json`.
    #[must_use]
    pub fn json(payload: Payload) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Self {
            headers,
            json: payload,
        }
    }
}

/// A request handed to a [`Transport`].
#[derive(Debug, Clone, PartialEq)]
pub struct TransportRequest {
    /// HTTP method.
    pub method: Method,
    /// Absolute target URI.
    pub uri: String,
    /// Headers and body.
    pub options: RequestOptions,
}

/// A raw response returned by a [`Transport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    /// HTTP status.
    pub status: StatusCode,
    /// Response headers.
    pub headers: HeaderMap,
    /// Response body as text.
    pub body: String,
}

impl TransportResponse {
    /// Creates a response with no headers.
    #[must_use]
    pub fn new(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: body.into(),
        }
    }

    /// Sets the response headers.
    #[must_use]
    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }
}

/// Sends a single HTTP exchange.
///
/// Implementations must be safe to share across tasks. A non-2xx status is
/// not an error at this layer: the gateway reports failures in the body.
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    /// Sends `request` and returns the raw response.
    ///
    /// # Errors
    ///
    /// Returns a [`TransportError`] on network failure or timeout.
    async fn send(&self, request: &TransportRequest) -> Result<TransportResponse, TransportError>;
}
