//! Error types for the HTTP transport layer.

/// Errors raised by [`ReqwestTransport`](crate::transport::ReqwestTransport).
///
/// At the [`payfort::transport::Transport`] boundary these are boxed into a
/// [`payfort::transport::TransportError`].
#[derive(Debug, thiserror::Error)]
pub enum HttpTransportError {
    /// The reqwest client could not be built.
    #[error("failed to build HTTP client: {source}")]
    ClientBuild {
        /// The underlying reqwest error.
        #[source]
        source: reqwest::Error,
    },
    /// HTTP transport error.
    #[error("HTTP error: {context}: {source}")]
    Http {
        /// Human-readable context.
        context: String,
        /// The underlying reqwest error.
        #[source]
        source: reqwest::Error,
    },
    /// Failed to read response body.
    #[error("Failed to read response body as text: {context}: {source}")]
    ResponseBodyRead {
        /// Human-readable context.
        context: String,
        /// The underlying reqwest error.
        #[source]
        source: reqwest::Error,
    },
}
