//! A [`Transport`] backed by `reqwest`.
//!
//! [`ReqwestTransport`] performs one HTTP exchange per call and returns the
//! status, headers and body text as-is. Non-2xx statuses are not errors here:
//! the gateway reports failures in the JSON body, which the core verifies.
//! Connection failures and timeouts become [`HttpTransportError`].

use std::time::Duration;

use http::header::{CONTENT_TYPE, HeaderValue};
use payfort::transport::{Transport, TransportError, TransportRequest, TransportResponse};
use reqwest::Client;

#[cfg(feature = "telemetry")]
use tracing::instrument;

use crate::constants::{APPLICATION_JSON, DEFAULT_TIMEOUT, MAX_REDIRECTS};
use crate::error::HttpTransportError;

/// Configuration for [`ReqwestTransport`].
pub struct TransportConfig {
    /// HTTP request timeout.
    pub timeout: Duration,

    /// Optional pre-configured reqwest client. If `None`, a new client is
    /// created with the configured timeout.
    pub http_client: Option<Client>,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            http_client: None,
        }
    }
}

impl TransportConfig {
    /// Sets the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets a pre-configured reqwest client.
    #[must_use]
    pub fn with_http_client(mut self, client: Client) -> Self {
        self.http_client = Some(client);
        self
    }
}

impl std::fmt::Debug for TransportConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransportConfig")
            .field("timeout", &self.timeout)
            .field("has_http_client", &self.http_client.is_some())
            .finish()
    }
}

/// Sends gateway requests with `reqwest`.
///
/// # Example
///
/// ```no_run
/// use payfort::{ApiClient, Credential, Environment};
/// use payfort_http::{ReqwestTransport, TransportConfig};
///
/// # fn build() -> Result<(), payfort_http::HttpTransportError> {
/// let transport = ReqwestTransport::new(TransportConfig::default())?;
/// let credential = Credential::new("merchant", "access", "in-phrase", "out-phrase");
/// let client = ApiClient::new(Environment::Sandbox, transport, credential);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Creates a transport from the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`HttpTransportError::ClientBuild`] if no client was supplied
    /// and a new one cannot be built.
    pub fn new(config: TransportConfig) -> Result<Self, HttpTransportError> {
        let client = match config.http_client {
            Some(client) => client,
            None => Client::builder()
                .timeout(config.timeout)
                .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
                .build()
                .map_err(|source| HttpTransportError::ClientBuild { source })?,
        };
        Ok(Self { client })
    }

    /// Wraps an existing reqwest client.
    #[must_use]
    pub const fn from_client(client: Client) -> Self {
        Self { client }
    }

    /// Returns the underlying reqwest client.
    #[must_use]
    pub const fn client(&self) -> &Client {
        &self.client
    }

    #[cfg_attr(
        feature = "telemetry",
        instrument(
            name = "payfort_http.send",
            skip_all,
            fields(method = %request.method, uri = %request.uri),
            err
        )
    )]
    async fn execute(
        &self,
        request: &TransportRequest,
    ) -> Result<TransportResponse, HttpTransportError> {
        let context = format!("{} {}", request.method, request.uri);

        let mut headers = request.options.headers.clone();
        if !headers.contains_key(CONTENT_TYPE) {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static(APPLICATION_JSON));
        }

        let http_response = self
            .client
            .request(request.method.clone(), request.uri.as_str())
            .headers(headers)
            .json(&request.options.json)
            .send()
            .await
            .map_err(|source| HttpTransportError::Http {
                context: context.clone(),
                source,
            })?;

        let status = http_response.status();
        let response_headers = http_response.headers().clone();
        let body = http_response
            .text()
            .await
            .map_err(|source| HttpTransportError::ResponseBodyRead { context, source })?;

        #[cfg(feature = "telemetry")]
        tracing::debug!(%status, body_len = body.len(), "payfort_http.response");

        Ok(TransportResponse::new(status, body).with_headers(response_headers))
    }
}

#[async_trait::async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: &TransportRequest) -> Result<TransportResponse, TransportError> {
        self.execute(request).await.map_err(Into::into)
    }
}
