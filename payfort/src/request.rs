//! The sign, dispatch, parse and verify pipeline.
//!
//! One call to [`ApiClient::request`] moves a payload through
//! `Building -> Signed -> Dispatched -> Parsed -> Verified -> Delivered`.
//! Any failure ends the exchange; nothing is retried here.

use std::fmt;
use std::sync::Arc;

use http::Method;
#[cfg(feature = "telemetry")]
use tracing::instrument;

use crate::credential::{Credential, PhraseKind};
use crate::environment::{Environment, PAYMENT_API_PATH};
use crate::error::{CallbackError, Error, Result};
use crate::payload::{ACCESS_CODE_FIELD, MERCHANT_IDENTIFIER_FIELD, Payload, SIGNATURE_FIELD};
use crate::response::Response;
use crate::signature::Signature;
use crate::transport::{RequestOptions, Transport, TransportRequest, TransportResponse};

/// Runs a response callback, wrapping its error.
///
/// # Errors
///
/// Returns [`Error::CallbackExecution`] if the callback fails.
pub fn execute_callback<T, E, F>(callback: F, response: &Response, request: &Payload) -> Result<T>
where
    F: FnOnce(&Response, &Payload) -> Result<T, E>,
    E: Into<CallbackError>,
{
    callback(response, request).map_err(|e| Error::CallbackExecution { source: e.into() })
}

/// Client for the server-to-server payment API.
///
/// Owns the merchant credential and a shared transport. Cloning is cheap and
/// clones share the transport.
///
/// # Example
///
/// ```no_run
/// # async fn run(transport: impl payfort::transport::Transport + 'static) -> payfort::Result<()> {
/// use payfort::{ApiClient, Credential, Environment};
/// use serde_json::json;
///
/// let credential = Credential::new("merchant", "access", "in", "out");
/// let client = ApiClient::new(Environment::Sandbox, transport, credential);
///
/// let payload = json!({"query_command": "CHECK_STATUS", "merchant_reference": "order-1"});
/// let response = client.request(payload.as_object().cloned().unwrap_or_default()).await?;
/// println!("{:?}", response.status());
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct ApiClient {
    environment: Environment,
    base_url: String,
    credential: Credential,
    transport: Arc<dyn Transport>,
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("environment", &self.environment)
            .field("base_url", &self.base_url)
            .field("credential", &self.credential)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Creates a client for `environment`.
    #[must_use]
    pub fn new(
        environment: Environment,
        transport: impl Transport + 'static,
        credential: Credential,
    ) -> Self {
        Self::with_shared_transport(environment, Arc::new(transport), credential)
    }

    /// Creates a client that shares an existing transport.
    #[must_use]
    pub fn with_shared_transport(
        environment: Environment,
        transport: Arc<dyn Transport>,
        credential: Credential,
    ) -> Self {
        Self {
            environment,
            base_url: environment.base_url().to_owned(),
            credential,
            transport,
        }
    }

    /// Overrides the base URL (a trailing slash is added if missing).
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        self.base_url = base_url;
        self
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

    /// Returns the base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the payment API URL requests are sent to by default.
    #[must_use]
    pub fn payment_api_url(&self) -> String {
        format!("{}{PAYMENT_API_PATH}", self.base_url)
    }

    /// Adds the credential fields and the request signature to `payload`.
    ///
    /// Any `signature` already present is replaced.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SignatureComputation`] if the credential's algorithm
    /// is not supported.
    pub fn sign_request_payload(&self, mut payload: Payload) -> Result<Payload> {
        payload.remove(SIGNATURE_FIELD);
        payload.insert(
            ACCESS_CODE_FIELD.to_owned(),
            self.credential.access_code().into(),
        );
        payload.insert(
            MERCHANT_IDENTIFIER_FIELD.to_owned(),
            self.credential.merchant_identifier().into(),
        );

        let signature =
            Signature::from_credential(&self.credential, PhraseKind::Request).calculate(&payload)?;
        payload.insert(SIGNATURE_FIELD.to_owned(), signature.into());
        Ok(payload)
    }

    /// Sends `options` with `method` to `uri`, or to the payment API if `uri` is `None`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RequestTransport`] if the transport fails.
    #[cfg_attr(
        feature = "telemetry",
        instrument(name = "payfort.raw_request", skip_all, fields(method = %method), err)
    )]
    pub async fn raw_request(
        &self,
        options: RequestOptions,
        uri: Option<&str>,
        method: Method,
    ) -> Result<TransportResponse> {
        let uri = uri.map_or_else(|| self.payment_api_url(), ToOwned::to_owned);
        let request = TransportRequest {
            method,
            uri,
            options,
        };

        match self.transport.send(&request).await {
            Ok(response) => {
                #[cfg(feature = "telemetry")]
                tracing::debug!(status = %response.status, "payfort response received");
                Ok(response)
            }
            Err(source) => Err(Error::RequestTransport {
                uri: request.uri,
                method: request.method,
                options: request.options,
                source,
            }),
        }
    }

    /// POSTs a signed payload to the payment API.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RequestTransport`] if the transport fails.
    pub async fn dispatch(&self, signed: &Payload) -> Result<TransportResponse> {
        self.raw_request(RequestOptions::json(signed.clone()), None, Method::POST)
            .await
    }

    /// Parses a raw response, rejects invalid requests and verifies the
    /// response signature.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ResponseParse`], [`Error::InvalidRequest`],
    /// [`Error::SignatureMissing`] or [`Error::SignatureMismatch`].
    pub fn process_response(&self, raw: TransportResponse, request: &Payload) -> Result<Response> {
        let response = Response::from_transport(raw)?;

        if response.invalid_request() {
            #[cfg(feature = "telemetry")]
            tracing::warn!(
                response_code = ?response.response_code(),
                response_message = ?response.response_message(),
                "payfort rejected request"
            );
            return Err(Error::InvalidRequest {
                request: request.clone(),
                response_code: response.response_code().map(ToOwned::to_owned),
                response_message: response.response_message().map(ToOwned::to_owned),
            });
        }

        Signature::from_credential(&self.credential, PhraseKind::Response)
            .verify(response.attributes())?;
        Ok(response)
    }

    /// Signs `payload`, sends it and returns the verified response.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by any pipeline stage.
    #[cfg_attr(
        feature = "telemetry",
        instrument(name = "payfort.request", skip_all, err)
    )]
    pub async fn request(&self, payload: Payload) -> Result<Response> {
        self.exchange(payload).await.map(|(response, _)| response)
    }

    /// Like [`request`](Self::request), then hands the response and the signed
    /// request payload to `callback`.
    ///
    /// # Errors
    ///
    /// Returns any pipeline error, or [`Error::CallbackExecution`] if the
    /// callback fails.
    pub async fn request_with<T, E, F>(&self, payload: Payload, callback: F) -> Result<T>
    where
        F: FnOnce(&Response, &Payload) -> Result<T, E>,
        E: Into<CallbackError>,
    {
        let (response, request) = self.exchange(payload).await?;
        execute_callback(callback, &response, &request)
    }

    async fn exchange(&self, payload: Payload) -> Result<(Response, Payload)> {
        let request = self.sign_request_payload(payload)?;
        let raw = self.dispatch(&request).await?;
        let response = self.process_response(raw, &request)?;
        Ok((response, request))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::Mutex;

    use http::StatusCode;
    use http::header::CONTENT_TYPE;
    use serde_json::{Value, json};

    use super::*;
    use crate::transport::TransportError;

    pub(crate) const REQUEST_PHRASE: &str = "request-phrase";
    pub(crate) const RESPONSE_PHRASE: &str = "response-phrase";

    pub(crate) fn credential() -> Credential {
        Credential::new("merchant-id", "access-code", REQUEST_PHRASE, RESPONSE_PHRASE)
    }

    pub(crate) fn object(value: Value) -> Payload {
        value.as_object().cloned().unwrap_or_default()
    }

    pub(crate) fn signed_response(value: Value) -> String {
        let mut payload = object(value);
        let signature = Signature::new(RESPONSE_PHRASE, "sha256")
            .calculate(&payload)
            .unwrap();
        payload.insert(SIGNATURE_FIELD.into(), signature.into());
        Value::Object(payload).to_string()
    }

    /// Records requests and replays a canned response.
    #[derive(Debug, Default)]
    pub(crate) struct MockTransport {
        pub(crate) reply: Option<(StatusCode, String)>,
        pub(crate) sent: Mutex<Vec<TransportRequest>>,
    }

    impl MockTransport {
        pub(crate) fn replying(body: String) -> Arc<Self> {
            Arc::new(Self {
                reply: Some((StatusCode::OK, body)),
                sent: Mutex::default(),
            })
        }

        pub(crate) fn failing() -> Arc<Self> {
            Arc::new(Self::default())
        }

        pub(crate) fn last_sent(&self) -> TransportRequest {
            self.sent.lock().unwrap().last().cloned().unwrap()
        }
    }

    #[async_trait::async_trait]
    impl Transport for MockTransport {
        async fn send(
            &self,
            request: &TransportRequest,
        ) -> Result<TransportResponse, TransportError> {
            self.sent.lock().unwrap().push(request.clone());
            match &self.reply {
                Some((status, body)) => Ok(TransportResponse::new(*status, body.clone())),
                None => Err("connection refused".into()),
            }
        }
    }

    pub(crate) fn client(transport: Arc<MockTransport>) -> ApiClient {
        ApiClient::with_shared_transport(Environment::Sandbox, transport, credential())
    }

    #[test]
    fn test_sign_request_payload_adds_credentials() {
        let transport = MockTransport::failing();
        let signed = client(transport)
            .sign_request_payload(object(json!({"query_command": "CHECK_STATUS"})))
            .unwrap();

        assert_eq!(signed["access_code"], "access-code");
        assert_eq!(signed["merchant_identifier"], "merchant-id");
        Signature::new(REQUEST_PHRASE, "sha256").verify(&signed).unwrap();
    }

    #[test]
    fn test_sign_request_payload_replaces_stale_signature() {
        let transport = MockTransport::failing();
        let signed = client(transport)
            .sign_request_payload(object(json!({"language": "en", "signature": "stale"})))
            .unwrap();
        assert_ne!(signed["signature"], "stale");
        Signature::new(REQUEST_PHRASE, "sha256").verify(&signed).unwrap();
    }

    #[test]
    fn test_sign_request_payload_unsupported_algorithm() {
        let client = ApiClient::new(
            Environment::Sandbox,
            MockTransport::default(),
            credential().with_sha_type("md4"),
        );
        let err = client.sign_request_payload(Payload::new()).unwrap_err();
        assert!(matches!(err, Error::SignatureComputation { .. }));
    }

    #[tokio::test]
    async fn test_request_happy_path() {
        let transport = MockTransport::replying(signed_response(json!({
            "status": "12",
            "response_code": "12000",
            "merchant_reference": "order-1",
        })));
        let client = client(Arc::clone(&transport));

        let response = client
            .request(object(json!({"query_command": "CHECK_STATUS", "merchant_reference": "order-1"})))
            .await
            .unwrap();

        assert_eq!(response.status(), Some("12"));
        assert_eq!(response.merchant_reference(), Some("order-1"));

        let sent = transport.last_sent();
        assert_eq!(sent.method, Method::POST);
        assert_eq!(
            sent.uri,
            "https://sbpaymentservices.payfort.com/FortAPI/paymentApi"
        );
        assert_eq!(
            sent.options.headers.get(CONTENT_TYPE).unwrap(),
            "application/json"
        );
        assert!(sent.options.json.contains_key("signature"));
    }

    #[tokio::test]
    async fn test_transport_failure_carries_context() {
        let client = client(MockTransport::failing());
        let err = client
            .request(object(json!({"command": "REFUND"})))
            .await
            .unwrap_err();
        match err {
            Error::RequestTransport {
                uri,
                method,
                options,
                source,
            } => {
                assert!(uri.ends_with("FortAPI/paymentApi"));
                assert_eq!(method, Method::POST);
                assert_eq!(options.json["command"], "REFUND");
                assert_eq!(source.to_string(), "connection refused");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_raw_request_custom_uri_and_method() {
        let transport = MockTransport::replying("{}".into());
        let client = client(Arc::clone(&transport));
        let raw = client
            .raw_request(
                RequestOptions::json(Payload::new()),
                Some("https://example.test/custom"),
                Method::PUT,
            )
            .await
            .unwrap();
        assert_eq!(raw.body, "{}");
        let sent = transport.last_sent();
        assert_eq!(sent.uri, "https://example.test/custom");
        assert_eq!(sent.method, Method::PUT);
    }

    #[tokio::test]
    async fn test_invalid_request_status() {
        let transport = MockTransport::replying(signed_response(json!({
            "status": "00",
            "response_code": "00008",
            "response_message": "Signature mismatch",
        })));
        let err = client(transport)
            .request(object(json!({"command": "REFUND"})))
            .await
            .unwrap_err();
        match err {
            Error::InvalidRequest {
                request,
                response_code,
                response_message,
            } => {
                assert_eq!(request["command"], "REFUND");
                assert!(request.contains_key("signature"));
                assert_eq!(response_code.as_deref(), Some("00008"));
                assert_eq!(response_message.as_deref(), Some("Signature mismatch"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_tampered_response_is_rejected() {
        let body = signed_response(json!({"status": "14", "amount": "1000"}))
            .replace("1000", "9999");
        let err = client(MockTransport::replying(body))
            .request(Payload::new())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::SignatureMismatch { .. }));
    }

    #[tokio::test]
    async fn test_unsigned_response_is_rejected() {
        let err = client(MockTransport::replying(r#"{"status":"14"}"#.into()))
            .request(Payload::new())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::SignatureMissing { .. }));
    }

    #[tokio::test]
    async fn test_malformed_body_is_rejected() {
        let err = client(MockTransport::replying("<html>".into()))
            .request(Payload::new())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::ResponseParse { status, .. } if status == StatusCode::OK));
    }

    #[tokio::test]
    async fn test_callback_receives_response_and_request() {
        let transport = MockTransport::replying(signed_response(json!({"status": "06"})));
        let status = client(transport)
            .request_with(object(json!({"command": "REFUND"})), |response, request| {
                assert_eq!(request["command"], "REFUND");
                Ok::<_, Error>(response.status().map(ToOwned::to_owned))
            })
            .await
            .unwrap();
        assert_eq!(status.as_deref(), Some("06"));
    }

    #[tokio::test]
    async fn test_callback_error_is_wrapped() {
        let transport = MockTransport::replying(signed_response(json!({"status": "06"})));
        let err = client(transport)
            .request_with(Payload::new(), |_, _| Err::<(), _>("callback exploded"))
            .await
            .unwrap_err();
        match err {
            Error::CallbackExecution { source } => {
                assert_eq!(source.to_string(), "callback exploded");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_with_base_url_normalizes_slash() {
        let client = client(MockTransport::failing()).with_base_url("http://127.0.0.1:8080");
        assert_eq!(client.payment_api_url(), "http://127.0.0.1:8080/FortAPI/paymentApi");
    }
}
