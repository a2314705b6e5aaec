//! Typed requests for the payment API operations.
//!
//! Each request type builds the operation's payload: the command field, the
//! fields the operation always needs, any optional fields that were set, and
//! finally `extra` for gateway fields not modelled here. Sending goes through
//! the shared [`ApiClient`] pipeline, so every operation is signed and its
//! response verified the same way.

use crate::error::{CallbackError, Result};
use crate::operation::Operation;
use crate::options::{Eci, PaymentOption, RecurringMode, yes_no};
use crate::payload::{Payload, PayloadBuilder};
use crate::request::ApiClient;
use crate::response::Response;

/// Default request language.
pub const DEFAULT_LANGUAGE: &str = "en";

/// Default currency for refunds and recurring charges.
pub const DEFAULT_CURRENCY: &str = "SAR";

/// A request for one payment API operation.
pub trait OperationRequest {
    /// The operation this request performs.
    const OPERATION: Operation;

    /// Builds the unsigned payload.
    fn into_payload(self) -> Payload;
}

fn builder(operation: Operation) -> PayloadBuilder {
    PayloadBuilder::new().field(operation.command_field(), operation.command())
}

/// Query the state of an order by merchant reference or `fort_id`.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckStatusRequest {
    /// Merchant order reference.
    pub merchant_reference: Option<String>,
    /// Gateway order identifier.
    pub fort_id: Option<String>,
    /// Response language.
    pub language: String,
    /// Ask the gateway to include acquirer response codes.
    pub return_third_party_response_codes: Option<bool>,
    /// Additional fields.
    pub extra: Payload,
}

impl CheckStatusRequest {
    /// Looks up an order by merchant reference.
    #[must_use]
    pub fn by_merchant_reference(merchant_reference: impl Into<String>) -> Self {
        Self {
            merchant_reference: Some(merchant_reference.into()),
            fort_id: None,
            language: DEFAULT_LANGUAGE.to_owned(),
            return_third_party_response_codes: None,
            extra: Payload::new(),
        }
    }

    /// Looks up an order by gateway identifier.
    #[must_use]
    pub fn by_fort_id(fort_id: impl Into<String>) -> Self {
        Self {
            merchant_reference: None,
            fort_id: Some(fort_id.into()),
            language: DEFAULT_LANGUAGE.to_owned(),
            return_third_party_response_codes: None,
            extra: Payload::new(),
        }
    }
}

impl OperationRequest for CheckStatusRequest {
    const OPERATION: Operation = Operation::CheckStatus;

    fn into_payload(self) -> Payload {
        builder(Self::OPERATION)
            .field("language", self.language)
            .optional("merchant_reference", self.merchant_reference)
            .optional("fort_id", self.fort_id)
            .optional(
                "return_third_party_response_codes",
                self.return_third_party_response_codes.map(yes_no),
            )
            .extend(self.extra)
            .build()
    }
}

/// Refund, or capture, an amount against an existing order.
///
/// Shared by [`RefundRequest`] and [`CaptureRequest`].
#[derive(Debug, Clone, PartialEq)]
pub struct MaintenanceRequest {
    /// Merchant order reference.
    pub merchant_reference: Option<String>,
    /// Gateway order identifier.
    pub fort_id: Option<String>,
    /// Amount in minor units.
    pub amount: u64,
    /// ISO 4217 currency code.
    pub currency: String,
    /// Response language.
    pub language: String,
    /// Merchant's reference for this maintenance operation.
    pub maintenance_reference: Option<String>,
    /// Free-text description.
    pub order_description: Option<String>,
}

impl MaintenanceRequest {
    /// Targets an order by merchant reference.
    #[must_use]
    pub fn new(merchant_reference: impl Into<String>, amount: u64) -> Self {
        Self {
            merchant_reference: Some(merchant_reference.into()),
            fort_id: None,
            amount,
            currency: DEFAULT_CURRENCY.to_owned(),
            language: DEFAULT_LANGUAGE.to_owned(),
            maintenance_reference: None,
            order_description: None,
        }
    }

    /// Sets the currency.
    #[must_use]
    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = currency.into();
        self
    }

    fn into_payload(self, operation: Operation) -> Payload {
        builder(operation)
            .field("language", self.language)
            .field("amount", self.amount)
            .field("currency", self.currency)
            .optional("merchant_reference", self.merchant_reference)
            .optional("maintenance_reference", self.maintenance_reference)
            .optional("fort_id", self.fort_id)
            .optional("order_description", self.order_description)
            .build()
    }
}

/// Refund a captured amount.
#[derive(Debug, Clone, PartialEq)]
pub struct RefundRequest(pub MaintenanceRequest);

impl OperationRequest for RefundRequest {
    const OPERATION: Operation = Operation::Refund;

    fn into_payload(self) -> Payload {
        self.0.into_payload(Self::OPERATION)
    }
}

/// Capture an authorized amount.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptureRequest(pub MaintenanceRequest);

impl OperationRequest for CaptureRequest {
    const OPERATION: Operation = Operation::Capture;

    fn into_payload(self) -> Payload {
        self.0.into_payload(Self::OPERATION)
    }
}

/// Release an authorization.
#[derive(Debug, Clone, PartialEq)]
pub struct VoidAuthorizationRequest {
    /// Merchant order reference.
    pub merchant_reference: Option<String>,
    /// Gateway order identifier.
    pub fort_id: Option<String>,
    /// Response language.
    pub language: String,
    /// Free-text description.
    pub order_description: Option<String>,
}

impl VoidAuthorizationRequest {
    /// Targets an authorization by merchant reference.
    #[must_use]
    pub fn new(merchant_reference: impl Into<String>) -> Self {
        Self {
            merchant_reference: Some(merchant_reference.into()),
            fort_id: None,
            language: DEFAULT_LANGUAGE.to_owned(),
            order_description: None,
        }
    }
}

impl OperationRequest for VoidAuthorizationRequest {
    const OPERATION: Operation = Operation::VoidAuthorization;

    fn into_payload(self) -> Payload {
        builder(Self::OPERATION)
            .field("language", self.language)
            .optional("merchant_reference", self.merchant_reference)
            .optional("fort_id", self.fort_id)
            .optional("order_description", self.order_description)
            .build()
    }
}

/// Charge a stored token without the customer present.
#[derive(Debug, Clone, PartialEq)]
pub struct RecurringRequest {
    /// Merchant order reference.
    pub merchant_reference: String,
    /// Stored card token.
    pub token_name: String,
    /// Customer e-mail.
    pub customer_email: String,
    /// Amount in minor units.
    pub amount: u64,
    /// ISO 4217 currency code.
    pub currency: String,
    /// Response language.
    pub language: String,
    /// Additional fields (e.g. `agreement_id`).
    pub extra: Payload,
}

impl RecurringRequest {
    /// Creates a recurring charge in the default currency.
    #[must_use]
    pub fn new(
        merchant_reference: impl Into<String>,
        token_name: impl Into<String>,
        customer_email: impl Into<String>,
        amount: u64,
    ) -> Self {
        Self {
            merchant_reference: merchant_reference.into(),
            token_name: token_name.into(),
            customer_email: customer_email.into(),
            amount,
            currency: DEFAULT_CURRENCY.to_owned(),
            language: DEFAULT_LANGUAGE.to_owned(),
            extra: Payload::new(),
        }
    }
}

impl OperationRequest for RecurringRequest {
    const OPERATION: Operation = Operation::Recurring;

    fn into_payload(self) -> Payload {
        builder(Self::OPERATION)
            .field("eci", Eci::Recurring)
            .field("language", self.language)
            .field("merchant_reference", self.merchant_reference)
            .field("token_name", self.token_name)
            .field("customer_email", self.customer_email)
            .field("amount", self.amount)
            .field("currency", self.currency)
            .extend(self.extra)
            .build()
    }
}

/// Tokenize a card.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateTokenRequest {
    /// Clear card number.
    pub card_number: String,
    /// Card expiry date (`YYMM`).
    pub expiry_date: String,
    /// URL the gateway returns to.
    pub return_url: String,
    /// Response language.
    pub language: String,
    /// ISO 4217 currency code.
    pub currency: Option<String>,
    /// Requested token name.
    pub token_name: Option<String>,
    /// Card holder name.
    pub card_holder_name: Option<String>,
}

impl CreateTokenRequest {
    /// Creates a tokenization request.
    #[must_use]
    pub fn new(
        card_number: impl Into<String>,
        expiry_date: impl Into<String>,
        return_url: impl Into<String>,
    ) -> Self {
        Self {
            card_number: card_number.into(),
            expiry_date: expiry_date.into(),
            return_url: return_url.into(),
            language: DEFAULT_LANGUAGE.to_owned(),
            currency: None,
            token_name: None,
            card_holder_name: None,
        }
    }
}

impl OperationRequest for CreateTokenRequest {
    const OPERATION: Operation = Operation::CreateToken;

    fn into_payload(self) -> Payload {
        builder(Self::OPERATION)
            .field("language", self.language)
            .field("card_number", self.card_number)
            .field("expiry_date", self.expiry_date)
            .field("return_url", self.return_url)
            .optional("currency", self.currency)
            .optional("token_name", self.token_name)
            .optional("card_holder_name", self.card_holder_name)
            .build()
    }
}

/// Update a stored token.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateTokenRequest {
    /// Merchant order reference.
    pub merchant_reference: String,
    /// Existing token name.
    pub token_name: String,
    /// Response language.
    pub language: String,
    /// New card holder name.
    pub card_holder_name: Option<String>,
    /// ISO 4217 currency code.
    pub currency: Option<String>,
    /// New token name.
    pub new_token_name: Option<String>,
    /// `true` activates the token, `false` deactivates it.
    pub token_status: Option<bool>,
}

impl UpdateTokenRequest {
    /// Creates an update request for `token_name`.
    #[must_use]
    pub fn new(merchant_reference: impl Into<String>, token_name: impl Into<String>) -> Self {
        Self {
            merchant_reference: merchant_reference.into(),
            token_name: token_name.into(),
            language: DEFAULT_LANGUAGE.to_owned(),
            card_holder_name: None,
            currency: None,
            new_token_name: None,
            token_status: None,
        }
    }
}

impl OperationRequest for UpdateTokenRequest {
    const OPERATION: Operation = Operation::UpdateToken;

    fn into_payload(self) -> Payload {
        let token_status = self
            .token_status
            .map(|active| if active { "ACTIVE" } else { "INACTIVE" });
        builder(Self::OPERATION)
            .field("language", self.language)
            .field("merchant_reference", self.merchant_reference)
            .field("token_name", self.token_name)
            .optional("currency", self.currency)
            .optional("card_holder_name", self.card_holder_name)
            .optional("token_status", token_status)
            .optional("new_token_name", self.new_token_name)
            .build()
    }
}

/// Fields shared by purchase and authorization requests.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentRequest {
    /// Merchant order reference.
    pub merchant_reference: String,
    /// Amount in minor units.
    pub amount: u64,
    /// ISO 4217 currency code.
    pub currency: String,
    /// Customer e-mail.
    pub customer_email: String,
    /// Response language.
    pub language: String,
    /// Stored card token.
    pub token_name: Option<String>,
    /// Payment method.
    pub payment_option: Option<PaymentOption>,
    /// Settlement reference.
    pub settlement_reference: Option<String>,
    /// Free-text description.
    pub order_description: Option<String>,
    /// Statement descriptor.
    pub statement_descriptor: Option<String>,
    /// Customer IP address.
    pub customer_ip: Option<String>,
    /// Customer name.
    pub customer_name: Option<String>,
    /// Whether the gateway should remember the card. Only `NO` is sent.
    pub remember_me: Option<bool>,
    /// Customer phone number.
    pub phone_number: Option<String>,
    /// URL the gateway returns to.
    pub return_url: Option<String>,
    /// Recurring agreement identifier.
    pub agreement_id: Option<String>,
    /// Recurring agreement mode.
    pub recurring_mode: Option<RecurringMode>,
    /// Number of transactions in the agreement.
    pub recurring_transactions_count: Option<String>,
    /// Agreement expiry date.
    pub recurring_expiry_date: Option<String>,
    /// Days between agreement payments.
    pub recurring_days_between_payments: Option<String>,
    /// Additional fields.
    pub extra: Payload,
}

impl PaymentRequest {
    /// Creates a payment with only the required fields set.
    #[must_use]
    pub fn new(
        merchant_reference: impl Into<String>,
        amount: u64,
        currency: impl Into<String>,
        customer_email: impl Into<String>,
    ) -> Self {
        Self {
            merchant_reference: merchant_reference.into(),
            amount,
            currency: currency.into(),
            customer_email: customer_email.into(),
            language: DEFAULT_LANGUAGE.to_owned(),
            token_name: None,
            payment_option: None,
            settlement_reference: None,
            order_description: None,
            statement_descriptor: None,
            customer_ip: None,
            customer_name: None,
            remember_me: None,
            phone_number: None,
            return_url: None,
            agreement_id: None,
            recurring_mode: None,
            recurring_transactions_count: None,
            recurring_expiry_date: None,
            recurring_days_between_payments: None,
            extra: Payload::new(),
        }
    }

    /// Pays with a stored card token.
    #[must_use]
    pub fn with_token(mut self, token_name: impl Into<String>) -> Self {
        self.token_name = Some(token_name.into());
        self
    }

    fn into_payload(self, operation: Operation) -> Payload {
        let remember_me = self.remember_me.filter(|remember| !remember).map(yes_no);
        builder(operation)
            .field("merchant_reference", self.merchant_reference)
            .field("amount", self.amount)
            .field("currency", self.currency)
            .field("customer_email", self.customer_email)
            .field("language", self.language)
            .optional("token_name", self.token_name)
            .optional("payment_option", self.payment_option)
            .optional("order_description", self.order_description)
            .optional("statement_descriptor", self.statement_descriptor)
            .optional("customer_ip", self.customer_ip)
            .optional("customer_name", self.customer_name)
            .optional("remember_me", remember_me)
            .optional("phone_number", self.phone_number)
            .optional("settlement_reference", self.settlement_reference)
            .optional("return_url", self.return_url)
            .optional("agreement_id", self.agreement_id)
            .optional("recurring_mode", self.recurring_mode)
            .optional("recurring_transactions_count", self.recurring_transactions_count)
            .optional("recurring_expiry_date", self.recurring_expiry_date)
            .optional(
                "recurring_days_between_payments",
                self.recurring_days_between_payments,
            )
            .extend(self.extra)
            .build()
    }
}

/// Authorize and capture in one step.
#[derive(Debug, Clone, PartialEq)]
pub struct PurchaseRequest(pub PaymentRequest);

impl OperationRequest for PurchaseRequest {
    const OPERATION: Operation = Operation::Purchase;

    fn into_payload(self) -> Payload {
        self.0.into_payload(Self::OPERATION)
    }
}

/// Reserve funds for a later capture.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthorizationRequest(pub PaymentRequest);

impl OperationRequest for AuthorizationRequest {
    const OPERATION: Operation = Operation::Authorization;

    fn into_payload(self) -> Payload {
        self.0.into_payload(Self::OPERATION)
    }
}

impl ApiClient {
    /// Sends a typed operation request through the pipeline.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by any pipeline stage.
    pub async fn send<R: OperationRequest>(&self, request: R) -> Result<Response> {
        #[cfg(feature = "telemetry")]
        tracing::debug!(operation = %R::OPERATION, "sending payfort operation");
        self.request(request.into_payload()).await
    }

    /// Sends a typed operation request and hands the result to `callback`.
    ///
    /// # Errors
    ///
    /// Returns any pipeline error, or [`crate::Error::CallbackExecution`] if
    /// the callback fails.
    pub async fn send_with<R, T, E, F>(&self, request: R, callback: F) -> Result<T>
    where
        R: OperationRequest,
        F: FnOnce(&Response, &Payload) -> Result<T, E>,
        E: Into<CallbackError>,
    {
        self.request_with(request.into_payload(), callback).await
    }

    /// Queries the state of an order.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::send`].
    pub async fn check_status(&self, request: CheckStatusRequest) -> Result<Response> {
        self.send(request).await
    }

    /// Refunds a captured amount.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::send`].
    pub async fn refund(&self, request: MaintenanceRequest) -> Result<Response> {
        self.send(RefundRequest(request)).await
    }

    /// Captures an authorized amount.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::send`].
    pub async fn capture(&self, request: MaintenanceRequest) -> Result<Response> {
        self.send(CaptureRequest(request)).await
    }

    /// Releases an authorization.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::send`].
    pub async fn void_authorization(&self, request: VoidAuthorizationRequest) -> Result<Response> {
        self.send(request).await
    }

    /// Charges a stored token.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::send`].
    pub async fn recurring(&self, request: RecurringRequest) -> Result<Response> {
        self.send(request).await
    }

    /// Tokenizes a card.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::send`].
    pub async fn create_token(&self, request: CreateTokenRequest) -> Result<Response> {
        self.send(request).await
    }

    /// Updates a stored token.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::send`].
    pub async fn update_token(&self, request: UpdateTokenRequest) -> Result<Response> {
        self.send(request).await
    }

    /// Authorizes and captures a payment.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::send`].
    pub async fn purchase(&self, request: PaymentRequest) -> Result<Response> {
        self.send(PurchaseRequest(request)).await
    }

    /// Authorizes a payment for later capture.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::send`].
    pub async fn authorization(&self, request: PaymentRequest) -> Result<Response> {
        self.send(AuthorizationRequest(request)).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::request::tests::{MockTransport, client, object, signed_response};

    #[test]
    fn test_check_status_payload() {
        let mut request = CheckStatusRequest::by_fort_id("169996200002");
        request.return_third_party_response_codes = Some(true);
        let payload = request.into_payload();
        assert_eq!(
            serde_json::Value::Object(payload),
            json!({
                "query_command": "CHECK_STATUS",
                "language": "en",
                "fort_id": "169996200002",
                "return_third_party_response_codes": "YES",
            })
        );
    }

    #[test]
    fn test_refund_payload_skips_unset_fields() {
        let payload = RefundRequest(MaintenanceRequest::new("order-1", 1000).with_currency("AED"))
            .into_payload();
        assert_eq!(payload["command"], "REFUND");
        assert_eq!(payload["amount"], 1000);
        assert_eq!(payload["currency"], "AED");
        assert!(!payload.contains_key("fort_id"));
        assert!(!payload.contains_key("maintenance_reference"));
    }

    #[test]
    fn test_recurring_payload() {
        let mut request = RecurringRequest::new("order-2", "tok", "a@b.c", 500);
        request.extra = object(json!({"agreement_id": "agr-1"}));
        let payload = request.into_payload();
        assert_eq!(payload["command"], "PURCHASE");
        assert_eq!(payload["eci"], "RECURRING");
        assert_eq!(payload["currency"], "SAR");
        assert_eq!(payload["agreement_id"], "agr-1");
    }

    #[test]
    fn test_update_token_status_rendering() {
        let mut request = UpdateTokenRequest::new("order-3", "tok");
        request.token_status = Some(false);
        let payload = request.into_payload();
        assert_eq!(payload["service_command"], "UPDATE_TOKEN");
        assert_eq!(payload["token_status"], "INACTIVE");
    }

    #[test]
    fn test_payment_payload() {
        let mut payment = PaymentRequest::new("order-4", 2500, "SAR", "a@b.c").with_token("tok");
        payment.payment_option = Some(PaymentOption::Mada);
        payment.remember_me = Some(true);
        payment.recurring_mode = Some(RecurringMode::Fixed);
        let payload = AuthorizationRequest(payment.clone()).into_payload();
        assert_eq!(payload["command"], "AUTHORIZATION");
        assert_eq!(payload["payment_option"], "MADA");
        assert_eq!(payload["recurring_mode"], "FIXED");
        assert!(!payload.contains_key("remember_me"));

        payment.remember_me = Some(false);
        let payload = PurchaseRequest(payment).into_payload();
        assert_eq!(payload["command"], "PURCHASE");
        assert_eq!(payload["remember_me"], "NO");
    }

    #[tokio::test]
    async fn test_purchase_round_trip() {
        let transport = MockTransport::replying(signed_response(json!({
            "command": "PURCHASE",
            "status": "14",
            "response_code": "14000",
            "fort_id": "169996200002",
            "card_number": "400555******0001",
        })));
        let client = client(Arc::clone(&transport));

        let response = client
            .purchase(PaymentRequest::new("order-5", 1000, "SAR", "a@b.c").with_token("tok"))
            .await
            .unwrap();
        assert!(response.is_success(Operation::Purchase));
        assert_eq!(response.card_number(), Some("400555******0001"));

        let sent = transport.last_sent().options.json;
        assert_eq!(sent["command"], "PURCHASE");
        assert_eq!(sent["token_name"], "tok");
        assert_eq!(sent["access_code"], "access-code");
    }

    #[tokio::test]
    async fn test_send_with_callback() {
        let transport = MockTransport::replying(signed_response(json!({"status": "58"})));
        let success = client(transport)
            .send_with(UpdateTokenRequest::new("order-6", "tok"), |response, request| {
                assert_eq!(request["token_name"], "tok");
                Ok::<_, crate::Error>(response.is_success(Operation::UpdateToken))
            })
            .await
            .unwrap();
        assert!(success);
    }
}
