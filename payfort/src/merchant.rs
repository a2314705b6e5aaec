//! Merchant facade.

use std::sync::Arc;

use crate::config::MerchantConfig;
use crate::credential::Credential;
use crate::environment::Environment;
use crate::request::ApiClient;
use crate::transport::Transport;

/// A merchant account bound to one environment and transport.
///
/// All operations are reached through [`Merchant::api`].
///
/// # Example
///
/// ```rust,no_run
/// use payfort::{Merchant, MerchantConfig};
/// use payfort::api::CheckStatusRequest;
///
/// # async fn run(config: MerchantConfig, transport: impl payfort::transport::Transport + 'static) -> payfort::Result<()> {
/// let merchant = Merchant::from_config(&config, transport);
/// let response = merchant
///     .api()
///     .check_status(CheckStatusRequest::by_merchant_reference("order-1"))
///     .await?;
/// println!("{:?}", response.status());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Merchant {
    api: ApiClient,
}

impl Merchant {
    /// Creates a merchant.
    #[must_use]
    pub fn new(
        environment: Environment,
        transport: impl Transport + 'static,
        credential: Credential,
    ) -> Self {
        Self {
            api: ApiClient::new(environment, transport, credential),
        }
    }

    /// Creates a merchant that shares `transport` with other clients.
    #[must_use]
    pub fn with_shared_transport(
        environment: Environment,
        transport: Arc<dyn Transport>,
        credential: Credential,
    ) -> Self {
        Self {
            api: ApiClient::with_shared_transport(environment, transport, credential),
        }
    }

    /// Creates a merchant from configuration.
    #[must_use]
    pub fn from_config(config: &MerchantConfig, transport: impl Transport + 'static) -> Self {
        Self::new(config.environment(), transport, config.credential().clone())
    }

    /// Returns the API client.
    #[must_use]
    pub const fn api(&self) -> &ApiClient {
        &self.api
    }

    /// Returns the credential.
    #[must_use]
    pub const fn credential(&self) -> &Credential {
        self.api.credential()
    }

    /// Returns the environment.
    #[must_use]
    pub const fn environment(&self) -> Environment {
        self.api.environment()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::CheckStatusRequest;
    use crate::operation::Operation;
    use crate::request::tests::{MockTransport, credential, signed_response};
    use serde_json::json;

    #[tokio::test]
    async fn test_from_config_uses_environment_and_credential() {
        let transport = MockTransport::replying(signed_response(json!({"status": "12"})));
        let config = MerchantConfig::new(Environment::Production, credential());
        let shared: Arc<dyn Transport> = Arc::clone(&transport) as _;
        let merchant = Merchant::with_shared_transport(config.environment(), shared, credential());
        assert_eq!(merchant.environment(), Environment::Production);
        assert_eq!(merchant.credential(), config.credential());

        let response = merchant
            .api()
            .check_status(CheckStatusRequest::by_merchant_reference("order-1"))
            .await
            .unwrap();
        assert!(response.is_success(Operation::CheckStatus));
        assert_eq!(
            transport.last_sent().uri,
            "https://paymentservices.payfort.com/FortAPI/paymentApi"
        );
    }

    #[test]
    fn test_debug_hides_phrases() {
        let config = MerchantConfig::new(Environment::Sandbox, credential());
        let merchant = Merchant::from_config(&config, MockTransport::default());
        let debug = format!("{merchant:?}");
        assert!(!debug.contains("request-phrase"));
    }
}
