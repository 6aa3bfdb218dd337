//! Gateway configuration and request objects.
//!
//! A [`Gateway`] holds the merchant's credentials and endpoints and hands out
//! one [`TransactionRequest`] per operation. A request validates and builds
//! its document, resolves its endpoint once, sends the document through a
//! [`Transport`] and interprets the reply.

use crate::errors::{MonerisError, Result};
use crate::messages;
use crate::request::RequestParameters;
use crate::response::Response;
use crate::transport::{xml_headers, HttpTransport, Transport};
use crate::types::{Environment, Operation, PRODUCTION_ENDPOINT, SANDBOX_ENDPOINT};
use reqwest::{Client, Method};
use std::sync::{Arc, OnceLock};
use url::Url;

/// Credentials and endpoints for one Moneris store.
#[derive(Clone, Debug)]
pub struct GatewayConfig {
    /// Store id
    pub merchant_id: String,

    /// API token
    pub merchant_key: String,

    /// QA endpoint, used in test mode
    pub sandbox_endpoint: String,

    /// Live endpoint
    pub production_endpoint: String,

    /// Send requests to the sandbox
    pub test_mode: bool,

    /// HTTP client used by the default transport
    pub http_client: Client,
}

impl GatewayConfig {
    /// Creates a configuration for the live endpoint.
    ///
    /// # Examples
    ///
    /// ```
    /// use moneris_rs::gateway::GatewayConfig;
    ///
    /// let config = GatewayConfig::new("store1", "yesguy").with_test_mode(true);
    /// assert!(config.test_mode);
    /// assert!(config.sandbox_endpoint.starts_with("https://esqa.moneris.com"));
    /// ```
    pub fn new(merchant_id: impl Into<String>, merchant_key: impl Into<String>) -> Self {
        Self {
            merchant_id: merchant_id.into(),
            merchant_key: merchant_key.into(),
            sandbox_endpoint: SANDBOX_ENDPOINT.to_string(),
            production_endpoint: PRODUCTION_ENDPOINT.to_string(),
            test_mode: false,
            http_client: Client::new(),
        }
    }

    /// Reads the configuration from the environment.
    ///
    /// `MONERIS_STORE_ID` and `MONERIS_API_TOKEN` are required;
    /// `MONERIS_SANDBOX_ENDPOINT`, `MONERIS_PRODUCTION_ENDPOINT` and
    /// `MONERIS_TEST_MODE` (`true`/`1`) are optional.
    pub fn from_env() -> Result<Self> {
        let required = |name: &str| {
            std::env::var(name)
                .map_err(|_| MonerisError::ConfigError(format!("{} is not set", name)))
        };

        let mut config = Self::new(
            required("MONERIS_STORE_ID")?,
            required("MONERIS_API_TOKEN")?,
        );

        if let Ok(endpoint) = std::env::var("MONERIS_SANDBOX_ENDPOINT") {
            config.sandbox_endpoint = endpoint;
        }
        if let Ok(endpoint) = std::env::var("MONERIS_PRODUCTION_ENDPOINT") {
            config.production_endpoint = endpoint;
        }
        if let Ok(flag) = std::env::var("MONERIS_TEST_MODE") {
            config.test_mode = matches!(
                flag.trim().to_ascii_lowercase().as_str(),
                "1" | "true" | "yes"
            );
        }

        Ok(config)
    }

    /// Selects the sandbox (`true`) or the live endpoint.
    pub fn with_test_mode(mut self, test_mode: bool) -> Self {
        self.test_mode = test_mode;
        self
    }

    /// Sets the sandbox endpoint.
    pub fn with_sandbox_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.sandbox_endpoint = endpoint.into();
        self
    }

    /// Sets the live endpoint.
    pub fn with_production_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.production_endpoint = endpoint.into();
        self
    }

    /// Sets a custom HTTP client.
    pub fn with_client(mut self, client: Client) -> Self {
        self.http_client = client;
        self
    }

    /// Environment selected by the test-mode flag.
    pub fn environment(&self) -> Environment {
        Environment::from_test_mode(self.test_mode)
    }

    /// Parses the endpoint for an environment.
    pub fn endpoint_for(&self, environment: Environment) -> Result<Url> {
        let raw = match environment {
            Environment::Sandbox => &self.sandbox_endpoint,
            Environment::Production => &self.production_endpoint,
        };
        if raw.trim().is_empty() {
            return Err(MonerisError::ConfigError(format!(
                "no endpoint configured for {:?}",
                environment
            )));
        }
        Ok(Url::parse(raw)?)
    }
}

/// Factory for requests against one store.
#[derive(Clone, Debug)]
pub struct Gateway {
    config: Arc<GatewayConfig>,
}

impl Gateway {
    /// Creates a gateway from its configuration.
    pub fn new(config: GatewayConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// Gateway name.
    pub fn name(&self) -> &'static str {
        "Moneris"
    }

    /// The shared configuration.
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Creates a request for any operation.
    pub fn request(&self, operation: Operation, params: RequestParameters) -> TransactionRequest {
        TransactionRequest::new(operation, Arc::clone(&self.config), params)
    }

    /// Charges a card or a vaulted card.
    pub fn purchase(&self, params: RequestParameters) -> TransactionRequest {
        self.request(Operation::Purchase, params)
    }

    /// Reserves funds on a card or a vaulted card.
    pub fn authorize(&self, params: RequestParameters) -> TransactionRequest {
        self.request(Operation::Authorize, params)
    }

    /// Captures a prior authorization.
    pub fn capture(&self, params: RequestParameters) -> TransactionRequest {
        self.request(Operation::Capture, params)
    }

    /// Refunds a prior transaction.
    pub fn refund(&self, params: RequestParameters) -> TransactionRequest {
        self.request(Operation::Refund, params)
    }

    /// Voids a prior transaction.
    pub fn void(&self, params: RequestParameters) -> TransactionRequest {
        self.request(Operation::Void, params)
    }

    /// Stores a card in the vault.
    pub fn create_card(&self, params: RequestParameters) -> TransactionRequest {
        self.request(Operation::CreateCard, params)
    }

    /// Removes a card from the vault.
    pub fn delete_card(&self, params: RequestParameters) -> TransactionRequest {
        self.request(Operation::DeleteCard, params)
    }
}

/// One operation against the gateway.
///
/// Used for a single validate, build, send and interpret cycle.
#[derive(Debug)]
pub struct TransactionRequest {
    operation: Operation,
    config: Arc<GatewayConfig>,
    params: RequestParameters,
    endpoint: OnceLock<Url>,
}

impl TransactionRequest {
    /// Creates a request. Credentials missing from `params` are taken from
    /// the configuration.
    pub fn new(
        operation: Operation,
        config: Arc<GatewayConfig>,
        mut params: RequestParameters,
    ) -> Self {
        if params.merchant_id.is_none() {
            params.merchant_id = Some(config.merchant_id.clone());
        }
        if params.merchant_key.is_none() {
            params.merchant_key = Some(config.merchant_key.clone());
        }

        Self {
            operation,
            config,
            params,
            endpoint: OnceLock::new(),
        }
    }

    /// The operation this request performs.
    pub fn operation(&self) -> Operation {
        self.operation
    }

    /// The request parameters.
    pub fn parameters(&self) -> &RequestParameters {
        &self.params
    }

    /// Pins the endpoint, overriding the test-mode selection and any
    /// endpoint resolved earlier.
    pub fn set_endpoint(&mut self, endpoint: &str) -> Result<()> {
        let url = Url::parse(endpoint)?;
        self.endpoint = OnceLock::from(url);
        Ok(())
    }

    /// Endpoint this request is sent to, resolved once from the test-mode
    /// flag and cached.
    pub fn endpoint(&self) -> Result<&Url> {
        if let Some(url) = self.endpoint.get() {
            return Ok(url);
        }
        let url = self.config.endpoint_for(self.config.environment())?;
        Ok(self.endpoint.get_or_init(|| url))
    }

    /// Validates the parameters and builds the request document, without
    /// any I/O.
    pub fn data(&self) -> Result<String> {
        messages::build(self.operation, &self.params)
    }

    /// Sends the request over HTTPS with the configured client.
    pub async fn send(&self) -> Result<Response> {
        let transport = HttpTransport::new(self.config.http_client.clone());
        self.send_with(&transport).await
    }

    /// Sends the request through a custom transport.
    pub async fn send_with<T: Transport + ?Sized>(&self, transport: &T) -> Result<Response> {
        let body = self.data()?;
        let endpoint = self.endpoint()?;

        tracing::debug!(operation = %self.operation, %endpoint, "sending gateway request");

        let reply = transport
            .send(Method::POST, endpoint, xml_headers(), body)
            .await?;

        let response = Response::from_reply(&reply);
        tracing::debug!(
            operation = %self.operation,
            successful = response.is_successful(),
            code = response.code().unwrap_or("none"),
            "gateway reply interpreted"
        );

        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PaymentMethod;

    fn config() -> GatewayConfig {
        GatewayConfig::new("store1", "yesguy")
            .with_sandbox_endpoint("https://sandbox.test/gateway")
            .with_production_endpoint("https://live.test/gateway")
    }

    #[test]
    fn test_config_builders() {
        let config = config().with_test_mode(true);
        assert_eq!(config.environment(), Environment::Sandbox);
        assert_eq!(
            config.endpoint_for(Environment::Production).unwrap().as_str(),
            "https://live.test/gateway"
        );
    }

    #[test]
    fn test_default_endpoints() {
        let config = GatewayConfig::new("store1", "yesguy");
        assert_eq!(config.sandbox_endpoint, SANDBOX_ENDPOINT);
        assert_eq!(config.production_endpoint, PRODUCTION_ENDPOINT);
        assert!(!config.test_mode);
    }

    #[test]
    fn test_empty_endpoint_is_config_error() {
        let config = config().with_sandbox_endpoint("");
        let err = config.endpoint_for(Environment::Sandbox).unwrap_err();
        assert!(matches!(err, MonerisError::ConfigError(_)));
    }

    #[test]
    fn test_endpoint_follows_test_mode() {
        let live = Gateway::new(config()).delete_card(RequestParameters::new());
        assert_eq!(live.endpoint().unwrap().as_str(), "https://live.test/gateway");

        let sandbox =
            Gateway::new(config().with_test_mode(true)).delete_card(RequestParameters::new());
        assert_eq!(sandbox.endpoint().unwrap().as_str(), "https://sandbox.test/gateway");
    }

    #[test]
    fn test_set_endpoint_overrides() {
        let mut request = Gateway::new(config()).void(RequestParameters::new());
        request.set_endpoint("https://override.test/mpg").unwrap();
        assert_eq!(request.endpoint().unwrap().as_str(), "https://override.test/mpg");
    }

    #[test]
    fn test_set_endpoint_after_resolution() {
        let mut request = Gateway::new(config()).void(RequestParameters::new());
        assert_eq!(request.endpoint().unwrap().as_str(), "https://live.test/gateway");

        request.set_endpoint("https://override.test/mpg").unwrap();
        assert_eq!(request.endpoint().unwrap().as_str(), "https://override.test/mpg");
    }

    #[test]
    fn test_set_endpoint_rejects_bad_url() {
        let mut request = Gateway::new(config()).void(RequestParameters::new());
        let err = request.set_endpoint("not a url").unwrap_err();
        assert!(matches!(err, MonerisError::UrlParseError(_)));
    }

    #[test]
    fn test_credentials_come_from_config() {
        let gateway = Gateway::new(config());
        let request = gateway.delete_card(RequestParameters::new().with_card_reference("ot-1"));

        assert_eq!(request.operation(), Operation::DeleteCard);
        assert_eq!(request.parameters().merchant_id.as_deref(), Some("store1"));
        assert!(request
            .data()
            .unwrap()
            .contains("<store_id>store1</store_id><api_token>yesguy</api_token>"));
    }

    #[test]
    fn test_explicit_credentials_win() {
        let gateway = Gateway::new(config());
        let request = gateway.delete_card(
            RequestParameters::new()
                .with_credentials("store9", "token9")
                .with_card_reference("ot-1"),
        );
        assert!(request.data().unwrap().contains("<store_id>store9</store_id>"));
    }

    #[test]
    fn test_data_reports_preflight_errors() {
        let gateway = Gateway::new(config());
        let request = gateway.purchase(
            RequestParameters::new().with_payment_method(PaymentMethod::PaymentProfile),
        );
        let err = request.data().unwrap_err();
        assert!(err.is_preflight());
        assert_eq!(err.field(), Some("orderNumber"));
    }

    #[test]
    fn test_gateway_name() {
        assert_eq!(Gateway::new(config()).name(), "Moneris");
    }
}
