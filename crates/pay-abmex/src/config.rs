//! # ABMEX Configuration
//!
//! Configuration management for the ABMEX integration.
//! Credentials are loaded from environment variables.

use pay_core::{Credentials, GatewaySettings, PaymentError};
use std::env;
use std::time::Duration;
use url::Url;

/// Production API endpoint
pub const DEFAULT_API_BASE_URL: &str = "https://api.abmex.com.br";

/// Gateway identifier used for registration and routing
pub const GATEWAY_ID: &str = "abmex_gateway";

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Default merchant display settings
pub fn default_settings() -> GatewaySettings {
    GatewaySettings::new(GATEWAY_ID, "ABMEX Gateway")
        .with_description("Pay with your credit card via our super-cool payment gateway!")
        .with_method_description("Allows payments through the ABMEX payment gateway.")
}

/// ABMEX API configuration
#[derive(Debug, Clone)]
pub struct AbmexConfig {
    /// Merchant client id/secret
    pub credentials: Credentials,

    /// API base URL (for testing/mocking)
    pub api_base_url: String,

    /// Upper bound for each remote call, body included
    pub request_timeout: Duration,

    /// Upper bound for establishing a connection
    pub connect_timeout: Duration,

    /// Issue the legacy `GET /transactions/{id}` lookup between session and
    /// transaction creation. Its outcome is ignored.
    pub query_transaction: bool,

    /// Refuse non-HTTPS endpoints
    pub require_tls: bool,

    /// Merchant display settings
    pub settings: GatewaySettings,
}

impl AbmexConfig {
    /// Load configuration from environment variables.
    ///
    /// Required env vars:
    /// - `ABMEX_CLIENT_ID`
    /// - `ABMEX_CLIENT_SECRET`
    ///
    /// Optional: `ABMEX_API_BASE_URL`, `ABMEX_TIMEOUT_SECS`,
    /// `ABMEX_QUERY_TRANSACTION`, `ABMEX_ENABLED`, `ABMEX_TITLE`,
    /// `ABMEX_DESCRIPTION`.
    pub fn from_env() -> Result<Self, PaymentError> {
        dotenvy::dotenv().ok(); // Load .env file if present
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build configuration from any variable source, `from_env` uses the
    /// process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, PaymentError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let client_id = lookup("ABMEX_CLIENT_ID").ok_or_else(|| {
            PaymentError::Configuration("ABMEX_CLIENT_ID not set".to_string())
        })?;

        let client_secret = lookup("ABMEX_CLIENT_SECRET").ok_or_else(|| {
            PaymentError::Configuration("ABMEX_CLIENT_SECRET not set".to_string())
        })?;

        let mut config = Self::new(client_id, client_secret);

        if let Some(url) = lookup("ABMEX_API_BASE_URL") {
            config.api_base_url = url;
        }

        if let Some(secs) = lookup("ABMEX_TIMEOUT_SECS") {
            let secs: u64 = secs.trim().parse().map_err(|_| {
                PaymentError::Configuration(format!("ABMEX_TIMEOUT_SECS is not a number: {}", secs))
            })?;
            config.request_timeout = Duration::from_secs(secs);
        }

        config.query_transaction = flag(lookup("ABMEX_QUERY_TRANSACTION"), false);
        config.settings.enabled = flag(lookup("ABMEX_ENABLED"), true);

        if let Some(title) = lookup("ABMEX_TITLE") {
            config.settings.title = title;
        }
        if let Some(description) = lookup("ABMEX_DESCRIPTION") {
            config.settings.description = description;
        }

        config.validate()?;
        Ok(config)
    }

    /// Create config with explicit credentials and production defaults
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            credentials: Credentials::new(client_id, client_secret),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
            query_transaction: false,
            require_tls: true,
            settings: default_settings().enabled(true),
        }
    }

    /// Reject settings that would send credentials somewhere unsafe or hang
    pub fn validate(&self) -> Result<(), PaymentError> {
        if !self.credentials.is_complete() {
            return Err(PaymentError::Configuration(
                "ABMEX client id and secret must both be set".to_string(),
            ));
        }

        let url = Url::parse(&self.api_base_url).map_err(|e| {
            PaymentError::Configuration(format!("Invalid ABMEX API URL {}: {}", self.api_base_url, e))
        })?;

        match url.scheme() {
            "https" => {}
            "http" if !self.require_tls => {}
            other => {
                return Err(PaymentError::Configuration(format!(
                    "ABMEX API URL must use https, got {}",
                    other
                )))
            }
        }

        if self.request_timeout.is_zero() || self.connect_timeout.is_zero() {
            return Err(PaymentError::Configuration(
                "ABMEX timeouts must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }

    /// Full URL for an API path
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_base_url.trim_end_matches('/'), path.trim_start_matches('/'))
    }

    /// Builder: set custom API base URL (for testing)
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    /// Builder: allow plain HTTP (local mock servers only)
    pub fn with_insecure_transport(mut self) -> Self {
        self.require_tls = false;
        self
    }

    /// Builder: per-request timeout
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Builder: enable the legacy transaction lookup
    pub fn with_transaction_query(mut self, enabled: bool) -> Self {
        self.query_transaction = enabled;
        self
    }

    /// Builder: replace display settings
    pub fn with_settings(mut self, settings: GatewaySettings) -> Self {
        self.settings = settings;
        self
    }
}

fn flag(value: Option<String>, default: bool) -> bool {
    match value {
        Some(value) => matches!(
            value.trim().to_ascii_lowercase().as_str(),
            "1" | "true" | "yes" | "on"
        ),
        None => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = AbmexConfig::new("client", "secret");

        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert!(!config.query_transaction);
        assert!(config.require_tls);
        assert_eq!(config.settings.id, GATEWAY_ID);
        assert_eq!(config.settings.title, "ABMEX Gateway");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_settings_are_disabled() {
        assert!(!default_settings().enabled);
    }

    #[test]
    fn test_plain_http_requires_opt_in() {
        let config = AbmexConfig::new("client", "secret").with_api_base_url("http://127.0.0.1:9999");
        assert!(matches!(config.validate(), Err(PaymentError::Configuration(_))));

        let config = config.with_insecure_transport();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_incomplete_credentials() {
        let config = AbmexConfig::new("client", "");
        assert!(matches!(config.validate(), Err(PaymentError::Configuration(_))));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let config = AbmexConfig::new("client", "secret").with_request_timeout(Duration::ZERO);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_endpoint_joining() {
        let config = AbmexConfig::new("client", "secret").with_api_base_url("https://api.example.com/");
        assert_eq!(config.endpoint("/sessions"), "https://api.example.com/sessions");
        assert_eq!(config.endpoint("transactions"), "https://api.example.com/transactions");
    }

    #[test]
    fn test_debug_hides_secret() {
        let config = AbmexConfig::new("client", "very-secret");
        assert!(!format!("{:?}", config).contains("very-secret"));
    }

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_lookup_applies_optional_settings() {
        let config = AbmexConfig::from_lookup(lookup_from(&[
            ("ABMEX_CLIENT_ID", "client"),
            ("ABMEX_CLIENT_SECRET", "secret"),
            ("ABMEX_API_BASE_URL", "https://sandbox.abmex.test"),
            ("ABMEX_TIMEOUT_SECS", "5"),
            ("ABMEX_QUERY_TRANSACTION", "true"),
            ("ABMEX_ENABLED", "no"),
            ("ABMEX_TITLE", "Cartão de crédito"),
        ]))
        .unwrap();

        assert_eq!(config.api_base_url, "https://sandbox.abmex.test");
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert!(config.query_transaction);
        assert!(!config.settings.enabled);
        assert_eq!(config.settings.title, "Cartão de crédito");
    }

    #[test]
    fn test_lookup_defaults() {
        let config = AbmexConfig::from_lookup(lookup_from(&[
            ("ABMEX_CLIENT_ID", "client"),
            ("ABMEX_CLIENT_SECRET", "secret"),
        ]))
        .unwrap();

        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert!(!config.query_transaction);
        assert!(config.settings.enabled);
    }

    #[test]
    fn test_lookup_bad_timeout() {
        let result = AbmexConfig::from_lookup(lookup_from(&[
            ("ABMEX_CLIENT_ID", "client"),
            ("ABMEX_CLIENT_SECRET", "secret"),
            ("ABMEX_TIMEOUT_SECS", "thirty"),
        ]));

        match result {
            Err(PaymentError::Configuration(message)) => {
                assert!(message.contains("ABMEX_TIMEOUT_SECS"))
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_lookup_missing_secret() {
        let result = AbmexConfig::from_lookup(lookup_from(&[("ABMEX_CLIENT_ID", "client")]));
        assert!(matches!(result, Err(PaymentError::Configuration(_))));
    }

    #[test]
    fn test_from_env_missing_key() {
        env::remove_var("ABMEX_CLIENT_ID");

        let result = AbmexConfig::from_env();
        assert!(result.is_err());
    }
}
