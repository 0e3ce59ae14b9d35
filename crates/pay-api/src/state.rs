//! # Application State
//!
//! Shared state for the Axum application and the composition root:
//! configuration is read once here and gateways are registered explicitly.

use pay_abmex::{register_gateway, AbmexConfig, GATEWAY_ID};
use pay_core::{BoxedPaymentGateway, CheckoutUrls, GatewayRegistry, GatewaySettings, RetryPolicy};
use std::time::Duration;

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Shop base URL, used for default success/cancel URLs
    pub base_url: String,
    /// Environment (development, staging, production)
    pub environment: String,
    /// Caller-side retry policy for gateway calls
    pub retry: RetryPolicy,
}

impl AppConfig {
    /// Load from environment variables
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let retry = RetryPolicy::exponential(
            env_parse("RETRY_MAX_ATTEMPTS", 1),
            Duration::from_millis(env_parse("RETRY_INITIAL_BACKOFF_MS", 200)),
            Duration::from_millis(env_parse("RETRY_MAX_BACKOFF_MS", 2_000)),
        );

        Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env_parse("PORT", 8080),
            base_url: std::env::var("BASE_URL")
                .unwrap_or_else(|_| "http://localhost:8080".to_string()),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            retry,
        }
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> anyhow::Result<std::net::SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid socket address {}:{}: {}", self.host, self.port, e))
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

fn env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Registered payment gateways
    pub gateways: GatewayRegistry,
    /// Default checkout URLs
    pub urls: CheckoutUrls,
    /// Application config
    pub config: AppConfig,
}

impl AppState {
    /// Build state from the environment and register the ABMEX gateway
    pub fn new() -> anyhow::Result<Self> {
        let config = AppConfig::from_env();

        let mut abmex = AbmexConfig::from_env()
            .map_err(|e| anyhow::anyhow!("Failed to configure ABMEX: {}", e))?;
        if let Some(settings) = load_gateway_settings()? {
            abmex = abmex.with_settings(settings);
        }

        let mut gateways = GatewayRegistry::new();
        register_gateway(&mut gateways, abmex)
            .map_err(|e| anyhow::anyhow!("Failed to initialize ABMEX: {}", e))?;

        Ok(Self::from_parts(config, gateways))
    }

    /// Assemble state from an already populated registry
    pub fn from_parts(config: AppConfig, gateways: GatewayRegistry) -> Self {
        let urls = CheckoutUrls::new(&config.base_url);
        Self {
            gateways,
            urls,
            config,
        }
    }

    /// Gateway by ID, or the default one
    pub fn gateway(&self, id: Option<&str>) -> Option<&BoxedPaymentGateway> {
        self.gateways.get_or_default(id)
    }
}

/// Load merchant display settings from config file, if one exists
fn load_gateway_settings() -> anyhow::Result<Option<GatewaySettings>> {
    let config_paths = [
        "config/gateway.toml",
        "../config/gateway.toml",
        "../../config/gateway.toml",
    ];

    for path in config_paths {
        if let Ok(content) = std::fs::read_to_string(path) {
            let mut settings = GatewaySettings::from_toml(&content)
                .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", path, e))?;
            if settings.id != GATEWAY_ID {
                tracing::warn!(
                    "Gateway settings in {} name '{}', applying them to {}",
                    path,
                    settings.id,
                    GATEWAY_ID
                );
                settings.id = GATEWAY_ID.to_string();
            }
            tracing::info!("Loaded gateway settings from {}", path);
            return Ok(Some(settings));
        }
    }

    tracing::info!("No gateway settings file found, using environment defaults");
    Ok(None)
}
