//! # pay-abmex
//!
//! ABMEX hosted-checkout gateway.
//!
//! [`AbmexCheckout`] opens an ABMEX session with the merchant's client
//! id/secret, creates a credit-card transaction for the order and returns
//! the `payment_link` the shopper must be redirected to.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use pay_abmex::{register_gateway, AbmexConfig};
//! use pay_core::GatewayRegistry;
//!
//! // At startup, in the composition root
//! let mut registry = GatewayRegistry::new();
//! register_gateway(&mut registry, AbmexConfig::from_env()?)?;
//!
//! // Per checkout
//! let gateway = registry.get("abmex_gateway").unwrap();
//! let redirect = gateway.start_payment(&order).await?;
//! ```

pub mod api;
pub mod checkout;
pub mod config;

use pay_core::{GatewayRegistry, PaymentResult};
use std::sync::Arc;
use tracing::info;

// Re-exports
pub use api::Step;
pub use checkout::AbmexCheckout;
pub use config::{default_settings, AbmexConfig, DEFAULT_API_BASE_URL, GATEWAY_ID};

/// Build the ABMEX gateway from `config` and add it to `registry`.
pub fn register_gateway(registry: &mut GatewayRegistry, config: AbmexConfig) -> PaymentResult<()> {
    let checkout = AbmexCheckout::new(config)?;
    info!(
        "Registered ABMEX gateway: enabled={}, base_url={}",
        checkout.config().settings.enabled,
        checkout.config().api_base_url
    );
    registry.register(Arc::new(checkout));
    Ok(())
}
