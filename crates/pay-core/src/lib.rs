//! # pay-core
//!
//! Core types and traits for the ABMEX checkout integration.
//!
//! This crate provides:
//! - `PaymentGateway` trait and `GatewayRegistry` for explicit registration
//! - `Order`, `Currency` and `RedirectUrl` for the checkout hand-off
//! - `Credentials` for merchant API keys
//! - `GatewaySettings` for merchant display settings
//! - `RetryPolicy` for caller-side retries
//! - `PaymentError` for typed error handling
//!
//! ## Example
//!
//! ```rust,ignore
//! use pay_core::{Currency, GatewayRegistry, Order};
//!
//! let mut registry = GatewayRegistry::new();
//! registry.register(Arc::new(abmex_gateway));
//!
//! let order = Order::new("1001", "100.00".parse()?, Currency::BRL)
//!     .with_customer("Maria Silva", "maria@example.com")
//!     .with_redirect_urls(success_url, cancel_url);
//!
//! let redirect = registry.default_gateway().unwrap().start_payment(&order).await?;
//! // Redirect the shopper to `redirect`
//! ```

pub mod credentials;
pub mod currency;
pub mod error;
pub mod order;
pub mod retry;
pub mod settings;
pub mod strategy;

// Re-exports for convenience
pub use credentials::Credentials;
pub use currency::Currency;
pub use error::{PaymentError, PaymentResult};
pub use order::{full_name, Order, RedirectUrl};
pub use retry::RetryPolicy;
pub use settings::GatewaySettings;
pub use strategy::{
    start_payment_with_cancel, BoxedPaymentGateway, CheckoutUrls, GatewayRegistry,
    PaymentGateway,
};

pub use rust_decimal::Decimal;
