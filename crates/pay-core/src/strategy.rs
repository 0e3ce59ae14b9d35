//! # Payment Gateway Trait
//!
//! The narrow capability a host checkout platform calls: turn an order into
//! a hosted payment page. Gateways are registered explicitly by the
//! application's composition root.
//!
//! ```text
//! host checkout ──► GatewayRegistry::get(id) ──► PaymentGateway::start_payment(order)
//!                                                     │
//!                                                     ▼
//!                                         RedirectUrl | PaymentError
//! ```

use crate::error::{PaymentError, PaymentResult};
use crate::order::{Order, RedirectUrl};
use crate::settings::GatewaySettings;
use async_trait::async_trait;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use tracing::warn;

/// A payment provider integration usable from checkout.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Stable identifier (for routing and logging).
    fn id(&self) -> &'static str;

    /// Merchant display settings.
    fn settings(&self) -> &GatewaySettings;

    /// Open a payment for `order` and return the page the shopper must be
    /// redirected to.
    ///
    /// The host must not treat the order as paid on `Ok`; payment status
    /// arrives out of band.
    async fn start_payment(&self, order: &Order) -> PaymentResult<RedirectUrl>;
}

/// Type alias for a shared gateway (dynamic dispatch)
pub type BoxedPaymentGateway = Arc<dyn PaymentGateway>;

/// Run `start_payment`, giving up as soon as `cancel` resolves.
///
/// In-flight requests are dropped on cancellation.
pub async fn start_payment_with_cancel<C>(
    gateway: &dyn PaymentGateway,
    order: &Order,
    cancel: C,
) -> PaymentResult<RedirectUrl>
where
    C: Future<Output = ()> + Send,
{
    tokio::select! {
        biased;
        _ = cancel => {
            warn!("Payment for order {} abandoned by caller", order.id);
            Err(PaymentError::Cancelled)
        }
        result = gateway.start_payment(order) => result,
    }
}

/// Gateways available to checkout, filled in at startup
#[derive(Clone, Default)]
pub struct GatewayRegistry {
    gateways: HashMap<String, BoxedPaymentGateway>,
    default_gateway: Option<String>,
}

impl GatewayRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a gateway. The first registration becomes the default.
    pub fn register(&mut self, gateway: BoxedPaymentGateway) {
        let id = gateway.id().to_string();
        if self.default_gateway.is_none() {
            self.default_gateway = Some(id.clone());
        }
        self.gateways.insert(id, gateway);
    }

    /// Register with builder pattern
    pub fn with_gateway(mut self, gateway: BoxedPaymentGateway) -> Self {
        self.register(gateway);
        self
    }

    /// Set the default gateway ID
    pub fn set_default(&mut self, id: impl Into<String>) {
        self.default_gateway = Some(id.into());
    }

    /// Get an enabled gateway by ID
    pub fn get(&self, id: &str) -> Option<&BoxedPaymentGateway> {
        self.gateways.get(id).filter(|g| g.settings().enabled)
    }

    /// Get the default gateway, if enabled
    pub fn default_gateway(&self) -> Option<&BoxedPaymentGateway> {
        self.default_gateway.as_deref().and_then(|id| self.get(id))
    }

    /// Get gateway by ID or fall back to default
    pub fn get_or_default(&self, id: Option<&str>) -> Option<&BoxedPaymentGateway> {
        match id {
            Some(id) => self.get(id),
            None => self.default_gateway(),
        }
    }

    /// Settings of every enabled gateway, sorted by ID
    pub fn enabled_settings(&self) -> Vec<&GatewaySettings> {
        let mut settings: Vec<_> = self
            .gateways
            .values()
            .map(|g| g.settings())
            .filter(|s| s.enabled)
            .collect();
        settings.sort_by(|a, b| a.id.cmp(&b.id));
        settings
    }

    /// All registered IDs, enabled or not
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<_> = self.gateways.keys().map(|s| s.as_str()).collect();
        ids.sort_unstable();
        ids
    }

    pub fn len(&self) -> usize {
        self.gateways.len()
    }

    pub fn is_empty(&self) -> bool {
        self.gateways.is_empty()
    }
}

/// Where the shopper lands after the hosted page, per order
#[derive(Debug, Clone)]
pub struct CheckoutUrls {
    /// Base URL of the shop (e.g., "https://shop.example.com")
    pub base_url: String,
    /// Success page path (e.g., "/checkout/order-received")
    pub success_path: String,
    /// Cancel page path (e.g., "/checkout/cancel")
    pub cancel_path: String,
}

impl CheckoutUrls {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            success_path: "/checkout/order-received".to_string(),
            cancel_path: "/checkout/cancel".to_string(),
        }
    }

    pub fn success_url(&self, order_id: &str) -> String {
        format!("{}{}/{}", self.base_url, self.success_path, order_id)
    }

    pub fn cancel_url(&self, order_id: &str) -> String {
        format!("{}{}/{}", self.base_url, self.cancel_path, order_id)
    }
}

impl Default for CheckoutUrls {
    fn default() -> Self {
        Self::new("http://localhost:8080")
    }
}
