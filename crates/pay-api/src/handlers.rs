//! # Request Handlers
//!
//! Axum request handlers for the checkout adapter. A successful payment
//! start answers with a redirect to the hosted payment page; failures carry
//! the error kind so the storefront can show a checkout error and leave the
//! order unpaid.

use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect},
    Json,
};
use pay_core::{full_name, Currency, Decimal, Order, PaymentError};
use serde::{Deserialize, Deserializer, Serialize};
use std::str::FromStr;
use tracing::{error, info, instrument};

// =============================================================================
// Request/Response Types
// =============================================================================

/// Pay order request
#[derive(Debug, Deserialize)]
pub struct PayOrderRequest {
    /// Order total as a decimal string ("100.00"); JSON numbers are refused
    #[serde(deserialize_with = "decimal_string")]
    pub amount: Decimal,
    /// Currency (defaults to BRL)
    #[serde(default)]
    pub currency: Currency,
    /// Billing details
    pub customer: CustomerDetails,
    /// Where the shopper returns after paying (defaults to the shop's page)
    #[serde(default)]
    pub success_url: Option<String>,
    /// Where the shopper returns after giving up (defaults to the shop's page)
    #[serde(default)]
    pub cancel_url: Option<String>,
    /// Gateway ID (optional, defaults to the first registered one)
    #[serde(default)]
    pub gateway: Option<String>,
    /// Idempotency key (optional, defaults to the order ID)
    #[serde(default)]
    pub idempotency_key: Option<String>,
}

/// Parse an amount from a JSON string only. A JSON number goes through f64,
/// which drops trailing zeros ("100.00" becomes 100).
fn decimal_string<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Decimal::from_str(raw.trim()).map_err(serde::de::Error::custom)
}

/// Billing details of the shopper
#[derive(Debug, Deserialize)]
pub struct CustomerDetails {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub email: String,
}

/// Gateway offered at checkout
#[derive(Debug, Serialize)]
pub struct GatewayView {
    pub id: String,
    pub title: String,
    pub description: String,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<&'static str>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, code: u16) -> Self {
        Self {
            error: error.into(),
            code,
            kind: None,
        }
    }

    pub fn with_kind(mut self, kind: &'static str) -> Self {
        self.kind = Some(kind);
        self
    }
}

fn payment_error_to_response(err: PaymentError) -> (StatusCode, Json<ErrorResponse>) {
    let code = err.status_code();
    let response = ErrorResponse::new(err.to_string(), code).with_kind(err.kind());
    (StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR), Json(response))
}

// =============================================================================
// Handlers
// =============================================================================

/// Health check endpoint
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "abmex-checkout",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// List gateways shoppers can choose from
pub async fn list_gateways(State(state): State<AppState>) -> impl IntoResponse {
    let gateways: Vec<_> = state
        .gateways
        .enabled_settings()
        .into_iter()
        .map(|s| GatewayView {
            id: s.id.clone(),
            title: s.title.clone(),
            description: s.description.clone(),
        })
        .collect();

    Json(serde_json::json!({
        "count": gateways.len(),
        "gateways": gateways,
    }))
}

/// Start payment for an order and redirect the shopper to the hosted page
#[instrument(skip(state, request))]
pub async fn pay_order(
    State(state): State<AppState>,
    Path(order_id): Path<String>,
    Json(request): Json<PayOrderRequest>,
) -> Result<Redirect, (StatusCode, Json<ErrorResponse>)> {
    let gateway = state.gateway(request.gateway.as_deref()).ok_or_else(|| {
        (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new(
                format!("Payment gateway not available: {:?}", request.gateway),
                404,
            )),
        )
    })?;

    let success_url = request
        .success_url
        .clone()
        .unwrap_or_else(|| state.urls.success_url(&order_id));
    let cancel_url = request
        .cancel_url
        .clone()
        .unwrap_or_else(|| state.urls.cancel_url(&order_id));

    let mut order = Order::new(order_id.clone(), request.amount, request.currency)
        .with_customer(
            full_name(&request.customer.first_name, &request.customer.last_name),
            request.customer.email.trim(),
        )
        .with_redirect_urls(success_url, cancel_url);

    if let Some(key) = request.idempotency_key {
        order = order.with_idempotency_key(key);
    }

    info!(
        "Starting payment: gateway={}, total={} {}",
        gateway.id(),
        order.total_amount,
        order.currency
    );

    let link = state
        .config
        .retry
        .run(|| gateway.start_payment(&order))
        .await
        .map_err(|e| {
            error!("Payment for order {} failed: {}", order_id, e);
            payment_error_to_response(e)
        })?;

    info!("Redirecting order {} to hosted payment page", order_id);

    Ok(Redirect::to(link.as_str()))
}
