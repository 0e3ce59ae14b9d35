//! # ABMEX API Types
//!
//! Request/response bodies for the ABMEX REST API and the mapping from
//! HTTP outcomes to [`PaymentError`].

use pay_core::{Currency, Decimal, Order, PaymentError};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

pub(crate) const PROVIDER: &str = "abmex";

/// Payment method sent with every transaction; the hosted page collects the card.
pub(crate) const PAYMENT_METHOD_TYPE: &str = "credit_card";
pub(crate) const INSTALLMENTS: u32 = 1;

/// Remote call being made, for errors and logs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    OpenSession,
    QueryTransaction,
    CreateTransaction,
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Step::OpenSession => "session creation",
            Step::QueryTransaction => "transaction query",
            Step::CreateTransaction => "transaction creation",
        };
        f.write_str(name)
    }
}

// =============================================================================
// Requests
// =============================================================================

/// `POST /sessions`. Amount is a decimal string with the scale it arrived with.
#[derive(Debug, Serialize)]
pub(crate) struct SessionRequest<'a> {
    pub amount: &'a Decimal,
    pub currency: Currency,
}

impl<'a> SessionRequest<'a> {
    pub fn for_order(order: &'a Order) -> Self {
        Self {
            amount: &order.total_amount,
            currency: order.currency,
        }
    }
}

/// `POST /transactions`
#[derive(Debug, Serialize)]
pub(crate) struct TransactionRequest<'a> {
    pub amount: &'a Decimal,
    pub currency: Currency,
    pub reference: &'a str,
    pub customer: CustomerData<'a>,
    pub payment_method: PaymentMethodData,
    pub redirect_urls: RedirectUrlsData<'a>,
}

#[derive(Debug, Serialize)]
pub(crate) struct CustomerData<'a> {
    pub name: &'a str,
    pub email: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct PaymentMethodData {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub installments: u32,
}

#[derive(Debug, Serialize)]
pub(crate) struct RedirectUrlsData<'a> {
    pub success: &'a str,
    pub cancel: &'a str,
}

impl<'a> TransactionRequest<'a> {
    pub fn for_order(order: &'a Order) -> Self {
        Self {
            amount: &order.total_amount,
            currency: order.currency,
            reference: &order.id,
            customer: CustomerData {
                name: &order.customer_name,
                email: &order.customer_email,
            },
            payment_method: PaymentMethodData {
                kind: PAYMENT_METHOD_TYPE,
                installments: INSTALLMENTS,
            },
            redirect_urls: RedirectUrlsData {
                success: &order.success_url,
                cancel: &order.cancel_url,
            },
        }
    }
}

// =============================================================================
// Responses
// =============================================================================

#[derive(Debug, Deserialize)]
pub(crate) struct SessionResponse {
    pub id: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TransactionResponse {
    pub payment_link: String,
}

/// Best-effort extraction of a human message from an error body
pub(crate) fn provider_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    let candidates = [
        value.get("message"),
        value.get("error").filter(|e| e.is_string()),
        value.get("error").and_then(|e| e.get("message")),
    ];
    let message = candidates
        .into_iter()
        .flatten()
        .find_map(|v| v.as_str())
        .map(String::from);
    message
}

/// Error body shortened for logs and messages
pub(crate) fn excerpt(body: &str) -> String {
    body.chars().take(200).collect()
}

/// Map a non-success HTTP status to the error taxonomy
pub(crate) fn classify_status(step: Step, status: StatusCode, body: &str) -> PaymentError {
    let detail = provider_message(body).unwrap_or_else(|| excerpt(body));

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => PaymentError::CredentialsRejected {
            provider: PROVIDER.to_string(),
            status: status.as_u16(),
        },
        StatusCode::REQUEST_TIMEOUT | StatusCode::TOO_MANY_REQUESTS => {
            PaymentError::unavailable(PROVIDER, format!("{} got HTTP {}", step, status.as_u16()))
        }
        s if s.is_client_error() => PaymentError::InvalidRequest(format!(
            "ABMEX rejected {} (HTTP {}): {}",
            step,
            s.as_u16(),
            detail
        )),
        s => PaymentError::unavailable(
            PROVIDER,
            format!("{} got HTTP {}: {}", step, s.as_u16(), detail),
        ),
    }
}
