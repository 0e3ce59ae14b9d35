//! # Order Types
//!
//! The order handed over by the host checkout platform, and the redirect URL
//! handed back once a hosted payment page exists.

use crate::currency::Currency;
use crate::error::{PaymentError, PaymentResult};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use url::Url;

/// An order ready to be paid
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    /// Merchant-unique order reference
    pub id: String,

    /// Order total in major units, scale as supplied by the platform
    pub total_amount: Decimal,

    /// Currency
    #[serde(default)]
    pub currency: Currency,

    /// Customer display name
    pub customer_name: String,

    /// Customer email
    pub customer_email: String,

    /// URL the provider sends the shopper to after paying
    pub success_url: String,

    /// URL the provider sends the shopper to after giving up
    pub cancel_url: String,

    /// Idempotency key (prevents duplicate transactions)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub idempotency_key: Option<String>,
}

impl Order {
    /// Create an order with amount and currency; customer and URLs are set
    /// with the builders below.
    pub fn new(id: impl Into<String>, total_amount: Decimal, currency: Currency) -> Self {
        Self {
            id: id.into(),
            total_amount,
            currency,
            customer_name: String::new(),
            customer_email: String::new(),
            success_url: String::new(),
            cancel_url: String::new(),
            idempotency_key: None,
        }
    }

    /// Set customer name and email
    pub fn with_customer(mut self, name: impl Into<String>, email: impl Into<String>) -> Self {
        self.customer_name = name.into();
        self.customer_email = email.into();
        self
    }

    /// Set success and cancel URLs
    pub fn with_redirect_urls(
        mut self,
        success_url: impl Into<String>,
        cancel_url: impl Into<String>,
    ) -> Self {
        self.success_url = success_url.into();
        self.cancel_url = cancel_url.into();
        self
    }

    /// Set idempotency key
    pub fn with_idempotency_key(mut self, key: impl Into<String>) -> Self {
        self.idempotency_key = Some(key.into());
        self
    }

    /// Key the provider uses to deduplicate transaction creation
    pub fn idempotency_key(&self) -> &str {
        self.idempotency_key.as_deref().unwrap_or(&self.id)
    }

    /// Check the order before anything is sent to a provider.
    ///
    /// Amounts with more fractional digits than the currency allows are
    /// rejected rather than rounded.
    pub fn validate(&self) -> PaymentResult<()> {
        if self.id.trim().is_empty() {
            return Err(PaymentError::InvalidRequest(
                "Order reference is empty".to_string(),
            ));
        }

        if self.total_amount <= Decimal::ZERO {
            return Err(PaymentError::InvalidRequest(format!(
                "Order total must be positive, got {}",
                self.total_amount
            )));
        }

        if !self.currency.fits_minor_unit(self.total_amount) {
            return Err(PaymentError::InvalidRequest(format!(
                "Order total {} has more than {} decimal places for {}",
                self.total_amount,
                self.currency.decimal_places(),
                self.currency
            )));
        }

        if self.customer_email.trim().is_empty() {
            return Err(PaymentError::InvalidRequest(
                "Customer email is required".to_string(),
            ));
        }

        for (name, value) in [("success", &self.success_url), ("cancel", &self.cancel_url)] {
            parse_web_url(value).map_err(|reason| {
                PaymentError::InvalidRequest(format!("Invalid {} URL: {}", name, reason))
            })?;
        }

        Ok(())
    }
}

/// Join billing first and last name the way checkout forms collect them
pub fn full_name(first: &str, last: &str) -> String {
    format!("{} {}", first.trim(), last.trim()).trim().to_string()
}

/// Hosted payment page the shopper must be sent to
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RedirectUrl(String);

impl RedirectUrl {
    /// Accepts only absolute http(s) URLs. The provider's text is kept
    /// verbatim, not re-serialized.
    pub fn parse(raw: &str) -> Result<Self, String> {
        parse_web_url(raw).map(|_| RedirectUrl(raw.trim().to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl std::fmt::Display for RedirectUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

fn parse_web_url(raw: &str) -> Result<Url, String> {
    let url = Url::parse(raw.trim()).map_err(|e| format!("{} ({:?})", e, raw))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(format!("unsupported scheme {}", other)),
    }
}
