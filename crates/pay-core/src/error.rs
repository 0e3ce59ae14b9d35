//! # Payment Error Types
//!
//! Typed error handling for the checkout orchestration.
//! All payment operations return `Result<T, PaymentError>`.

use thiserror::Error;

/// Core error type for all payment operations
#[derive(Debug, Error)]
pub enum PaymentError {
    /// Provider refused the merchant credentials or the session token (HTTP 401/403)
    #[error("Credentials rejected by {provider} (HTTP {status})")]
    CredentialsRejected { provider: String, status: u16 },

    /// Malformed amount, currency, reference or URLs (local or provider 4xx)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Network failure, timeout or 5xx from the provider
    #[error("Provider unavailable [{provider}]: {message}")]
    ProviderUnavailable { provider: String, message: String },

    /// Body is not JSON or lacks the expected field
    #[error("Malformed response from {provider}: {message}")]
    MalformedResponse { provider: String, message: String },

    /// Configuration errors (missing keys, invalid config)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Caller abandoned the payment before it completed
    #[error("Payment cancelled before completion")]
    Cancelled,
}

impl PaymentError {
    pub fn unavailable(provider: impl Into<String>, message: impl Into<String>) -> Self {
        PaymentError::ProviderUnavailable {
            provider: provider.into(),
            message: message.into(),
        }
    }

    pub fn malformed(provider: impl Into<String>, message: impl Into<String>) -> Self {
        PaymentError::MalformedResponse {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Returns true if a fresh attempt may succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, PaymentError::ProviderUnavailable { .. })
    }

    /// Short machine-readable name of the error kind
    pub fn kind(&self) -> &'static str {
        match self {
            PaymentError::CredentialsRejected { .. } => "credentials_rejected",
            PaymentError::InvalidRequest(_) => "invalid_request",
            PaymentError::ProviderUnavailable { .. } => "provider_unavailable",
            PaymentError::MalformedResponse { .. } => "malformed_response",
            PaymentError::Configuration(_) => "configuration",
            PaymentError::Cancelled => "cancelled",
        }
    }

    /// Returns the HTTP status code appropriate for this error
    pub fn status_code(&self) -> u16 {
        match self {
            PaymentError::CredentialsRejected { .. } => 502,
            PaymentError::InvalidRequest(_) => 400,
            PaymentError::ProviderUnavailable { .. } => 503,
            PaymentError::MalformedResponse { .. } => 502,
            PaymentError::Configuration(_) => 500,
            PaymentError::Cancelled => 408,
        }
    }
}

/// Result type alias for payment operations
pub type PaymentResult<T> = Result<T, PaymentError>;
