//! # ABMEX Checkout
//!
//! Payment session orchestration against the ABMEX API:
//!
//! 1. `POST /sessions` with Basic auth, yielding a session token
//! 2. optional legacy `GET /transactions/{random id}`, result ignored
//! 3. `POST /transactions` with the session token, yielding `payment_link`
//!
//! Any failure aborts the remaining steps. Nothing is retried here.

use crate::api::{
    classify_status, excerpt, SessionRequest, SessionResponse, Step, TransactionRequest,
    TransactionResponse, PROVIDER,
};
use crate::config::{AbmexConfig, GATEWAY_ID};
use async_trait::async_trait;
use pay_core::{
    Credentials, GatewaySettings, Order, PaymentError, PaymentGateway, PaymentResult, RedirectUrl,
};
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

/// Upper bound for the legacy lookup, which never gates the payment
const LEGACY_QUERY_TIMEOUT: Duration = Duration::from_secs(2);

/// Bearer token scoped to one `start_payment` call
struct SessionToken(String);

impl SessionToken {
    fn bearer_header(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

/// ABMEX hosted-checkout gateway
///
/// Holds only immutable configuration and a pooled HTTP client, so one
/// instance can serve any number of concurrent orders.
pub struct AbmexCheckout {
    config: AbmexConfig,
    client: Client,
}

impl AbmexCheckout {
    /// Create a new ABMEX checkout gateway
    pub fn new(config: AbmexConfig) -> PaymentResult<Self> {
        config.validate()?;

        let client = Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .https_only(config.require_tls)
            .user_agent(concat!("pay-abmex/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| {
                PaymentError::Configuration(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self { config, client })
    }

    /// Create from environment variables
    pub fn from_env() -> PaymentResult<Self> {
        let config = AbmexConfig::from_env()?;
        Self::new(config)
    }

    pub fn config(&self) -> &AbmexConfig {
        &self.config
    }

    /// Turn `order` into a hosted payment page using `credentials`.
    ///
    /// Session creation must succeed before a transaction is attempted.
    #[instrument(skip(self, order, credentials), fields(order_id = %order.id, provider = PROVIDER))]
    pub async fn start_payment_with(
        &self,
        order: &Order,
        credentials: &Credentials,
    ) -> PaymentResult<RedirectUrl> {
        order.validate()?;

        debug!(
            "Starting ABMEX payment: amount={} {}",
            order.total_amount, order.currency
        );

        let session = self.open_session(order, credentials).await?;

        if self.config.query_transaction {
            self.query_transaction(&session).await;
        }

        let link = self.create_transaction(order, &session).await?;

        info!("Created ABMEX payment link for order {}", order.id);

        Ok(link)
    }

    async fn open_session(
        &self,
        order: &Order,
        credentials: &Credentials,
    ) -> PaymentResult<SessionToken> {
        let request = self
            .client
            .post(self.config.endpoint("sessions"))
            .header(AUTHORIZATION, credentials.basic_auth_header())
            .json(&SessionRequest::for_order(order));

        let body = self.send(Step::OpenSession, request).await?;
        let response: SessionResponse = parse_body(Step::OpenSession, &body)?;

        if response.id.trim().is_empty() {
            return Err(PaymentError::malformed(
                PROVIDER,
                "session creation returned an empty id",
            ));
        }

        debug!("ABMEX session opened");
        Ok(SessionToken(response.id))
    }

    /// Legacy lookup of a freshly generated transaction id. It can never
    /// match a real transaction; every outcome is logged and dropped.
    async fn query_transaction(&self, session: &SessionToken) {
        let transaction_id = Uuid::new_v4().simple().to_string();
        let timeout = self.config.request_timeout.min(LEGACY_QUERY_TIMEOUT);
        let result = self
            .client
            .get(self.config.endpoint(&format!("transactions/{}", transaction_id)))
            .header(AUTHORIZATION, session.bearer_header())
            .timeout(timeout)
            .send()
            .await;

        match result {
            Ok(response) if response.status().is_success() => {
                debug!("Legacy transaction query {} answered", transaction_id)
            }
            Ok(response) => debug!(
                "Legacy transaction query {} returned {}, ignored",
                transaction_id,
                response.status()
            ),
            Err(e) => warn!("Ignoring legacy transaction query failure: {}", e),
        }
    }

    async fn create_transaction(
        &self,
        order: &Order,
        session: &SessionToken,
    ) -> PaymentResult<RedirectUrl> {
        let request = self
            .client
            .post(self.config.endpoint("transactions"))
            .header(AUTHORIZATION, session.bearer_header())
            .header("Idempotency-Key", order.idempotency_key())
            .json(&TransactionRequest::for_order(order));

        let body = self.send(Step::CreateTransaction, request).await?;
        let response: TransactionResponse = parse_body(Step::CreateTransaction, &body)?;

        RedirectUrl::parse(&response.payment_link).map_err(|reason| {
            PaymentError::malformed(
                PROVIDER,
                format!("payment_link is not a usable URL: {}", reason),
            )
        })
    }

    /// Send a request and return the body of a 2xx response
    async fn send(&self, step: Step, request: RequestBuilder) -> PaymentResult<String> {
        let response = request.send().await.map_err(|e| self.transport_error(step, e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| self.transport_error(step, e))?;

        if !status.is_success() {
            error!(
                "ABMEX API error: step={}, status={}, body={}",
                step,
                status,
                excerpt(&body)
            );
            return Err(classify_status(step, status, &body));
        }

        Ok(body)
    }

    fn transport_error(&self, step: Step, e: reqwest::Error) -> PaymentError {
        let message = if e.is_timeout() {
            format!(
                "{} timed out after {:?}",
                step, self.config.request_timeout
            )
        } else {
            format!("{} failed: {}", step, e)
        };
        error!("ABMEX transport error: {}", message);
        PaymentError::unavailable(PROVIDER, message)
    }
}

fn parse_body<T: DeserializeOwned>(step: Step, body: &str) -> PaymentResult<T> {
    serde_json::from_str(body).map_err(|e| {
        PaymentError::malformed(
            PROVIDER,
            format!("Failed to parse {} response: {}", step, e),
        )
    })
}

#[async_trait]
impl PaymentGateway for AbmexCheckout {
    fn id(&self) -> &'static str {
        GATEWAY_ID
    }

    fn settings(&self) -> &GatewaySettings {
        &self.config.settings
    }

    async fn start_payment(&self, order: &Order) -> PaymentResult<RedirectUrl> {
        self.start_payment_with(order, &self.config.credentials).await
    }
}
