//! # ABMEX Checkout
//!
//! Checkout adapter that sends shoppers to ABMEX hosted payment pages.
//!
//! ## Usage
//!
//! ```bash
//! # Set environment variables
//! export ABMEX_CLIENT_ID=...
//! export ABMEX_CLIENT_SECRET=...
//! export BASE_URL=https://shop.example.com
//!
//! # Run the server
//! abmex-checkout
//! ```

use pay_api::{routes, state::AppState};
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    // Composition root: configuration and gateway registration
    let state = AppState::new()?;

    let addr = state.config.socket_addr()?;

    info!("Environment: {}", state.config.environment);
    info!("Payment gateways: {:?}", state.gateways.ids());
    info!("Retry attempts per payment: {}", state.config.retry.max_attempts);

    let is_prod = state.config.is_production();
    let app = routes::create_router(state);

    info!("ABMEX checkout listening on http://{}", addr);
    if !is_prod {
        info!("Pay: POST http://{}/api/v1/orders/{{order_id}}/pay", addr);
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}
