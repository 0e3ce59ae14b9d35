//! # Routes
//!
//! Axum router configuration for the checkout adapter.

use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Create the main application router
///
/// Routes:
///   - GET  /health, / - Health check
///   - GET  /api/v1/gateways - Gateways offered at checkout
///   - POST /api/v1/orders/{order_id}/pay - Start payment, 303 to hosted page
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let order_routes = Router::new().route("/{order_id}/pay", post(handlers::pay_order));

    let api_routes = Router::new()
        .route("/gateways", get(handlers::list_gateways))
        .nest("/orders", order_routes);

    Router::new()
        .route("/health", get(handlers::health))
        .route("/", get(handlers::health))
        .nest("/api/v1", api_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
