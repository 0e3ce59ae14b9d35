//! # pay-api
//!
//! Checkout host adapter for the ABMEX gateway.
//!
//! The storefront posts "pay order N" here; the adapter builds an `Order`,
//! runs the registered gateway and answers with a redirect to the hosted
//! payment page.
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/health` | Health check |
//! | GET | `/api/v1/gateways` | Gateways offered at checkout |
//! | POST | `/api/v1/orders/{order_id}/pay` | Start payment (303 redirect) |

pub mod handlers;
pub mod routes;
pub mod state;

pub use routes::create_router;
pub use state::{AppConfig, AppState};
