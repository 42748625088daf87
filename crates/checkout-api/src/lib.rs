//! # checkout-api
//!
//! HTTP API layer for checkout-gateway-rs.
//!
//! This crate provides:
//! - Axum-based HTTP server
//! - The five checkout endpoints, relayed to a `PaymentProcessor`
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/` | Liveness message |
//! | GET | `/health` | Health check |
//! | POST | `/api/orders` | Create order |
//! | POST | `/api/orders/{orderId}/capture` | Capture order |
//! | POST | `/api/orders/{orderId}/authorize` | Authorize order |
//! | POST | `/api/orders/{authorizationId}/captureAuthorize` | Capture authorization |
//! | POST | `/api/payments/refund` | Refund capture |

pub mod handlers;
pub mod routes;
pub mod state;

pub use routes::create_router;
pub use state::{AppConfig, AppState, LogFormat};
