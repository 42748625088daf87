//! # checkout-paypal
//!
//! PayPal payment processor for checkout-gateway-rs.
//!
//! Talks to the PayPal REST API directly:
//!
//! | Operation | Endpoint |
//! |-----------|----------|
//! | create order | `POST /v2/checkout/orders` |
//! | capture order | `POST /v2/checkout/orders/{id}/capture` |
//! | authorize order | `POST /v2/checkout/orders/{id}/authorize` |
//! | capture authorization | `POST /v2/payments/authorizations/{id}/capture` |
//! | refund capture | `POST /v2/payments/captures/{id}/refund` |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use checkout_paypal::PayPalClient;
//! use checkout_core::PaymentProcessor;
//!
//! // Reads PAYPAL_CLIENT_ID / PAYPAL_CLIENT_SECRET / PAYPAL_ENVIRONMENT
//! let paypal = PayPalClient::from_env()?;
//!
//! let response = paypal.capture_order("5O190127TN364715T").await?;
//! println!("{} {}", response.status_code, response.body);
//! ```

pub mod client;
pub mod config;

// Re-exports
pub use client::PayPalClient;
pub use config::{PayPalConfig, PayPalEnvironment};
