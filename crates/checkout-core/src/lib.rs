//! # checkout-core
//!
//! Core types and traits for the checkout gateway.
//!
//! This crate provides:
//! - `PaymentProcessor` trait for adapting a payment provider's API
//! - `OrderRequest` and friends, the order creation payload
//! - `OrderTemplate`, the fixed amount/shipping set used for new orders
//! - `GatewayError` and `UpstreamError` for typed error handling
//!
//! ## Example
//!
//! ```rust,ignore
//! use checkout_core::{Cart, OrderTemplate, PaymentProcessor};
//!
//! let order = OrderTemplate::default().build_order(&Cart(cart_json));
//! let response = processor.create_order(&order).await?;
//!
//! // Relay response.status_code and response.body to the browser
//! ```

pub mod error;
pub mod order;
pub mod processor;
pub mod template;

// Re-exports for convenience
pub use error::{GatewayError, GatewayResult, UpstreamError, UpstreamResult};
pub use order::{
    Cart, CheckoutIntent, Money, OrderRequest, PurchaseUnit, ShippingDetails, ShippingOption,
    ShippingType,
};
pub use processor::{PaymentProcessor, ProcessorResponse, SharedPaymentProcessor};
pub use template::{OrderTemplate, TemplateShippingOption};
