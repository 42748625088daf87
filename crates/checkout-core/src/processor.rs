//! # Payment Processor Trait
//!
//! Adapter trait for the external payment processor behind the gateway.
//! Implementations: PayPal REST (`checkout-paypal`), test stubs.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  PaymentProcessor (trait)                   │
//! │  ├── create_order()                                         │
//! │  ├── capture_order()                                        │
//! │  ├── authorize_order()                                      │
//! │  ├── capture_authorization()                                │
//! │  └── refund_capture()                                       │
//! └─────────────────────────────────────────────────────────────┘
//!                            ▲
//!                  ┌─────────┴─────────┐
//!                  │                   │
//!          ┌───────┴───────┐   ┌───────┴───────┐
//!          │ PayPalClient  │   │  test stubs   │
//!          └───────────────┘   └───────────────┘
//! ```

use crate::error::UpstreamResult;
use crate::order::OrderRequest;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Successful answer of the payment processor, relayed as-is to the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessorResponse {
    /// HTTP status code reported by the processor
    pub status_code: u16,
    /// JSON body reported by the processor
    pub body: serde_json::Value,
}

impl ProcessorResponse {
    pub fn new(status_code: u16, body: serde_json::Value) -> Self {
        Self { status_code, body }
    }
}

/// Operations the gateway needs from a payment processor.
///
/// Identifiers are opaque and must be forwarded unchanged.
#[async_trait]
pub trait PaymentProcessor: Send + Sync {
    /// Create an order from the given payload.
    async fn create_order(&self, order: &OrderRequest) -> UpstreamResult<ProcessorResponse>;

    /// Capture payment for an approved order.
    async fn capture_order(&self, order_id: &str) -> UpstreamResult<ProcessorResponse>;

    /// Authorize payment for an approved order.
    async fn authorize_order(&self, order_id: &str) -> UpstreamResult<ProcessorResponse>;

    /// Capture a previously authorized payment.
    async fn capture_authorization(
        &self,
        authorization_id: &str,
    ) -> UpstreamResult<ProcessorResponse>;

    /// Refund a captured payment.
    async fn refund_capture(&self, capture_id: &str) -> UpstreamResult<ProcessorResponse>;

    /// Get the provider name (for logging).
    fn provider_name(&self) -> &'static str;
}

/// Type alias for a shared payment processor (dynamic dispatch)
pub type SharedPaymentProcessor = Arc<dyn PaymentProcessor>;
