//! # Request Handlers
//!
//! Axum request handlers for the checkout API.
//! Each operation relays one payment processor call and reflects its
//! status code and body; any processor failure becomes a fixed 500.

use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use checkout_core::{
    Cart, GatewayError, GatewayResult, ProcessorResponse, UpstreamError, UpstreamResult,
};
use serde::{Deserialize, Serialize};
use std::future::Future;
use tracing::{error, info, instrument, warn};

// =============================================================================
// Request/Response Types
// =============================================================================

/// Create order request
#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    /// Cart contents from the browser
    #[serde(default)]
    pub cart: Option<Cart>,
}

impl CreateOrderRequest {
    fn into_cart(self) -> GatewayResult<Cart> {
        match self.cart {
            Some(cart) if !cart.0.is_null() => Ok(cart),
            _ => Err(GatewayError::missing_field("cart")),
        }
    }
}

/// Refund request
#[derive(Debug, Deserialize)]
pub struct RefundRequest {
    /// Capture to refund
    #[serde(rename = "capturedPaymentId", default)]
    pub captured_payment_id: Option<String>,
}

impl RefundRequest {
    fn into_capture_id(self) -> GatewayResult<String> {
        match self.captured_payment_id {
            Some(id) if !id.trim().is_empty() => Ok(id),
            _ => Err(GatewayError::missing_field("capturedPaymentId")),
        }
    }
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// The five relayed operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    CreateOrder,
    CaptureOrder,
    AuthorizeOrder,
    CaptureAuthorization,
    RefundCapture,
}

impl Operation {
    pub fn name(&self) -> &'static str {
        match self {
            Operation::CreateOrder => "create_order",
            Operation::CaptureOrder => "capture_order",
            Operation::AuthorizeOrder => "authorize_order",
            Operation::CaptureAuthorization => "capture_authorization",
            Operation::RefundCapture => "refund_capture",
        }
    }

    /// Message returned to the caller when the operation fails upstream
    pub fn failure_message(&self) -> &'static str {
        match self {
            Operation::CreateOrder => "Failed to create order.",
            Operation::CaptureOrder => "Failed to capture order.",
            Operation::AuthorizeOrder => "Failed to authorize order.",
            Operation::CaptureAuthorization => "Failed to capture authorization.",
            Operation::RefundCapture => "Failed refund capture.",
        }
    }
}

fn failure_response(operation: Operation) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse::new(operation.failure_message())),
    )
        .into_response()
}

/// Map a gateway error to a response. Upstream detail stays in the logs.
fn gateway_error_to_response(
    operation: Operation,
    identifier: Option<&str>,
    err: GatewayError,
) -> Response {
    match err {
        GatewayError::ClientInput { .. } => {
            warn!(operation = operation.name(), "Rejected request: {}", err);
            let status = StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::BAD_REQUEST);
            (status, Json(ErrorResponse::new(err.to_string()))).into_response()
        }
        GatewayError::Upstream(_) | GatewayError::Configuration(_) => {
            error!(
                operation = operation.name(),
                identifier = identifier.unwrap_or("-"),
                "{}: {}",
                operation.failure_message(),
                err
            );
            failure_response(operation)
        }
    }
}

fn json_rejection_to_error(rejection: JsonRejection) -> GatewayError {
    GatewayError::ClientInput {
        field: "body".to_string(),
        message: rejection.body_text(),
    }
}

/// Run one processor call under the configured timeout and relay its answer
async fn relay<F>(
    state: &AppState,
    operation: Operation,
    identifier: Option<&str>,
    call: F,
) -> Response
where
    F: Future<Output = UpstreamResult<ProcessorResponse>>,
{
    let timeout = state.upstream_timeout();
    let result = match tokio::time::timeout(timeout, call).await {
        Ok(result) => result,
        Err(_) => Err(UpstreamError::Timeout {
            secs: timeout.as_secs(),
        }),
    };

    let response = match result {
        Ok(response) => response,
        Err(e) => return gateway_error_to_response(operation, identifier, e.into()),
    };

    match StatusCode::from_u16(response.status_code) {
        Ok(status) => {
            info!(
                operation = operation.name(),
                identifier = identifier.unwrap_or("-"),
                status = response.status_code,
                "Relayed processor response"
            );
            // 204 carries no body
            if status == StatusCode::NO_CONTENT {
                return status.into_response();
            }
            (status, Json(response.body)).into_response()
        }
        Err(_) => {
            let err = UpstreamError::InvalidResponse(format!(
                "status code {} out of range",
                response.status_code
            ));
            gateway_error_to_response(operation, identifier, err.into())
        }
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Root endpoint
pub async fn root() -> impl IntoResponse {
    Json(serde_json::json!({ "message": "Server is running" }))
}

/// Health check endpoint
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "checkout-gateway",
        "version": env!("CARGO_PKG_VERSION"),
        "provider": state.processor.provider_name()
    }))
}

/// Create an order from the configured template
#[instrument(skip(state, payload))]
pub async fn create_order(
    State(state): State<AppState>,
    payload: Result<Json<CreateOrderRequest>, JsonRejection>,
) -> Response {
    let op = Operation::CreateOrder;

    let cart = match payload
        .map_err(json_rejection_to_error)
        .and_then(|Json(request)| request.into_cart())
    {
        Ok(cart) => cart,
        Err(e) => return gateway_error_to_response(op, None, e),
    };

    let order = state.order_template.build_order(&cart);
    info!(
        "Creating order: cart_items={:?}, amount={} {}",
        cart.item_count(),
        state.order_template.value,
        state.order_template.currency_code
    );

    relay(&state, op, None, state.processor.create_order(&order)).await
}

/// Capture payment for an approved order
#[instrument(skip(state))]
pub async fn capture_order(State(state): State<AppState>, Path(order_id): Path<String>) -> Response {
    relay(
        &state,
        Operation::CaptureOrder,
        Some(order_id.as_str()),
        state.processor.capture_order(&order_id),
    )
    .await
}

/// Authorize payment for an approved order
#[instrument(skip(state))]
pub async fn authorize_order(
    State(state): State<AppState>,
    Path(order_id): Path<String>,
) -> Response {
    relay(
        &state,
        Operation::AuthorizeOrder,
        Some(order_id.as_str()),
        state.processor.authorize_order(&order_id),
    )
    .await
}

/// Capture a previously authorized payment
#[instrument(skip(state))]
pub async fn capture_authorization(
    State(state): State<AppState>,
    Path(authorization_id): Path<String>,
) -> Response {
    relay(
        &state,
        Operation::CaptureAuthorization,
        Some(authorization_id.as_str()),
        state.processor.capture_authorization(&authorization_id),
    )
    .await
}

/// Refund a captured payment
#[instrument(skip(state, payload))]
pub async fn refund_capture(
    State(state): State<AppState>,
    payload: Result<Json<RefundRequest>, JsonRejection>,
) -> Response {
    let op = Operation::RefundCapture;

    let capture_id = match payload
        .map_err(json_rejection_to_error)
        .and_then(|Json(request)| request.into_capture_id())
    {
        Ok(id) => id,
        Err(e) => return gateway_error_to_response(op, None, e),
    };

    relay(
        &state,
        op,
        Some(capture_id.as_str()),
        state.processor.refund_capture(&capture_id),
    )
    .await
}
