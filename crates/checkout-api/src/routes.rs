//! # Routes
//!
//! Axum router configuration for the checkout API.

use crate::handlers;
use crate::state::AppState;
use axum::{
    body::Body,
    http::Request,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use uuid::Uuid;

/// Create the main application router
///
/// Routes:
/// - POST /api/orders - Create order
/// - POST /api/orders/{orderId}/capture - Capture order
/// - POST /api/orders/{orderId}/authorize - Authorize order
/// - POST /api/orders/{authorizationId}/captureAuthorize - Capture authorization
/// - POST /api/payments/refund - Refund a capture
/// - GET  /, GET /health - Liveness
pub fn create_router(state: AppState) -> Router {
    // Browser front-ends are served from other origins
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let trace = TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
        tracing::info_span!(
            "http_request",
            method = %request.method(),
            uri = %request.uri(),
            request_id = %Uuid::new_v4(),
        )
    });

    // One path parameter name for all order routes; the router rejects
    // differently named parameters in the same position.
    let api_routes = Router::new()
        .route("/api/orders", post(handlers::create_order))
        .route("/api/orders/{id}/capture", post(handlers::capture_order))
        .route("/api/orders/{id}/authorize", post(handlers::authorize_order))
        .route(
            "/api/orders/{id}/captureAuthorize",
            post(handlers::capture_authorization),
        )
        .route("/api/payments/refund", post(handlers::refund_capture));

    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .merge(api_routes)
        .layer(ServiceBuilder::new().layer(trace).layer(cors))
        .with_state(state)
}
