//! Router-level tests against a recording stub processor.

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
};
use axum_test::TestServer;
use checkout_api::{create_router, AppConfig, AppState};
use checkout_core::{
    CheckoutIntent, OrderRequest, OrderTemplate, PaymentProcessor, ProcessorResponse,
    UpstreamError, UpstreamResult,
};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tower::ServiceExt;

const SECRET_DETAIL: &str = "INSTRUMENT_DECLINED debug_id=f00ba4";

#[derive(Debug, Clone, PartialEq)]
enum Call {
    CreateOrder(OrderRequest),
    CaptureOrder(String),
    AuthorizeOrder(String),
    CaptureAuthorization(String),
    RefundCapture(String),
}

#[derive(Default)]
struct StubProcessor {
    calls: Mutex<Vec<Call>>,
    orders_created: AtomicUsize,
    fail: bool,
    delay: Option<Duration>,
    status_code: Option<u16>,
}

impl StubProcessor {
    fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    fn slow(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Default::default()
        }
    }

    fn with_status(status_code: u16) -> Self {
        Self {
            status_code: Some(status_code),
            ..Default::default()
        }
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    async fn answer(&self, call: Call, body: Value) -> UpstreamResult<ProcessorResponse> {
        self.calls.lock().unwrap().push(call);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if self.fail {
            return Err(UpstreamError::Api {
                status: 422,
                message: SECRET_DETAIL.to_string(),
            });
        }

        Ok(ProcessorResponse::new(self.status_code.unwrap_or(201), body))
    }
}

#[async_trait]
impl PaymentProcessor for StubProcessor {
    async fn create_order(&self, order: &OrderRequest) -> UpstreamResult<ProcessorResponse> {
        let n = self.orders_created.fetch_add(1, Ordering::SeqCst);
        let body = json!({
            "id": format!("ORDER-{}", n),
            "status": "CREATED",
            "intent": order.intent,
            "purchase_units": order.purchase_units.len()
        });
        self.answer(Call::CreateOrder(order.clone()), body).await
    }

    async fn capture_order(&self, order_id: &str) -> UpstreamResult<ProcessorResponse> {
        let body = json!({ "id": order_id, "status": "COMPLETED" });
        self.answer(Call::CaptureOrder(order_id.to_string()), body).await
    }

    async fn authorize_order(&self, order_id: &str) -> UpstreamResult<ProcessorResponse> {
        let body = json!({
            "id": order_id,
            "purchase_units": [{ "payments": { "authorizations": [{ "id": "AUTH-1" }] } }]
        });
        self.answer(Call::AuthorizeOrder(order_id.to_string()), body).await
    }

    async fn capture_authorization(
        &self,
        authorization_id: &str,
    ) -> UpstreamResult<ProcessorResponse> {
        let body = json!({ "id": "CAPTURE-1", "authorization_id": authorization_id });
        self.answer(
            Call::CaptureAuthorization(authorization_id.to_string()),
            body,
        )
        .await
    }

    async fn refund_capture(&self, capture_id: &str) -> UpstreamResult<ProcessorResponse> {
        let body = json!({ "id": format!("REFUND-{}", capture_id), "capture_id": capture_id });
        self.answer(Call::RefundCapture(capture_id.to_string()), body).await
    }

    fn provider_name(&self) -> &'static str {
        "stub"
    }
}

fn state_with(processor: Arc<StubProcessor>, timeout: Duration) -> AppState {
    let config = AppConfig {
        upstream_timeout: timeout,
        ..AppConfig::default()
    };
    AppState::new(config, processor, OrderTemplate::default())
}

fn server_with(processor: Arc<StubProcessor>) -> TestServer {
    TestServer::new(create_router(state_with(processor, Duration::from_secs(5)))).unwrap()
}

// =============================================================================
// Pass-through
// =============================================================================

#[tokio::test]
async fn create_order_relays_processor_response() {
    let stub = Arc::new(StubProcessor::default());
    let server = server_with(stub.clone());

    let response = server
        .post("/api/orders")
        .json(&json!({ "cart": [{ "id": "YOUR_PRODUCT_ID", "quantity": "YOUR_PRODUCT_QUANTITY" }] }))
        .await;

    assert_eq!(response.status_code(), StatusCode::CREATED);
    assert_eq!(
        response.json::<Value>(),
        json!({ "id": "ORDER-0", "status": "CREATED", "intent": "CAPTURE", "purchase_units": 1 })
    );

    let calls = stub.calls();
    assert_eq!(calls.len(), 1);
    match &calls[0] {
        Call::CreateOrder(order) => {
            assert_eq!(order.intent, CheckoutIntent::Capture);
            assert_eq!(order.purchase_units.len(), 1);
            let shipping = order.purchase_units[0].shipping.as_ref().unwrap();
            assert_eq!(shipping.options.iter().filter(|o| o.selected).count(), 1);
        }
        other => panic!("unexpected call: {:?}", other),
    }
}

#[tokio::test]
async fn processor_status_code_is_relayed() {
    let stub = Arc::new(StubProcessor::with_status(200));
    let server = server_with(stub);

    let response = server.post("/api/orders/ORDER-7/capture").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(
        response.json::<Value>(),
        json!({ "id": "ORDER-7", "status": "COMPLETED" })
    );
}

#[tokio::test]
async fn no_content_is_relayed_without_body() {
    let stub = Arc::new(StubProcessor::with_status(204));
    let server = server_with(stub.clone());

    let response = server.post("/api/orders/ORDER-9/authorize").await;
    assert_eq!(response.status_code(), StatusCode::NO_CONTENT);
    assert!(response.text().is_empty());
    assert_eq!(stub.calls(), vec![Call::AuthorizeOrder("ORDER-9".into())]);
}

#[tokio::test]
async fn path_identifiers_are_passed_unchanged() {
    let stub = Arc::new(StubProcessor::default());
    let server = server_with(stub.clone());

    server.post("/api/orders/5O190127TN364715T/capture").await;
    server.post("/api/orders/8MC585209K746392H/authorize").await;
    let response = server.post("/api/orders/0VF52814937998046/captureAuthorize").await;

    assert_eq!(response.status_code(), StatusCode::CREATED);
    assert_eq!(
        response.json::<Value>(),
        json!({ "id": "CAPTURE-1", "authorization_id": "0VF52814937998046" })
    );

    assert_eq!(
        stub.calls(),
        vec![
            Call::CaptureOrder("5O190127TN364715T".into()),
            Call::AuthorizeOrder("8MC585209K746392H".into()),
            Call::CaptureAuthorization("0VF52814937998046".into()),
        ]
    );
}

#[tokio::test]
async fn identifiers_are_not_trimmed() {
    let stub = Arc::new(StubProcessor::default());
    let server = server_with(stub.clone());

    server.post("/api/orders/%20ORDER-1%20/capture").await;
    assert_eq!(stub.calls(), vec![Call::CaptureOrder(" ORDER-1 ".into())]);
}

#[tokio::test]
async fn refund_invokes_processor_once_with_capture_id() {
    let stub = Arc::new(StubProcessor::default());
    let server = server_with(stub.clone());

    let response = server
        .post("/api/payments/refund")
        .json(&json!({ "capturedPaymentId": "abc123" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::CREATED);
    assert_eq!(
        response.json::<Value>(),
        json!({ "id": "REFUND-abc123", "capture_id": "abc123" })
    );
    assert_eq!(stub.calls(), vec![Call::RefundCapture("abc123".into())]);
}

// =============================================================================
// Upstream failures
// =============================================================================

#[tokio::test]
async fn upstream_errors_become_fixed_500s() {
    let stub = Arc::new(StubProcessor::failing());
    let server = server_with(stub.clone());

    let cases = [
        (server.post("/api/orders").json(&json!({ "cart": [] })).await, "Failed to create order."),
        (server.post("/api/orders/O-1/capture").await, "Failed to capture order."),
        (server.post("/api/orders/O-1/authorize").await, "Failed to authorize order."),
        (
            server.post("/api/orders/A-1/captureAuthorize").await,
            "Failed to capture authorization.",
        ),
        (
            server
                .post("/api/payments/refund")
                .json(&json!({ "capturedPaymentId": "C-1" }))
                .await,
            "Failed refund capture.",
        ),
    ];

    for (response, message) in cases {
        assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.json::<Value>(), json!({ "error": message }));
        assert!(!response.text().contains("INSTRUMENT_DECLINED"));
    }

    assert_eq!(stub.calls().len(), 5);
}

#[tokio::test]
async fn slow_processor_times_out_as_500() {
    let stub = Arc::new(StubProcessor::slow(Duration::from_secs(5)));
    let app = create_router(state_with(stub, Duration::from_millis(50)));
    let server = TestServer::new(app).unwrap();

    let response = server.post("/api/orders/O-1/capture").await;
    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        response.json::<Value>(),
        json!({ "error": "Failed to capture order." })
    );
}

#[tokio::test]
async fn out_of_range_status_becomes_500() {
    let stub = Arc::new(StubProcessor::with_status(42));
    let server = server_with(stub);

    let response = server
        .post("/api/payments/refund")
        .json(&json!({ "capturedPaymentId": "C-1" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        response.json::<Value>(),
        json!({ "error": "Failed refund capture." })
    );
}

// =============================================================================
// Client input
// =============================================================================

#[tokio::test]
async fn refund_without_capture_id_is_400() {
    let stub = Arc::new(StubProcessor::default());
    let server = server_with(stub.clone());

    let response = server.post("/api/payments/refund").json(&json!({})).await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body = response.json::<Value>();
    assert!(body["error"].as_str().unwrap().contains("capturedPaymentId"));

    let response = server
        .post("/api/payments/refund")
        .json(&json!({ "capturedPaymentId": "" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    assert!(stub.calls().is_empty());
}

#[tokio::test]
async fn create_order_without_cart_is_400() {
    let stub = Arc::new(StubProcessor::default());
    let server = server_with(stub.clone());

    let response = server.post("/api/orders").json(&json!({ "basket": [] })).await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body = response.json::<Value>();
    assert!(body["error"].as_str().unwrap().contains("cart"));

    assert!(stub.calls().is_empty());
}

#[tokio::test]
async fn malformed_json_is_400() {
    let stub = Arc::new(StubProcessor::default());
    let server = server_with(stub.clone());

    let response = server
        .post("/api/payments/refund")
        .bytes("{\"capturedPaymentId\": ".into())
        .content_type("application/json")
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert!(response.json::<Value>()["error"].is_string());

    assert!(stub.calls().is_empty());
}

// =============================================================================
// Misc routes
// =============================================================================

#[tokio::test]
async fn root_and_health() {
    let server = server_with(Arc::new(StubProcessor::default()));

    let response = server.get("/").await;
    assert_eq!(response.json::<Value>(), json!({ "message": "Server is running" }));

    let response = server.get("/health").await;
    let body = response.json::<Value>();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["provider"], "stub");
}

// =============================================================================
// Concurrency
// =============================================================================

async fn send(app: axum::Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn json_post(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_requests_get_their_own_responses() {
    const ORDERS: usize = 16;
    const REFUNDS: usize = 16;

    let stub = Arc::new(StubProcessor::slow(Duration::from_millis(10)));
    let app = create_router(state_with(stub.clone(), Duration::from_secs(5)));

    let mut orders = Vec::new();
    for _ in 0..ORDERS {
        let app = app.clone();
        orders.push(tokio::spawn(async move {
            send(app, json_post("/api/orders", json!({ "cart": [] }))).await
        }));
    }

    let mut refunds = Vec::new();
    for i in 0..REFUNDS {
        let app = app.clone();
        let capture_id = format!("CAPTURE-{}", i);
        refunds.push(tokio::spawn(async move {
            let result = send(
                app,
                json_post("/api/payments/refund", json!({ "capturedPaymentId": capture_id })),
            )
            .await;
            (capture_id, result)
        }));
    }

    let mut order_ids = std::collections::HashSet::new();
    for handle in orders {
        let (status, body) = handle.await.unwrap();
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["status"], "CREATED");
        assert!(order_ids.insert(body["id"].as_str().unwrap().to_string()));
    }
    assert_eq!(order_ids.len(), ORDERS);

    for handle in refunds {
        let (capture_id, (status, body)) = handle.await.unwrap();
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["capture_id"], capture_id.as_str());
        assert_eq!(body["id"], format!("REFUND-{}", capture_id));
    }

    let calls = stub.calls();
    assert_eq!(calls.len(), ORDERS + REFUNDS);
    let refund_calls = calls
        .iter()
        .filter(|c| matches!(c, Call::RefundCapture(_)))
        .count();
    assert_eq!(refund_calls, REFUNDS);
}
