//! # PayPal REST Client
//!
//! `PaymentProcessor` implementation on top of the PayPal Orders v2 and
//! Payments v2 REST APIs. Holds a client-credentials access token that is
//! reused until shortly before it expires.

use crate::config::PayPalConfig;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use checkout_core::{
    GatewayError, OrderRequest, PaymentProcessor, ProcessorResponse, UpstreamError,
    UpstreamResult,
};
use reqwest::{header, Client, Url};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, error, info, instrument};

/// Seconds before expiry at which a cached token is no longer used
const TOKEN_EXPIRY_MARGIN_SECS: i64 = 60;

/// PayPal payment processor
pub struct PayPalClient {
    config: PayPalConfig,
    client: Client,
    token: RwLock<Option<AccessToken>>,
}

#[derive(Debug, Clone)]
struct AccessToken {
    value: String,
    expires_at: DateTime<Utc>,
}

impl AccessToken {
    fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        now + Duration::seconds(TOKEN_EXPIRY_MARGIN_SECS) < self.expires_at
    }
}

impl PayPalClient {
    /// Create a new PayPal client
    pub fn new(config: PayPalConfig) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| GatewayError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            config,
            client,
            token: RwLock::new(None),
        })
    }

    /// Create from environment variables
    pub fn from_env() -> Result<Self, GatewayError> {
        let config = PayPalConfig::from_env()?;
        Self::new(config)
    }

    pub fn config(&self) -> &PayPalConfig {
        &self.config
    }

    /// Build an API URL, adding each segment escaped
    fn endpoint(&self, segments: &[&str]) -> UpstreamResult<Url> {
        // The URL parser drops dot segments, so "." or ".." would address another endpoint
        if let Some(bad) = segments
            .iter()
            .find(|s| s.is_empty() || **s == "." || **s == "..")
        {
            return Err(UpstreamError::InvalidIdentifier(bad.to_string()));
        }

        let mut url = Url::parse(&self.config.api_base_url).map_err(|e| {
            UpstreamError::Network(format!("Invalid API base URL {}: {}", self.config.api_base_url, e))
        })?;

        url.path_segments_mut()
            .map_err(|_| {
                UpstreamError::Network(format!(
                    "API base URL cannot be a base: {}",
                    self.config.api_base_url
                ))
            })?
            .pop_if_empty()
            .extend(segments);

        Ok(url)
    }

    /// Get a bearer token, fetching a new one when the cached one is stale
    async fn access_token(&self) -> UpstreamResult<String> {
        if let Some(token) = self.token.read().await.as_ref() {
            if token.is_fresh(Utc::now()) {
                return Ok(token.value.clone());
            }
        }

        let mut guard = self.token.write().await;

        // Another request may have refreshed while we waited for the lock
        if let Some(token) = guard.as_ref() {
            if token.is_fresh(Utc::now()) {
                return Ok(token.value.clone());
            }
        }

        let token = self.fetch_token().await?;
        let value = token.value.clone();
        *guard = Some(token);
        Ok(value)
    }

    #[instrument(skip(self))]
    async fn fetch_token(&self) -> UpstreamResult<AccessToken> {
        let url = self.endpoint(&["v1", "oauth2", "token"])?;

        let response = self
            .client
            .post(url)
            .basic_auth(&self.config.client_id, Some(&self.config.client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await
            .map_err(|e| UpstreamError::Authentication(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| UpstreamError::Authentication(e.to_string()))?;

        if !status.is_success() {
            error!("PayPal token request failed: status={}, body={}", status, body);
            return Err(UpstreamError::Authentication(format!("HTTP {}", status)));
        }

        let token: TokenResponse = serde_json::from_str(&body).map_err(|e| {
            UpstreamError::Authentication(format!("Failed to parse token response: {}", e))
        })?;

        info!("Obtained PayPal access token, expires_in={}s", token.expires_in);

        Ok(AccessToken {
            value: token.access_token,
            expires_at: Utc::now() + Duration::seconds(token.expires_in),
        })
    }

    /// POST to an API endpoint and relay the answer
    async fn post<T: Serialize + ?Sized>(
        &self,
        segments: &[&str],
        payload: Option<&T>,
    ) -> UpstreamResult<ProcessorResponse> {
        let url = self.endpoint(segments)?;
        let token = self.access_token().await?;

        let mut request = self
            .client
            .post(url.clone())
            .bearer_auth(token)
            .header(header::CONTENT_TYPE, "application/json");

        if let Some(payload) = payload {
            let body = serde_json::to_string(payload)
                .map_err(|e| UpstreamError::InvalidResponse(format!("Failed to encode request: {}", e)))?;
            debug!("PayPal request: POST {} body={}", url.path(), body);
            request = request.body(body);
        } else {
            debug!("PayPal request: POST {}", url.path());
        }

        let response = request
            .send()
            .await
            .map_err(|e| UpstreamError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| UpstreamError::Network(e.to_string()))?;

        debug!("PayPal response: status={}, body={}", status, body);

        if !status.is_success() {
            error!("PayPal API error: status={}, body={}", status, body);

            let message = match serde_json::from_str::<PayPalErrorResponse>(&body) {
                Ok(err) => err.summary(),
                Err(_) => format!("HTTP {}: {}", status, body),
            };

            return Err(UpstreamError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let json = if body.trim().is_empty() {
            serde_json::Value::Object(serde_json::Map::new())
        } else {
            serde_json::from_str(&body).map_err(|e| {
                UpstreamError::InvalidResponse(format!("Failed to parse PayPal response: {}", e))
            })?
        };

        Ok(ProcessorResponse::new(status.as_u16(), json))
    }
}

#[async_trait]
impl PaymentProcessor for PayPalClient {
    #[instrument(skip(self, order), fields(units = order.purchase_units.len()))]
    async fn create_order(&self, order: &OrderRequest) -> UpstreamResult<ProcessorResponse> {
        self.post(&["v2", "checkout", "orders"], Some(order)).await
    }

    #[instrument(skip(self))]
    async fn capture_order(&self, order_id: &str) -> UpstreamResult<ProcessorResponse> {
        self.post::<()>(&["v2", "checkout", "orders", order_id, "capture"], None)
            .await
    }

    #[instrument(skip(self))]
    async fn authorize_order(&self, order_id: &str) -> UpstreamResult<ProcessorResponse> {
        self.post::<()>(&["v2", "checkout", "orders", order_id, "authorize"], None)
            .await
    }

    #[instrument(skip(self))]
    async fn capture_authorization(
        &self,
        authorization_id: &str,
    ) -> UpstreamResult<ProcessorResponse> {
        self.post::<()>(
            &["v2", "payments", "authorizations", authorization_id, "capture"],
            None,
        )
        .await
    }

    #[instrument(skip(self))]
    async fn refund_capture(&self, capture_id: &str) -> UpstreamResult<ProcessorResponse> {
        self.post::<()>(&["v2", "payments", "captures", capture_id, "refund"], None)
            .await
    }

    fn provider_name(&self) -> &'static str {
        "paypal"
    }
}

// =============================================================================
// PayPal API Types
// =============================================================================

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

#[derive(Debug, Deserialize)]
struct PayPalErrorResponse {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    debug_id: Option<String>,
}

impl PayPalErrorResponse {
    fn summary(&self) -> String {
        format!(
            "{}: {} (debug_id={})",
            self.name.as_deref().unwrap_or("UNKNOWN_ERROR"),
            self.message.as_deref().unwrap_or("no message"),
            self.debug_id.as_deref().unwrap_or("-")
        )
    }
}
