//! # PayPal Configuration
//!
//! Configuration management for the PayPal integration.
//! Credentials are loaded from environment variables.

use checkout_core::GatewayError;
use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

const SANDBOX_API_BASE_URL: &str = "https://api-m.sandbox.paypal.com";
const LIVE_API_BASE_URL: &str = "https://api-m.paypal.com";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Target PayPal environment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayPalEnvironment {
    Sandbox,
    Live,
}

impl PayPalEnvironment {
    /// REST API base URL for this environment
    pub fn api_base_url(&self) -> &'static str {
        match self {
            PayPalEnvironment::Sandbox => SANDBOX_API_BASE_URL,
            PayPalEnvironment::Live => LIVE_API_BASE_URL,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PayPalEnvironment::Sandbox => "sandbox",
            PayPalEnvironment::Live => "live",
        }
    }
}

impl Default for PayPalEnvironment {
    fn default() -> Self {
        PayPalEnvironment::Sandbox
    }
}

impl fmt::Display for PayPalEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PayPalEnvironment {
    type Err = GatewayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sandbox" => Ok(PayPalEnvironment::Sandbox),
            "live" | "production" => Ok(PayPalEnvironment::Live),
            other => Err(GatewayError::Configuration(format!(
                "PAYPAL_ENVIRONMENT must be sandbox or live, got {}",
                other
            ))),
        }
    }
}

/// PayPal API configuration
#[derive(Clone)]
pub struct PayPalConfig {
    /// REST app client id
    pub client_id: String,

    /// REST app client secret
    pub client_secret: String,

    /// Sandbox or live
    pub environment: PayPalEnvironment,

    /// API base URL (for testing/mocking)
    pub api_base_url: String,

    /// Per-request timeout of the HTTP client
    pub timeout: Duration,
}

impl PayPalConfig {
    /// Load configuration from environment variables.
    ///
    /// Required env vars:
    /// - `PAYPAL_CLIENT_ID`
    /// - `PAYPAL_CLIENT_SECRET`
    ///
    /// Optional: `PAYPAL_ENVIRONMENT` (sandbox | live), `PAYPAL_API_BASE_URL`.
    pub fn from_env() -> Result<Self, GatewayError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, GatewayError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| GatewayError::Configuration(format!("{} not set", key)))
        };

        let client_id = required("PAYPAL_CLIENT_ID")?;
        let client_secret = required("PAYPAL_CLIENT_SECRET")?;

        let environment = match lookup("PAYPAL_ENVIRONMENT") {
            Some(value) if !value.trim().is_empty() => value.parse()?,
            _ => PayPalEnvironment::default(),
        };

        let mut config = Self::new(client_id, client_secret, environment);

        if let Some(url) = lookup("PAYPAL_API_BASE_URL").filter(|v| !v.trim().is_empty()) {
            config = config.with_api_base_url(url);
        }

        Ok(config)
    }

    /// Create config with explicit values
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        environment: PayPalEnvironment,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            environment,
            api_base_url: environment.api_base_url().to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Check if targeting the live environment
    pub fn is_live(&self) -> bool {
        self.environment == PayPalEnvironment::Live
    }

    /// Builder: set custom API base URL (for testing)
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    /// Builder: set HTTP client timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl fmt::Debug for PayPalConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PayPalConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("environment", &self.environment)
            .field("api_base_url", &self.api_base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}
