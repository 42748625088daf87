//! # Application State
//!
//! Shared state for the Axum application.
//! Holds the payment processor, the order template and configuration.

use checkout_core::{GatewayError, OrderTemplate, SharedPaymentProcessor};
use checkout_paypal::{PayPalClient, PayPalConfig};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = GatewayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(GatewayError::Configuration(format!(
                "LOG_FORMAT must be pretty or json, got {}",
                other
            ))),
        }
    }
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Upper bound for one payment processor call
    pub upstream_timeout: Duration,
    /// Optional TOML file with the order template
    pub order_template_path: Option<PathBuf>,
    /// Log output format
    pub log_format: LogFormat,
}

impl AppConfig {
    /// Load from environment variables
    pub fn from_env() -> Result<Self, GatewayError> {
        dotenvy::dotenv().ok();

        Self::from_lookup(|key: &str| std::env::var(key).ok())
    }

    /// Load through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, GatewayError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let port = match get("PORT") {
            Some(p) => p.trim().parse().map_err(|_| {
                GatewayError::Configuration(format!("PORT must be a port number, got {}", p))
            })?,
            None => defaults.port,
        };

        let upstream_timeout = match get("UPSTREAM_TIMEOUT_SECS") {
            Some(s) => match s.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    return Err(GatewayError::Configuration(format!(
                        "UPSTREAM_TIMEOUT_SECS must be a positive integer, got {}",
                        s
                    )))
                }
            },
            None => defaults.upstream_timeout,
        };

        let log_format = match get("LOG_FORMAT") {
            Some(f) => f.parse()?,
            None => defaults.log_format,
        };

        Ok(Self {
            host: get("HOST").unwrap_or(defaults.host),
            port,
            upstream_timeout,
            order_template_path: get("ORDER_TEMPLATE_PATH").map(PathBuf::from),
            log_format,
        })
    }

    /// Address the listener binds to
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            upstream_timeout: Duration::from_secs(30),
            order_template_path: None,
            log_format: LogFormat::Pretty,
        }
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Payment processor all operations are relayed to
    pub processor: SharedPaymentProcessor,
    /// Amount and shipping options of created orders
    pub order_template: Arc<OrderTemplate>,
    /// Application config
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Assemble state from already-built parts
    pub fn new(
        config: AppConfig,
        processor: SharedPaymentProcessor,
        order_template: OrderTemplate,
    ) -> Self {
        Self {
            processor,
            order_template: Arc::new(order_template),
            config: Arc::new(config),
        }
    }

    /// Build state backed by the PayPal REST client
    pub fn with_paypal(config: AppConfig, paypal: PayPalConfig) -> anyhow::Result<Self> {
        let order_template = load_order_template(config.order_template_path.as_deref())?;

        let client = PayPalClient::new(paypal.with_timeout(config.upstream_timeout))?;
        tracing::info!(
            "PayPal client ready: environment={}, api={}",
            client.config().environment,
            client.config().api_base_url
        );

        Ok(Self::new(config, Arc::new(client), order_template))
    }

    /// Build state from a variable lookup; fails when credentials are missing
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = AppConfig::from_lookup(&lookup)?;
        let paypal = PayPalConfig::from_lookup(&lookup)?;
        Self::with_paypal(config, paypal)
    }

    /// Upper bound for one payment processor call
    pub fn upstream_timeout(&self) -> Duration {
        self.config.upstream_timeout
    }
}

/// Load the order template from a TOML file, or use the built-in one
fn load_order_template(path: Option<&Path>) -> Result<OrderTemplate, GatewayError> {
    let Some(path) = path else {
        tracing::info!("No ORDER_TEMPLATE_PATH set, using built-in order template");
        return Ok(OrderTemplate::default());
    };

    let content = std::fs::read_to_string(path).map_err(|e| {
        GatewayError::Configuration(format!("Failed to read {}: {}", path.display(), e))
    })?;
    let template = OrderTemplate::from_toml(&content)?;

    tracing::info!(
        "Loaded order template from {}: {} {}, {} shipping options",
        path.display(),
        template.value,
        template.currency_code,
        template.shipping_options.len()
    );

    Ok(template)
}
