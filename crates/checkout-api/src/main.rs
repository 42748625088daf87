//! # Checkout Gateway
//!
//! Relays browser checkout requests to PayPal.
//!
//! ## Usage
//!
//! ```bash
//! # Set environment variables
//! export PAYPAL_CLIENT_ID=...
//! export PAYPAL_CLIENT_SECRET=...
//! export PAYPAL_ENVIRONMENT=sandbox
//!
//! # Run the server
//! checkout-gateway
//! ```

use checkout_api::{routes, AppConfig, AppState, LogFormat};
use checkout_paypal::PayPalConfig;
use tracing::{error, info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // An invalid LOG_FORMAT is reported by main's error return, logging is not up yet
    let config = AppConfig::from_env()?;
    init_logging(config.log_format);

    // Missing credentials stop the process here, before binding
    let state = PayPalConfig::from_env()
        .map_err(anyhow::Error::from)
        .and_then(|paypal| AppState::with_paypal(config, paypal))
        .map_err(|e| {
            error!("Startup failed: {:#}", e);
            e
        })?;

    let addr = state.config.bind_addr();

    info!("Payment provider: {}", state.processor.provider_name());
    info!(
        "Upstream timeout: {}s",
        state.upstream_timeout().as_secs()
    );

    let app = routes::create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Checkout gateway listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}

fn init_logging(format: LogFormat) {
    let filter = EnvFilter::builder()
        .with_default_directive(Level::INFO.into())
        .from_env_lossy();

    match format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(filter)
            .init(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(fmt::layer())
            .with(filter)
            .init(),
    }
}
