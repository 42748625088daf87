//! # Gateway Error Types
//!
//! Typed error handling for the checkout gateway.
//! Handlers return `Result<T, GatewayError>`, payment processor
//! adapters return `Result<T, UpstreamError>`.

use thiserror::Error;

/// Failure reported by (or while talking to) the payment processor.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// Network/HTTP error communicating with the processor
    #[error("Network error: {0}")]
    Network(String),

    /// Processor answered with a non-success status
    #[error("Processor API error [{status}]: {message}")]
    Api { status: u16, message: String },

    /// Could not obtain an access token
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Processor answered with a body we could not read as JSON
    #[error("Invalid processor response: {0}")]
    InvalidResponse(String),

    /// Identifier that cannot be sent as a URL path segment
    #[error("Invalid identifier: {0:?}")]
    InvalidIdentifier(String),

    /// Outbound call did not finish in time
    #[error("Processor call timed out after {secs}s")]
    Timeout { secs: u64 },
}

/// Core error type for gateway operations
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Malformed or missing field in the inbound request
    #[error("Invalid request field `{field}`: {message}")]
    ClientInput { field: String, message: String },

    /// Any failure of the external payment processor call
    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    /// Configuration errors (missing credentials, invalid template)
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl GatewayError {
    /// Missing required field
    pub fn missing_field(field: impl Into<String>) -> Self {
        let field = field.into();
        GatewayError::ClientInput {
            message: format!("missing required field `{}`", field),
            field,
        }
    }

    /// Returns the HTTP status code appropriate for this error
    pub fn status_code(&self) -> u16 {
        match self {
            GatewayError::ClientInput { .. } => 400,
            GatewayError::Upstream(_) => 500,
            GatewayError::Configuration(_) => 500,
        }
    }
}

/// Result type alias for processor calls
pub type UpstreamResult<T> = Result<T, UpstreamError>;

/// Result type alias for gateway operations
pub type GatewayResult<T> = Result<T, GatewayError>;
