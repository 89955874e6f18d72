// ── Core error types ──
//
// User-facing errors from genie-core. Consumers never see HTTP status codes
// or JSON parse failures directly; the `From<genie_api::Error>` impl
// translates transport-layer errors into domain-appropriate variants.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot reach the management server: {reason}")]
    ConnectionFailed { reason: String },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Request timed out: {message}")]
    Timeout { message: String },

    // ── Data errors ──────────────────────────────────────────────────
    #[error("Device not found: {identifier}")]
    DeviceNotFound { identifier: String },

    #[error("Not found: {resource}")]
    NotFound { resource: String },

    // ── Operation errors ─────────────────────────────────────────────
    #[error("Validation failed: {message}")]
    ValidationFailed { message: String },

    /// Server-side failure or an unclassified API response.
    #[error("API error: {message}")]
    Api {
        message: String,
        status: Option<u16>,
    },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<genie_api::Error> for CoreError {
    fn from(err: genie_api::Error) -> Self {
        match err {
            genie_api::Error::Validation { message } => CoreError::ValidationFailed { message },
            genie_api::Error::Auth { message } => CoreError::AuthenticationFailed { message },
            genie_api::Error::NotFound { resource } => match resource.strip_prefix("device ") {
                Some(id) => CoreError::DeviceNotFound {
                    identifier: id.to_owned(),
                },
                None => CoreError::NotFound { resource },
            },
            genie_api::Error::Timeout { message } => CoreError::Timeout { message },
            genie_api::Error::Server { status, message } => CoreError::Api {
                message,
                status: Some(status),
            },
            genie_api::Error::Unexpected { status } => CoreError::Api {
                message: format!("unexpected response status {status}"),
                status: Some(status),
            },
            genie_api::Error::Connectivity(e) => CoreError::ConnectionFailed {
                reason: e.to_string(),
            },
            genie_api::Error::ClientBuild(e) => CoreError::Config {
                message: format!("failed to build HTTP client: {e}"),
            },
            genie_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("invalid URL: {e}"),
            },
            genie_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("deserialization error: {message}"))
            }
        }
    }
}
