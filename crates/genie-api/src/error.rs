use thiserror::Error;

/// Top-level error type for the `genie-api` crate.
///
/// Every failure is classified into one user-meaningful bucket keyed by the
/// HTTP status class (or the absence of a response). `genie-core` maps these
/// into domain diagnostics; nothing above this crate sees raw `reqwest`
/// errors.
#[derive(Debug, Error)]
pub enum Error {
    // ── Request classification ──────────────────────────────────────
    /// The server rejected the request body or parameters (HTTP 400).
    #[error("Invalid request: {message}")]
    Validation { message: String },

    /// Credentials rejected or insufficient (HTTP 401/403).
    #[error("Authentication failed: {message}")]
    Auth { message: String },

    /// The addressed resource does not exist (HTTP 404, or a filtered
    /// lookup that matched nothing).
    #[error("Resource not found: {resource}")]
    NotFound { resource: String },

    /// The request timed out (HTTP 408/504, or the client-side deadline).
    #[error("Request timed out: {message}")]
    Timeout { message: String },

    /// The server failed internally (HTTP 5xx).
    #[error("Server error (HTTP {status}): {message}")]
    Server { status: u16, message: String },

    /// A status outside the classified set.
    #[error("Server returned unexpected status: HTTP {status}")]
    Unexpected { status: u16 },

    // ── Transport ───────────────────────────────────────────────────
    /// No response was received (connection refused, DNS failure, reset).
    #[error("No response from server; check your connection")]
    Connectivity(#[source] reqwest::Error),

    /// The HTTP client could not be constructed from the transport config.
    #[error("Failed to build HTTP client")]
    ClientBuild(#[source] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Classify a non-2xx HTTP response into the error taxonomy.
    ///
    /// `resource` names what was being addressed (used for 404s); `body` is
    /// the raw response body, surfaced for 400s and 5xx where the server
    /// usually explains itself.
    pub(crate) fn from_status(status: reqwest::StatusCode, resource: &str, body: String) -> Self {
        let detail = |fallback: &str| {
            let trimmed = body.trim();
            if trimmed.is_empty() {
                fallback.to_owned()
            } else {
                trimmed.to_owned()
            }
        };

        match status.as_u16() {
            400 => Self::Validation {
                message: detail("the server rejected the request"),
            },
            401 => Self::Auth {
                message: "unauthorized; check the configured credentials".into(),
            },
            403 => Self::Auth {
                message: "access denied; the account lacks permission for this action".into(),
            },
            404 => Self::NotFound {
                resource: resource.to_owned(),
            },
            408 | 504 => Self::Timeout {
                message: format!("the server reported HTTP {}", status.as_u16()),
            },
            500..=599 => Self::Server {
                status: status.as_u16(),
                message: detail("try again later"),
            },
            other => Self::Unexpected { status: other },
        }
    }

    /// Classify a `reqwest` transport failure (no usable response).
    pub(crate) fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout {
                message: "no response within the configured timeout".into(),
            }
        } else {
            Self::Connectivity(err)
        }
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns `true` if re-authenticating might resolve this error.
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Auth { .. })
    }

    /// Returns `true` if this is a transient error worth retrying.
    ///
    /// The client itself never retries; callers decide.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::Timeout { .. } | Self::Connectivity(_) | Self::Server { .. }
        )
    }
}
