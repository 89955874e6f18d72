// ── Runtime connection configuration ──
//
// Describes *how* to reach a management server. Carries credential data and
// connection tuning but never touches disk; the CLI constructs a
// `ConsoleConfig` from its profile layer and hands it in.

use std::time::Duration;

use secrecy::SecretString;
use url::Url;

use genie_api::transport::TransportConfig;
use genie_api::{Credentials, GenieClient};

use crate::error::CoreError;

/// Configuration for connecting to a single management server.
#[derive(Debug, Clone)]
pub struct ConsoleConfig {
    /// API base URL (e.g., `http://acs.example.net:7557`).
    pub endpoint: Url,
    /// Basic-auth username.
    pub username: String,
    /// Basic-auth password.
    pub password: SecretString,
    /// Request timeout.
    pub timeout: Duration,
    /// Accept self-signed TLS certificates.
    pub accept_invalid_certs: bool,
}

impl ConsoleConfig {
    /// Build an API client from this configuration.
    pub fn build_client(&self) -> Result<GenieClient, CoreError> {
        let transport = TransportConfig {
            timeout: self.timeout,
            accept_invalid_certs: self.accept_invalid_certs,
        };
        let credentials = Credentials {
            username: self.username.clone(),
            password: self.password.clone(),
        };
        GenieClient::new(self.endpoint.clone(), credentials, &transport).map_err(CoreError::from)
    }
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://127.0.0.1:7557"
                .parse()
                .expect("default endpoint URL is valid"),
            username: "admin".into(),
            password: SecretString::from(String::new()),
            timeout: Duration::from_secs(30),
            accept_invalid_certs: false,
        }
    }
}
