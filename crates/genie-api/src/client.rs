// GenieACS northbound API HTTP client
//
// Wraps `reqwest::Client` with query/projection URL construction, basic-auth
// injection, and per-request correlation logging. Endpoint groups (devices,
// tasks, presets) are implemented as inherent methods in separate files to
// keep this module focused on transport mechanics.

use std::time::Instant;

use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;
use uuid::Uuid;

use crate::error::Error;
use crate::transport::TransportConfig;

/// Fixed basic-auth credentials attached to every request.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: SecretString,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: SecretString::from(password.into()),
        }
    }
}

/// Raw HTTP client for the GenieACS northbound API.
///
/// All lookups are collection-level: the API has no single-item device
/// endpoint, so "get by id" is a filtered list (see
/// [`get_device`](GenieClient::get_device)). The client performs no retries;
/// callers own that policy.
pub struct GenieClient {
    http: reqwest::Client,
    base_url: Url,
    credentials: Credentials,
}

impl GenieClient {
    /// Create a new client from a base URL and a `TransportConfig`.
    ///
    /// `base_url` should be the API root (e.g. `http://acs.example.net:7557`).
    pub fn new(
        base_url: Url,
        credentials: Credentials,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self {
            http,
            base_url,
            credentials,
        })
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url, credentials: Credentials) -> Self {
        Self {
            http,
            base_url,
            credentials,
        }
    }

    /// The API base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build a full URL for a collection path, optionally adding the JSON
    /// `query` filter and CSV `projection` parameters the API understands.
    pub(crate) fn collection_url(
        &self,
        path: &str,
        query: Option<&serde_json::Value>,
        projection: Option<&str>,
    ) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let mut url = Url::parse(&format!("{base}/{path}"))?;

        {
            let mut pairs = url.query_pairs_mut();
            if let Some(filter) = query {
                pairs.append_pair("query", &filter.to_string());
            }
            if let Some(fields) = projection {
                pairs.append_pair("projection", fields);
            }
        }

        Ok(url)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send a GET request and decode the JSON response.
    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
        resource: &str,
    ) -> Result<T, Error> {
        let request = self.http.get(url.clone());
        let response = self.send(request, "GET", &url, resource).await?;
        Self::decode(response).await
    }

    /// Send a POST request with a JSON body and decode the JSON response.
    pub(crate) async fn post_json<T: DeserializeOwned>(
        &self,
        url: Url,
        body: &impl Serialize,
        resource: &str,
    ) -> Result<T, Error> {
        let request = self.http.post(url.clone()).json(body);
        let response = self.send(request, "POST", &url, resource).await?;
        Self::decode(response).await
    }

    /// Send a DELETE request, discarding the response body.
    pub(crate) async fn delete(&self, url: Url, resource: &str) -> Result<(), Error> {
        let request = self.http.delete(url.clone());
        self.send(request, "DELETE", &url, resource).await?;
        Ok(())
    }

    /// Attach credentials, dispatch, and classify the outcome.
    ///
    /// Each request is tagged with a correlation id and logged at dispatch
    /// and completion with its duration, so slow or failing calls can be
    /// tied back to a single exchange.
    async fn send(
        &self,
        request: reqwest::RequestBuilder,
        method: &'static str,
        url: &Url,
        resource: &str,
    ) -> Result<reqwest::Response, Error> {
        let request_id = Uuid::new_v4();
        let started = Instant::now();
        debug!(%request_id, method, %url, "dispatching request");

        let result = request
            .basic_auth(
                &self.credentials.username,
                Some(self.credentials.password.expose_secret()),
            )
            .send()
            .await;

        let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

        let response = match result {
            Ok(response) => response,
            Err(err) => {
                debug!(%request_id, elapsed_ms, error = %err, "request failed");
                return Err(Error::from_transport(err));
            }
        };

        let status = response.status();
        debug!(%request_id, status = status.as_u16(), elapsed_ms, "response received");

        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(Error::from_status(status, resource, body))
    }

    /// Decode a successful response body as JSON, keeping the raw text for
    /// diagnostics if deserialization fails. An empty body decodes as JSON
    /// `null`, which suits endpoints that acknowledge without a payload.
    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, Error> {
        let body = response.text().await.map_err(Error::from_transport)?;

        let text = if body.trim().is_empty() {
            "null"
        } else {
            body.as_str()
        };

        serde_json::from_str(text).map_err(|e| Error::Deserialization {
            message: e.to_string(),
            body,
        })
    }
}
