// Web API HTTP client
//
// Wraps `reqwest::Client` with encoder-specific URL construction,
// cache-busting query parameters and explicit session cookie handling.
// Endpoint groups (auth, system, encoder) are implemented as inherent
// methods in separate files to keep this module focused on transport
// mechanics.

use chrono::Utc;
use reqwest::header::COOKIE;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::auth::SessionToken;
use crate::error::Error;
use crate::transport::{self, TransportConfig, check_status, decode, parse_json};

/// Raw HTTP client for the encoder's web API.
///
/// Stateless with respect to the session: every authenticated call takes
/// the [`SessionToken`] it should present, so the caller decides which
/// session is current. Cheap to clone.
#[derive(Debug, Clone)]
pub struct WebClient {
    http: reqwest::Client,
    base_url: Url,
}

impl WebClient {
    /// Create a new web client for `host` (IP, hostname, or full URL).
    pub fn new(host: &str, transport: &TransportConfig) -> Result<Self, Error> {
        Ok(Self {
            http: transport.build_client()?,
            base_url: transport::base_url(host)?,
        })
    }

    /// Create a web client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self { http, base_url }
    }

    /// The underlying HTTP client (for auth flows that need direct access).
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// The encoder base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build `{base}/{segments...}`, percent-encoding every segment.
    pub(crate) fn endpoint(&self, segments: &[&str]) -> Result<Url, Error> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| Error::UnsupportedOperation("base URL cannot carry a path"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Like [`endpoint`](Self::endpoint) with a `_=<epoch millis>` query
    /// parameter so intermediate caches never serve stale state.
    pub(crate) fn fresh_endpoint(&self, segments: &[&str]) -> Result<Url, Error> {
        let mut url = self.endpoint(segments)?;
        url.query_pairs_mut()
            .append_pair("_", &Utc::now().timestamp_millis().to_string());
        Ok(url)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send an authenticated GET and return the raw JSON body.
    pub(crate) async fn get_value(
        &self,
        session: &SessionToken,
        url: Url,
    ) -> Result<serde_json::Value, Error> {
        debug!("GET {}", url.path());

        let resp = self
            .http
            .get(url)
            .header(COOKIE, session.cookie_header())
            .send()
            .await
            .map_err(Error::Transport)?;

        parse_json(resp).await
    }

    /// Send an authenticated GET and decode the body as `T`.
    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        session: &SessionToken,
        url: Url,
    ) -> Result<T, Error> {
        let value = self.get_value(session, url).await?;
        decode(value)
    }

    /// Send an authenticated, body-less POST. The response body is
    /// discarded; only the status is checked.
    pub(crate) async fn post_empty(&self, session: &SessionToken, url: Url) -> Result<(), Error> {
        debug!("POST {}", url.path());

        let resp = self
            .http
            .post(url)
            .header(COOKIE, session.cookie_header())
            .send()
            .await
            .map_err(Error::Transport)?;

        check_status(resp).await.map(drop)
    }
}
