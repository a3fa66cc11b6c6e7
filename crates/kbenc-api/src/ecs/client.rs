// ECS API HTTP client
//
// Same shape as the web client, but the session travels in the
// `Authorization` header instead of a cookie and every document path
// ends in `.json`.

use reqwest::header::AUTHORIZATION;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::auth::SessionToken;
use crate::error::Error;
use crate::transport::{self, TransportConfig, check_status, decode, parse_json};

/// Raw HTTP client for the encoder's ECS API.
///
/// Stateless with respect to the session, like
/// [`WebClient`](crate::web::WebClient). Cheap to clone.
#[derive(Debug, Clone)]
pub struct EcsClient {
    http: reqwest::Client,
    base_url: Url,
}

impl EcsClient {
    /// Create a new ECS client for `host` (IP, hostname, or full URL).
    pub fn new(host: &str, transport: &TransportConfig) -> Result<Self, Error> {
        Ok(Self {
            http: transport.build_client()?,
            base_url: transport::base_url(host)?,
        })
    }

    /// Create an ECS client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self { http, base_url }
    }

    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build `{base}/{path}` for a path such as `ecs/channels/7.json`.
    pub(crate) fn endpoint(&self, segments: &[&str]) -> Result<Url, Error> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| Error::UnsupportedOperation("base URL cannot carry a path"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    pub(crate) async fn get_value(
        &self,
        session: &SessionToken,
        url: Url,
    ) -> Result<serde_json::Value, Error> {
        debug!("GET {}", url.path());

        let resp = self
            .http
            .get(url)
            .header(AUTHORIZATION, session.expose())
            .send()
            .await
            .map_err(Error::Transport)?;

        parse_json(resp).await
    }

    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        session: &SessionToken,
        url: Url,
    ) -> Result<T, Error> {
        let value = self.get_value(session, url).await?;
        decode(value)
    }

    /// Send an authenticated PUT with a JSON body, discarding the response.
    pub(crate) async fn put(
        &self,
        session: &SessionToken,
        url: Url,
        body: &(impl Serialize + Sync),
    ) -> Result<(), Error> {
        debug!("PUT {}", url.path());

        let resp = self
            .http
            .put(url)
            .header(AUTHORIZATION, session.expose())
            .json(body)
            .send()
            .await
            .map_err(Error::Transport)?;

        check_status(resp).await.map(drop)
    }
}
