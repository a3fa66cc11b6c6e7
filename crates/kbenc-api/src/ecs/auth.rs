// ECS API authentication
//
// `POST /ecs/auth.json` with `{username, password}`; the response body
// carries `sessionid`, which later requests send as `Authorization`.

use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use tracing::debug;

use crate::auth::{ApiGeneration, SessionToken};
use crate::ecs::client::EcsClient;
use crate::ecs::models::EcsAuthResponse;
use crate::error::Error;
use crate::transport::check_status;

impl EcsClient {
    /// Authenticate and return the issued session token.
    pub async fn login(&self, username: &str, password: &SecretString) -> Result<SessionToken, Error> {
        let url = self.endpoint(&["ecs", "auth.json"])?;
        debug!(path = ApiGeneration::Ecs.login_path(), "logging in");

        let body = json!({
            "username": username,
            "password": password.expose_secret(),
        });

        let resp = self
            .http()
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(Error::Transport)?;

        let resp = check_status(resp).await.map_err(|e| match e {
            Error::Http { status, body } => Error::Authentication {
                message: format!("login failed (HTTP {status}): {}", body.trim()),
            },
            other => other,
        })?;

        let text = resp.text().await.map_err(Error::Transport)?;
        let auth: EcsAuthResponse =
            serde_json::from_str(&text).map_err(|e| Error::MissingSessionToken {
                message: format!("unreadable login response: {e}"),
            })?;

        let token = auth
            .sessionid
            .filter(|t| !t.is_empty())
            .ok_or_else(|| Error::MissingSessionToken {
                message: "no sessionid in login response".into(),
            })?;

        debug!("login successful");
        Ok(SessionToken::new(token))
    }
}
