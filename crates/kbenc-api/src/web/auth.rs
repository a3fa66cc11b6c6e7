// Web API authentication
//
// `POST /api/session` with `{username, password}`. The encoder answers
// with a `Set-Cookie: sessionID=<token>` header; that token must be
// presented as a cookie on every later request.

use reqwest::header::SET_COOKIE;
use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use tracing::debug;

use crate::auth::{ApiGeneration, SessionToken, session_from_set_cookie};
use crate::error::Error;
use crate::web::client::WebClient;

impl WebClient {
    /// Authenticate and return the issued session token.
    ///
    /// Fails with [`Error::Authentication`] on a non-success status and
    /// with [`Error::MissingSessionToken`] when the response carries no
    /// usable `sessionID` cookie.
    pub async fn login(&self, username: &str, password: &SecretString) -> Result<SessionToken, Error> {
        let url = self.endpoint(&["api", "session"])?;
        debug!(path = ApiGeneration::Web.login_path(), "logging in");

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

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Authentication {
                message: format!("login failed (HTTP {status}): {}", body.trim()),
            });
        }

        let cookies: Vec<&str> = resp
            .headers()
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .collect();

        let token = session_from_set_cookie(cookies).ok_or_else(|| Error::MissingSessionToken {
            message: "no sessionID cookie in login response".into(),
        })?;

        debug!("login successful");
        Ok(SessionToken::new(token))
    }
}
