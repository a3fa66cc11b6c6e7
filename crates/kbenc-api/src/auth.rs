use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

/// Name of the session cookie issued by the web API login endpoint.
pub const SESSION_COOKIE: &str = "sessionID";

/// Which management API the encoder firmware speaks.
///
/// Determines login path, how the session token is carried, and which
/// endpoints are polled.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ApiGeneration {
    /// Web API (`/api/...`): cookie session, per-command POST endpoints.
    #[default]
    Web,
    /// ECS API (`/ecs...`): `Authorization` header session, PUT `invoke` bodies.
    Ecs,
}

impl ApiGeneration {
    /// The login endpoint path.
    pub fn login_path(self) -> &'static str {
        match self {
            Self::Web => "/api/session",
            Self::Ecs => "/ecs/auth.json",
        }
    }

    /// Whether the generation addresses channels through a device id.
    ///
    /// Only the web API nests channels under `/api/kulabyte/{deviceId}`.
    pub fn requires_device_id(self) -> bool {
        matches!(self, Self::Web)
    }
}

/// Opaque session credential issued at login.
///
/// The value is kept in a [`SecretString`] so it never lands in logs via
/// `Debug`; call [`expose`](Self::expose) when attaching it to a request.
#[derive(Debug, Clone)]
pub struct SessionToken(SecretString);

impl SessionToken {
    pub fn new(value: impl Into<String>) -> Self {
        Self(SecretString::from(value.into()))
    }

    /// The raw token value.
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }

    /// `Cookie` header value for the web API.
    pub(crate) fn cookie_header(&self) -> String {
        format!("{SESSION_COOKIE}={}", self.expose())
    }
}

/// Extract the `sessionID` value from a set of `Set-Cookie` header values.
///
/// Every `;`-separated attribute of every header is inspected, so the
/// cookie is found regardless of ordering or extra attributes. Empty
/// values count as missing.
pub fn session_from_set_cookie<'a>(headers: impl IntoIterator<Item = &'a str>) -> Option<String> {
    headers
        .into_iter()
        .flat_map(|h| h.split(';'))
        .filter_map(|part| part.trim().split_once('='))
        .find(|(name, _)| name.trim() == SESSION_COOKIE)
        .map(|(_, value)| value.trim().trim_matches('"').to_owned())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_session_cookie_with_attributes() {
        let token = session_from_set_cookie(["sessionID=abc123; Path=/"]);
        assert_eq!(token.as_deref(), Some("abc123"));
    }

    #[test]
    fn finds_session_cookie_among_others() {
        let token = session_from_set_cookie([
            "lang=en; Path=/",
            "Secure; sessionID=xyz; HttpOnly",
        ]);
        assert_eq!(token.as_deref(), Some("xyz"));
    }

    #[test]
    fn missing_or_empty_cookie_is_none() {
        assert_eq!(session_from_set_cookie(["lang=en"]), None);
        assert_eq!(session_from_set_cookie(["sessionID=; Path=/"]), None);
        assert_eq!(session_from_set_cookie(Vec::<&str>::new()), None);
    }

    #[test]
    fn similarly_named_cookie_is_not_the_session() {
        assert_eq!(session_from_set_cookie(["oldsessionID=zzz"]), None);
    }

    #[test]
    fn generation_paths() {
        assert_eq!(ApiGeneration::Web.login_path(), "/api/session");
        assert_eq!(ApiGeneration::Ecs.login_path(), "/ecs/auth.json");
        assert!(ApiGeneration::Web.requires_device_id());
        assert!(!ApiGeneration::Ecs.requires_device_id());
    }

    #[test]
    fn generation_parses_from_config_strings() {
        assert_eq!("ecs".parse::<ApiGeneration>().ok(), Some(ApiGeneration::Ecs));
        assert_eq!(ApiGeneration::Web.to_string(), "web");
    }
}
