// ── Session management ──
//
// The generation-specific client behind one connection and the session
// it holds. The controller owns both inside its connection context.

use chrono::{DateTime, Utc};
use kbenc_api::{ApiGeneration, EcsClient, SessionToken, TlsMode, TransportConfig, WebClient};
use secrecy::SecretString;

use crate::config::{ControllerConfig, TlsVerification};
use crate::error::CoreError;

/// An authenticated session.
#[derive(Debug, Clone)]
pub struct Session {
    pub token: SessionToken,
    pub established_at: DateTime<Utc>,
}

impl Session {
    pub fn new(token: SessionToken) -> Self {
        Self {
            token,
            established_at: Utc::now(),
        }
    }
}

/// HTTP client for whichever API generation the encoder speaks.
#[derive(Debug, Clone)]
pub enum EncoderClient {
    Web(WebClient),
    Ecs(EcsClient),
}

impl EncoderClient {
    pub fn from_config(config: &ControllerConfig) -> Result<Self, CoreError> {
        let transport = build_transport(config);
        Ok(match config.api {
            ApiGeneration::Web => Self::Web(WebClient::new(&config.host, &transport)?),
            ApiGeneration::Ecs => Self::Ecs(EcsClient::new(&config.host, &transport)?),
        })
    }

    pub fn generation(&self) -> ApiGeneration {
        match self {
            Self::Web(_) => ApiGeneration::Web,
            Self::Ecs(_) => ApiGeneration::Ecs,
        }
    }

    /// One login attempt.
    pub async fn login(&self, username: &str, password: &SecretString) -> Result<Session, CoreError> {
        let token = match self {
            Self::Web(client) => client.login(username, password).await?,
            Self::Ecs(client) => client.login(username, password).await?,
        };
        Ok(Session::new(token))
    }
}

// ── Helpers ──────────────────────────────────────────────────────

fn build_transport(config: &ControllerConfig) -> TransportConfig {
    TransportConfig {
        tls: tls_to_transport(&config.tls),
        timeout: config.timeout,
    }
}

fn tls_to_transport(tls: &TlsVerification) -> TlsMode {
    match tls {
        TlsVerification::SystemDefaults => TlsMode::System,
        TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
        TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
    }
}
