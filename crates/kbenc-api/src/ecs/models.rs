// ECS API request and response types

use serde::{Deserialize, Serialize};

use crate::models::{StreamStatus, lenient_string};

/// `POST /ecs/auth.json` response.
#[derive(Debug, Clone, Deserialize)]
pub struct EcsAuthResponse {
    #[serde(default, alias = "sessionId", alias = "session_id")]
    pub sessionid: Option<String>,
}

/// `GET /ecs.json` — device, system and channel summary in one document.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct EcsSummary {
    #[serde(default)]
    pub system: Option<EcsSystem>,
    #[serde(default)]
    pub device: Option<EcsDevice>,
    #[serde(default)]
    pub channels: Vec<EcsChannelRef>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct EcsSystem {
    #[serde(default, deserialize_with = "lenient_string")]
    pub version: Option<String>,
    /// Uptime in seconds.
    #[serde(default, deserialize_with = "lenient_string")]
    pub uptime: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub cpu: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub memory: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct EcsDevice {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: Option<String>,
    #[serde(default, alias = "hostname")]
    pub name: Option<String>,
}

/// Channel reference inside the summary document.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EcsChannelRef {
    #[serde(deserialize_with = "required_string")]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// `GET /ecs/channels/{id}.json`
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct EcsChannel {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, alias = "status", deserialize_with = "lenient_string")]
    pub state: Option<String>,
    #[serde(default)]
    pub input: Option<StreamStatus>,
    #[serde(default)]
    pub output: Option<StreamStatus>,
    /// Recording arm flag; firmware reports a boolean or a word.
    #[serde(default, alias = "recordArmed", alias = "recording")]
    pub record: Option<serde_json::Value>,
}

impl EcsChannel {
    /// Interpret the recording field as an armed flag.
    pub fn is_record_armed(&self) -> bool {
        match &self.record {
            Some(serde_json::Value::Bool(b)) => *b,
            Some(serde_json::Value::String(s)) => {
                matches!(s.to_ascii_lowercase().as_str(), "active" | "armed" | "true")
            }
            Some(serde_json::Value::Object(map)) => {
                map.get("armed").and_then(serde_json::Value::as_bool) == Some(true)
            }
            _ => false,
        }
    }
}

/// Commands accepted by `PUT /ecs/channels/{id}.json`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::Display)]
pub enum EcsCommand {
    StartChannel,
    StopChannel,
    StartRecord,
    StopRecord,
    PrepareStop,
}

/// `{ "invoke": { "command": ..., "param": ... } }`
#[derive(Debug, Clone, Serialize)]
pub struct EcsInvoke {
    pub invoke: EcsInvocation,
}

#[derive(Debug, Clone, Serialize)]
pub struct EcsInvocation {
    pub command: EcsCommand,
    pub param: String,
}

impl EcsInvoke {
    pub fn new(command: EcsCommand) -> Self {
        Self {
            invoke: EcsInvocation {
                command,
                param: String::new(),
            },
        }
    }
}

fn required_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    lenient_string(deserializer)?.ok_or_else(|| serde::de::Error::custom("expected a string or number id"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn invoke_body_shape() {
        let body = serde_json::to_value(EcsInvoke::new(EcsCommand::PrepareStop)).unwrap();
        assert_eq!(body, json!({ "invoke": { "command": "PrepareStop", "param": "" } }));
    }

    #[test]
    fn summary_accepts_numeric_channel_ids() {
        let summary: EcsSummary = serde_json::from_value(json!({
            "device": { "id": 4, "hostname": "kb-lab" },
            "channels": [ { "id": 7, "name": "Main" } ]
        }))
        .unwrap();

        assert_eq!(summary.channels[0].id, "7");
        assert_eq!(summary.device.unwrap().name.as_deref(), Some("kb-lab"));
    }

    #[test]
    fn record_flag_variants() {
        let armed = |v: serde_json::Value| {
            serde_json::from_value::<EcsChannel>(json!({ "record": v }))
                .unwrap()
                .is_record_armed()
        };
        assert!(armed(json!(true)));
        assert!(armed(json!("Active")));
        assert!(armed(json!({ "armed": true })));
        assert!(!armed(json!("idle")));
    }
}
