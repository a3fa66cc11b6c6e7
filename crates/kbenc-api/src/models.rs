// Response helpers shared by both API generations.

use serde::{Deserialize, Deserializer, Serialize};

/// Accept a string, number or boolean and keep its textual form.
pub(crate) fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        Some(serde_json::Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    })
}

/// Input/output health as reported per channel.
///
/// Older firmware sends a bare status string, newer firmware an object
/// with a status and a human-readable detail line.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum StreamStatus {
    Bare(String),
    Detailed {
        #[serde(default, deserialize_with = "lenient_string")]
        status: Option<String>,
        #[serde(default, alias = "message", deserialize_with = "lenient_string")]
        info: Option<String>,
    },
}

impl StreamStatus {
    pub fn status(&self) -> Option<&str> {
        match self {
            Self::Bare(s) => Some(s),
            Self::Detailed { status, .. } => status.as_deref(),
        }
    }

    pub fn info(&self) -> Option<&str> {
        match self {
            Self::Bare(_) => None,
            Self::Detailed { info, .. } => info.as_deref(),
        }
    }
}
