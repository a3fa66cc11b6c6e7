// Web API response types
//
// Loosely typed where firmware revisions disagree: numeric readings may
// arrive as numbers or strings, and unknown fields are kept in `extra`.

use serde::{Deserialize, Serialize};

use crate::models::{StreamStatus, lenient_string};

/// `GET /api/system`
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct WebSystemInfo {
    #[serde(default)]
    pub version: Option<WebVersion>,
    #[serde(default)]
    pub uptime: Option<WebUptime>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct WebVersion {
    #[serde(default, deserialize_with = "lenient_string")]
    pub release: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub build: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize)]
pub struct WebUptime {
    #[serde(default)]
    pub days: u64,
    #[serde(default)]
    pub hrs: u64,
    #[serde(default)]
    pub mins: u64,
    #[serde(default)]
    pub secs: u64,
}

/// One entry of `GET /api/devices`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WebDevice {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// One entry of `GET /api/kulabyte/{deviceId}/channels`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WebChannel {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub state: Option<String>,
    /// `"active"` when recording is armed.
    #[serde(default, deserialize_with = "lenient_string")]
    pub recording: Option<String>,
    #[serde(default)]
    pub input: Option<StreamStatus>,
    #[serde(default)]
    pub output: Option<StreamStatus>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// `GET /api/kulabyte/{deviceId}/encoder/statistics`
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct WebStatistics {
    #[serde(default, deserialize_with = "lenient_string")]
    pub cpu: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub memory: Option<String>,
    #[serde(default, rename = "diskSpace")]
    pub disk_space: Option<WebDiskSpace>,
    #[serde(default)]
    pub network: Option<WebNetwork>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct WebDiskSpace {
    #[serde(default, deserialize_with = "lenient_string")]
    pub free: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub total: Option<String>,
    #[serde(default, rename = "usedPercent", deserialize_with = "lenient_string")]
    pub used_percent: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct WebNetwork {
    #[serde(default, deserialize_with = "lenient_string")]
    pub incoming: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub outgoing: Option<String>,
}
