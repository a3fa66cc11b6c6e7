// ── Variable and choice catalogs ──

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Device-level variables present from the start of every connection.
pub const BASELINE_VARIABLES: [(&str, &str); 10] = [
    ("current_version", "Current Software Version"),
    ("current_cpu_usage", "Current CPU Usage"),
    ("current_mem_usage", "Current Memory Usage"),
    ("free_disk_space", "Free Disk Space (GB)"),
    ("total_disk_space", "Total Disk Space (GB)"),
    ("used_disk_space", "Used Disk Space (Percent)"),
    ("device_name", "Device Name"),
    ("uptime", "Uptime"),
    ("network_incoming", "Network Incoming"),
    ("network_outgoing", "Network Outgoing"),
];

/// Id of the choice shown before any channel is known. Never dispatched.
pub const PLACEHOLDER_CHOICE_ID: &str = "null";
pub const PLACEHOLDER_CHOICE_LABEL: &str = "(no channels found)";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableDefinition {
    pub id: String,
    pub label: String,
}

/// Ordered, append-only set of variable definitions keyed by id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableCatalog {
    entries: IndexMap<String, String>,
}

impl VariableCatalog {
    /// A catalog holding only [`BASELINE_VARIABLES`].
    pub fn baseline() -> Self {
        Self {
            entries: BASELINE_VARIABLES
                .iter()
                .map(|(id, label)| ((*id).to_owned(), (*label).to_owned()))
                .collect(),
        }
    }

    /// Append unless the id already exists. Returns whether it was added.
    pub fn insert(&mut self, id: String, label: String) -> bool {
        if self.entries.contains_key(&id) {
            return false;
        }
        self.entries.insert(id, label);
        true
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn definitions(&self) -> Vec<VariableDefinition> {
        self.entries
            .iter()
            .map(|(id, label)| VariableDefinition {
                id: id.clone(),
                label: label.clone(),
            })
            .collect()
    }
}

impl Default for VariableCatalog {
    fn default() -> Self {
        Self::baseline()
    }
}

/// One selectable channel in an action's `channel` option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelChoice {
    pub id: String,
    pub label: String,
}

impl ChannelChoice {
    pub fn placeholder() -> Self {
        Self {
            id: PLACEHOLDER_CHOICE_ID.into(),
            label: PLACEHOLDER_CHOICE_LABEL.into(),
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.id == PLACEHOLDER_CHOICE_ID
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn baseline_is_ordered() {
        let catalog = VariableCatalog::baseline();
        let ids: Vec<_> = catalog.definitions().into_iter().map(|d| d.id).collect();
        assert_eq!(ids.first().map(String::as_str), Some("current_version"));
        assert_eq!(ids.last().map(String::as_str), Some("network_outgoing"));
        assert_eq!(catalog.len(), 10);
    }

    #[test]
    fn insert_is_idempotent() {
        let mut catalog = VariableCatalog::baseline();
        assert!(catalog.insert("state_Cam1".into(), "State of Cam1".into()));
        assert!(!catalog.insert("state_Cam1".into(), "other".into()));
        assert_eq!(catalog.len(), 11);
    }
}
