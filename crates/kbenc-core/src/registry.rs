// ── Channel registry ──
//
// Owns the channels seen during one connection lifetime together with
// the variable catalog and channel choices derived from them. The three
// only ever grow; a reconnect replaces the whole registry.

use std::sync::Arc;

use indexmap::IndexMap;
use tracing::debug;

use crate::model::Channel;
use crate::surface::{ChannelChoice, VariableCatalog, VariableDefinition};

/// What a [`ChannelRegistry::reconcile`] call changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileOutcome {
    /// At least one channel was registered for the first time.
    pub grew: bool,
    /// Ids of newly registered channels, in observation order.
    pub added: Vec<String>,
    /// Fresh values for the derived variables of every observed channel.
    pub values: Vec<(String, String)>,
}

#[derive(Debug, Clone)]
pub struct ChannelRegistry {
    channels: IndexMap<String, Arc<Channel>>,
    catalog: VariableCatalog,
    choices: Vec<ChannelChoice>,
}

impl ChannelRegistry {
    /// Empty registry: baseline catalog and the placeholder choice.
    pub fn new() -> Self {
        Self {
            channels: IndexMap::new(),
            catalog: VariableCatalog::baseline(),
            choices: vec![ChannelChoice::placeholder()],
        }
    }

    /// Merge an observed channel list.
    ///
    /// Unknown ids are appended to the channel set, the catalog and the
    /// choices; known ids are updated in place. Identity is the channel
    /// id, so a renamed channel keeps its slot and choice; the choice label
    /// follows the new name and the new variable ids are appended to the
    /// catalog.
    pub fn reconcile(&mut self, observed: Vec<Channel>) -> ReconcileOutcome {
        let mut outcome = ReconcileOutcome::default();

        if self.channels.is_empty() && !observed.is_empty() {
            self.choices.clear();
        }

        for channel in observed {
            let vars = channel.variables();
            let label = channel.label();

            if !self.channels.contains_key(&channel.id) {
                debug!(channel_id = %channel.id, name = %label, "registering channel");
                self.choices.push(ChannelChoice {
                    id: channel.id.clone(),
                    label: label.clone(),
                });
                outcome.added.push(channel.id.clone());
                outcome.grew = true;
            } else if let Some(choice) = self
                .choices
                .iter_mut()
                .find(|c| c.id == channel.id && c.label != label)
            {
                debug!(channel_id = %channel.id, name = %label, "channel renamed");
                choice.label.clone_from(&label);
                outcome.grew = true;
            }

            for (id, var_label) in vars.definitions(&label) {
                if self.catalog.insert(id, var_label) {
                    outcome.grew = true;
                }
            }
            outcome.values.extend(vars.values(&channel));

            self.channels.insert(channel.id.clone(), Arc::new(channel));
        }

        outcome
    }

    pub fn get(&self, id: &str) -> Option<&Channel> {
        self.channels.get(id).map(AsRef::as_ref)
    }

    pub fn ids(&self) -> Vec<String> {
        self.channels.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// Channels in registration order.
    pub fn snapshot(&self) -> Vec<Arc<Channel>> {
        self.channels.values().cloned().collect()
    }

    pub fn catalog(&self) -> &VariableCatalog {
        &self.catalog
    }

    pub fn variable_definitions(&self) -> Vec<VariableDefinition> {
        self.catalog.definitions()
    }

    pub fn choices(&self) -> &[ChannelChoice] {
        &self.choices
    }
}

impl Default for ChannelRegistry {
    fn default() -> Self {
        Self::new()
    }
}
