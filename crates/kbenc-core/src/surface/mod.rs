// ── Host-facing surface ──
//
// Everything a host binding observes, published through `watch`
// channels: connection status, the variable catalog and values, the
// action catalog with its channel choices, the channel snapshot and a
// feedback generation counter.

mod catalog;
mod feedback;

use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

pub use catalog::{
    BASELINE_VARIABLES, ChannelChoice, PLACEHOLDER_CHOICE_ID, PLACEHOLDER_CHOICE_LABEL,
    VariableCatalog, VariableDefinition,
};
pub use feedback::Feedback;

use crate::command::ActionDefinition;
use crate::model::Channel;
use crate::stream::SurfaceStream;

/// Connection status reported to the host.
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
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ConnectionStatus {
    Ok,
    Connecting,
    Error,
    BadConfig,
    #[default]
    Disconnected,
}

pub type VariableValues = Arc<IndexMap<String, String>>;

pub struct Surface {
    status: watch::Sender<ConnectionStatus>,
    variables: watch::Sender<Arc<Vec<VariableDefinition>>>,
    values: watch::Sender<VariableValues>,
    actions: watch::Sender<Arc<Vec<ActionDefinition>>>,
    choices: watch::Sender<Arc<Vec<ChannelChoice>>>,
    channels: watch::Sender<Arc<Vec<Arc<Channel>>>>,
    feedback_generation: watch::Sender<u64>,
    cycles: watch::Sender<u64>,
    last_error: watch::Sender<Option<String>>,
}

impl Surface {
    pub fn new() -> Self {
        Self {
            status: watch::Sender::new(ConnectionStatus::Disconnected),
            variables: watch::Sender::new(Arc::new(VariableCatalog::baseline().definitions())),
            values: watch::Sender::new(Arc::new(IndexMap::new())),
            actions: watch::Sender::new(Arc::new(Vec::new())),
            choices: watch::Sender::new(Arc::new(vec![ChannelChoice::placeholder()])),
            channels: watch::Sender::new(Arc::new(Vec::new())),
            feedback_generation: watch::Sender::new(0),
            cycles: watch::Sender::new(0),
            last_error: watch::Sender::new(None),
        }
    }

    // ── Publishing ───────────────────────────────────────────────

    /// Returns whether the status changed.
    pub fn set_status(&self, status: ConnectionStatus) -> bool {
        self.status.send_if_modified(|current| {
            if *current == status {
                return false;
            }
            *current = status;
            true
        })
    }

    pub fn publish_variables(&self, definitions: Vec<VariableDefinition>) {
        self.variables.send_replace(Arc::new(definitions));
    }

    pub fn publish_actions(&self, actions: Vec<ActionDefinition>) {
        self.actions.send_replace(Arc::new(actions));
    }

    pub fn publish_choices(&self, choices: Vec<ChannelChoice>) {
        self.choices.send_replace(Arc::new(choices));
    }

    pub fn publish_channels(&self, channels: Vec<Arc<Channel>>) {
        self.channels.send_replace(Arc::new(channels));
    }

    /// Merge values into the published set, notifying only on change.
    pub fn set_values<I>(&self, values: I)
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let updates: Vec<_> = values.into_iter().collect();
        self.values.send_if_modified(|current| {
            let changed = updates
                .iter()
                .any(|(k, v)| current.get(k).is_none_or(|old| old != v));
            if changed {
                let map = Arc::make_mut(current);
                for (k, v) in updates {
                    map.insert(k, v);
                }
            }
            changed
        });
    }

    pub fn bump_feedbacks(&self) {
        self.feedback_generation.send_modify(|g| *g = g.wrapping_add(1));
    }

    pub(crate) fn record_cycle(&self) {
        self.last_error.send_replace(None);
        self.cycles.send_modify(|c| *c = c.wrapping_add(1));
    }

    pub(crate) fn record_error(&self, message: String) {
        self.last_error.send_replace(Some(message));
    }

    /// Back to the empty-registry state of a fresh connection lifetime.
    pub fn reset(&self) {
        self.publish_variables(VariableCatalog::baseline().definitions());
        self.publish_choices(vec![ChannelChoice::placeholder()]);
        self.publish_channels(Vec::new());
        self.values.send_replace(Arc::new(IndexMap::new()));
        self.bump_feedbacks();
    }

    // ── Observation ──────────────────────────────────────────────

    pub fn status(&self) -> ConnectionStatus {
        *self.status.borrow()
    }

    pub fn value(&self, id: &str) -> Option<String> {
        self.values.borrow().get(id).cloned()
    }

    pub fn channel(&self, id: &str) -> Option<Arc<Channel>> {
        self.channels.borrow().iter().find(|c| c.id == id).cloned()
    }

    /// Evaluate a feedback against the latest channel snapshot.
    pub fn check(&self, feedback: &Feedback) -> bool {
        let channel = self.channel(feedback.channel_id());
        feedback.evaluate(channel.as_deref())
    }

    /// Most recent login or poll failure, cleared by a successful cycle.
    pub fn last_error(&self) -> Option<String> {
        self.last_error.borrow().clone()
    }

    pub fn subscribe_status(&self) -> watch::Receiver<ConnectionStatus> {
        self.status.subscribe()
    }

    pub fn variables(&self) -> SurfaceStream<Arc<Vec<VariableDefinition>>> {
        SurfaceStream::new(self.variables.subscribe())
    }

    pub fn values(&self) -> SurfaceStream<VariableValues> {
        SurfaceStream::new(self.values.subscribe())
    }

    pub fn actions(&self) -> SurfaceStream<Arc<Vec<ActionDefinition>>> {
        SurfaceStream::new(self.actions.subscribe())
    }

    pub fn choices(&self) -> SurfaceStream<Arc<Vec<ChannelChoice>>> {
        SurfaceStream::new(self.choices.subscribe())
    }

    pub fn channels(&self) -> SurfaceStream<Arc<Vec<Arc<Channel>>>> {
        SurfaceStream::new(self.channels.subscribe())
    }

    pub fn feedback_generation(&self) -> SurfaceStream<u64> {
        SurfaceStream::new(self.feedback_generation.subscribe())
    }

    /// Count of successful poll cycles since the controller was created.
    pub fn cycles(&self) -> SurfaceStream<u64> {
        SurfaceStream::new(self.cycles.subscribe())
    }
}

impl Default for Surface {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unchanged_values_do_not_notify() {
        let surface = Surface::new();
        let mut rx = surface.values.subscribe();

        surface.set_values([("uptime".to_string(), "0d0h0m1s".to_string())]);
        assert!(rx.has_changed().unwrap_or(false));
        rx.mark_unchanged();

        surface.set_values([("uptime".to_string(), "0d0h0m1s".to_string())]);
        assert!(!rx.has_changed().unwrap_or(true));
        assert_eq!(surface.value("uptime").as_deref(), Some("0d0h0m1s"));
    }

    #[test]
    fn status_change_is_reported_once() {
        let surface = Surface::new();
        assert!(surface.set_status(ConnectionStatus::Connecting));
        assert!(!surface.set_status(ConnectionStatus::Connecting));
        assert_eq!(surface.status(), ConnectionStatus::Connecting);
    }

    #[test]
    fn reset_restores_placeholder_and_baseline() {
        let surface = Surface::new();
        surface.publish_choices(vec![ChannelChoice {
            id: "c1".into(),
            label: "Cam1".into(),
        }]);
        surface.set_values([("device_name".to_string(), "kb".to_string())]);

        surface.reset();

        assert!(surface.choices().latest()[0].is_placeholder());
        assert_eq!(surface.variables().latest().len(), BASELINE_VARIABLES.len());
        assert!(surface.value("device_name").is_none());
    }

    #[test]
    fn feedback_against_unknown_channel_is_false() {
        let surface = Surface::new();
        assert!(!surface.check(&Feedback::channel_running("c9")));
    }
}
