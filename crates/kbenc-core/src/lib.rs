// kbenc-core: Session lifecycle and polling layer between kbenc-api and hosts (CLI or
// a control-surface binding).

pub mod command;
pub mod config;
pub mod controller;
pub mod convert;
pub mod dispatch;
pub mod error;
pub mod model;
pub mod poll;
pub mod registry;
pub mod scheduler;
pub mod session;
pub mod stream;
pub mod surface;

// ── Primary re-exports ──────────────────────────────────────────────
pub use command::{Action, ActionKind, DispatchReport};
pub use config::{ControllerConfig, TlsVerification};
pub use controller::Controller;
pub use error::CoreError;
pub use kbenc_api::ApiGeneration;
pub use registry::{ChannelRegistry, ReconcileOutcome};
pub use scheduler::{TimerKind, TimerSet};
pub use stream::SurfaceStream;
pub use surface::{ConnectionStatus, Feedback, Surface, VariableDefinition};

pub use model::{Channel, ChannelCommand, DeviceRef, EncoderStats, LinkStatus, RunState, SystemInfo};
