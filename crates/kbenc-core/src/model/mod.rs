// ── Domain model ──
//
// Canonical types produced from either API generation. The registry,
// feedbacks and CLI only ever see these.

mod channel;
mod device;

pub use channel::{Channel, ChannelCommand, ChannelVariables, LinkStatus, RunState, decode_name, variable_suffix};
pub use device::{DeviceRef, EncoderStats, SystemInfo, format_uptime};
