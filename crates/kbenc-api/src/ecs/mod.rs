// ECS API client modules
//
// Client for the `/ecs...` management API found on later firmware:
// JSON-body session login, a combined device/channel summary, per-channel
// detail documents, and `invoke` commands sent with PUT.

pub mod auth;
pub mod channels;
pub mod client;
pub mod models;

pub use client::EcsClient;
pub use models::EcsCommand;
