// kbenc-api: Async Rust client for the Haivision KB encoder management APIs
//
// Two device API generations are covered: the `web` API (`/api/...`,
// cookie session) and the `ecs` API (`/ecs...`, header session).

pub mod auth;
pub mod ecs;
pub mod error;
pub mod models;
pub mod transport;
pub mod web;

pub use auth::{ApiGeneration, SessionToken};
pub use ecs::EcsClient;
pub use error::Error;
pub use transport::{TlsMode, TransportConfig};
pub use web::WebClient;
