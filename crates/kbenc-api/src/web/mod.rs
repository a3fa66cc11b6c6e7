// Web API client modules
//
// Hand-written client for the encoder's `/api/...` management endpoints:
// cookie-based session login, system/device discovery, and the
// `kulabyte` encoder namespace (channels, statistics, channel control).

pub mod auth;
pub mod client;
pub mod encoder;
pub mod models;
pub mod system;

pub use client::WebClient;
pub use encoder::WebCommand;
