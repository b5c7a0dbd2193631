pub mod api;
pub mod config;
pub mod static_assets;

pub use api::{AppState, router};
pub use config::{RelayConfig, ServerConfig};
