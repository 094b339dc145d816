//! Configuration file loading and profile resolution.

pub mod loader;
pub mod types;

pub use loader::{ConfigError, ConfigLoader, default_config_path};
pub use types::{AdminConfig, CorsConfig, LoggingConfig, ResolvedConfig};
