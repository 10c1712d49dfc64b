//! Configuration: `.env`, TOML file, legacy `settings.json`, environment.

pub mod loader;
pub mod models;
pub mod sources;

pub use loader::{ConfigLoad, ConfigLoadError, ConfigLoader, ConfigLoaderOptions};
pub use models::{
    ANY_ORIGIN, ApiConfig, Config, ConfigMetadata, ConfigWarning, ConfigWarnings,
    CorsConfig, DeliveryConfig, HostConfig, LibraryConfig, ServerConfig,
};
