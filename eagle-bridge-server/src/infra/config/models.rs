use std::{path::PathBuf, time::Duration};

use eagle_bridge_core::{
    image::DEFAULT_STREAM_THRESHOLD_BYTES,
    host::{DEFAULT_HOST_TIMEOUT, DEFAULT_HOST_URL},
};

pub const DEFAULT_SERVER_HOST: &str = "0.0.0.0";
pub const DEFAULT_SERVER_PORT: u16 = 8000;

/// Allow-list entry accepting every origin.
pub const ANY_ORIGIN: &str = "*";

/// Fully resolved runtime configuration.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub server: ServerConfig,
    pub library: LibraryConfig,
    pub cors: CorsConfig,
    pub api: ApiConfig,
    pub host: HostConfig,
    pub delivery: DeliveryConfig,
    pub metadata: ConfigMetadata,
}

impl Config {
    /// Externally visible base URL of this gateway, used in item listings.
    pub fn public_base_url(&self) -> String {
        match &self.api.base_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => format!("http://localhost:{}", self.server.port),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_SERVER_HOST.to_string(),
            port: DEFAULT_SERVER_PORT,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct LibraryConfig {
    /// Root scanned for `*.library` directories.
    pub search_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default)]
pub struct CorsConfig {
    /// Empty allows no cross-origin requests; [`ANY_ORIGIN`] allows all of
    /// them, without credentials.
    pub allowed_origins: Vec<String>,
}

impl CorsConfig {
    pub fn allows_any_origin(&self) -> bool {
        self.allowed_origins.iter().any(|origin| origin == ANY_ORIGIN)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ApiConfig {
    pub base_url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct HostConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_HOST_URL.to_string(),
            timeout: DEFAULT_HOST_TIMEOUT,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DeliveryConfig {
    pub stream_threshold_bytes: u64,
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            stream_threshold_bytes: DEFAULT_STREAM_THRESHOLD_BYTES,
        }
    }
}

/// Where the configuration came from, for startup logging.
#[derive(Debug, Clone, Default)]
pub struct ConfigMetadata {
    pub config_path: Option<PathBuf>,
    pub settings_path: Option<PathBuf>,
    pub env_file_loaded: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ConfigWarnings {
    pub items: Vec<ConfigWarning>,
}

impl ConfigWarnings {
    pub fn push(&mut self, message: impl Into<String>) {
        self.items.push(ConfigWarning {
            message: message.into(),
            hint: None,
        });
    }

    pub fn push_with_hint(
        &mut self,
        message: impl Into<String>,
        hint: impl Into<String>,
    ) {
        self.items.push(ConfigWarning {
            message: message.into(),
            hint: Some(hint.into()),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
