use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw configuration as defined in a TOML file.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    pub server: FileServerConfig,
    #[serde(default)]
    pub library: FileLibraryConfig,
    #[serde(default)]
    pub cors: FileCorsConfig,
    #[serde(default)]
    pub api: FileApiConfig,
    #[serde(default)]
    pub host: FileHostConfig,
    #[serde(default)]
    pub delivery: FileDeliveryConfig,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileServerConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileLibraryConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_path: Option<PathBuf>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileCorsConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_origins: Option<Vec<String>>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileApiConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileHostConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Human readable duration, e.g. `"10s"` or `"1500ms"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileDeliveryConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stream_threshold_bytes: Option<u64>,
}

/// The JSON settings file older deployments ship as `setting/settings.json`.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct LegacySettings {
    #[serde(rename = "EAGLE_LIBRARY_SEARCH_PATH", default)]
    pub library_search_path: Option<PathBuf>,
    #[serde(rename = "ALLOW_ORIGINS", default)]
    pub allow_origins: Option<Vec<String>>,
    #[serde(rename = "API_BASE_URL", default)]
    pub api_base_url: Option<String>,
}

/// Values read from the process environment. Unparsed on purpose so the
/// loader can report which variable was malformed.
#[derive(Debug, Default, Clone)]
pub struct EnvConfig {
    pub config_path: Option<PathBuf>,
    pub settings_path: Option<PathBuf>,
    pub server_host: Option<String>,
    pub server_port: Option<String>,
    pub library_search_path: Option<PathBuf>,
    pub allow_origins: Option<Vec<String>>,
    pub api_base_url: Option<String>,
    pub host_url: Option<String>,
    pub host_timeout: Option<String>,
    pub stream_threshold_bytes: Option<String>,
}

impl EnvConfig {
    pub fn gather() -> Self {
        Self {
            config_path: var("EAGLE_BRIDGE_CONFIG").map(PathBuf::from),
            settings_path: var("EAGLE_BRIDGE_SETTINGS").map(PathBuf::from),
            server_host: var("SERVER_HOST"),
            server_port: var("SERVER_PORT"),
            library_search_path: var("EAGLE_LIBRARY_SEARCH_PATH")
                .map(PathBuf::from),
            allow_origins: var("ALLOW_ORIGINS").map(|raw| parse_csv(&raw)),
            api_base_url: var("API_BASE_URL"),
            host_url: var("EAGLE_API_URL"),
            host_timeout: var("EAGLE_API_TIMEOUT"),
            stream_threshold_bytes: var("STREAM_THRESHOLD_BYTES"),
        }
    }
}

fn var(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

pub fn parse_csv(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
