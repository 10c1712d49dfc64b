use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use thiserror::Error;
use url::Url;

use super::{
    models::{
        ANY_ORIGIN, ApiConfig, Config, ConfigMetadata, ConfigWarnings,
        CorsConfig, DeliveryConfig, HostConfig, LibraryConfig, ServerConfig,
    },
    sources::{EnvConfig, FileConfig, LegacySettings},
};

const DEFAULT_CONFIG_LOCATIONS: &[&str] =
    &["eagle-bridge.toml", "config/eagle-bridge.toml"];

const DEFAULT_SETTINGS_LOCATION: &str = "setting/settings.json";

#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("config file {path} does not exist")]
    MissingConfig { path: PathBuf },

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to parse {path}: {source}")]
    ParseSettings {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid value for {key}: {value:?} ({reason})")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },

    #[error("failed to load .env file: {0}")]
    EnvFile(#[from] dotenvy::Error),
}

#[derive(Debug)]
pub struct ConfigLoad {
    pub config: Config,
    pub warnings: ConfigWarnings,
}

#[derive(Debug, Default, Clone)]
pub struct ConfigLoaderOptions {
    pub config_path: Option<PathBuf>,
    pub settings_path: Option<PathBuf>,
    pub env_file: Option<PathBuf>,
}

/// Precedence, lowest first: defaults, legacy settings JSON, TOML file,
/// environment variables.
#[derive(Debug, Default)]
pub struct ConfigLoader {
    options: ConfigLoaderOptions,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ConfigLoaderOptions) -> Self {
        Self { options }
    }

    pub fn with_config_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.options.config_path = Some(path.into());
        self
    }

    pub fn with_settings_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.options.settings_path = Some(path.into());
        self
    }

    pub fn with_env_file<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.options.env_file = Some(path.into());
        self
    }

    /// Load `.env`, then compose the configuration from the process
    /// environment and any config files found.
    pub fn load(&self) -> Result<ConfigLoad, ConfigLoadError> {
        let env_file_loaded = match &self.options.env_file {
            Some(path) => dotenvy::from_path(path).map(|_| true).or_else(
                |err| match err {
                    dotenvy::Error::Io(_) => Ok(false),
                    _ => Err(err),
                },
            )?,
            None => {
                dotenvy::dotenv().map(|_| true).or_else(|err| match err {
                    dotenvy::Error::Io(_) => Ok(false),
                    _ => Err(err),
                })?
            }
        };

        let mut load = self.load_with_env(EnvConfig::gather())?;
        load.config.metadata.env_file_loaded = env_file_loaded;
        Ok(load)
    }

    /// Compose the configuration from an explicit environment snapshot.
    pub fn load_with_env(
        &self,
        env: EnvConfig,
    ) -> Result<ConfigLoad, ConfigLoadError> {
        let mut warnings = ConfigWarnings::default();

        let (file, config_path) = self.load_file_config(&env)?;
        let (legacy, settings_path) = self.load_legacy_settings(&env)?;

        if config_path.is_none() && settings_path.is_none() {
            warnings.push_with_hint(
                "No eagle-bridge.toml or setting/settings.json found; using environment and defaults",
                "Set EAGLE_LIBRARY_SEARCH_PATH or create eagle-bridge.toml",
            );
        }

        let server = ServerConfig {
            host: env
                .server_host
                .clone()
                .or(file.server.host)
                .unwrap_or_else(|| ServerConfig::default().host),
            port: match env.server_port.as_deref() {
                Some(raw) => parse_value("SERVER_PORT", raw)?,
                None => file.server.port.unwrap_or(ServerConfig::default().port),
            },
        };

        let search_path = env
            .library_search_path
            .clone()
            .or(file.library.search_path)
            .or(legacy.library_search_path);
        if search_path.is_none() {
            warnings.push_with_hint(
                "No library search path configured; no libraries will be listed",
                "Set EAGLE_LIBRARY_SEARCH_PATH to the folder holding your *.library directories",
            );
        }

        let allowed_origins = env
            .allow_origins
            .clone()
            .or(file.cors.allowed_origins)
            .or(legacy.allow_origins)
            .unwrap_or_default();
        let cors = CorsConfig { allowed_origins };
        if cors.allowed_origins.is_empty() {
            warnings.push_with_hint(
                "ALLOW_ORIGINS is empty; cross-origin requests are rejected",
                "List the web client origins in ALLOW_ORIGINS, or \"*\" for any origin",
            );
        } else if cors.allows_any_origin() {
            warnings.push(
                "ALLOW_ORIGINS contains \"*\"; any origin is allowed, without credentials",
            );
        }
        for origin in &cors.allowed_origins {
            if origin != ANY_ORIGIN {
                validate_url("ALLOW_ORIGINS", origin)?;
            }
        }

        let api_base_url = env
            .api_base_url
            .clone()
            .or(file.api.base_url)
            .or(legacy.api_base_url);
        if let Some(url) = &api_base_url {
            validate_url("API_BASE_URL", url)?;
        }

        let host_url = env
            .host_url
            .clone()
            .or(file.host.base_url)
            .unwrap_or_else(|| HostConfig::default().base_url);
        validate_url("EAGLE_API_URL", &host_url)?;

        let timeout = match env.host_timeout.as_deref().or(file.host.timeout.as_deref()) {
            Some(raw) => parse_duration("EAGLE_API_TIMEOUT", raw)?,
            None => HostConfig::default().timeout,
        };

        let stream_threshold_bytes = match env.stream_threshold_bytes.as_deref() {
            Some(raw) => parse_value("STREAM_THRESHOLD_BYTES", raw)?,
            None => file
                .delivery
                .stream_threshold_bytes
                .unwrap_or(DeliveryConfig::default().stream_threshold_bytes),
        };

        let config = Config {
            server,
            library: LibraryConfig { search_path },
            cors,
            api: ApiConfig {
                base_url: api_base_url,
            },
            host: HostConfig {
                base_url: host_url,
                timeout,
            },
            delivery: DeliveryConfig {
                stream_threshold_bytes,
            },
            metadata: ConfigMetadata {
                config_path,
                settings_path,
                env_file_loaded: false,
            },
        };

        Ok(ConfigLoad { config, warnings })
    }

    fn load_file_config(
        &self,
        env: &EnvConfig,
    ) -> Result<(FileConfig, Option<PathBuf>), ConfigLoadError> {
        let explicit = self
            .options
            .config_path
            .clone()
            .or_else(|| env.config_path.clone());

        let path = match explicit {
            Some(path) if !path.exists() => {
                return Err(ConfigLoadError::MissingConfig { path });
            }
            Some(path) => path,
            None => match DEFAULT_CONFIG_LOCATIONS
                .iter()
                .map(PathBuf::from)
                .find(|candidate| candidate.exists())
            {
                Some(path) => path,
                None => return Ok((FileConfig::default(), None)),
            },
        };

        let contents = read(&path)?;
        let file = toml::from_str(&contents).map_err(|source| {
            ConfigLoadError::Parse {
                path: path.clone(),
                source,
            }
        })?;
        Ok((file, Some(path)))
    }

    fn load_legacy_settings(
        &self,
        env: &EnvConfig,
    ) -> Result<(LegacySettings, Option<PathBuf>), ConfigLoadError> {
        let path = self
            .options
            .settings_path
            .clone()
            .or_else(|| env.settings_path.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SETTINGS_LOCATION));

        if !path.exists() {
            return Ok((LegacySettings::default(), None));
        }

        let contents = read(&path)?;
        let settings = serde_json::from_str(&contents).map_err(|source| {
            ConfigLoadError::ParseSettings {
                path: path.clone(),
                source,
            }
        })?;
        Ok((settings, Some(path)))
    }
}

fn read(path: &Path) -> Result<String, ConfigLoadError> {
    fs::read_to_string(path).map_err(|source| ConfigLoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn parse_value<T>(key: &'static str, raw: &str) -> Result<T, ConfigLoadError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.parse().map_err(|err: T::Err| ConfigLoadError::InvalidValue {
        key,
        value: raw.to_string(),
        reason: err.to_string(),
    })
}

fn parse_duration(
    key: &'static str,
    raw: &str,
) -> Result<Duration, ConfigLoadError> {
    humantime::parse_duration(raw).map_err(|err| {
        ConfigLoadError::InvalidValue {
            key,
            value: raw.to_string(),
            reason: err.to_string(),
        }
    })
}

fn validate_url(key: &'static str, raw: &str) -> Result<(), ConfigLoadError> {
    Url::parse(raw)
        .map(|_| ())
        .map_err(|err| ConfigLoadError::InvalidValue {
            key,
            value: raw.to_string(),
            reason: err.to_string(),
        })
}
