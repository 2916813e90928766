//! Server configuration loading from file and environment variables.

use serde::Deserialize;
use std::net::{IpAddr, Ipv4Addr};
use switchboard_voice::{ModelConfig, RoomProviderConfig};
use thiserror::Error;

/// Top-level server configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Server network settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Workflow backend settings.
    #[serde(default)]
    pub backend: BackendConfig,

    /// Room provider credentials and endpoint.
    #[serde(default)]
    pub rooms: RoomProviderConfig,

    /// Speech-model provider credentials.
    #[serde(default)]
    pub model: ModelConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Network configuration for the HTTP server.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind to.
    #[serde(default = "default_host")]
    pub host: IpAddr,

    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Workflow backend configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the workflow backend.
    #[serde(default = "default_backend_url")]
    pub url: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "switchboard_server=debug,info").
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Whether to output logs in JSON format.
    #[serde(default)]
    pub json: bool,
}

fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0))
}

fn default_port() -> u16 {
    8765
}

fn default_backend_url() -> String {
    "http://localhost:3001".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: default_backend_url(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse the configuration file.
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// A required credential was absent.
    #[error("missing required configuration: {0}")]
    Missing(&'static str),
}

/// Loads configuration from a TOML file, falling back to defaults.
///
/// Environment variable overrides:
/// - `SWITCHBOARD_HOST` overrides `server.host`
/// - `SWITCHBOARD_PORT` overrides `server.port`
/// - `SWITCHBOARD_BACKEND_URL` overrides `backend.url`
/// - `SWITCHBOARD_ROOM_API_KEY` overrides `rooms.api_key`
/// - `SWITCHBOARD_ROOM_PROVIDER_URL` overrides `rooms.base_url`
/// - `SWITCHBOARD_MODEL_API_KEY` overrides `model.api_key`
/// - `SWITCHBOARD_LOG_LEVEL` overrides `logging.level`
/// - `SWITCHBOARD_LOG_JSON` overrides `logging.json` (set to "true" to enable)
///
/// # Errors
///
/// Returns `ConfigError` if the file exists but cannot be read or parsed.
pub fn load_config(path: Option<&str>) -> Result<Config, ConfigError> {
    let mut config = match path {
        Some(p) => match std::fs::read_to_string(p) {
            Ok(contents) => toml::from_str(&contents)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = p, "config file not found, using defaults");
                Config::default()
            }
            Err(e) => return Err(ConfigError::FileRead(e)),
        },
        None => Config::default(),
    };

    // Environment variable overrides
    if let Ok(host) = std::env::var("SWITCHBOARD_HOST") {
        if let Ok(parsed) = host.parse() {
            config.server.host = parsed;
        }
    }
    if let Ok(port) = std::env::var("SWITCHBOARD_PORT") {
        if let Ok(parsed) = port.parse() {
            config.server.port = parsed;
        }
    }
    if let Ok(url) = std::env::var("SWITCHBOARD_BACKEND_URL") {
        config.backend.url = url;
    }
    if let Ok(key) = std::env::var("SWITCHBOARD_ROOM_API_KEY") {
        config.rooms.api_key = key;
    }
    if let Ok(url) = std::env::var("SWITCHBOARD_ROOM_PROVIDER_URL") {
        config.rooms.base_url = url;
    }
    if let Ok(key) = std::env::var("SWITCHBOARD_MODEL_API_KEY") {
        config.model.api_key = key;
    }
    if let Ok(level) = std::env::var("SWITCHBOARD_LOG_LEVEL") {
        config.logging.level = level;
    }
    if let Ok(json) = std::env::var("SWITCHBOARD_LOG_JSON") {
        config.logging.json = json == "true" || json == "1";
    }

    Ok(config)
}

impl Config {
    /// Checks that required credentials are present.
    ///
    /// The process must not start without them: every session needs the
    /// model provider and the room provider.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.model.api_key.is_empty() {
            return Err(ConfigError::Missing(
                "model.api_key (SWITCHBOARD_MODEL_API_KEY)",
            ));
        }
        if self.rooms.api_key.is_empty() {
            return Err(ConfigError::Missing(
                "rooms.api_key (SWITCHBOARD_ROOM_API_KEY)",
            ));
        }
        Ok(())
    }
}
