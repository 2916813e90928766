use serde::{Deserialize, Serialize};
use std::fmt;

/// Default base URL of the hosted room provider API.
pub const DEFAULT_ROOM_PROVIDER_URL: &str = "https://api.daily.co";

/// Credentials and endpoint for the external room provider.
#[derive(Clone, Serialize, Deserialize)]
pub struct RoomProviderConfig {
    /// Base URL of the provider API.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Bearer token for the provider API.
    #[serde(default, skip_serializing)]
    pub api_key: String,
}

fn default_base_url() -> String {
    DEFAULT_ROOM_PROVIDER_URL.to_string()
}

impl Default for RoomProviderConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: String::new(),
        }
    }
}

impl RoomProviderConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: default_base_url(),
            api_key: api_key.into(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }
}

impl fmt::Debug for RoomProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RoomProviderConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

/// Credentials for the hosted speech-to-speech model provider.
///
/// Handed to the transport session; the model itself runs externally.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct ModelConfig {
    /// API key for the model provider.
    #[serde(default, skip_serializing)]
    pub api_key: String,
}

impl ModelConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
        }
    }
}

impl fmt::Debug for ModelConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelConfig")
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_output_redacts_secrets() {
        let room = RoomProviderConfig::new("super-secret");
        let debug = format!("{:?}", room);
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("[REDACTED]"));

        let model = ModelConfig::new("also-secret");
        let debug = format!("{:?}", model);
        assert!(!debug.contains("also-secret"));
    }
}
