use crate::config::RoomProviderConfig;
use crate::error::VoiceError;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::json;

/// A provisioned room.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomInfo {
    /// Join URL handed to clients.
    pub url: String,
    /// Provider-assigned room name; doubles as the session identifier.
    pub name: String,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    token: String,
}

/// Bearer-authenticated client for the external room provider.
#[derive(Debug, Clone)]
pub struct RoomClient {
    config: RoomProviderConfig,
    http: reqwest::Client,
}

impl RoomClient {
    pub fn new(config: RoomProviderConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }

    /// Creates a room sized for one caller and one bot, with chat,
    /// screenshare, and recording disabled.
    pub async fn create_room(&self) -> Result<RoomInfo, VoiceError> {
        let body = json!({
            "properties": {
                "max_participants": 2,
                "enable_chat": false,
                "enable_screenshare": false,
                "enable_recording": false,
            }
        });

        let response = self
            .http
            .post(format!("{}/v1/rooms", self.config.base_url))
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(VoiceError::RoomService { status, body });
        }

        let text = response.text().await?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Mints a non-owner meeting token scoped to one room.
    pub async fn create_meeting_token(&self, room_name: &str) -> Result<String, VoiceError> {
        let body = json!({
            "properties": {
                "room_name": room_name,
                "is_owner": false,
            }
        });

        let response = self
            .http
            .post(format!("{}/v1/meeting-tokens", self.config.base_url))
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(VoiceError::RoomService { status, body });
        }

        let text = response.text().await?;
        let parsed: TokenResponse = serde_json::from_str(&text)?;
        Ok(parsed.token)
    }

    /// Deletes a room. Used to roll back an orphaned room when token minting
    /// fails after room creation.
    pub async fn delete_room(&self, room_name: &str) -> Result<(), VoiceError> {
        let response = self
            .http
            .delete(format!("{}/v1/rooms/{}", self.config.base_url, room_name))
            .bearer_auth(&self.config.api_key)
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(VoiceError::RoomService { status, body });
        }
        Ok(())
    }
}
