use crate::config::ModelConfig;
use crate::error::VoiceError;
use std::sync::atomic::{AtomicBool, Ordering};
use switchboard_types::FrontendMessage;
use tracing::info;

/// The bot's connection to a room.
///
/// In a production deployment this wraps the external voice framework's
/// transport (audio in/out, VAD, the hosted speech-to-speech model). That
/// framework is not available as a crate, so this seam simulates the
/// connection: it tracks connection state and carries the out-of-band app
/// messages the tool handlers push to the frontend.
#[derive(Debug)]
pub struct TransportSession {
    room_url: String,
    room_name: String,
    connected: AtomicBool,
}

impl TransportSession {
    /// Connects the bot to a room.
    ///
    /// The model credentials are handed to the underlying framework; the
    /// simulated transport only validates their presence.
    pub async fn connect(
        room_url: &str,
        room_name: &str,
        model: &ModelConfig,
    ) -> Result<Self, VoiceError> {
        if model.api_key.is_empty() {
            return Err(VoiceError::Config(
                "model api key must not be empty".to_string(),
            ));
        }

        info!(room = room_name, url = room_url, "bot joining room");

        // Simulate connection setup latency.
        tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;

        Ok(Self {
            room_url: room_url.to_string(),
            room_name: room_name.to_string(),
            connected: AtomicBool::new(true),
        })
    }

    pub fn room_url(&self) -> &str {
        &self.room_url
    }

    pub fn room_name(&self) -> &str {
        &self.room_name
    }

    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    /// Sends an out-of-band app message to the connected frontend.
    pub fn send_app_message(&self, message: &FrontendMessage) -> Result<(), VoiceError> {
        if !self.is_connected() {
            return Err(VoiceError::Transport(
                "session is not connected to a room".to_string(),
            ));
        }

        info!(
            room = self.room_name,
            message = ?message,
            "sending app message to frontend"
        );
        Ok(())
    }

    pub fn disconnect(&self) {
        if self.connected.swap(false, Ordering::SeqCst) {
            info!(room = self.room_name, "bot leaving room");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use switchboard_types::Domain;

    #[tokio::test]
    async fn connect_and_send_app_message() {
        let model = ModelConfig::new("key");
        let session = TransportSession::connect("https://rooms.example/abc", "abc", &model)
            .await
            .unwrap();
        assert!(session.is_connected());

        let message = FrontendMessage::AgentSwitch {
            agent: Domain::Sales,
            previous_agent: "orchestrator".to_string(),
        };
        session.send_app_message(&message).unwrap();
    }

    #[tokio::test]
    async fn send_after_disconnect_fails() {
        let model = ModelConfig::new("key");
        let session = TransportSession::connect("https://rooms.example/abc", "abc", &model)
            .await
            .unwrap();
        session.disconnect();

        let message = FrontendMessage::AgentSwitch {
            agent: Domain::Support,
            previous_agent: "orchestrator".to_string(),
        };
        assert!(session.send_app_message(&message).is_err());
    }

    #[tokio::test]
    async fn empty_model_key_is_rejected() {
        let model = ModelConfig::new("");
        let result = TransportSession::connect("https://rooms.example/abc", "abc", &model).await;
        assert!(matches!(result, Err(VoiceError::Config(_))));
    }
}
