use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum VoiceError {
    /// The room provider answered with a non-OK status.
    #[error("room provider returned status {status}: {body}")]
    RoomService {
        status: StatusCode,
        body: String,
    },

    /// The room provider could not be reached.
    #[error("failed to connect to room provider: {0}")]
    Connect(#[from] reqwest::Error),

    /// The room provider answered OK but the body was not the expected shape.
    #[error("invalid room provider response: {0}")]
    Decode(#[from] serde_json::Error),

    /// Transport-session failure (not connected, send failed).
    #[error("transport error: {0}")]
    Transport(String),

    #[error("invalid configuration: {0}")]
    Config(String),
}
