//! Voice infrastructure for the Switchboard service.
//!
//! Provisions rooms and access tokens from the external room provider and
//! models the transport seam to the hosted speech-to-speech framework. The
//! architecture keeps the split deliberate: humans speak via the provider's
//! WebRTC rooms, the hosted model drives tool calls, and this crate only
//! provisions the space and carries out-of-band app messages.

pub mod agent;
pub mod config;
pub mod error;
pub mod rooms;

pub use agent::TransportSession;
pub use config::{ModelConfig, RoomProviderConfig, DEFAULT_ROOM_PROVIDER_URL};
pub use error::VoiceError;
pub use rooms::{RoomClient, RoomInfo};
