//! Per-session pipeline task.
//!
//! One pipeline runs per voice session: it registers the session, joins the
//! room, wires the transcript relay, and serves tool calls until cancelled.
//! The registry entry is removed by a drop guard in every termination path.

use crate::conversation::Conversation;
use crate::sessions::RegistryGuard;
use crate::tools::{self, ToolContext};
use crate::AppState;
use serde_json::Value;
use std::sync::Arc;
use switchboard_backend::BackendClient;
use switchboard_types::{Role, TranscriptEntry};
use switchboard_voice::{RoomInfo, TransportSession};
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

/// A live session's moving parts.
///
/// In production the hosted speech model drives [`handle_tool_call`] and
/// [`record_message`] through the voice framework; tests play that role
/// directly.
///
/// [`handle_tool_call`]: SessionPipeline::handle_tool_call
/// [`record_message`]: SessionPipeline::record_message
pub struct SessionPipeline {
    tools: ToolContext,
    conversation: Arc<Conversation>,
}

impl SessionPipeline {
    pub fn new(tools: ToolContext, conversation: Arc<Conversation>) -> Self {
        Self {
            tools,
            conversation,
        }
    }

    /// Serves one tool call from the model runtime.
    ///
    /// Calls for one session arrive serially; the runtime never issues a new
    /// call before the previous one resolved.
    pub async fn handle_tool_call(&self, name: &str, args: &Value) -> Value {
        tools::dispatch(&self.tools, name, args).await
    }

    /// Appends one conversation turn, notifying transcript listeners.
    pub fn record_message(&self, role: Role, content: &str) {
        self.conversation.record(role, content);
    }

    pub fn conversation(&self) -> &Arc<Conversation> {
        &self.conversation
    }

    /// Runs until cancelled, then leaves the room.
    pub async fn run(self, cancel: CancellationToken) {
        cancel.cancelled().await;
        self.tools.transport.disconnect();
    }
}

/// Entry point of the spawned per-session task.
///
/// The start handler has already registered the session; this task owns the
/// entry from here on and removes it in every termination path through the
/// drop guard. It never inserts, so a session ended before the task got
/// scheduled stays ended.
pub async fn run_session(state: AppState, room: RoomInfo, cancel: CancellationToken) {
    let _guard = RegistryGuard::new(state.registry.clone(), room.name.clone());

    let transport = match TransportSession::connect(&room.url, &room.name, &state.model).await {
        Ok(transport) => Arc::new(transport),
        Err(e) => {
            error!(room = %room.name, "failed to join room: {e}");
            return;
        }
    };

    let conversation = Arc::new(Conversation::new());
    spawn_transcript_relay(
        state.backend.clone(),
        room.name.clone(),
        conversation.subscribe(),
    );

    let pipeline = SessionPipeline::new(
        ToolContext {
            room_name: room.name.clone(),
            registry: state.registry.clone(),
            backend: state.backend.clone(),
            transport,
        },
        conversation,
    );

    info!(room = %room.name, "session pipeline running");
    pipeline.run(cancel).await;
    info!(room = %room.name, "session pipeline finished");
}

/// Forwards appended conversation messages to the backend's live transcript.
///
/// Fire-and-forget: errors are logged and the relay keeps going. The task
/// ends when the conversation (and with it the event channel) is dropped.
pub fn spawn_transcript_relay(
    backend: Arc<BackendClient>,
    room_name: String,
    mut events: broadcast::Receiver<switchboard_types::Message>,
) {
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(message) => {
                    let entry = TranscriptEntry::from_message(&room_name, &message);
                    if let Err(e) = backend.relay_transcript(&entry).await {
                        warn!(room = %room_name, "transcript relay failed: {e}");
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(room = %room_name, skipped, "transcript relay lagged");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    });
}
