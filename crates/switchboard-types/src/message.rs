//! Conversation messages and out-of-band notification payloads.

use crate::{CredentialRequirement, Domain, Workflow};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Who produced a conversation message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The caller.
    User,
    /// The voice assistant.
    Assistant,
}

/// One turn of the running conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Speaker role.
    pub role: Role,
    /// Spoken/transcribed text.
    pub content: String,
    /// When the message was appended.
    pub timestamp: DateTime<Utc>,
}

impl Message {
    /// Creates a message stamped with the current time.
    pub fn now(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Wire payload for the best-effort live-transcript relay.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptEntry {
    /// Room name identifying the session.
    #[serde(rename = "sessionId")]
    pub session_id: String,
    /// Speaker role.
    pub role: Role,
    /// Spoken/transcribed text.
    pub content: String,
    /// When the message was appended.
    pub timestamp: DateTime<Utc>,
}

impl TranscriptEntry {
    /// Builds a transcript entry from a conversation message.
    pub fn from_message(session_id: impl Into<String>, message: &Message) -> Self {
        Self {
            session_id: session_id.into(),
            role: message.role,
            content: message.content.clone(),
            timestamp: message.timestamp,
        }
    }
}

/// Out-of-band messages pushed to the connected frontend over the room's
/// data channel. Delivery is best-effort; the voice turn never waits on it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FrontendMessage {
    /// The active specialist changed.
    AgentSwitch {
        /// The newly active specialist domain.
        agent: Domain,
        /// The label that was active before the switch.
        previous_agent: String,
    },
    /// A workflow was generated and should be rendered on screen.
    WorkflowGenerated {
        /// The generated workflow, verbatim from the backend.
        workflow: Workflow,
        /// Credentials the user still needs to set up.
        #[serde(rename = "credentialRequirements")]
        credential_requirements: Vec<CredentialRequirement>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn agent_switch_wire_shape() {
        let msg = FrontendMessage::AgentSwitch {
            agent: Domain::Sales,
            previous_agent: "orchestrator".to_string(),
        };
        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(value["type"], "agent_switch");
        assert_eq!(value["agent"], "sales");
        assert_eq!(value["previous_agent"], "orchestrator");
    }

    #[test]
    fn transcript_entry_carries_session_and_role() {
        let message = Message::now(Role::User, "build me a workflow");
        let entry = TranscriptEntry::from_message("room-1", &message);
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["sessionId"], "room-1");
        assert_eq!(value["role"], "user");
        assert_eq!(value["content"], "build me a workflow");
    }
}
