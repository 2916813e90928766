//! In-memory session registry.
//!
//! One entry per live voice session, keyed by room name. The registry is an
//! explicitly owned object injected through [`crate::AppState`]; it is
//! constructed at process start and torn down at shutdown.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use switchboard_intent::SwitchOutcome;
use switchboard_types::{Domain, Specialist};
use tokio_util::sync::CancellationToken;

/// State tracked for one live session.
#[derive(Debug, Clone)]
pub struct SessionEntry {
    /// Owning user, when the frontend supplied one.
    pub user_id: Option<String>,
    /// The specialist currently handling the conversation.
    pub specialist: Specialist,
    /// Cooperative cancellation handle for the session's pipeline task.
    pub cancel: CancellationToken,
}

/// Registry of live sessions.
///
/// Uses `std::sync::RwLock` intentionally: all lock acquisitions are brief
/// HashMap operations (get/insert/remove) that never span `.await` points,
/// making a synchronous lock safe and more efficient than `tokio::sync::RwLock`.
#[derive(Debug, Clone, Default)]
pub struct SessionRegistry {
    inner: Arc<RwLock<HashMap<String, SessionEntry>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a session under its room name.
    ///
    /// The session starts in the generalist specialist mode.
    pub fn register(
        &self,
        room_name: &str,
        user_id: Option<String>,
        cancel: CancellationToken,
    ) {
        let entry = SessionEntry {
            user_id,
            specialist: Specialist::default(),
            cancel,
        };
        self.inner
            .write()
            .expect("session registry lock poisoned")
            .insert(room_name.to_string(), entry);
    }

    /// Returns a snapshot of the session's state, if registered.
    pub fn get(&self, room_name: &str) -> Option<SessionEntry> {
        self.inner
            .read()
            .expect("session registry lock poisoned")
            .get(room_name)
            .cloned()
    }

    /// Removes a session entry. Safe to call for unknown rooms.
    pub fn remove(&self, room_name: &str) -> Option<SessionEntry> {
        self.inner
            .write()
            .expect("session registry lock poisoned")
            .remove(room_name)
    }

    /// Transitions the session's active specialist.
    ///
    /// Returns `None` when no session is registered under `room_name`;
    /// otherwise the transition outcome, which reports `changed == false`
    /// when the requested specialist was already active.
    pub fn switch_specialist(&self, room_name: &str, requested: Domain) -> Option<SwitchOutcome> {
        let mut sessions = self.inner.write().expect("session registry lock poisoned");
        let entry = sessions.get_mut(room_name)?;
        Some(switchboard_intent::switch(&mut entry.specialist, requested))
    }

    /// Ends a session: cancels its pipeline and removes its entry.
    ///
    /// Idempotent by design: ending an unknown or already-ended session is
    /// "already ended", not an error. Returns whether a live session was
    /// actually cancelled.
    pub fn end(&self, room_name: &str) -> bool {
        match self.remove(room_name) {
            Some(entry) => {
                entry.cancel.cancel();
                true
            }
            None => false,
        }
    }

    /// Cancels every live session. Called once at process shutdown.
    pub fn shutdown(&self) {
        let drained: Vec<SessionEntry> = {
            let mut sessions = self.inner.write().expect("session registry lock poisoned");
            sessions.drain().map(|(_, entry)| entry).collect()
        };
        for entry in &drained {
            entry.cancel.cancel();
        }
        if !drained.is_empty() {
            tracing::info!(count = drained.len(), "cancelled live sessions at shutdown");
        }
    }

    /// Number of live sessions.
    pub fn len(&self) -> usize {
        self.inner
            .read()
            .expect("session registry lock poisoned")
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Removes a session's registry entry when dropped.
///
/// The pipeline task holds one of these so the entry is cleaned up on normal
/// completion, cooperative cancellation, and panic alike.
#[derive(Debug)]
pub struct RegistryGuard {
    registry: SessionRegistry,
    room_name: String,
}

impl RegistryGuard {
    pub fn new(registry: SessionRegistry, room_name: impl Into<String>) -> Self {
        Self {
            registry,
            room_name: room_name.into(),
        }
    }
}

impl Drop for RegistryGuard {
    fn drop(&mut self) {
        if self.registry.remove(&self.room_name).is_some() {
            tracing::debug!(room = %self.room_name, "session unregistered");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_get_remove() {
        let registry = SessionRegistry::new();
        registry.register("room-1", Some("user-7".into()), CancellationToken::new());

        let entry = registry.get("room-1").unwrap();
        assert_eq!(entry.user_id.as_deref(), Some("user-7"));
        assert_eq!(entry.specialist, Specialist::Orchestrator);

        assert!(registry.remove("room-1").is_some());
        assert!(registry.get("room-1").is_none());
    }

    #[test]
    fn end_is_idempotent() {
        let registry = SessionRegistry::new();
        let token = CancellationToken::new();
        registry.register("room-1", None, token.clone());

        assert!(registry.end("room-1"));
        assert!(token.is_cancelled());

        // Second end, and ends of rooms never registered, are not errors.
        assert!(!registry.end("room-1"));
        assert!(!registry.end("no-such-room"));
    }

    #[test]
    fn switch_specialist_tracks_state_per_room() {
        let registry = SessionRegistry::new();
        registry.register("room-1", None, CancellationToken::new());

        let outcome = registry
            .switch_specialist("room-1", Domain::Sales)
            .unwrap();
        assert!(outcome.changed);
        assert_eq!(outcome.previous, Specialist::Orchestrator);
        assert_eq!(
            registry.get("room-1").unwrap().specialist,
            Specialist::Domain(Domain::Sales)
        );

        let outcome = registry
            .switch_specialist("room-1", Domain::Sales)
            .unwrap();
        assert!(!outcome.changed);

        assert!(registry.switch_specialist("ghost", Domain::Sales).is_none());
    }

    #[test]
    fn guard_removes_entry_on_drop() {
        let registry = SessionRegistry::new();
        registry.register("room-1", None, CancellationToken::new());
        {
            let _guard = RegistryGuard::new(registry.clone(), "room-1");
        }
        assert!(registry.is_empty());
    }

    #[test]
    fn shutdown_cancels_everything() {
        let registry = SessionRegistry::new();
        let a = CancellationToken::new();
        let b = CancellationToken::new();
        registry.register("room-a", None, a.clone());
        registry.register("room-b", None, b.clone());

        registry.shutdown();
        assert!(a.is_cancelled());
        assert!(b.is_cancelled());
        assert!(registry.is_empty());
    }
}
