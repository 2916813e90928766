//! Conversation context with an append-observer hook.
//!
//! Listeners (the live-transcript relay) subscribe to a broadcast channel
//! instead of wrapping the append path, so side effects can never block or
//! fail a voice turn.

use std::sync::Mutex;
use switchboard_types::{Message, Role};
use tokio::sync::broadcast;

/// Capacity of the append-event channel. A lagging listener skips messages
/// rather than applying backpressure to the conversation.
const EVENT_CHANNEL_CAPACITY: usize = 256;

/// The running conversation of one session.
#[derive(Debug)]
pub struct Conversation {
    messages: Mutex<Vec<Message>>,
    events: broadcast::Sender<Message>,
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}

impl Conversation {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            messages: Mutex::new(Vec::new()),
            events,
        }
    }

    /// Appends a message and notifies subscribed listeners.
    pub fn append(&self, message: Message) {
        self.messages
            .lock()
            .expect("conversation lock poisoned")
            .push(message.clone());
        // No receivers is fine; the conversation does not depend on listeners.
        let _ = self.events.send(message);
    }

    /// Convenience: append a message stamped now.
    pub fn record(&self, role: Role, content: impl Into<String>) {
        self.append(Message::now(role, content));
    }

    /// Subscribes to append events.
    pub fn subscribe(&self) -> broadcast::Receiver<Message> {
        self.events.subscribe()
    }

    /// Snapshot of the conversation so far.
    pub fn messages(&self) -> Vec<Message> {
        self.messages
            .lock()
            .expect("conversation lock poisoned")
            .clone()
    }

    pub fn len(&self) -> usize {
        self.messages
            .lock()
            .expect("conversation lock poisoned")
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn append_notifies_subscribers() {
        let conversation = Conversation::new();
        let mut rx = conversation.subscribe();

        conversation.record(Role::User, "automate my reports");
        conversation.record(Role::Assistant, "what tools do you use?");

        let first = rx.recv().await.unwrap();
        assert_eq!(first.role, Role::User);
        assert_eq!(first.content, "automate my reports");

        let second = rx.recv().await.unwrap();
        assert_eq!(second.role, Role::Assistant);

        assert_eq!(conversation.len(), 2);
    }

    #[test]
    fn append_without_subscribers_is_fine() {
        let conversation = Conversation::new();
        conversation.record(Role::User, "hello");
        assert_eq!(conversation.messages()[0].content, "hello");
    }
}
