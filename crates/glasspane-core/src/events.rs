//! Broadcast event channel from the host to the UI process.
//!
//! One-directional, many-listener, no acknowledgment, no back-pressure.
//! Topics and payloads are fixed; listeners are held in an explicit
//! topic → ordered list mapping and unsubscribe by dropping their
//! [`Subscription`].

use crate::session::ConversationTurn;

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, PoisonError, Weak},
};

use serde::Serialize;

/// Event topics on the host → UI channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventTopic {
    /// String status codes, including `"Error: <msg>"`.
    StatusUpdate,
    /// Incremental or final response text.
    ResponseUpdate,
    /// Session initialization started/finished.
    SessionInitializing,
    /// A completed conversation turn was recorded.
    ConversationTurnSaved,
    /// The nextStep hotkey fired; pure signal, no payload.
    NextStepShortcut,
    /// The opacity value last applied by `setWindowOpacity`; the UI chrome
    /// composites the translucent surface.
    WindowOpacity,
}

/// An event broadcast to the UI process.
///
/// Serialized as JSON with an `"event"` tag field for type discrimination.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event")]
pub enum UiEvent {
    /// Status code from the host or the service stream.
    #[serde(rename = "status-update")]
    StatusUpdate {
        /// The status code.
        status: String,
    },

    /// Incremental or final response text.
    #[serde(rename = "response-update")]
    ResponseUpdate {
        /// Response text chunk.
        text: String,
    },

    /// Session initialization started (`true`) or finished (`false`).
    #[serde(rename = "session-initializing")]
    SessionInitializing {
        /// Whether initialization is in progress.
        active: bool,
    },

    /// A completed conversation turn.
    #[serde(rename = "conversation-turn-saved")]
    ConversationTurnSaved {
        /// The recorded turn.
        turn: ConversationTurn,
    },

    /// The nextStep hotkey fired.
    #[serde(rename = "next-step-shortcut")]
    NextStepShortcut,

    /// Window opacity changed.
    #[serde(rename = "window-opacity")]
    WindowOpacity {
        /// The value applied, verbatim.
        value: f64,
    },
}

impl UiEvent {
    /// The topic this event belongs to.
    pub fn topic(&self) -> EventTopic {
        match self {
            UiEvent::StatusUpdate { .. } => EventTopic::StatusUpdate,
            UiEvent::ResponseUpdate { .. } => EventTopic::ResponseUpdate,
            UiEvent::SessionInitializing { .. } => EventTopic::SessionInitializing,
            UiEvent::ConversationTurnSaved { .. } => EventTopic::ConversationTurnSaved,
            UiEvent::NextStepShortcut => EventTopic::NextStepShortcut,
            UiEvent::WindowOpacity { .. } => EventTopic::WindowOpacity,
        }
    }
}

type Listener = Arc<dyn Fn(&UiEvent) + Send + Sync>;

#[derive(Default)]
struct BusInner {
    next_id: u64,
    listeners: HashMap<EventTopic, Vec<(u64, Listener)>>,
}

/// Topic → ordered listener list with a `subscribe → disposer` contract.
///
/// Cheap to clone; clones share the same listener table.
#[derive(Clone, Default)]
pub struct EventBus {
    inner: Arc<Mutex<BusInner>>,
}

impl EventBus {
    /// An empty bus.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener for one topic.
    ///
    /// Listeners on the same topic are invoked in registration order.
    /// Dropping the returned [`Subscription`] unregisters the listener.
    #[must_use = "dropping the subscription unregisters the listener"]
    pub fn subscribe<F>(&self, topic: EventTopic, listener: F) -> Subscription
    where
        F: Fn(&UiEvent) + Send + Sync + 'static,
    {
        let mut inner = self.lock();
        let id = inner.next_id;
        inner.next_id += 1;
        inner
            .listeners
            .entry(topic)
            .or_default()
            .push((id, Arc::new(listener)));

        Subscription {
            bus: Arc::downgrade(&self.inner),
            topic,
            id,
        }
    }

    /// Broadcast an event to every listener of its topic.
    ///
    /// Listeners run outside the bus lock, so a listener may subscribe or
    /// unsubscribe from within its callback.
    pub fn emit(&self, event: &UiEvent) {
        let listeners: Vec<Listener> = {
            let inner = self.lock();
            inner
                .listeners
                .get(&event.topic())
                .map(|entries| entries.iter().map(|(_, l)| Arc::clone(l)).collect())
                .unwrap_or_default()
        };

        for listener in listeners {
            listener(event);
        }
    }

    /// Number of live listeners on a topic.
    pub fn listener_count(&self, topic: EventTopic) -> usize {
        self.lock()
            .listeners
            .get(&topic)
            .map(Vec::len)
            .unwrap_or(0)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BusInner> {
        // A poisoned bus still holds a consistent listener table.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// RAII disposer returned by [`EventBus::subscribe`].
pub struct Subscription {
    bus: Weak<Mutex<BusInner>>,
    topic: EventTopic,
    id: u64,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(inner) = self.bus.upgrade() {
            let mut inner = inner.lock().unwrap_or_else(PoisonError::into_inner);
            if let Some(entries) = inner.listeners.get_mut(&self.topic) {
                entries.retain(|(id, _)| *id != self.id);
            }
        }
    }
}
