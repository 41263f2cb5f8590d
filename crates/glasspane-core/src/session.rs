//! The session handle, its cell, and the external-service seams.
//!
//! Exactly one live session may exist at a time. The handle is owned by the
//! host and never crosses the process boundary; the UI only ever sees its
//! existence and a metadata snapshot.

use crate::error::Result;

use std::{
    sync::Arc,
    time::{SystemTime, UNIX_EPOCH},
};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, mpsc};
use uuid::Uuid;

/// Credentials and configuration for a session initialize request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeParams {
    /// API key presented to the external service.
    pub api_key: String,
    /// Conversation profile name.
    #[serde(default)]
    pub profile: String,
    /// Response language.
    #[serde(default)]
    pub language: String,
}

/// Session metadata exposed to the UI process in place of the handle itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    /// Conversation profile the session was opened with.
    pub profile: String,
    /// Response language the session was opened with.
    pub language: String,
    /// Unix milliseconds at which the session connected.
    pub connected_at_ms: u64,
    /// Number of conversation turns completed so far.
    pub turn_count: u64,
}

/// One completed prompt/response exchange.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationTurn {
    /// Unique turn id.
    pub id: Uuid,
    /// The prompt text sent by the user.
    pub prompt: String,
    /// The full response text.
    pub response: String,
    /// Unix milliseconds at which the turn completed.
    pub timestamp_ms: u64,
}

/// Unix milliseconds now, saturating at zero for pre-epoch clocks.
pub fn unix_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Out-of-band notifications from a live session's stream.
///
/// The host pumps these into the event channel; they are how response
/// content and asynchronous service failures reach the UI.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// A status code from the service.
    Status(String),
    /// An incremental chunk of response text.
    ResponseChunk(String),
    /// The current response finished.
    ResponseComplete,
    /// A prompt/response pair was completed and recorded.
    TurnSaved(ConversationTurn),
    /// An asynchronous service failure. Surfaced as an `"Error: <msg>"`
    /// status update, never as a command reply.
    Error(String),
    /// The service closed the session.
    Closed,
}

/// A handle to one active external conversation session.
///
/// The streaming protocol behind it is opaque; the control plane only ever
/// sends text, stops capture, and reads metadata.
#[async_trait]
pub trait LiveSession: Send + Sync {
    /// Forward user text to the service. Fire-and-forget with respect to the
    /// answer: response content arrives on the session's event stream.
    async fn send_text(&self, text: &str) -> Result<()>;

    /// Ask the service to stop capturing audio.
    async fn stop_capture(&self) -> Result<()>;

    /// Metadata snapshot; never fails.
    fn snapshot(&self) -> SessionSnapshot;
}

/// Opens sessions against the external service.
#[async_trait]
pub trait SessionConnector: Send + Sync {
    /// Request a new session. Events for the session's lifetime are
    /// delivered on `events`.
    async fn connect(
        &self,
        params: InitializeParams,
        events: mpsc::Sender<SessionEvent>,
    ) -> Result<Arc<dyn LiveSession>>;
}

/// The single mutable slot holding the active session handle.
///
/// Commands that read and then conditionally write the slot hold the lock
/// across both steps; nothing awaits while the lock is held, so two
/// concurrent writers can never interleave inside one transition.
#[derive(Default)]
pub struct SessionCell {
    slot: Mutex<Option<Arc<dyn LiveSession>>>,
}

impl SessionCell {
    /// An empty cell.
    pub fn new() -> Self {
        Self::default()
    }

    /// The current handle, if present.
    pub async fn get(&self) -> Option<Arc<dyn LiveSession>> {
        self.slot.lock().await.clone()
    }

    /// Whether a session is present.
    pub async fn is_present(&self) -> bool {
        self.slot.lock().await.is_some()
    }

    /// Install a new handle, discarding any previous one without teardown
    /// (fire-and-replace).
    pub async fn replace(&self, handle: Arc<dyn LiveSession>) {
        *self.slot.lock().await = Some(handle);
    }

    /// Clear the slot unconditionally.
    pub async fn clear(&self) {
        *self.slot.lock().await = None;
    }

    /// Clear the slot only if it still holds `handle`.
    ///
    /// Used by the session event pump: a `Closed` notification from a
    /// session that has already been replaced must not evict its successor.
    pub async fn clear_if(&self, handle: &Arc<dyn LiveSession>) -> bool {
        let mut slot = self.slot.lock().await;
        match slot.as_ref() {
            Some(current) if Arc::ptr_eq(current, handle) => {
                *slot = None;
                true
            }
            _ => false,
        }
    }
}
