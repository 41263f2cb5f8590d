//! Session-facing command handlers.
//!
//! These implement the command-channel semantics that touch the session
//! handle cell. Each handler flattens every failure into a
//! [`CommandReply`]; nothing propagates a raw fault toward the UI process.

use crate::{
    error::ControlError,
    events::{EventBus, UiEvent},
    protocol::CommandReply,
    session::{InitializeParams, LiveSession, SessionCell, SessionConnector, SessionEvent},
};

use std::{panic::Location, sync::Arc};

use error_location::ErrorLocation;
use tokio::sync::mpsc;
use tracing::{info, instrument, warn};

/// Buffer for one session's out-of-band event stream.
const SESSION_EVENT_BUFFER: usize = 64;

/// A freshly connected session whose event pump has not started yet.
///
/// Returned by [`SessionCommands::initialize`] so the caller can put the
/// initialize reply on the wire first; until the activation is handed to
/// [`SessionCommands::activate`], every session event (including the
/// service's `"Live session connected"` status) stays queued on the
/// stream and cannot overtake the reply.
pub struct SessionActivation {
    handle: Arc<dyn LiveSession>,
    events: mpsc::Receiver<SessionEvent>,
}

/// Command handlers operating on the session handle cell.
///
/// Cheap to clone; clones share the same cell, bus, and connector.
#[derive(Clone)]
pub struct SessionCommands {
    cell: Arc<SessionCell>,
    bus: EventBus,
    connector: Arc<dyn SessionConnector>,
}

impl SessionCommands {
    /// Wire the handlers to their collaborators.
    pub fn new(cell: Arc<SessionCell>, bus: EventBus, connector: Arc<dyn SessionConnector>) -> Self {
        Self {
            cell,
            bus,
            connector,
        }
    }

    /// The shared session handle cell.
    pub fn cell(&self) -> &Arc<SessionCell> {
        &self.cell
    }

    /// `initializeSession`: open a new session, fire-and-replace.
    ///
    /// Any previous handle is discarded without teardown. On failure the
    /// cell keeps its prior state and no activation is returned. The caller
    /// delivers the reply, then hands the activation to [`Self::activate`];
    /// session events buffered in the meantime flow after the reply.
    #[instrument(skip(self, params), fields(profile = %params.profile))]
    pub async fn initialize(
        &self,
        params: InitializeParams,
    ) -> (CommandReply, Option<SessionActivation>) {
        self.bus.emit(&UiEvent::SessionInitializing { active: true });

        let (event_tx, event_rx) = mpsc::channel(SESSION_EVENT_BUFFER);
        let outcome = match self.connector.connect(params, event_tx).await {
            Ok(handle) => {
                self.cell.replace(Arc::clone(&handle)).await;
                info!("Session installed");
                let activation = SessionActivation {
                    handle,
                    events: event_rx,
                };
                (CommandReply::ok(), Some(activation))
            }
            Err(err) => {
                warn!(error = %err, "Session initialize failed");
                (CommandReply::from(err), None)
            }
        };

        self.bus.emit(&UiEvent::SessionInitializing { active: false });
        outcome
    }

    /// Start pumping an initialized session's event stream.
    ///
    /// Deliberately separate from [`Self::initialize`]: the initialize
    /// reply must be on the wire before the first session event.
    pub fn activate(&self, activation: SessionActivation) {
        self.spawn_event_pump(activation.handle, activation.events);
    }

    /// `sendMessage`: forward text to the held session.
    ///
    /// Fire-and-forget with respect to the answer; the reply only confirms
    /// the dispatch. With no session present the service is never reached.
    #[instrument(skip(self, text), fields(text_len = text.len()))]
    pub async fn send_message(&self, text: &str) -> CommandReply {
        let Some(handle) = self.cell.get().await else {
            return CommandReply::from(no_active_session());
        };

        match handle.send_text(text).await {
            Ok(()) => CommandReply::ok(),
            Err(err) => {
                warn!(error = %err, "Send failed");
                CommandReply::from(err)
            }
        }
    }

    /// `stopAudioCapture`: ask the held session to stop capturing.
    #[instrument(skip(self))]
    pub async fn stop_audio_capture(&self) -> CommandReply {
        let Some(handle) = self.cell.get().await else {
            return CommandReply::from(no_active_session());
        };

        match handle.stop_capture().await {
            Ok(()) => CommandReply::ok(),
            Err(err) => {
                warn!(error = %err, "Stop capture failed");
                CommandReply::from(err)
            }
        }
    }

    /// `getSessionData`: metadata snapshot, never a thrown fault.
    #[instrument(skip(self))]
    pub async fn session_data(&self) -> CommandReply {
        let Some(handle) = self.cell.get().await else {
            return CommandReply::from(no_active_session());
        };

        match serde_json::to_value(handle.snapshot()) {
            Ok(data) => CommandReply::ok_with(data),
            Err(err) => CommandReply::fail(format!("Failed to read session data: {err}")),
        }
    }

    /// Pump one session's out-of-band events onto the UI event channel.
    ///
    /// Runs until the stream closes. A `Closed` notification clears the
    /// cell only if this session is still the one installed; a handle that
    /// was already replaced must not evict its successor.
    fn spawn_event_pump(
        &self,
        handle: Arc<dyn LiveSession>,
        mut events: mpsc::Receiver<SessionEvent>,
    ) {
        let cell = Arc::clone(&self.cell);
        let bus = self.bus.clone();

        tokio::spawn(async move {
            while let Some(event) = events.recv().await {
                match event {
                    SessionEvent::Status(status) => {
                        bus.emit(&UiEvent::StatusUpdate { status });
                    }
                    SessionEvent::ResponseChunk(text) => {
                        bus.emit(&UiEvent::ResponseUpdate { text });
                    }
                    SessionEvent::ResponseComplete => {
                        bus.emit(&UiEvent::StatusUpdate {
                            status: "Response complete".to_string(),
                        });
                    }
                    SessionEvent::TurnSaved(turn) => {
                        bus.emit(&UiEvent::ConversationTurnSaved { turn });
                    }
                    SessionEvent::Error(message) => {
                        bus.emit(&UiEvent::StatusUpdate {
                            status: format!("Error: {message}"),
                        });
                    }
                    SessionEvent::Closed => {
                        if cell.clear_if(&handle).await {
                            bus.emit(&UiEvent::StatusUpdate {
                                status: "Session closed".to_string(),
                            });
                        }
                        break;
                    }
                }
            }
        });
    }
}

#[track_caller]
fn no_active_session() -> ControlError {
    ControlError::NoActiveSession {
        location: ErrorLocation::from(Location::caller()),
    }
}
