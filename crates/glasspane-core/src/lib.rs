//! Glasspane Core Library
//!
//! Platform-independent control plane for the Glasspane overlay host:
//! the command/event channel contract, the session handle cell, the keybind
//! model, and the capture routing policy. The host binary supplies the OS
//! collaborators (window, hotkeys, displays) and the external-service
//! connector.
//!
//! # Example
//!
//! ```no_run
//! use glasspane_core::{EventBus, EventTopic, KeybindSet, SessionCell, SessionCommands};
//!
//! use std::sync::Arc;
//!
//! # fn connector() -> Arc<dyn glasspane_core::SessionConnector> { unimplemented!() }
//! # async fn run() {
//! let bus = EventBus::new();
//! let _sub = bus.subscribe(EventTopic::StatusUpdate, |event| {
//!     println!("{event:?}");
//! });
//!
//! let keybinds = KeybindSet::default();
//! let commands = SessionCommands::new(Arc::new(SessionCell::new()), bus, connector());
//! let reply = commands.send_message("hello").await;
//! assert!(!reply.success); // no session yet
//! # let _ = keybinds;
//! # }
//! ```

mod capture;
mod commands;
mod error;
mod events;
mod keybinds;
mod protocol;
mod session;

pub use {
    capture::{AudioRoute, CaptureSelection, CaptureSource, SourceEnumerator, SourceKind, route_capture},
    commands::{SessionActivation, SessionCommands},
    error::{ControlError, Result},
    events::{EventBus, EventTopic, Subscription, UiEvent},
    keybinds::{KeybindAction, KeybindSet},
    protocol::{CommandEnvelope, CommandReply, CommandRequest, ReplyEnvelope},
    session::{
        ConversationTurn, InitializeParams, LiveSession, SessionCell, SessionConnector,
        SessionEvent, SessionSnapshot, unix_millis,
    },
};

#[cfg(test)]
mod tests;
