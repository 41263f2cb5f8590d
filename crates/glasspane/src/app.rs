//! The host-side command dispatcher.
//!
//! Receives parsed commands from the bridge, routes session commands onto
//! the shared session state and window commands onto the main thread via
//! the event-loop proxy, and drives the content-ready sequence the first
//! time a UI client connects.

use crate::{WindowCommand, storage};

use std::{panic::Location, path::PathBuf, time::Duration};

use error_location::ErrorLocation;
use glasspane_core::{
    CommandReply, CommandRequest, ControlError, EventBus, SessionCommands, UiEvent,
};
use tao::event_loop::EventLoopProxy;
use tokio::sync::{mpsc, oneshot, watch};
use tracing::{debug, info, instrument, warn};

/// Delay between the first UI connection and the ready sequence, letting
/// the UI finish its own first paint before hotkeys go live.
const CONTENT_SETTLE: Duration = Duration::from_millis(150);

/// Messages into the app's inbox from the bridge.
pub enum AppMessage {
    /// A parsed command awaiting a reply.
    Command {
        /// The command itself.
        request: CommandRequest,
        /// Where the outcome goes; dropping it without sending reads as a
        /// handler failure on the bridge side.
        reply: oneshot::Sender<Dispatched>,
    },
    /// A UI client opened the socket.
    UiConnected,
}

/// A command outcome, optionally carrying a follow-up the bridge runs
/// only after the reply is queued on the socket.
///
/// Side effects that broadcast events (session event pumps, the applied
/// opacity, window teardown) go into the follow-up; running them behind
/// the queued reply keeps each socket's order as reply first, then the
/// events the command caused.
pub struct Dispatched {
    /// The reply to put on the wire.
    pub reply: CommandReply,
    /// Runs after the reply is queued, if present.
    pub after_reply: Option<Box<dyn FnOnce() + Send>>,
}

impl Dispatched {
    /// An outcome with no follow-up.
    pub fn reply(reply: CommandReply) -> Self {
        Self {
            reply,
            after_reply: None,
        }
    }

    /// An outcome whose side effects must wait for the reply to be queued.
    pub fn then(reply: CommandReply, after_reply: impl FnOnce() + Send + 'static) -> Self {
        Self {
            reply,
            after_reply: Some(Box::new(after_reply)),
        }
    }
}

impl From<CommandReply> for Dispatched {
    fn from(reply: CommandReply) -> Self {
        Self::reply(reply)
    }
}

/// The dispatch loop's state.
pub struct App {
    commands: SessionCommands,
    bus: EventBus,
    window_proxy: EventLoopProxy<WindowCommand>,
    message_rx: mpsc::Receiver<AppMessage>,
    shutdown_tx: watch::Sender<bool>,
    keybinds_path: PathBuf,
    content_loaded: bool,
}

impl App {
    /// Assemble the dispatcher.
    pub fn new(
        commands: SessionCommands,
        bus: EventBus,
        window_proxy: EventLoopProxy<WindowCommand>,
        message_rx: mpsc::Receiver<AppMessage>,
        shutdown_tx: watch::Sender<bool>,
        keybinds_path: PathBuf,
    ) -> Self {
        Self {
            commands,
            bus,
            window_proxy,
            message_rx,
            shutdown_tx,
            keybinds_path,
            content_loaded: false,
        }
    }

    /// Run until the inbox closes (the bridge shut down) or a close
    /// command lands.
    #[instrument(skip(self))]
    pub async fn run(mut self) {
        info!("Command dispatcher running");

        while let Some(message) = self.message_rx.recv().await {
            match message {
                AppMessage::Command { request, reply } => self.dispatch(request, reply),
                AppMessage::UiConnected => self.on_ui_connected(),
            }
        }

        let _ = self.shutdown_tx.send(true);
        info!("Command dispatcher stopped");
    }

    /// Route one command. Session commands run on their own task so a
    /// slow service call never blocks the inbox.
    fn dispatch(&mut self, request: CommandRequest, reply: oneshot::Sender<Dispatched>) {
        match request {
            CommandRequest::InitializeSession(params) => {
                let commands = self.commands.clone();
                tokio::spawn(async move {
                    let (outcome, activation) = commands.initialize(params).await;
                    let dispatched = match activation {
                        // The event pump starts only after the reply is on
                        // the socket queue, so the session's connect status
                        // cannot overtake it.
                        Some(activation) => {
                            Dispatched::then(outcome, move || commands.activate(activation))
                        }
                        None => outcome.into(),
                    };
                    let _ = reply.send(dispatched);
                });
            }
            CommandRequest::SendMessage { text } => {
                let commands = self.commands.clone();
                tokio::spawn(async move {
                    let _ = reply.send(commands.send_message(&text).await.into());
                });
            }
            CommandRequest::StopAudioCapture => {
                let commands = self.commands.clone();
                tokio::spawn(async move {
                    let _ = reply.send(commands.stop_audio_capture().await.into());
                });
            }
            CommandRequest::GetSessionData => {
                let commands = self.commands.clone();
                tokio::spawn(async move {
                    let _ = reply.send(commands.session_data().await.into());
                });
            }
            CommandRequest::SetWindowOpacity { opacity } => self.set_opacity(opacity, reply),
            CommandRequest::CloseWindow => {
                // Teardown waits behind the queued reply so the UI observes
                // success before the socket starts closing.
                let window_proxy = self.window_proxy.clone();
                let _ = reply.send(Dispatched::then(CommandReply::ok(), move || {
                    if window_proxy.send_event(WindowCommand::Close).is_err() {
                        warn!("Event loop gone before close command was delivered");
                    }
                }));
            }
            CommandRequest::SelectCaptureSource => self.select_capture_source(reply),
        }
    }

    /// Hand the opacity value to the main thread; the applied value is
    /// broadcast only once the reply is queued.
    fn set_opacity(&self, value: f64, reply: oneshot::Sender<Dispatched>) {
        let (done_tx, done_rx) = oneshot::channel();
        let command = WindowCommand::SetOpacity {
            value,
            done: done_tx,
        };
        if self.window_proxy.send_event(command).is_err() {
            let _ = reply.send(window_unavailable().into());
            return;
        }

        let bus = self.bus.clone();
        tokio::spawn(async move {
            let dispatched = match done_rx.await {
                Ok(true) => Dispatched::then(CommandReply::ok(), move || {
                    bus.emit(&UiEvent::WindowOpacity { value });
                }),
                Ok(false) | Err(_) => window_unavailable().into(),
            };
            let _ = reply.send(dispatched);
        });
    }

    fn select_capture_source(&self, reply: oneshot::Sender<Dispatched>) {
        let (selection_tx, selection_rx) = oneshot::channel();
        let command = WindowCommand::RouteCapture {
            reply: selection_tx,
        };
        if self.window_proxy.send_event(command).is_err() {
            let _ = reply.send(window_unavailable().into());
            return;
        }

        tokio::spawn(async move {
            let outcome = match selection_rx.await {
                Ok(Some(selection)) => match serde_json::to_value(&selection) {
                    Ok(data) => CommandReply::ok_with(data),
                    Err(e) => CommandReply::fail(format!("Selection encoding failed: {e}")),
                },
                Ok(None) => CommandReply::fail("No screen source available"),
                Err(_) => window_unavailable(),
            };
            let _ = reply.send(outcome.into());
        });
    }

    /// First connection drives the ready sequence: settle delay, keybind
    /// pull, content-protection re-assert, registry install, Ready status.
    /// Reconnects skip it.
    fn on_ui_connected(&mut self) {
        if self.content_loaded {
            debug!("UI reconnected");
            return;
        }
        self.content_loaded = true;

        let window_proxy = self.window_proxy.clone();
        let bus = self.bus.clone();
        let keybinds_path = self.keybinds_path.clone();
        tokio::spawn(async move {
            tokio::time::sleep(CONTENT_SETTLE).await;

            let keybinds = storage::load_keybinds(&keybinds_path);
            if window_proxy
                .send_event(WindowCommand::ReassertContentProtection)
                .is_err()
                || window_proxy
                    .send_event(WindowCommand::InstallKeybinds(keybinds))
                    .is_err()
            {
                warn!("Event loop gone during ready sequence");
                return;
            }

            bus.emit(&UiEvent::StatusUpdate {
                status: "Ready".to_owned(),
            });
            info!("Content ready sequence complete");
        });
    }
}

#[track_caller]
fn window_unavailable() -> CommandReply {
    CommandReply::from(ControlError::WindowUnavailable {
        location: ErrorLocation::from(Location::caller()),
    })
}
