//! Async side of the hotkey subsystem: receives pressed events and turns
//! them into window effects or UI signals.

use crate::{
    hotkeys::HotkeyMap,
    window_command::{MoveDirection, WindowCommand},
};

use std::time::Duration;

use glasspane_core::{EventBus, KeybindAction, UiEvent};
use global_hotkey::{GlobalHotKeyEvent, HotKeyState};
use tao::event_loop::EventLoopProxy;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, instrument, warn};

/// Listens on the global hotkey event channel and dispatches actions.
pub struct HotkeyListener {
    map_rx: watch::Receiver<HotkeyMap>,
    window_proxy: EventLoopProxy<WindowCommand>,
    bus: EventBus,
}

impl HotkeyListener {
    /// Wire the listener to the registry's mapping and its effect targets.
    pub fn new(
        map_rx: watch::Receiver<HotkeyMap>,
        window_proxy: EventLoopProxy<WindowCommand>,
        bus: EventBus,
    ) -> Self {
        Self {
            map_rx,
            window_proxy,
            bus,
        }
    }

    /// Run the hotkey event loop until shutdown.
    #[instrument(skip(self, shutdown_rx))]
    pub async fn run(mut self, mut shutdown_rx: watch::Receiver<bool>) {
        let receiver = GlobalHotKeyEvent::receiver().clone();
        let (event_tx, mut event_rx) = mpsc::channel(32);

        // Single persistent blocking task that forwards hotkey events.
        // GlobalHotKeyEvent::receiver() returns a crossbeam_channel::Receiver
        // which has blocking recv() -- zero polling, instant response, one
        // thread.
        //
        // Shutdown: when event_rx is dropped (loop breaks), the next
        // event_tx.blocking_send() fails, breaking the blocking loop.
        let handle = tokio::task::spawn_blocking(move || {
            while let Ok(event) = receiver.recv() {
                if event_tx.blocking_send(event).is_err() {
                    break;
                }
            }
        });

        loop {
            tokio::select! {
                _ = shutdown_rx.changed() => {
                    info!("Hotkey listener shutting down");
                    break;
                }
                Some(event) = event_rx.recv() => {
                    if event.state == HotKeyState::Pressed {
                        self.handle_press(event.id);
                    }
                }
            }
        }

        // Drop event_rx to unblock the blocking task's next blocking_send().
        drop(event_rx);

        // Best-effort join: the blocking task may be stuck in recv() if no
        // hotkey event arrives after shutdown. Use a timeout to avoid
        // hanging; the runtime cleans the task up on process exit anyway.
        match tokio::time::timeout(Duration::from_secs(1), handle).await {
            Ok(Ok(())) => debug!("Hotkey event forwarder stopped cleanly"),
            Ok(Err(e)) => warn!(error = ?e, "Hotkey event forwarder task panicked"),
            Err(_) => debug!(
                "Hotkey event forwarder did not stop within timeout, \
                   will be cleaned up on exit"
            ),
        }
    }

    fn handle_press(&mut self, id: u32) {
        let Some(action) = self.map_rx.borrow_and_update().get(&id).copied() else {
            return;
        };
        debug!(action = action.key(), "Hotkey pressed");

        let command = match action {
            KeybindAction::MoveUp => WindowCommand::Nudge(MoveDirection::Up),
            KeybindAction::MoveDown => WindowCommand::Nudge(MoveDirection::Down),
            KeybindAction::MoveLeft => WindowCommand::Nudge(MoveDirection::Left),
            KeybindAction::MoveRight => WindowCommand::Nudge(MoveDirection::Right),
            KeybindAction::ToggleVisibility => WindowCommand::ToggleVisibility,
            KeybindAction::ToggleClickThrough => WindowCommand::ToggleClickThrough,
            KeybindAction::NextStep => {
                // Pure signal: the UI layer decides what "next step" means.
                self.bus.emit(&UiEvent::NextStepShortcut);
                return;
            }
        };

        if self.window_proxy.send_event(command).is_err() {
            warn!("Event loop gone; dropping hotkey effect");
        }
    }
}
