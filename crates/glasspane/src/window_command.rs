use glasspane_core::{CaptureSelection, KeybindSet};

use tokio::sync::oneshot;

/// Direction of a hotkey-driven window nudge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDirection {
    /// Toward the top of the screen.
    Up,
    /// Toward the bottom of the screen.
    Down,
    /// Toward the left edge.
    Left,
    /// Toward the right edge.
    Right,
}

/// Commands sent from the async runtime to the main UI thread.
///
/// The main thread owns the overlay window and the global hotkey manager
/// (both are `!Send`), so every window mutation and registry rebuild flows
/// through this enum via the tao event loop proxy.
pub enum WindowCommand {
    /// Apply a window opacity value, verbatim. Answers whether the window
    /// still exists.
    SetOpacity {
        /// The opacity fraction from the command channel.
        value: f64,
        /// `Ok` once applied; `Err` when the window is gone.
        done: oneshot::Sender<bool>,
    },
    /// Nudge the window one increment in a direction.
    Nudge(MoveDirection),
    /// Show/hide the window.
    ToggleVisibility,
    /// Toggle mouse click-through.
    ToggleClickThrough,
    /// Re-assert the content-protection flag.
    ReassertContentProtection,
    /// Rebuild the hotkey registry from a new keybind set and mark the
    /// window Ready.
    InstallKeybinds(KeybindSet),
    /// Run the capture routing policy against a fresh display enumeration.
    RouteCapture {
        /// The selection, or `None` when no screen source exists.
        reply: oneshot::Sender<Option<CaptureSelection>>,
    },
    /// Tear the window down and exit the event loop.
    Close,
}
