//! The single overlay window and its lifecycle.
//!
//! `Created → ContentLoading → Ready → Closed` (terminal). Content
//! protection and always-on-top are applied by the window builder, before
//! any content can render. Position is computed once against the primary
//! display; the window never reflows on display changes.

use crate::{AppError, AppResult, config::WindowConfig, window_command::MoveDirection};

use std::panic::Location;

use error_location::ErrorLocation;
use glasspane_core::{CaptureSource, SourceEnumerator, SourceKind};
use tao::{
    dpi::{PhysicalPosition, PhysicalSize},
    event_loop::EventLoopWindowTarget,
    window::{Window, WindowBuilder},
};
use tracing::{debug, info, instrument, warn};

/// Window lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecyclePhase {
    /// Window object exists, flags not yet applied.
    Created,
    /// Flags applied, UI content not yet loaded.
    ContentLoading,
    /// Content loaded, keybinds installed.
    Ready,
    /// Torn down. Terminal.
    Closed,
}

/// The overlay window, owned by the main thread.
pub struct OverlayWindow {
    window: Option<Window>,
    phase: LifecyclePhase,
    move_increment: i32,
    click_through: bool,
    visible: bool,
}

impl OverlayWindow {
    /// Create the overlay window against the primary display.
    ///
    /// Content-protection and always-on-top are set by the builder so there
    /// is no window of exposure between creation and protection.
    #[track_caller]
    #[instrument(skip(target))]
    pub fn create<T>(target: &EventLoopWindowTarget<T>, config: &WindowConfig) -> AppResult<Self> {
        let window = WindowBuilder::new()
            .with_title("glasspane")
            .with_inner_size(PhysicalSize::new(config.width, config.height))
            .with_transparent(true)
            .with_always_on_top(true)
            .with_content_protection(true)
            .with_resizable(false)
            .build(target)
            .map_err(|e| AppError::Window {
                reason: format!("Failed to create overlay window: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        let mut overlay = Self {
            window: Some(window),
            phase: LifecyclePhase::Created,
            move_increment: 0,
            click_through: false,
            visible: true,
        };
        if let Some(window) = overlay.window.as_ref() {
            window.set_visible_on_all_workspaces(true);

            // Centered horizontally, pinned to the top of the primary
            // display. Computed once; display changes do not reflow the
            // window.
            match target.primary_monitor() {
                Some(monitor) => {
                    let screen = monitor.size();
                    let (x, y) = centered_top_position(screen.width, config.width);
                    window.set_outer_position(PhysicalPosition::new(x, y));
                    overlay.move_increment = nudge_increment(screen.width, screen.height);
                    let increment = overlay.move_increment;
                    info!(x, y, increment, "Overlay window positioned");
                }
                None => warn!("No primary monitor; overlay window left at default position"),
            }
        }

        overlay.phase = LifecyclePhase::ContentLoading;
        Ok(overlay)
    }

    /// Mark the content-loaded → ready transition.
    pub fn mark_ready(&mut self) {
        if self.phase == LifecyclePhase::ContentLoading {
            self.phase = LifecyclePhase::Ready;
            info!("Overlay window ready");
        }
    }

    /// Accept an opacity value, verbatim. The transparent window itself has
    /// no alpha primitive; the UI chrome composites the value, broadcast on
    /// the event channel by the caller. Returns false once the window is
    /// gone.
    pub fn set_opacity(&self, value: f64) -> bool {
        if self.window.is_none() {
            return false;
        }
        debug!(value, "Window opacity applied");
        true
    }

    /// Nudge the window one increment in a direction.
    pub fn nudge(&self, direction: MoveDirection) {
        let Some(window) = self.window.as_ref() else {
            return;
        };
        let position = match window.outer_position() {
            Ok(position) => position,
            Err(e) => {
                warn!(error = %e, "Failed to read window position");
                return;
            }
        };

        let step = self.move_increment;
        let (dx, dy) = match direction {
            MoveDirection::Up => (0, -step),
            MoveDirection::Down => (0, step),
            MoveDirection::Left => (-step, 0),
            MoveDirection::Right => (step, 0),
        };
        window.set_outer_position(PhysicalPosition::new(position.x + dx, position.y + dy));
    }

    /// Show/hide the window.
    pub fn toggle_visibility(&mut self) {
        if let Some(window) = self.window.as_ref() {
            self.visible = !self.visible;
            window.set_visible(self.visible);
            debug!(visible = self.visible, "Window visibility toggled");
        }
    }

    /// Toggle mouse click-through.
    pub fn toggle_click_through(&mut self) {
        if let Some(window) = self.window.as_ref() {
            let next = !self.click_through;
            match window.set_ignore_cursor_events(next) {
                Ok(()) => {
                    self.click_through = next;
                    debug!(click_through = next, "Click-through toggled");
                }
                Err(e) => warn!(error = %e, "Failed to toggle click-through"),
            }
        }
    }

    /// Re-assert the content-protection flag.
    pub fn reassert_content_protection(&self) {
        if let Some(window) = self.window.as_ref() {
            window.set_content_protection(true);
        }
    }

    /// Enumerate the displays as capture sources, freshly for one request.
    pub fn capture_sources(&self) -> DisplayEnumerator {
        let sources = self
            .window
            .as_ref()
            .map(|window| {
                window
                    .available_monitors()
                    .enumerate()
                    .map(|(index, monitor)| CaptureSource {
                        id: index.to_string(),
                        name: monitor
                            .name()
                            .unwrap_or_else(|| format!("Display {index}")),
                        kind: SourceKind::Screen,
                    })
                    .collect()
            })
            .unwrap_or_default();
        DisplayEnumerator { sources }
    }

    /// Tear the window down. Terminal.
    pub fn close(&mut self) {
        if self.phase != LifecyclePhase::Closed {
            self.phase = LifecyclePhase::Closed;
            self.window.take();
            info!("Overlay window closed");
        }
    }
}

/// One request's snapshot of the available displays.
pub struct DisplayEnumerator {
    sources: Vec<CaptureSource>,
}

impl SourceEnumerator for DisplayEnumerator {
    fn sources(&self) -> Vec<CaptureSource> {
        self.sources.clone()
    }
}

/// Horizontal center, top of work area: `(floor((screen − window) / 2), 0)`.
pub fn centered_top_position(screen_width: u32, window_width: u32) -> (i32, i32) {
    let x = (i64::from(screen_width) - i64::from(window_width)) / 2;
    (x as i32, 0)
}

/// Hotkey nudge step: `floor(min(screen_w, screen_h) × 0.1)` pixels.
pub fn nudge_increment(screen_width: u32, screen_height: u32) -> i32 {
    (f64::from(screen_width.min(screen_height)) * 0.1).floor() as i32
}
