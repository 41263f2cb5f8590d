use crate::config::{default_window_height, default_window_width};

use serde::{Deserialize, Serialize};

/// Overlay window geometry. Fixed for the process lifetime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowConfig {
    /// Window width in pixels.
    #[serde(default = "default_window_width")]
    pub width: u32,
    /// Window height in pixels.
    #[serde(default = "default_window_height")]
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: default_window_width(),
            height: default_window_height(),
        }
    }
}
