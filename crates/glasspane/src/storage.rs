//! Best-effort read of the keybind snapshot persisted by the UI layer.
//!
//! Queried exactly once, after the content-loaded settle delay. The value
//! is untrusted input: a missing, unreadable, or malformed file falls back
//! to the default keybind set and is never surfaced to the UI process.

use std::{fs, panic::Location, path::Path};

use error_location::ErrorLocation;
use glasspane_core::{ControlError, KeybindSet};
use serde_json::Value;
use tracing::{debug, info};

/// Read the raw override document from the UI layer's storage.
fn read_override(path: &Path) -> Result<Value, ControlError> {
    let raw = fs::read_to_string(path).map_err(|e| ControlError::StorageRead {
        reason: format!("Failed to read {:?}: {}", path, e),
        location: ErrorLocation::from(Location::caller()),
    })?;

    serde_json::from_str(&raw).map_err(|e| ControlError::StorageRead {
        reason: format!("Failed to parse {:?}: {}", path, e),
        location: ErrorLocation::from(Location::caller()),
    })
}

/// Load the startup keybind set: persisted override merged over defaults.
///
/// The storage read collapses to the default set on any failure.
pub fn load_keybinds(path: &Path) -> KeybindSet {
    match read_override(path) {
        Ok(override_value) => {
            info!(path = ?path, "Keybind override loaded");
            KeybindSet::merged(&override_value)
        }
        Err(e) => {
            debug!(error = %e, "No usable keybind override; using defaults");
            KeybindSet::default()
        }
    }
}
