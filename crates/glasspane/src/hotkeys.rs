//! Global hotkey registry, rebuilt wholesale from a keybind set.
//!
//! Lives on the main thread: tao's event loop pumps the messages needed for
//! hotkey delivery on Windows, and the `GlobalHotKeyManager` must stay on
//! that thread. The id → action mapping travels to the async side over a
//! watch channel so a rebuild swaps the whole mapping at once.

use crate::{AppError, AppResult};

use std::{collections::HashMap, panic::Location};

use error_location::ErrorLocation;
use glasspane_core::{ControlError, KeybindAction, KeybindSet};
use global_hotkey::{GlobalHotKeyManager, hotkey::HotKey};
use tokio::sync::watch;
use tracing::{info, instrument, warn};

/// Id → action mapping for the currently registered hotkeys.
pub type HotkeyMap = HashMap<u32, KeybindAction>;

/// Parse the non-empty bindings of a set into registrable hotkeys.
///
/// Per-binding parse failures are logged and skipped; they never abort the
/// sibling bindings. Deterministic: the same set always yields the same
/// plan, which is what makes the wholesale rebuild idempotent.
pub fn plan_bindings(set: &KeybindSet) -> Vec<(KeybindAction, HotKey)> {
    set.bound()
        .filter_map(|(action, binding)| match binding.parse::<HotKey>() {
            Ok(hotkey) => Some((action, hotkey)),
            Err(e) => {
                warn!(
                    action = action.key(),
                    binding, error = %e,
                    "Skipping unparseable keybind"
                );
                None
            }
        })
        .collect()
}

/// Process-wide global hotkey registrations.
pub struct HotkeyRegistry {
    manager: GlobalHotKeyManager,
    registered: Vec<HotKey>,
    map_tx: watch::Sender<HotkeyMap>,
}

impl HotkeyRegistry {
    /// Create the OS-level hotkey manager.
    ///
    /// Must be called on the thread running the tao event loop.
    #[track_caller]
    pub fn new(map_tx: watch::Sender<HotkeyMap>) -> AppResult<Self> {
        let manager = GlobalHotKeyManager::new().map_err(|e| AppError::HotkeyManager {
            reason: format!("Failed to create manager: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        Ok(Self {
            manager,
            registered: Vec::new(),
            map_tx,
        })
    }

    /// Rebuild the registry from a new keybind set: unregister everything,
    /// then register each non-empty binding.
    ///
    /// Never incremental, so the registry cannot drift from the active set.
    /// Per-binding registration failures (e.g. a combination already claimed
    /// by the OS) are logged and do not abort sibling registrations.
    #[instrument(skip(self, set))]
    pub fn install(&mut self, set: &KeybindSet) {
        self.clear();

        let mut map = HotkeyMap::new();
        for (action, hotkey) in plan_bindings(set) {
            match self.manager.register(hotkey) {
                Ok(()) => {
                    map.insert(hotkey.id(), action);
                    self.registered.push(hotkey);
                }
                Err(e) => {
                    let err = ControlError::HotkeyRegistration {
                        binding: set.binding(action).to_string(),
                        reason: e.to_string(),
                        location: ErrorLocation::from(Location::caller()),
                    };
                    warn!(
                        action = action.key(),
                        error = %err,
                        "Failed to register hotkey; continuing with remaining bindings"
                    );
                }
            }
        }

        info!(active = self.registered.len(), "Hotkey registry rebuilt");
        let _ = self.map_tx.send(map);
    }

    /// Unregister every active hotkey and publish an empty mapping.
    pub fn clear(&mut self) {
        for hotkey in self.registered.drain(..) {
            if let Err(e) = self.manager.unregister(hotkey) {
                warn!(error = %e, "Failed to unregister hotkey");
            }
        }
        let _ = self.map_tx.send(HotkeyMap::new());
    }
}
