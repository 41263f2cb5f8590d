//! Keybind model: the fixed action set and the merge of untrusted overrides.
//!
//! The Keybind Set is built exactly once at startup by shallow-merging a
//! persisted override (written by the UI layer, treated as untrusted JSON)
//! over the defaults, field by field. Every action defaults to unbound, so
//! a fresh install claims no global shortcuts until the user assigns some.
//! A corrupt or partial override must never crash the merge.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The fixed, enumerated set of hotkey-bound actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeybindAction {
    /// Nudge the overlay window up.
    MoveUp,
    /// Nudge the overlay window down.
    MoveDown,
    /// Nudge the overlay window left.
    MoveLeft,
    /// Nudge the overlay window right.
    MoveRight,
    /// Show/hide the overlay window.
    ToggleVisibility,
    /// Toggle mouse click-through on the overlay window.
    ToggleClickThrough,
    /// Fire the `next-step-shortcut` event; the UI decides what it means.
    NextStep,
}

impl KeybindAction {
    /// Every action, in a stable order. Absent actions default to unbound,
    /// never omitted.
    pub const ALL: [KeybindAction; 7] = [
        KeybindAction::MoveUp,
        KeybindAction::MoveDown,
        KeybindAction::MoveLeft,
        KeybindAction::MoveRight,
        KeybindAction::ToggleVisibility,
        KeybindAction::ToggleClickThrough,
        KeybindAction::NextStep,
    ];

    /// The JSON field name used by the UI layer's persisted snapshot.
    pub fn key(self) -> &'static str {
        match self {
            KeybindAction::MoveUp => "moveUp",
            KeybindAction::MoveDown => "moveDown",
            KeybindAction::MoveLeft => "moveLeft",
            KeybindAction::MoveRight => "moveRight",
            KeybindAction::ToggleVisibility => "toggleVisibility",
            KeybindAction::ToggleClickThrough => "toggleClickThrough",
            KeybindAction::NextStep => "nextStep",
        }
    }
}

/// Mapping from every action to a key-combination string, or empty when
/// unbound. Every field is always present; every field defaults to empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct KeybindSet {
    /// Binding for [`KeybindAction::MoveUp`].
    pub move_up: String,
    /// Binding for [`KeybindAction::MoveDown`].
    pub move_down: String,
    /// Binding for [`KeybindAction::MoveLeft`].
    pub move_left: String,
    /// Binding for [`KeybindAction::MoveRight`].
    pub move_right: String,
    /// Binding for [`KeybindAction::ToggleVisibility`].
    pub toggle_visibility: String,
    /// Binding for [`KeybindAction::ToggleClickThrough`].
    pub toggle_click_through: String,
    /// Binding for [`KeybindAction::NextStep`].
    pub next_step: String,
}

impl KeybindSet {
    /// Merge an untrusted persisted override over the defaults.
    ///
    /// Shallow, field by field: only string-valued fields matching a known
    /// action are taken; anything else in the override (wrong types, unknown
    /// keys, non-object root) is ignored. Never fails.
    pub fn merged(override_value: &Value) -> Self {
        let mut set = Self::default();
        let Some(map) = override_value.as_object() else {
            return set;
        };

        for action in KeybindAction::ALL {
            if let Some(Value::String(binding)) = map.get(action.key()) {
                *set.binding_mut(action) = binding.clone();
            }
        }

        set
    }

    /// The binding string for an action; empty means unbound.
    pub fn binding(&self, action: KeybindAction) -> &str {
        match action {
            KeybindAction::MoveUp => &self.move_up,
            KeybindAction::MoveDown => &self.move_down,
            KeybindAction::MoveLeft => &self.move_left,
            KeybindAction::MoveRight => &self.move_right,
            KeybindAction::ToggleVisibility => &self.toggle_visibility,
            KeybindAction::ToggleClickThrough => &self.toggle_click_through,
            KeybindAction::NextStep => &self.next_step,
        }
    }

    fn binding_mut(&mut self, action: KeybindAction) -> &mut String {
        match action {
            KeybindAction::MoveUp => &mut self.move_up,
            KeybindAction::MoveDown => &mut self.move_down,
            KeybindAction::MoveLeft => &mut self.move_left,
            KeybindAction::MoveRight => &mut self.move_right,
            KeybindAction::ToggleVisibility => &mut self.toggle_visibility,
            KeybindAction::ToggleClickThrough => &mut self.toggle_click_through,
            KeybindAction::NextStep => &mut self.next_step,
        }
    }

    /// Iterate over the non-empty bindings in action order.
    pub fn bound(&self) -> impl Iterator<Item = (KeybindAction, &str)> {
        KeybindAction::ALL
            .into_iter()
            .map(|action| (action, self.binding(action)))
            .filter(|(_, binding)| !binding.is_empty())
    }
}
