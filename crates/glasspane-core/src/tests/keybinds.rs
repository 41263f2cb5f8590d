use crate::keybinds::{KeybindAction, KeybindSet};

use serde_json::json;

/// WHAT: A partial override keeps every action present
/// WHY: The merged set must be total; absent actions default, never vanish
#[test]
fn given_partial_override_when_merging_then_every_action_present() {
    // Given: An override naming only two actions
    let override_value = json!({
        "moveUp": "ALT+ArrowUp",
        "nextStep": "ALT+Enter",
    });

    // When: Merging over defaults
    let set = KeybindSet::merged(&override_value);

    // Then: Overridden actions take the override, the rest keep defaults
    assert_eq!(set.binding(KeybindAction::MoveUp), "ALT+ArrowUp");
    assert_eq!(set.binding(KeybindAction::NextStep), "ALT+Enter");
    let defaults = KeybindSet::default();
    assert_eq!(
        set.binding(KeybindAction::MoveDown),
        defaults.binding(KeybindAction::MoveDown)
    );
    assert_eq!(
        set.binding(KeybindAction::ToggleVisibility),
        defaults.binding(KeybindAction::ToggleVisibility)
    );
}

/// WHAT: A non-object override falls back to defaults wholesale
/// WHY: The persisted snapshot is untrusted; corruption must not crash
#[test]
fn given_corrupt_override_when_merging_then_defaults_used() {
    // Given: Overrides that are not JSON objects
    for corrupt in [json!(null), json!("garbage"), json!(42), json!([1, 2])] {
        // When: Merging
        let set = KeybindSet::merged(&corrupt);

        // Then: The full default set survives
        assert_eq!(set, KeybindSet::default());
    }
}

/// WHAT: Wrong-typed and unknown fields are ignored
/// WHY: Shallow field-by-field merge only accepts strings for known actions
#[test]
fn given_mixed_override_when_merging_then_only_valid_fields_taken() {
    // Given: An override mixing a valid field, a wrong type, and an unknown key
    let override_value = json!({
        "moveLeft": "SHIFT+ArrowLeft",
        "moveRight": 7,
        "selfDestruct": "CONTROL+KeyX",
    });

    // When: Merging
    let set = KeybindSet::merged(&override_value);

    // Then: Only the valid field is applied
    assert_eq!(set.binding(KeybindAction::MoveLeft), "SHIFT+ArrowLeft");
    assert_eq!(
        set.binding(KeybindAction::MoveRight),
        KeybindSet::default().binding(KeybindAction::MoveRight)
    );
}

/// WHAT: Every action starts unbound
/// WHY: A fresh install must not claim any global shortcut
#[test]
fn given_default_set_when_iterating_bound_then_empty() {
    // Given: The defaults, untouched
    let set = KeybindSet::default();

    // Then: No action carries a binding
    assert_eq!(set.bound().count(), 0);
    for action in KeybindAction::ALL {
        assert_eq!(set.binding(action), "");
    }
}

/// WHAT: Empty-string overrides leave an action unbound
/// WHY: Empty means unbound; only non-empty assignments join the bound set
#[test]
fn given_empty_string_override_when_merging_then_action_unbound() {
    // Given: An override assigning one action and explicitly clearing another
    let override_value = json!({
        "toggleVisibility": "",
        "moveUp": "CONTROL+ALT+ArrowUp",
    });

    // When: Merging and iterating bound actions
    let set = KeybindSet::merged(&override_value);
    let bound: Vec<_> = set.bound().map(|(action, _)| action).collect();

    // Then: Only the assigned action is bound
    assert_eq!(set.binding(KeybindAction::ToggleVisibility), "");
    assert_eq!(bound, vec![KeybindAction::MoveUp]);
}

/// WHAT: Deserializing a partial JSON document fills missing fields
/// WHY: serde defaults keep the set total even off the merge path
#[test]
#[allow(clippy::unwrap_used)]
fn given_partial_json_when_deserializing_then_missing_fields_default() {
    // Given: A document with a single field
    let set: KeybindSet = serde_json::from_str(r#"{"moveDown": "ALT+KeyJ"}"#).unwrap();

    // Then: The named field is set, the rest default
    assert_eq!(set.binding(KeybindAction::MoveDown), "ALT+KeyJ");
    assert_eq!(
        set.binding(KeybindAction::NextStep),
        KeybindSet::default().binding(KeybindAction::NextStep)
    );
}
