use crate::storage::load_keybinds;

use std::{fs, path::PathBuf};

use glasspane_core::KeybindSet;
use uuid::Uuid;

fn scratch_path() -> PathBuf {
    std::env::temp_dir().join(format!("glasspane-keybinds-{}.json", Uuid::new_v4()))
}

/// WHAT: A missing keybind file yields the default set
/// WHY: First launch has nothing persisted and must still bind hotkeys
#[test]
fn given_missing_file_when_loading_then_defaults_returned() {
    // Given: A path that does not exist
    let path = scratch_path();

    // When: Loading keybinds
    let set = load_keybinds(&path);

    // Then: The all-unbound defaults
    assert_eq!(set, KeybindSet::default());
}

/// WHAT: A corrupt keybind file yields the default set
/// WHY: Untrusted storage must never crash startup or drop hotkeys
#[test]
#[allow(clippy::unwrap_used)]
fn given_corrupt_file_when_loading_then_defaults_returned() {
    // Given: A file that is not JSON
    let path = scratch_path();
    fs::write(&path, "{not json at all").unwrap();

    // When: Loading keybinds
    let set = load_keybinds(&path);

    // Then: The all-unbound defaults
    assert_eq!(set, KeybindSet::default());
    fs::remove_file(&path).unwrap();
}

/// WHAT: A valid override replaces only the fields it names
/// WHY: The merge is shallow and field-by-field over the defaults
#[test]
#[allow(clippy::unwrap_used)]
fn given_partial_override_when_loading_then_merged_over_defaults() {
    // Given: An override naming one action
    let path = scratch_path();
    fs::write(&path, r#"{"moveUp": "CONTROL+SHIFT+KeyU"}"#).unwrap();

    // When: Loading keybinds
    let set = load_keybinds(&path);

    // Then: That field changes, the rest stay default
    assert_eq!(set.move_up, "CONTROL+SHIFT+KeyU");
    assert_eq!(set.move_down, KeybindSet::default().move_down);
    fs::remove_file(&path).unwrap();
}

/// WHAT: Wrong-typed and unknown fields in the override are ignored
/// WHY: The persisted snapshot is untrusted input
#[test]
#[allow(clippy::unwrap_used)]
fn given_wrong_typed_fields_when_loading_then_ignored() {
    // Given: An override with a number where a string belongs, plus junk
    let path = scratch_path();
    fs::write(&path, r#"{"moveUp": 42, "somethingElse": "x"}"#).unwrap();

    // When: Loading keybinds
    let set = load_keybinds(&path);

    // Then: Defaults untouched
    assert_eq!(set, KeybindSet::default());
    fs::remove_file(&path).unwrap();
}
