use crate::hotkeys::plan_bindings;

use glasspane_core::{KeybindAction, KeybindSet};

/// A fully bound set, as a user who assigned every action would have it.
fn full_set() -> KeybindSet {
    KeybindSet {
        move_up: "CONTROL+ALT+ArrowUp".to_string(),
        move_down: "CONTROL+ALT+ArrowDown".to_string(),
        move_left: "CONTROL+ALT+ArrowLeft".to_string(),
        move_right: "CONTROL+ALT+ArrowRight".to_string(),
        toggle_visibility: "CONTROL+Backslash".to_string(),
        toggle_click_through: "CONTROL+ALT+KeyM".to_string(),
        next_step: "CONTROL+Enter".to_string(),
    }
}

/// WHAT: A fully bound set plans every action
/// WHY: Well-formed combinations must all parse into registrable hotkeys
#[test]
fn given_fully_bound_set_when_planning_then_all_seven_actions_planned() {
    // Given: A set binding every action
    let set = full_set();

    // When: Planning the registrations
    let plan = plan_bindings(&set);

    // Then: Every action appears, in stable order
    assert_eq!(plan.len(), 7);
    let actions: Vec<KeybindAction> = plan.iter().map(|(action, _)| *action).collect();
    assert_eq!(actions, KeybindAction::ALL.to_vec());
}

/// WHAT: The all-unbound defaults plan nothing
/// WHY: A fresh install must not register any global shortcut
#[test]
fn given_default_set_when_planning_then_no_registrations() {
    // Given: The defaults, where every action is unbound
    let set = KeybindSet::default();

    // When: Planning the registrations
    let plan = plan_bindings(&set);

    // Then: The plan is empty
    assert!(plan.is_empty());
}

/// WHAT: An unparseable binding is skipped, not fatal
/// WHY: One bad override must never take down the sibling bindings
#[test]
fn given_one_invalid_binding_when_planning_then_only_that_action_skipped() {
    // Given: A set where moveUp cannot parse
    let set = KeybindSet {
        move_up: "NOT+A+REAL+KEY".to_string(),
        ..full_set()
    };

    // When: Planning the registrations
    let plan = plan_bindings(&set);

    // Then: Six survive, moveUp is absent
    assert_eq!(plan.len(), 6);
    assert!(
        !plan
            .iter()
            .any(|(action, _)| *action == KeybindAction::MoveUp)
    );
}

/// WHAT: An empty binding means unbound and produces no registration
/// WHY: Users can clear a binding without it erroring at startup
#[test]
fn given_empty_binding_when_planning_then_action_unbound() {
    let set = KeybindSet {
        next_step: String::new(),
        ..full_set()
    };

    let plan = plan_bindings(&set);

    assert_eq!(plan.len(), 6);
    assert!(
        !plan
            .iter()
            .any(|(action, _)| *action == KeybindAction::NextStep)
    );
}

/// WHAT: Planning the same set twice yields an identical plan
/// WHY: The wholesale rebuild relies on the plan being deterministic
#[test]
fn given_same_set_when_planning_twice_then_plans_identical() {
    let set = full_set();

    let first = plan_bindings(&set);
    let second = plan_bindings(&set);

    assert_eq!(first.len(), second.len());
    for ((action_a, key_a), (action_b, key_b)) in first.iter().zip(second.iter()) {
        assert_eq!(action_a, action_b);
        assert_eq!(key_a.id(), key_b.id());
    }
}

/// WHAT: Two actions may share one key combination
/// WHY: Duplicate bindings are the UI layer's problem, not a host error
#[test]
fn given_duplicate_bindings_when_planning_then_both_planned() {
    // Given: moveUp and moveDown bound to the same combination
    let set = KeybindSet {
        move_down: "CONTROL+ALT+ArrowUp".to_string(),
        ..full_set()
    };

    // When: Planning the registrations
    let plan = plan_bindings(&set);

    // Then: Both actions plan the same hotkey id
    assert_eq!(plan.len(), 7);
    assert_eq!(plan[0].1.id(), plan[1].1.id());
}
