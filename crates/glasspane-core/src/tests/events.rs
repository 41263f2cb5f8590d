use crate::events::{EventBus, EventTopic, UiEvent};

use std::sync::{Arc, Mutex};

fn collector() -> (Arc<Mutex<Vec<String>>>, impl Fn(&UiEvent) + Send + Sync + Clone) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let listener = move |event: &UiEvent| {
        if let UiEvent::StatusUpdate { status } = event {
            if let Ok(mut seen) = sink.lock() {
                seen.push(status.clone());
            }
        }
    };
    (seen, listener)
}

/// WHAT: Listeners on one topic fire in registration order
/// WHY: The channel contract promises ordered delivery per topic
#[test]
#[allow(clippy::unwrap_used)]
fn given_two_listeners_when_emitting_then_invoked_in_registration_order() {
    // Given: Two listeners tagging their position
    let bus = EventBus::new();
    let order = Arc::new(Mutex::new(Vec::new()));

    let first = Arc::clone(&order);
    let _sub_a = bus.subscribe(EventTopic::StatusUpdate, move |_| {
        first.lock().unwrap().push("first");
    });
    let second = Arc::clone(&order);
    let _sub_b = bus.subscribe(EventTopic::StatusUpdate, move |_| {
        second.lock().unwrap().push("second");
    });

    // When: Emitting one status update
    bus.emit(&UiEvent::StatusUpdate {
        status: "Ready".to_string(),
    });

    // Then: Both fired, in registration order
    assert_eq!(*order.lock().unwrap(), vec!["first", "second"]);
}

/// WHAT: Dropping a subscription unregisters its listener
/// WHY: subscribe returns a disposer; listener lifetime is explicit
#[test]
#[allow(clippy::unwrap_used)]
fn given_dropped_subscription_when_emitting_then_listener_not_invoked() {
    // Given: A subscribed then dropped listener
    let bus = EventBus::new();
    let (seen, listener) = collector();
    let sub = bus.subscribe(EventTopic::StatusUpdate, listener);
    assert_eq!(bus.listener_count(EventTopic::StatusUpdate), 1);
    drop(sub);

    // When: Emitting after the drop
    bus.emit(&UiEvent::StatusUpdate {
        status: "Ready".to_string(),
    });

    // Then: Nothing was delivered
    assert!(seen.lock().unwrap().is_empty());
    assert_eq!(bus.listener_count(EventTopic::StatusUpdate), 0);
}

/// WHAT: Listeners only receive events on their own topic
/// WHY: The bus maps topic to listener list; no cross-topic leakage
#[test]
#[allow(clippy::unwrap_used)]
fn given_listener_on_one_topic_when_emitting_other_topic_then_not_invoked() {
    // Given: A status-update listener
    let bus = EventBus::new();
    let (seen, listener) = collector();
    let _sub = bus.subscribe(EventTopic::StatusUpdate, listener);

    // When: Emitting a next-step signal
    bus.emit(&UiEvent::NextStepShortcut);

    // Then: The status listener stays silent
    assert!(seen.lock().unwrap().is_empty());
}

/// WHAT: Emitting with zero listeners is a no-op
/// WHY: Broadcast has no acknowledgment; nobody listening is fine
#[test]
fn given_no_listeners_when_emitting_then_nothing_happens() {
    let bus = EventBus::new();
    bus.emit(&UiEvent::SessionInitializing { active: true });
    assert_eq!(bus.listener_count(EventTopic::SessionInitializing), 0);
}

/// WHAT: A listener may unsubscribe itself from within its callback
/// WHY: Disposal must be legal at any time, including during delivery
#[test]
#[allow(clippy::unwrap_used)]
fn given_self_disposing_listener_when_emitting_twice_then_fires_once() {
    // Given: A listener that drops its own subscription on first delivery
    let bus = EventBus::new();
    let slot: Arc<Mutex<Option<crate::events::Subscription>>> = Arc::new(Mutex::new(None));
    let count = Arc::new(Mutex::new(0usize));

    let slot_in_listener = Arc::clone(&slot);
    let count_in_listener = Arc::clone(&count);
    let sub = bus.subscribe(EventTopic::NextStepShortcut, move |_| {
        *count_in_listener.lock().unwrap() += 1;
        slot_in_listener.lock().unwrap().take();
    });
    *slot.lock().unwrap() = Some(sub);

    // When: Emitting twice
    bus.emit(&UiEvent::NextStepShortcut);
    bus.emit(&UiEvent::NextStepShortcut);

    // Then: Only the first emission was delivered
    assert_eq!(*count.lock().unwrap(), 1);
}

/// WHAT: Events serialize with their kebab-case topic tag
/// WHY: The UI process dispatches on the "event" field
#[test]
#[allow(clippy::unwrap_used)]
fn given_events_when_serializing_then_tagged_with_topic_name() {
    let json = serde_json::to_value(UiEvent::StatusUpdate {
        status: "Live session connected".to_string(),
    })
    .unwrap();
    assert_eq!(json["event"], "status-update");
    assert_eq!(json["status"], "Live session connected");

    let json = serde_json::to_value(UiEvent::NextStepShortcut).unwrap();
    assert_eq!(json["event"], "next-step-shortcut");

    let json = serde_json::to_value(UiEvent::WindowOpacity { value: 0.05 }).unwrap();
    assert_eq!(json["event"], "window-opacity");
    assert_eq!(json["value"], 0.05);
}
