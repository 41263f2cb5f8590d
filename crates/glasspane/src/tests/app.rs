use crate::app::Dispatched;

use glasspane_core::{CommandReply, EventBus, EventTopic, ReplyEnvelope, UiEvent};

use tokio::sync::mpsc;

/// WHAT: A dispatched follow-up lands behind the reply on the outbound queue
/// WHY: The UI must observe a command's reply before any event its effect caused
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_dispatched_follow_up_when_replying_then_reply_precedes_event() {
    // Given: A per-socket outbound queue fed by a bus subscription,
    // mirroring the bridge's wiring
    let bus = EventBus::new();
    let (out_tx, mut out_rx) = mpsc::unbounded_channel::<String>();
    let event_tx = out_tx.clone();
    let _sub = bus.subscribe(EventTopic::WindowOpacity, move |event| {
        if let Ok(text) = serde_json::to_string(event) {
            let _ = event_tx.send(text);
        }
    });

    // When: Queuing the reply, then running the follow-up (the bridge's order)
    let emit_bus = bus.clone();
    let dispatched = Dispatched::then(CommandReply::ok(), move || {
        emit_bus.emit(&UiEvent::WindowOpacity { value: 0.5 });
    });
    let envelope = ReplyEnvelope {
        id: 7,
        reply: dispatched.reply,
    };
    out_tx.send(serde_json::to_string(&envelope).unwrap()).unwrap();
    if let Some(after_reply) = dispatched.after_reply {
        after_reply();
    }

    // Then: The reply frame precedes the event frame
    let first = out_rx.recv().await.unwrap();
    let second = out_rx.recv().await.unwrap();
    assert!(first.contains("\"id\":7"));
    assert!(second.contains("window-opacity"));
}

/// WHAT: A plain outcome carries no follow-up
/// WHY: Only commands with causally triggered events pay the extra hop
#[test]
fn given_plain_reply_when_converting_then_no_follow_up() {
    let dispatched = Dispatched::from(CommandReply::fail("nope"));

    assert!(!dispatched.reply.success);
    assert!(dispatched.after_reply.is_none());
}
