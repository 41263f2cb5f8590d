//! WebSocket bridge: the command/event transport to the UI process.
//!
//! One localhost endpoint carries both directions: the UI sends command
//! envelopes (`{"id", "command", ...args}`) and receives reply envelopes
//! plus unsolicited event broadcasts on a single ordered outbound queue.
//! A command's follow-up side effects run only after its reply is queued,
//! so the reply is observable before any event those effects broadcast.

use crate::{
    AppError, AppResult,
    app::AppMessage,
};

use std::panic::Location;

use axum::{
    Router,
    extract::{
        State, WebSocketUpgrade,
        ws::{Message, WebSocket},
    },
    response::Response,
    routing::get,
};
use error_location::ErrorLocation;
use futures_util::{SinkExt, StreamExt};
use glasspane_core::{
    CommandEnvelope, CommandReply, ControlError, EventBus, EventTopic, ReplyEnvelope,
};
use serde_json::Value;
use tokio::sync::{mpsc, oneshot, watch};
use tracing::{debug, info, instrument, warn};

/// Every topic forwarded to connected UI clients.
const TOPICS: [EventTopic; 6] = [
    EventTopic::StatusUpdate,
    EventTopic::ResponseUpdate,
    EventTopic::SessionInitializing,
    EventTopic::ConversationTurnSaved,
    EventTopic::NextStepShortcut,
    EventTopic::WindowOpacity,
];

/// Shared state handed to each socket.
#[derive(Clone)]
pub struct BridgeState {
    message_tx: mpsc::Sender<AppMessage>,
    bus: EventBus,
}

impl BridgeState {
    /// Wire the bridge to the app's inbox and the event bus.
    pub fn new(message_tx: mpsc::Sender<AppMessage>, bus: EventBus) -> Self {
        Self { message_tx, bus }
    }
}

/// Serve the bridge until shutdown is signalled.
#[instrument(skip(state, shutdown_rx))]
pub async fn serve(
    addr: String,
    state: BridgeState,
    mut shutdown_rx: watch::Receiver<bool>,
) -> AppResult<()> {
    let router = Router::new().route("/ws", get(ws_upgrade)).with_state(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::Bridge {
            reason: format!("Failed to bind {addr}: {e}"),
            location: ErrorLocation::from(Location::caller()),
        })?;

    info!(addr, "UI bridge listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(async move {
            let _ = shutdown_rx.changed().await;
        })
        .await
        .map_err(|e| AppError::Bridge {
            reason: format!("Bridge server failed: {e}"),
            location: ErrorLocation::from(Location::caller()),
        })
}

async fn ws_upgrade(State(state): State<BridgeState>, ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: BridgeState) {
    let (mut sink, mut stream) = socket.split();

    // Single ordered outbound queue for replies and events alike.
    let (out_tx, mut out_rx) = mpsc::unbounded_channel::<String>();

    // Forward every broadcast topic for this socket's lifetime. The
    // subscriptions drop with the socket, unregistering the listeners.
    let _subscriptions: Vec<_> = TOPICS
        .iter()
        .map(|topic| {
            let out_tx = out_tx.clone();
            state.bus.subscribe(*topic, move |event| {
                if let Ok(text) = serde_json::to_string(event) {
                    let _ = out_tx.send(text);
                }
            })
        })
        .collect();

    // The UI process signals content-ready by connecting.
    if state.message_tx.send(AppMessage::UiConnected).await.is_err() {
        return;
    }
    debug!("UI client connected");

    loop {
        tokio::select! {
            Some(text) = out_rx.recv() => {
                if sink.send(Message::Text(text.into())).await.is_err() {
                    break;
                }
            }
            incoming = stream.next() => {
                match incoming {
                    Some(Ok(Message::Text(raw))) => {
                        dispatch_request(raw.as_str(), &state, &out_tx);
                    }
                    Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                    Some(Ok(_)) => {}
                }
            }
        }
    }

    debug!("UI client disconnected");
}

/// Parse one inbound frame and hand it to the app, replying out-of-band.
///
/// Runs the round trip on its own task so a slow command (a network-bound
/// initialize, say) never stalls other commands on the same socket.
fn dispatch_request(raw: &str, state: &BridgeState, out_tx: &mpsc::UnboundedSender<String>) {
    let value: Value = match serde_json::from_str(raw) {
        Ok(value) => value,
        Err(e) => {
            send_reply(out_tx, 0, CommandReply::fail(format!("Malformed request: {e}")));
            return;
        }
    };
    let id = value.get("id").and_then(Value::as_u64).unwrap_or(0);

    let envelope: CommandEnvelope = match serde_json::from_value(value) {
        Ok(envelope) => envelope,
        Err(e) => {
            warn!(error = %e, "Rejected unparseable command");
            send_reply(out_tx, id, CommandReply::fail(format!("Unknown command: {e}")));
            return;
        }
    };

    let message_tx = state.message_tx.clone();
    let out_tx = out_tx.clone();
    tokio::spawn(async move {
        let (reply_tx, reply_rx) = oneshot::channel();
        let message = AppMessage::Command {
            request: envelope.request,
            reply: reply_tx,
        };

        if message_tx.send(message).await.is_err() {
            send_reply(&out_tx, id, channel_closed("Host is shutting down"));
            return;
        }

        let dispatched = reply_rx
            .await
            .unwrap_or_else(|_| channel_closed("Command handler dropped").into());
        send_reply(&out_tx, id, dispatched.reply);
        // With the reply queued, any event the follow-up broadcasts lands
        // behind it on the same ordered outbound queue.
        if let Some(after_reply) = dispatched.after_reply {
            after_reply();
        }
    });
}

#[track_caller]
fn channel_closed(message: &str) -> CommandReply {
    CommandReply::from(ControlError::ChannelClosed {
        message: message.to_string(),
        location: ErrorLocation::from(Location::caller()),
    })
}

fn send_reply(out_tx: &mpsc::UnboundedSender<String>, id: u64, reply: CommandReply) {
    if let Ok(text) = serde_json::to_string(&ReplyEnvelope { id, reply }) {
        let _ = out_tx.send(text);
    }
}
