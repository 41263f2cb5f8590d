//! Child-process connector for the external conversational service.
//!
//! The service client is a configurable CLI spawned per session. Requests
//! go to its stdin as JSON lines; its stdout is the session's out-of-band
//! stream (status codes, response chunks, completion markers). The protocol
//! behind the CLI is opaque to the control plane.

use crate::config::ServiceConfig;

use std::{
    panic::Location,
    process::Stdio,
    sync::{Arc, Mutex as StdMutex, PoisonError},
};

use async_trait::async_trait;
use error_location::ErrorLocation;
use glasspane_core::{
    ControlError, ConversationTurn, InitializeParams, LiveSession, Result, SessionConnector,
    SessionEvent, SessionSnapshot, unix_millis,
};
use serde_json::{Value, json};
use tokio::{
    io::{AsyncBufReadExt, AsyncWriteExt, BufReader},
    process::{Child, ChildStdin, ChildStdout, Command},
    sync::{Mutex, mpsc},
};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

#[track_caller]
fn external_error(reason: String) -> ControlError {
    ControlError::ExternalService {
        reason,
        location: ErrorLocation::from(Location::caller()),
    }
}

/// Spawns one service client process per session.
pub struct ChildProcessConnector {
    command: Vec<String>,
}

impl ChildProcessConnector {
    /// Build from the configured service command line.
    pub fn new(config: &ServiceConfig) -> Self {
        Self {
            command: config.command.clone(),
        }
    }
}

#[async_trait]
impl SessionConnector for ChildProcessConnector {
    #[instrument(skip(self, params, events), fields(profile = %params.profile))]
    async fn connect(
        &self,
        params: InitializeParams,
        events: mpsc::Sender<SessionEvent>,
    ) -> Result<Arc<dyn LiveSession>> {
        let (program, args) = self.command.split_first().ok_or_else(|| external_error(
            "Service command is not configured".to_string(),
        ))?;

        let mut child = Command::new(program)
            .args(args)
            .args(["--profile", &params.profile, "--language", &params.language])
            .env("GLASSPANE_API_KEY", &params.api_key)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| external_error(format!("Failed to spawn {program:?}: {e}")))?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| external_error("Service process has no stdin".to_string()))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| external_error("Service process has no stdout".to_string()))?;

        let session = Arc::new(ChildSession {
            stdin: Mutex::new(stdin),
            profile: params.profile.clone(),
            language: params.language.clone(),
            connected_at_ms: unix_millis(),
            turns: StdMutex::new(TurnState::default()),
            _child: Mutex::new(child),
        });

        // Connected status travels the out-of-band stream, after the
        // initialize reply.
        let _ = events.send(SessionEvent::Status(
            "Live session connected".to_string(),
        ))
        .await;

        spawn_stream_reader(stdout, Arc::clone(&session), events);

        info!(program = ?program, "Service session spawned");
        Ok(session)
    }
}

#[derive(Default)]
struct TurnState {
    prompt: String,
    response: String,
    turn_count: u64,
}

/// A live session backed by one service client process.
///
/// Dropping the last handle kills the child (`kill_on_drop`), which is how
/// fire-and-replace discards a superseded session.
struct ChildSession {
    stdin: Mutex<ChildStdin>,
    profile: String,
    language: String,
    connected_at_ms: u64,
    turns: StdMutex<TurnState>,
    _child: Mutex<Child>,
}

impl ChildSession {
    async fn write_line(&self, value: Value) -> Result<()> {
        let mut line = value.to_string();
        line.push('\n');

        let mut stdin = self.stdin.lock().await;
        stdin
            .write_all(line.as_bytes())
            .await
            .map_err(|e| external_error(format!("Failed to write to service: {e}")))?;
        stdin
            .flush()
            .await
            .map_err(|e| external_error(format!("Failed to flush to service: {e}")))
    }

    fn turns(&self) -> std::sync::MutexGuard<'_, TurnState> {
        self.turns.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl LiveSession for ChildSession {
    async fn send_text(&self, text: &str) -> Result<()> {
        {
            let mut turns = self.turns();
            turns.prompt = text.to_string();
            turns.response.clear();
        }
        self.write_line(json!({ "text": text })).await
    }

    async fn stop_capture(&self) -> Result<()> {
        self.write_line(json!({ "control": "stop-audio" })).await
    }

    fn snapshot(&self) -> SessionSnapshot {
        let turns = self.turns();
        SessionSnapshot {
            profile: self.profile.clone(),
            language: self.language.clone(),
            connected_at_ms: self.connected_at_ms,
            turn_count: turns.turn_count,
        }
    }
}

/// Pump the child's stdout into the session event stream until EOF.
fn spawn_stream_reader(
    stdout: ChildStdout,
    session: Arc<ChildSession>,
    events: mpsc::Sender<SessionEvent>,
) {
    tokio::spawn(async move {
        let mut lines = BufReader::new(stdout).lines();

        while let Ok(Some(line)) = lines.next_line().await {
            if line.is_empty() {
                continue;
            }
            for event in translate_line(&line, &session) {
                if events.send(event).await.is_err() {
                    debug!("Session event receiver gone; stopping stream reader");
                    return;
                }
            }
        }

        // EOF: the service closed the session.
        let _ = events.send(SessionEvent::Closed).await;
    });
}

/// Translate one stdout line into session events.
///
/// Structured lines carry `status`, `text`, `done`, or `error` fields; any
/// other line is treated as raw response text.
fn translate_line(line: &str, session: &ChildSession) -> Vec<SessionEvent> {
    let parsed: Option<Value> = serde_json::from_str(line).ok();
    let Some(Value::Object(fields)) = parsed else {
        session.turns().response.push_str(line);
        return vec![SessionEvent::ResponseChunk(line.to_string())];
    };

    if let Some(status) = fields.get("status").and_then(Value::as_str) {
        return vec![SessionEvent::Status(status.to_string())];
    }

    if let Some(message) = fields.get("error").and_then(Value::as_str) {
        return vec![SessionEvent::Error(message.to_string())];
    }

    if let Some(text) = fields.get("text").and_then(Value::as_str) {
        session.turns().response.push_str(text);
        return vec![SessionEvent::ResponseChunk(text.to_string())];
    }

    if fields.get("done").and_then(Value::as_bool) == Some(true) {
        let turn = {
            let mut turns = session.turns();
            turns.turn_count += 1;
            ConversationTurn {
                id: Uuid::new_v4(),
                prompt: turns.prompt.clone(),
                response: std::mem::take(&mut turns.response),
                timestamp_ms: unix_millis(),
            }
        };
        return vec![SessionEvent::ResponseComplete, SessionEvent::TurnSaved(turn)];
    }

    warn!(line, "Unrecognized service line; ignoring");
    Vec::new()
}
