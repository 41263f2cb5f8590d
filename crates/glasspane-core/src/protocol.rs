//! Wire types for the UI ↔ host command channel.
//!
//! Requests and replies are JSON. A request names its command in a
//! `"command"` tag field and carries its argument fields inline; the reply
//! always has the shape `{success: bool, error?: string, ...data}`. The
//! boundary is a hard isolation line: handlers translate every internal
//! failure into a `{success: false, error}` reply and never let a raw fault
//! cross.

use crate::{error::ControlError, session::InitializeParams};

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A command invoked by the UI process.
///
/// Tagged JSON with a `"command"` field for dispatch.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "command")]
pub enum CommandRequest {
    /// Open a new session against the external service, replacing any
    /// current one.
    #[serde(rename = "initializeSession")]
    InitializeSession(InitializeParams),

    /// Forward user text to the held session.
    #[serde(rename = "sendMessage")]
    SendMessage {
        /// The message text.
        text: String,
    },

    /// Ask the held session to stop capturing audio.
    #[serde(rename = "stopAudioCapture")]
    StopAudioCapture,

    /// Fetch a metadata snapshot of the held session.
    #[serde(rename = "getSessionData")]
    GetSessionData,

    /// Apply a window opacity value.
    #[serde(rename = "setWindowOpacity")]
    SetWindowOpacity {
        /// Opacity fraction; applied verbatim, not clamped by the host.
        opacity: f64,
    },

    /// Initiate window teardown.
    #[serde(rename = "closeWindow")]
    CloseWindow,

    /// Run the capture routing policy against a fresh source enumeration.
    #[serde(rename = "selectCaptureSource")]
    SelectCaptureSource,
}

/// A command request paired with its correlation id.
#[derive(Debug, Clone, Deserialize)]
pub struct CommandEnvelope {
    /// Correlation id echoed back in the reply.
    pub id: u64,
    /// The command itself.
    #[serde(flatten)]
    pub request: CommandRequest,
}

/// Structured result of one command: `{success, error?, ...data}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandReply {
    /// Whether the command succeeded.
    pub success: bool,
    /// Failure message when `success` is false.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Extra result fields, flattened into the reply object.
    #[serde(flatten, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl CommandReply {
    /// A bare `{success: true}`.
    pub fn ok() -> Self {
        Self {
            success: true,
            error: None,
            data: None,
        }
    }

    /// `{success: true}` with extra data fields.
    pub fn ok_with(data: Value) -> Self {
        Self {
            success: true,
            error: None,
            data: Some(data),
        }
    }

    /// `{success: false, error}`.
    pub fn fail(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            data: None,
        }
    }
}

impl From<ControlError> for CommandReply {
    fn from(err: ControlError) -> Self {
        CommandReply::fail(err.reply_message())
    }
}

/// A command reply paired with the request's correlation id.
#[derive(Debug, Clone, Serialize)]
pub struct ReplyEnvelope {
    /// Correlation id of the request this answers.
    pub id: u64,
    /// The reply itself.
    #[serde(flatten)]
    pub reply: CommandReply,
}
