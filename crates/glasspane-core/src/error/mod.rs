use error_location::ErrorLocation;
use thiserror::Error;

/// Control-plane errors with source location tracking.
///
/// Every failure a command handler can hit maps onto one of these variants.
/// Handlers flatten them into `{success: false, error}` replies before they
/// reach the UI process; nothing here crosses the boundary unstructured.
#[derive(Error, Debug)]
pub enum ControlError {
    /// A command that requires a live session found the cell empty.
    #[error("No active session {location}")]
    NoActiveSession {
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Initialize/send/stop failed against the remote service.
    #[error("External service error: {reason} {location}")]
    ExternalService {
        /// Description of the service failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Keybind snapshot could not be read from UI-layer storage.
    ///
    /// Always recovered locally by falling back to default keybinds;
    /// never surfaced to the UI process.
    #[error("Storage read failed: {reason} {location}")]
    StorageRead {
        /// Description of the read failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// A single global hotkey binding failed to parse or register.
    ///
    /// Logged and skipped; sibling registrations proceed.
    #[error("Hotkey registration failed for {binding:?}: {reason} {location}")]
    HotkeyRegistration {
        /// The offending key-combination string.
        binding: String,
        /// Description of the registration failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// A window command arrived after the overlay window was torn down.
    #[error("Window unavailable {location}")]
    WindowUnavailable {
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// An internal channel endpoint hung up.
    #[error("Channel closed: {message} {location}")]
    ChannelClosed {
        /// Description of which channel failed.
        message: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },
}

impl ControlError {
    /// The error string presented to the UI process in a command reply.
    ///
    /// `NoActiveSession` keeps its bare taxonomy name so callers can match
    /// on it; the other variants carry their human-readable reason without
    /// the source-location suffix.
    pub fn reply_message(&self) -> String {
        match self {
            ControlError::NoActiveSession { .. } => "NoActiveSession".to_string(),
            ControlError::ExternalService { reason, .. } => reason.clone(),
            ControlError::StorageRead { reason, .. } => reason.clone(),
            ControlError::HotkeyRegistration { binding, reason, .. } => {
                format!("{binding}: {reason}")
            }
            ControlError::WindowUnavailable { .. } => "Window unavailable".to_string(),
            ControlError::ChannelClosed { message, .. } => message.clone(),
        }
    }
}

/// Result type alias using [`ControlError`].
pub type Result<T> = std::result::Result<T, ControlError>;
