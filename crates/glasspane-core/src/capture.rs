//! Capture routing policy.
//!
//! Intercepts "what to capture" requests and deterministically selects a
//! video source and an audio route: first available screen source, loopback
//! audio. The selection is computed freshly on every request, never cached.

use serde::Serialize;

/// Kind of enumerable video source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// A whole display.
    Screen,
    /// An individual window.
    Window,
}

/// One enumerable video source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptureSource {
    /// Stable identifier within one enumeration.
    pub id: String,
    /// Human-readable source name.
    pub name: String,
    /// Screen or window.
    pub kind: SourceKind,
}

/// Audio route paired with the selected video source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioRoute {
    /// System loopback audio.
    Loopback,
}

/// The (video source, audio route) pair chosen for one capture request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptureSelection {
    /// The selected video source.
    pub video: CaptureSource,
    /// The selected audio route.
    pub audio: AudioRoute,
}

/// OS collaborator that enumerates the currently available video sources.
pub trait SourceEnumerator {
    /// Enumerate sources for one capture request.
    fn sources(&self) -> Vec<CaptureSource>;
}

/// Select the capture routing for one request: first screen source plus
/// loopback audio, or `None` when no screen source exists.
pub fn route_capture<E: SourceEnumerator + ?Sized>(enumerator: &E) -> Option<CaptureSelection> {
    enumerator
        .sources()
        .into_iter()
        .find(|source| source.kind == SourceKind::Screen)
        .map(|video| CaptureSelection {
            video,
            audio: AudioRoute::Loopback,
        })
}
