//! Frame and event types flowing over a surface's command channel.

use crossbeam_channel::Sender;
use serde_json::Value;
use std::fmt;

/// Unique identifier for a headless surface.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SurfaceId(String);

impl SurfaceId {
    /// Create a new surface ID.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The raw identifier string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SurfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Surface({})", self.0)
    }
}

/// Channel name for a surface's command transport.
pub fn channel_name(id: &SurfaceId) -> String {
    format!("headless_webview_{}", id.as_str())
}

/// A single command sent over a surface channel.
///
/// The reply slot must receive exactly one [`FrameReply`]; the sender
/// blocks on it until the platform side answers.
#[derive(Debug)]
pub struct CommandFrame {
    /// Command name, e.g. `"setSize"`.
    pub method: String,
    /// Argument map; `Value::Null` when the command takes none.
    pub args: Value,
    /// Where the platform side delivers the result.
    pub reply: Sender<FrameReply>,
}

/// Result of one command frame.
#[derive(Debug, Clone, PartialEq)]
pub enum FrameReply {
    /// Command succeeded with a structured value.
    Success(Value),
    /// Command succeeded with binary payload (captured image bytes).
    Binary(Vec<u8>),
    /// The platform side does not implement this command.
    NotImplemented,
    /// Command failed.
    Error { code: String, message: String },
}

/// Events sent from the platform side to the host, outside the
/// request/reply flow.
#[derive(Debug, Clone)]
pub enum SurfaceEvent {
    /// The surface's render view finished initializing and is ready
    /// for commands. Fired exactly once per surface.
    WebViewCreated { surface: SurfaceId },
    /// The surface was disposed and its channel closed.
    Disposed { surface: SurfaceId },
}
