//! Command parsing and reply types.
//!
//! Arguments are decoded and validated exactly once, here at the
//! transport boundary. A malformed payload is a hard validation
//! error, never a silent no-op.

use serde_json::{json, Value};
use thiserror::Error;
use veil_surface::{LoadDataParams, LogicalSize};
use veil_transport::FrameReply;

/// Errors from decoding a command's argument map.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("{method}: missing argument '{name}'")]
    MissingArgument {
        method: &'static str,
        name: &'static str,
    },

    #[error("{method}: invalid argument '{name}': {reason}")]
    InvalidArgument {
        method: &'static str,
        name: &'static str,
        reason: String,
    },
}

/// A validated command against one headless surface.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Detach and release the surface. Terminal.
    Dispose,
    /// Apply a new logical size to the surface layout.
    SetSize { size: LogicalSize },
    /// Read the current logical size.
    GetSize,
    /// Load an inline document, fire-and-forget.
    LoadData(LoadDataParams),
    /// Snapshot the full content as lossless image bytes.
    Capture,
}

impl Command {
    /// Decode a method name and argument map. `Ok(None)` means the
    /// method is not one this bridge implements.
    pub fn parse(method: &str, args: &Value) -> Result<Option<Self>, CommandError> {
        match method {
            "dispose" => Ok(Some(Self::Dispose)),
            "getSize" => Ok(Some(Self::GetSize)),
            "capture" => Ok(Some(Self::Capture)),
            "setSize" => {
                let raw = args.get("size").ok_or(CommandError::MissingArgument {
                    method: "setSize",
                    name: "size",
                })?;
                let size: LogicalSize = serde_json::from_value(raw.clone()).map_err(|e| {
                    CommandError::InvalidArgument {
                        method: "setSize",
                        name: "size",
                        reason: e.to_string(),
                    }
                })?;
                if !size.is_valid() {
                    return Err(CommandError::InvalidArgument {
                        method: "setSize",
                        name: "size",
                        reason: format!("dimensions must be non-negative, got {}", size),
                    });
                }
                Ok(Some(Self::SetSize { size }))
            }
            "loadData" => {
                let data = required_str(args, "loadData", "data")?;
                Ok(Some(Self::LoadData(LoadDataParams {
                    data,
                    mime_type: optional_str(args, "loadData", "mimeType")?,
                    encoding: optional_str(args, "loadData", "encoding")?,
                    base_url: optional_str(args, "loadData", "baseUrl")?,
                    history_url: optional_str(args, "loadData", "historyUrl")?,
                })))
            }
            _ => Ok(None),
        }
    }

    /// The wire-level method name.
    pub fn method(&self) -> &'static str {
        match self {
            Self::Dispose => "dispose",
            Self::SetSize { .. } => "setSize",
            Self::GetSize => "getSize",
            Self::LoadData(_) => "loadData",
            Self::Capture => "capture",
        }
    }
}

fn required_str(
    args: &Value,
    method: &'static str,
    name: &'static str,
) -> Result<String, CommandError> {
    match args.get(name) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(other) => Err(CommandError::InvalidArgument {
            method,
            name,
            reason: format!("expected a string, got {}", other),
        }),
        None => Err(CommandError::MissingArgument { method, name }),
    }
}

fn optional_str(
    args: &Value,
    method: &'static str,
    name: &'static str,
) -> Result<Option<String>, CommandError> {
    match args.get(name) {
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(Value::Null) | None => Ok(None),
        Some(other) => Err(CommandError::InvalidArgument {
            method,
            name,
            reason: format!("expected a string or null, got {}", other),
        }),
    }
}

/// Result of a dispatched command.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandReply {
    /// Plain success, answered as boolean `true`.
    Ack,
    /// Current size, or `None` when the surface was never attached.
    Size(Option<LogicalSize>),
    /// Encoded capture bytes.
    Image(Vec<u8>),
    /// The operation is not implemented on this platform.
    NotImplemented,
}

impl CommandReply {
    /// Lower to the transport-level reply.
    pub fn into_frame_reply(self) -> FrameReply {
        match self {
            Self::Ack => FrameReply::Success(json!(true)),
            Self::Size(Some(size)) => {
                FrameReply::Success(json!({"width": size.width, "height": size.height}))
            }
            Self::Size(None) => FrameReply::Success(Value::Null),
            Self::Image(bytes) => FrameReply::Binary(bytes),
            Self::NotImplemented => FrameReply::NotImplemented,
        }
    }
}
