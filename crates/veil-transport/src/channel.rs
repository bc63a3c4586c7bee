//! Per-surface command channel.

use crate::message::{channel_name, CommandFrame, FrameReply, SurfaceId};
use crossbeam_channel::{bounded, unbounded, Receiver, Sender};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Errors from the command transport itself, as opposed to errors the
/// platform side reports inside a [`FrameReply`].
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("channel {0} is closed")]
    Closed(String),

    #[error("no reply on channel {0} within {1:?}")]
    ReplyTimeout(String, Duration),
}

/// Host-side handle for one surface's command channel.
///
/// Cloning the handle shares the underlying channel; dropping the last
/// server-side receiver closes it.
#[derive(Debug, Clone)]
pub struct SurfaceChannel {
    name: String,
    tx: Sender<CommandFrame>,
}

impl SurfaceChannel {
    /// Open a channel for the given surface. Returns the host-side
    /// handle and the platform-side frame receiver.
    pub fn open(id: &SurfaceId) -> (Self, Receiver<CommandFrame>) {
        let name = channel_name(id);
        let (tx, rx) = unbounded();
        debug!("Opened command channel {}", name);
        (Self { name, tx }, rx)
    }

    /// The channel's name, `headless_webview_<id>`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Send one command and block until the platform side replies.
    pub fn invoke(&self, method: &str, args: Value) -> Result<FrameReply, TransportError> {
        let (reply_tx, reply_rx) = bounded(1);
        let frame = CommandFrame {
            method: method.to_string(),
            args,
            reply: reply_tx,
        };
        self.tx
            .send(frame)
            .map_err(|_| TransportError::Closed(self.name.clone()))?;
        reply_rx
            .recv()
            .map_err(|_| TransportError::Closed(self.name.clone()))
    }

    /// Like [`invoke`](Self::invoke), but give up if no reply arrives
    /// in time. The platform side answers synchronously, so a timeout
    /// means the serving thread is gone or wedged.
    pub fn invoke_timeout(
        &self,
        method: &str,
        args: Value,
        timeout: Duration,
    ) -> Result<FrameReply, TransportError> {
        let (reply_tx, reply_rx) = bounded(1);
        let frame = CommandFrame {
            method: method.to_string(),
            args,
            reply: reply_tx,
        };
        self.tx
            .send(frame)
            .map_err(|_| TransportError::Closed(self.name.clone()))?;
        reply_rx
            .recv_timeout(timeout)
            .map_err(|_| TransportError::ReplyTimeout(self.name.clone(), timeout))
    }
}
