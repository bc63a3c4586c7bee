//! Veil Transport
//!
//! Per-surface command channels between the host and the platform side:
//! - Named request/reply channel per headless surface
//! - One-shot command frames with an explicit reply slot
//! - Outbound surface events (the host-facing ready signal)

mod channel;
mod message;

pub use channel::{SurfaceChannel, TransportError};
pub use message::{channel_name, CommandFrame, FrameReply, SurfaceEvent, SurfaceId};
