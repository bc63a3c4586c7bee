//! Veil Dispatch
//!
//! The command side of the headless-surface bridge:
//! - Tagged command type, validated once at the transport boundary
//! - Dispatcher mapping each command onto a surface operation
//! - Per-surface worker threads serving command frames
//! - Manager coordinating create, registry, and dispose

mod command;
mod dispatcher;
mod manager;
mod worker;

pub use command::{Command, CommandError, CommandReply};
pub use dispatcher::{dispatch, serve_frame};
pub use manager::{HeadlessSurfaceManager, ManagerError};
pub use worker::spawn_worker;
