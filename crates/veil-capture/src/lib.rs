//! Veil Capture
//!
//! Turns a headless surface's rendered frame into encoded image bytes.
//! Captures cover the full scrollable content height at the view's
//! current zoom scale, not just the visible viewport, so the bitmap
//! grows with the document.

mod snapshot;

pub use snapshot::{capture_extent, CaptureError, Snapshot};
