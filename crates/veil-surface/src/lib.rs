//! Veil Surface
//!
//! Lifecycle management for headless web surfaces: render views that
//! sit invisible inside the host's view tree so pages can be loaded,
//! resized, and captured without ever being shown.
//!
//! - Explicit lifecycle state machine (uninitialized, attached, disposed)
//! - Logical-unit size math against the host's pixel density
//! - Injected host and render-view capabilities, no global view tree
//! - Process-wide registry of live surfaces

mod host;
mod registry;
mod size;
mod software;
mod surface;
mod view;

pub use host::{FrameHost, Layout, ViewHost};
pub use registry::SurfaceRegistry;
pub use size::LogicalSize;
pub use software::SoftwareRenderView;
pub use surface::{HeadlessSurface, SurfaceError, SurfaceState};
pub use view::{LoadDataParams, RenderView};
