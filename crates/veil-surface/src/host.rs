//! The surface-hosting capability.
//!
//! The lifecycle manager never touches a concrete view tree; it talks
//! to whatever implements [`ViewHost`]. The host owns the insertion
//! point, the layout parameters, and the display density.

use tracing::debug;

/// Layout applied to the hosted view, in device pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// Fixed extent in device pixels.
    Fixed { width_px: u32, height_px: u32 },
    /// Track the parent's extent.
    MatchParent,
}

/// Abstract host for a headless surface's view.
///
/// `attach` inserts the view as the first child of the host's root
/// content view and marks it invisible; the view stays laid out but is
/// never shown. Implementations decide what "view" means for their
/// toolkit.
pub trait ViewHost: Send {
    /// Insert the view into the view tree with the given layout.
    /// Returns `false` when the host has no content view to attach to.
    fn attach(&mut self, layout: Layout) -> bool;

    /// Remove the view from the view tree.
    fn detach(&mut self);

    /// Apply new layout dimensions. Takes effect on the next layout
    /// pass; nothing is re-rendered synchronously.
    fn set_layout(&mut self, layout: Layout);

    /// Current layout, or `None` when the view was never attached.
    fn layout(&self) -> Option<Layout>;

    /// Device pixels per logical unit for the current display.
    fn density(&self) -> f32;

    /// The parent content view's extent in device pixels.
    fn parent_size_px(&self) -> (u32, u32);
}

/// In-process host backed by a plain frame: a fixed-density display
/// with one root content view. Used by the bridge binary and tests.
#[derive(Debug)]
pub struct FrameHost {
    density: f32,
    parent_px: (u32, u32),
    layout: Option<Layout>,
    attached: bool,
}

impl FrameHost {
    pub fn new(density: f32, parent_width_px: u32, parent_height_px: u32) -> Self {
        Self {
            density,
            parent_px: (parent_width_px, parent_height_px),
            layout: None,
            attached: false,
        }
    }

    /// Whether the view is currently in the tree.
    pub fn is_attached(&self) -> bool {
        self.attached
    }
}

impl ViewHost for FrameHost {
    fn attach(&mut self, layout: Layout) -> bool {
        self.layout = Some(layout);
        self.attached = true;
        debug!("Attached invisible view at index 0 with {:?}", layout);
        true
    }

    fn detach(&mut self) {
        self.attached = false;
        debug!("Detached view from content frame");
    }

    fn set_layout(&mut self, layout: Layout) {
        self.layout = Some(layout);
    }

    fn layout(&self) -> Option<Layout> {
        self.layout
    }

    fn density(&self) -> f32 {
        self.density
    }

    fn parent_size_px(&self) -> (u32, u32) {
        self.parent_px
    }
}
