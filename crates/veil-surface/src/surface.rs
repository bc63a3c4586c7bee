//! Headless surface lifecycle.

use crate::host::{Layout, ViewHost};
use crate::registry::SurfaceRegistry;
use crate::size::LogicalSize;
use crate::view::{LoadDataParams, RenderView};
use crossbeam_channel::Sender;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};
use veil_capture::{capture_extent, CaptureError, Snapshot};
use veil_transport::{SurfaceEvent, SurfaceId};

/// Lifecycle state of a headless surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceState {
    /// Constructed but not yet inserted into the host view tree.
    Uninitialized,
    /// Attached and ready for commands.
    Attached,
    /// Disposed. Terminal; no operation is valid.
    Disposed,
}

impl fmt::Display for SurfaceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uninitialized => write!(f, "uninitialized"),
            Self::Attached => write!(f, "attached"),
            Self::Disposed => write!(f, "disposed"),
        }
    }
}

/// Errors from surface lifecycle operations.
#[derive(Debug, Error)]
pub enum SurfaceError {
    #[error("{op} is invalid on {id}: surface is {state}")]
    InvalidState {
        id: SurfaceId,
        state: SurfaceState,
        op: &'static str,
    },

    #[error("invalid size {width}x{height}")]
    InvalidSize { width: f64, height: f64 },

    #[error("host has no content view to attach {0}")]
    HostUnavailable(SurfaceId),

    #[error(transparent)]
    Capture(#[from] CaptureError),
}

/// A render view attached invisibly to the host's view tree.
///
/// Owns its [`RenderView`] exclusively. All size math is done in
/// logical units against the host's density at the point of use;
/// pixel values are never stored here.
pub struct HeadlessSurface {
    id: SurfaceId,
    state: SurfaceState,
    view: Option<Box<dyn RenderView>>,
    host: Option<Box<dyn ViewHost>>,
    registry: Option<Arc<SurfaceRegistry>>,
    events: Sender<SurfaceEvent>,
}

impl HeadlessSurface {
    /// Create a surface in the uninitialized state. [`attach`]
    /// (Self::attach) must run before any other operation.
    pub fn new(
        id: SurfaceId,
        view: Box<dyn RenderView>,
        host: Box<dyn ViewHost>,
        events: Sender<SurfaceEvent>,
    ) -> Self {
        Self {
            id,
            state: SurfaceState::Uninitialized,
            view: Some(view),
            host: Some(host),
            registry: None,
            events,
        }
    }

    pub fn id(&self) -> &SurfaceId {
        &self.id
    }

    pub fn state(&self) -> SurfaceState {
        self.state
    }

    /// Hook up the process-wide registry so dispose can deregister
    /// this surface.
    pub fn bind_registry(&mut self, registry: Arc<SurfaceRegistry>) {
        self.registry = Some(registry);
    }

    fn ensure_attached(&self, op: &'static str) -> Result<(), SurfaceError> {
        if self.state != SurfaceState::Attached {
            return Err(SurfaceError::InvalidState {
                id: self.id.clone(),
                state: self.state,
                op,
            });
        }
        Ok(())
    }

    fn host(&self) -> &dyn ViewHost {
        // ensure_attached guards every caller; host is only None after
        // dispose, which is not Attached.
        self.host.as_deref().unwrap()
    }

    /// Insert the render view into the host's view tree, invisible,
    /// sized by the optional hint or to fill the parent. Fires the
    /// `WebViewCreated` event once the view is in place.
    pub fn attach(&mut self, initial_size: Option<LogicalSize>) -> Result<(), SurfaceError> {
        if self.state != SurfaceState::Uninitialized {
            return Err(SurfaceError::InvalidState {
                id: self.id.clone(),
                state: self.state,
                op: "attach",
            });
        }
        let host = self.host.as_deref_mut().unwrap();
        let layout = match initial_size {
            Some(size) if !size.is_valid() => {
                return Err(SurfaceError::InvalidSize {
                    width: size.width,
                    height: size.height,
                });
            }
            Some(size) if !size.is_fill_parent() => {
                let (width_px, height_px) = size.to_pixels(host.density());
                Layout::Fixed {
                    width_px,
                    height_px,
                }
            }
            _ => Layout::MatchParent,
        };
        if !host.attach(layout) {
            return Err(SurfaceError::HostUnavailable(self.id.clone()));
        }
        self.state = SurfaceState::Attached;
        info!("{} attached with {:?}", self.id, layout);

        if self
            .events
            .send(SurfaceEvent::WebViewCreated {
                surface: self.id.clone(),
            })
            .is_err()
        {
            warn!("{} ready event dropped: no listener", self.id);
        }
        Ok(())
    }

    /// Apply a new logical size to the view's layout. Takes effect on
    /// the next layout pass.
    pub fn set_size(&mut self, size: LogicalSize) -> Result<(), SurfaceError> {
        self.ensure_attached("setSize")?;
        if !size.is_valid() {
            return Err(SurfaceError::InvalidSize {
                width: size.width,
                height: size.height,
            });
        }
        let host = self.host.as_deref_mut().unwrap();
        let layout = if size.is_fill_parent() {
            Layout::MatchParent
        } else {
            let (width_px, height_px) = size.to_pixels(host.density());
            Layout::Fixed {
                width_px,
                height_px,
            }
        };
        host.set_layout(layout);
        debug!("{} resized to {}", self.id, size);
        Ok(())
    }

    /// Current size in logical units, read back from the layout
    /// through the same density factor that wrote it.
    pub fn size(&self) -> Result<LogicalSize, SurfaceError> {
        self.ensure_attached("getSize")?;
        let host = self.host();
        let (width_px, height_px) = match host.layout() {
            Some(Layout::Fixed {
                width_px,
                height_px,
            }) => (width_px, height_px),
            _ => host.parent_size_px(),
        };
        Ok(LogicalSize::from_pixels(width_px, height_px, host.density()))
    }

    /// Pass an inline document through to the render view. Returns as
    /// soon as the engine accepts it; completion is not signalled.
    pub fn load_data(&mut self, params: &LoadDataParams) -> Result<(), SurfaceError> {
        self.ensure_attached("loadData")?;
        self.view.as_deref_mut().unwrap().load_data(params);
        Ok(())
    }

    /// Snapshot the full scrollable content as PNG bytes.
    ///
    /// The bitmap spans the surface's width in device pixels by the
    /// content height scaled by the current zoom, regardless of the
    /// viewport. Returns `None` when the platform cannot snapshot,
    /// consistently across calls.
    pub fn capture(&mut self) -> Result<Option<Vec<u8>>, SurfaceError> {
        self.ensure_attached("capture")?;
        let view = self.view.as_deref().unwrap();
        if !view.supports_capture() {
            debug!("{} capture not supported on this platform", self.id);
            return Ok(None);
        }
        let host = self.host();
        let width_px = match host.layout() {
            Some(Layout::Fixed { width_px, .. }) => width_px,
            _ => host.parent_size_px().0,
        };
        let (width_px, height_px) =
            capture_extent(width_px, view.content_height(), view.zoom_scale());
        let pixels = view.draw(width_px, height_px);
        let snapshot = Snapshot::from_rgba(&pixels, width_px, height_px)?;
        debug!("{} captured {}x{}", self.id, width_px, height_px);
        Ok(Some(snapshot.into_png_bytes()))
    }

    /// Detach the view, release the render view, and deregister the
    /// surface. Irreversible; a second call is a no-op.
    pub fn dispose(&mut self) {
        if self.state == SurfaceState::Disposed {
            debug!("{} already disposed", self.id);
            return;
        }
        if let Some(registry) = self.registry.take() {
            registry.remove(&self.id);
        }
        if let Some(mut host) = self.host.take() {
            if self.state == SurfaceState::Attached {
                host.detach();
            }
        }
        self.view = None;
        self.state = SurfaceState::Disposed;
        let _ = self.events.send(SurfaceEvent::Disposed {
            surface: self.id.clone(),
        });
        info!("{} disposed", self.id);
    }
}
