//! The owned render-view capability.

/// Parameters for loading an inline document into a render view.
///
/// All five fields pass through to the engine unmodified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadDataParams {
    pub data: String,
    pub mime_type: Option<String>,
    pub encoding: Option<String>,
    pub base_url: Option<String>,
    pub history_url: Option<String>,
}

impl LoadDataParams {
    /// Inline HTML with default mime type and encoding.
    pub fn html(data: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            mime_type: Some("text/html".to_string()),
            encoding: Some("UTF-8".to_string()),
            base_url: None,
            history_url: None,
        }
    }
}

/// The web-engine view a headless surface owns exclusively.
///
/// Rendering, page loading, and compositing all live behind this
/// trait; the lifecycle manager only drives it.
pub trait RenderView: Send {
    /// Load an inline document. Fire-and-forget: this returns before
    /// the document is rendered, and no completion signal is raised
    /// here. Callers that need readiness listen on the surface's
    /// event channel instead.
    fn load_data(&mut self, params: &LoadDataParams);

    /// Height of the full scrollable content, in logical units.
    fn content_height(&self) -> u32;

    /// The view's current zoom scale.
    fn zoom_scale(&self) -> f32;

    /// Render the current content into an RGBA8 buffer of exactly
    /// `width_px * height_px * 4` bytes.
    fn draw(&self, width_px: u32, height_px: u32) -> Vec<u8>;

    /// Whether this platform can snapshot the view at all. When this
    /// is `false`, capture consistently reports not-implemented.
    fn supports_capture(&self) -> bool {
        true
    }
}
