//! Deterministic software render view.
//!
//! Stands in for a real web engine in the bridge binary and in tests.
//! Content height tracks the loaded document line count, and draws
//! produce a gradient tinted by the document bytes so two different
//! documents never render identically.

use crate::view::{LoadDataParams, RenderView};
use tracing::debug;

/// Logical units per document line.
const LINE_HEIGHT: u32 = 16;

/// A render view that rasterizes documents in-process.
#[derive(Debug)]
pub struct SoftwareRenderView {
    document: Option<LoadDataParams>,
    zoom: f32,
    capture_supported: bool,
}

impl SoftwareRenderView {
    pub fn new() -> Self {
        Self {
            document: None,
            zoom: 1.0,
            capture_supported: true,
        }
    }

    pub fn with_zoom(zoom: f32) -> Self {
        Self {
            zoom,
            ..Self::new()
        }
    }

    /// A view whose platform cannot snapshot, for exercising the
    /// not-implemented capture path.
    pub fn without_capture() -> Self {
        Self {
            capture_supported: false,
            ..Self::new()
        }
    }

    /// The currently loaded document, if any.
    pub fn document(&self) -> Option<&LoadDataParams> {
        self.document.as_ref()
    }

    fn tint(&self) -> u8 {
        // Cheap deterministic fingerprint of the document bytes.
        self.document
            .as_ref()
            .map(|d| d.data.bytes().fold(0u8, |acc, b| acc.wrapping_mul(31).wrapping_add(b)))
            .unwrap_or(0)
    }
}

impl Default for SoftwareRenderView {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderView for SoftwareRenderView {
    fn load_data(&mut self, params: &LoadDataParams) {
        debug!(
            "Loading {} byte document (mime: {:?})",
            params.data.len(),
            params.mime_type
        );
        self.document = Some(params.clone());
    }

    fn content_height(&self) -> u32 {
        match &self.document {
            Some(doc) if !doc.data.is_empty() => doc.data.lines().count() as u32 * LINE_HEIGHT,
            _ => 0,
        }
    }

    fn zoom_scale(&self) -> f32 {
        self.zoom
    }

    fn draw(&self, width_px: u32, height_px: u32) -> Vec<u8> {
        let tint = self.tint();
        let mut pixels = Vec::with_capacity((width_px * height_px * 4) as usize);
        for y in 0..height_px {
            let shade = if height_px > 1 {
                (y * 255 / (height_px - 1)) as u8
            } else {
                255
            };
            for x in 0..width_px {
                let r = if width_px > 1 {
                    (x * 255 / (width_px - 1)) as u8
                } else {
                    255
                };
                pixels.extend_from_slice(&[r, shade, tint, 255]);
            }
        }
        pixels
    }

    fn supports_capture(&self) -> bool {
        self.capture_supported
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_height_follows_lines() {
        let mut view = SoftwareRenderView::new();
        assert_eq!(view.content_height(), 0);

        view.load_data(&LoadDataParams::html("<html>\n<body>\n</body>\n</html>"));
        assert_eq!(view.content_height(), 4 * LINE_HEIGHT);
    }

    #[test]
    fn test_empty_document_has_zero_height() {
        let mut view = SoftwareRenderView::new();
        view.load_data(&LoadDataParams::html(""));
        assert_eq!(view.content_height(), 0);
    }

    #[test]
    fn test_draw_buffer_size() {
        let view = SoftwareRenderView::new();
        assert_eq!(view.draw(8, 4).len(), 8 * 4 * 4);
        assert_eq!(view.draw(1, 1).len(), 4);
    }

    #[test]
    fn test_different_documents_render_differently() {
        let mut a = SoftwareRenderView::new();
        let mut b = SoftwareRenderView::new();
        a.load_data(&LoadDataParams::html("<html>one</html>"));
        b.load_data(&LoadDataParams::html("<html>two</html>"));
        assert_ne!(a.draw(4, 4), b.draw(4, 4));
    }

    #[test]
    fn test_load_data_preserves_params() {
        let mut view = SoftwareRenderView::new();
        let params = LoadDataParams {
            data: "<html></html>".to_string(),
            mime_type: Some("text/html".to_string()),
            encoding: Some("UTF-8".to_string()),
            base_url: Some("https://example.com/".to_string()),
            history_url: None,
        };
        view.load_data(&params);
        assert_eq!(view.document(), Some(&params));
    }
}
