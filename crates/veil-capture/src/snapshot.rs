//! Full-content snapshot encoding.

use image::{DynamicImage, ImageBuffer, Rgba};
use std::io::Cursor;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tracing::debug;

/// Errors from snapshot encoding.
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("Image encoding error: {0}")]
    ImageEncode(String),

    #[error("Pixel buffer does not match {width}x{height} RGBA frame")]
    BadBuffer { width: u32, height: u32 },
}

/// Bitmap dimensions for a capture: the surface's width in device
/// pixels by the content height scaled by the current zoom, rounded
/// to the nearest pixel. An empty document clamps to 1x1 so the
/// encoded image is always well formed.
pub fn capture_extent(width_px: u32, content_height: u32, zoom_scale: f32) -> (u32, u32) {
    let height = (content_height as f32 * zoom_scale + 0.5) as u32;
    (width_px.max(1), height.max(1))
}

/// A PNG-encoded capture of a surface's full content.
#[derive(Debug, Clone)]
pub struct Snapshot {
    /// PNG-encoded image data
    data: Arc<Vec<u8>>,
    /// Capture width in pixels
    width: u32,
    /// Capture height in pixels
    height: u32,
}

impl Snapshot {
    /// Encode a snapshot from raw RGBA pixel data.
    pub fn from_rgba(pixels: &[u8], width: u32, height: u32) -> Result<Self, CaptureError> {
        let start = Instant::now();

        let img: ImageBuffer<Rgba<u8>, Vec<u8>> =
            ImageBuffer::from_raw(width, height, pixels.to_vec())
                .ok_or(CaptureError::BadBuffer { width, height })?;
        let img = DynamicImage::ImageRgba8(img);

        // PNG: lossless, captures must not degrade the page
        let mut png_data = Vec::new();
        img.write_to(&mut Cursor::new(&mut png_data), image::ImageFormat::Png)
            .map_err(|e| CaptureError::ImageEncode(e.to_string()))?;

        debug!(
            "Encoded snapshot {}x{} ({} bytes) in {:?}",
            width,
            height,
            png_data.len(),
            start.elapsed()
        );

        Ok(Self {
            data: Arc::new(png_data),
            width,
            height,
        })
    }

    /// The encoded PNG bytes.
    pub fn png_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Take ownership of the encoded bytes, cloning only if shared.
    pub fn into_png_bytes(self) -> Vec<u8> {
        Arc::try_unwrap(self.data).unwrap_or_else(|arc| (*arc).clone())
    }

    /// Capture dimensions in pixels.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}
