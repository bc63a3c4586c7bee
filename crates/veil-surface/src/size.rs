//! Logical size units and density conversion.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A size in logical (density-independent) units.
///
/// Sizes are stored and reported in logical units; conversion to device
/// pixels happens at the point of use against the host's current
/// density factor. The `-1 x -1` sentinel means "fill the parent".
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LogicalSize {
    pub width: f64,
    pub height: f64,
}

impl LogicalSize {
    /// Sentinel for a surface sized to fill its parent.
    pub const FILL_PARENT: LogicalSize = LogicalSize {
        width: -1.0,
        height: -1.0,
    };

    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Whether this is the fill-parent sentinel.
    pub fn is_fill_parent(&self) -> bool {
        self.width == -1.0 && self.height == -1.0
    }

    /// A size is valid when both dimensions are finite and
    /// non-negative, or it is exactly the fill-parent sentinel.
    pub fn is_valid(&self) -> bool {
        self.is_fill_parent()
            || (self.width.is_finite()
                && self.height.is_finite()
                && self.width >= 0.0
                && self.height >= 0.0)
    }

    /// Convert to device pixels. Truncates to whole pixels, the same
    /// direction layout parameters truncate.
    pub fn to_pixels(&self, density: f32) -> (u32, u32) {
        (
            (self.width * density as f64) as u32,
            (self.height * density as f64) as u32,
        )
    }

    /// Convert a pixel extent back to logical units.
    pub fn from_pixels(width_px: u32, height_px: u32, density: f32) -> Self {
        Self {
            width: width_px as f64 / density as f64,
            height: height_px as f64 / density as f64,
        }
    }
}

impl fmt::Display for LogicalSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_pixel_round_trip() {
        let size = LogicalSize::new(320.0, 480.0);
        let (w, h) = size.to_pixels(2.0);
        assert_eq!((w, h), (640, 960));

        let back = LogicalSize::from_pixels(w, h, 2.0);
        assert!((back.width - size.width).abs() < 1e-9);
        assert!((back.height - size.height).abs() < 1e-9);
    }

    #[test]
    fn test_fractional_density_round_trip_tolerance() {
        let size = LogicalSize::new(100.0, 50.0);
        let (w, h) = size.to_pixels(2.625);
        let back = LogicalSize::from_pixels(w, h, 2.625);
        // Truncation to whole pixels loses at most one pixel per axis.
        assert!((back.width - size.width).abs() < 1.0 / 2.625);
        assert!((back.height - size.height).abs() < 1.0 / 2.625);
    }

    #[test]
    fn test_fill_parent_sentinel() {
        assert!(LogicalSize::FILL_PARENT.is_fill_parent());
        assert!(LogicalSize::FILL_PARENT.is_valid());
        assert!(!LogicalSize::new(-1.0, 480.0).is_valid());
    }

    #[test]
    fn test_invalid_sizes() {
        assert!(!LogicalSize::new(-2.0, 10.0).is_valid());
        assert!(!LogicalSize::new(f64::NAN, 10.0).is_valid());
        assert!(!LogicalSize::new(10.0, f64::INFINITY).is_valid());
        assert!(LogicalSize::new(0.0, 0.0).is_valid());
    }

    #[test]
    fn test_wire_map_shape() {
        let size = LogicalSize::new(320.0, 480.0);
        let value = serde_json::to_value(size).unwrap();
        assert_eq!(value, json!({"width": 320.0, "height": 480.0}));

        let parsed: LogicalSize = serde_json::from_value(value).unwrap();
        assert_eq!(parsed, size);
    }
}
