//! Halftone parameters.

use crate::color::Color;
use crate::shape::ShapeKind;

/// Parameters for one [`render`](crate::render) call.
///
/// `Settings` is plain data: the rasterizer reads it and never keeps it, so
/// callers pass the current settings again on every frame.
///
/// # Defaults
///
/// - Cell size: 10 px
/// - Contrast exponent: 1.5
/// - Foreground: `#ffffff`, background: `#1a1a1a`
/// - Shape: circle
/// - Invert / threshold: off
/// - Overlap: 0.2
/// - Edge detection: on, sensitivity 1.0
///
/// # Example
///
/// ```
/// use halftone::{Color, Settings, ShapeKind};
///
/// let settings = Settings::new()
///     .cell_size(6)
///     .shape(ShapeKind::Star)
///     .foreground(Color::BLACK)
///     .background(Color::Transparent);
///
/// assert_eq!(settings.cell_size, 6);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Grid cell edge length in pixels. Zero draws no cells.
    pub cell_size: u32,

    /// Contrast exponent, applied as `(b / 255) ^ (1 / contrast)`.
    ///
    /// Values above 1 lift the mapped brightness of midtones (smaller
    /// shapes in continuous mode), below 1 lower it. 1.0 is linear.
    pub contrast: f64,

    /// Shape color. Transparent suppresses all shapes.
    pub foreground: Color,

    /// Canvas color. Transparent leaves uncovered pixels at zero alpha.
    pub background: Color,

    /// Shape drawn in each cell.
    pub shape: ShapeKind,

    /// Flip the mapped brightness (`255 - adjusted`) before sizing.
    pub invert: bool,

    /// Draw full-size shapes where adjusted brightness exceeds 128 and
    /// nothing elsewhere, instead of sizing continuously.
    pub threshold: bool,

    /// Final size multiplier is `1 + overlap`. Negative values shrink;
    /// `-1` or below removes every shape.
    pub overlap: f64,

    /// Enlarge shapes in cells with high local brightness variance.
    pub edge_detection: bool,

    /// Scales the edge contribution when `edge_detection` is on.
    pub edge_sensitivity: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            cell_size: 10,
            contrast: 1.5,
            foreground: Color::WHITE,
            background: Color::rgb(0x1a, 0x1a, 0x1a),
            shape: ShapeKind::Circle,
            invert: false,
            threshold: false,
            overlap: 0.2,
            edge_detection: true,
            edge_sensitivity: 1.0,
        }
    }
}

impl Settings {
    /// Create settings with default values.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn cell_size(mut self, size: u32) -> Self {
        self.cell_size = size;
        self
    }

    #[inline]
    pub fn contrast(mut self, exponent: f64) -> Self {
        self.contrast = exponent;
        self
    }

    #[inline]
    pub fn foreground(mut self, color: Color) -> Self {
        self.foreground = color;
        self
    }

    #[inline]
    pub fn background(mut self, color: Color) -> Self {
        self.background = color;
        self
    }

    #[inline]
    pub fn shape(mut self, shape: ShapeKind) -> Self {
        self.shape = shape;
        self
    }

    #[inline]
    pub fn invert(mut self, enabled: bool) -> Self {
        self.invert = enabled;
        self
    }

    #[inline]
    pub fn threshold(mut self, enabled: bool) -> Self {
        self.threshold = enabled;
        self
    }

    #[inline]
    pub fn overlap(mut self, factor: f64) -> Self {
        self.overlap = factor;
        self
    }

    #[inline]
    pub fn edge_detection(mut self, enabled: bool) -> Self {
        self.edge_detection = enabled;
        self
    }

    #[inline]
    pub fn edge_sensitivity(mut self, sensitivity: f64) -> Self {
        self.edge_sensitivity = sensitivity;
        self
    }
}
