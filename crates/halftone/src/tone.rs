//! Brightness-to-size mapping.
//!
//! Turns [`CellStats`] into the scalar size handed to the shape primitives:
//!
//! ```text
//! avg_brightness
//!     |
//!     v
//! contrast curve        (b / 255) ^ (1 / contrast) * 255
//!     |
//!     v
//! [invert]              255 - adjusted
//!     |
//!     v
//! size                  threshold: max_size if adjusted > 128, else 0
//!     |                 continuous: (255 - adjusted) / 255 * max_size
//!     v
//! [edge boost]          * (1 + min(1, edge * sensitivity / 40) * 0.6)
//!     |
//!     v
//! overlap               * (1 + overlap), clamped at 0
//! ```

use crate::grid::Cell;
use crate::sample::CellStats;
use crate::settings::Settings;

/// Threshold mode cutoff. Exclusive: a cell at exactly 128 gets no shape.
pub const THRESHOLD_LEVEL: f64 = 128.0;

/// Edge strength (times sensitivity) at which the boost saturates.
pub const EDGE_BOOST_DIVISOR: f64 = 40.0;

/// Maximum relative enlargement from the edge boost (60%).
pub const EDGE_BOOST_MAX: f64 = 0.6;

/// Apply the gamma-style contrast curve to a 0-255 brightness.
///
/// An exponent of 1 is the identity.
#[inline]
pub fn contrast_curve(brightness: f64, exponent: f64) -> f64 {
    (brightness / 255.0).powf(1.0 / exponent) * 255.0
}

/// Base size before edge boost and overlap.
///
/// Darker `adjusted` values give larger shapes in continuous mode.
#[inline]
pub fn base_size(adjusted: f64, max_size: f64, threshold: bool) -> f64 {
    if threshold {
        if adjusted > THRESHOLD_LEVEL {
            max_size
        } else {
            0.0
        }
    } else {
        (255.0 - adjusted) / 255.0 * max_size
    }
}

/// Multiplier for cells with local variance; 1.0 when there is none.
#[inline]
pub fn edge_boost(edge_strength: f64, sensitivity: f64) -> f64 {
    if edge_strength > 0.0 {
        let boost = (edge_strength * sensitivity / EDGE_BOOST_DIVISOR).min(1.0);
        1.0 + boost * EDGE_BOOST_MAX
    } else {
        1.0
    }
}

/// Final shape size for a cell.
///
/// Never negative. Non-finite inputs (e.g. a NaN contrast) yield 0, which
/// the renderer treats as "no shape".
pub fn shape_size(stats: &CellStats, cell: &Cell, settings: &Settings) -> f64 {
    let mut adjusted = contrast_curve(stats.avg_brightness, settings.contrast);
    if settings.invert {
        adjusted = 255.0 - adjusted;
    }

    let mut size = base_size(adjusted, cell.max_size(), settings.threshold);
    if settings.edge_detection {
        size *= edge_boost(stats.edge_strength, settings.edge_sensitivity);
    }
    size *= 1.0 + settings.overlap;

    if size > 0.0 {
        size
    } else {
        0.0
    }
}
