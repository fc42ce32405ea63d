//! Per-cell brightness statistics.

use crate::grid::Cell;
use crate::raster::Raster;

/// Brightness statistics for one cell of the source raster.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CellStats {
    /// Mean luminance over the cell, 0-255.
    pub avg_brightness: f64,
    /// Mean absolute deviation of luminance from `avg_brightness`.
    /// Zero when edge detection is off.
    pub edge_strength: f64,
}

/// Sample a cell of `raster`.
///
/// The first pass computes the mean luminance; the second, run only when
/// `with_edges` is set, measures how far samples stray from that mean.
/// Uniform cells therefore have zero edge strength regardless of brightness.
///
/// `cell` must lie within the raster bounds (as produced by
/// [`CellGrid`](crate::CellGrid) for the same raster).
pub fn sample_cell(raster: &Raster, cell: &Cell, with_edges: bool) -> CellStats {
    let count = cell.area();
    if count == 0 {
        return CellStats::default();
    }

    let mut total = 0.0;
    for_each_luminance(raster, cell, |l| total += l);
    let avg_brightness = total / count as f64;

    let edge_strength = if with_edges {
        let mut deviation = 0.0;
        for_each_luminance(raster, cell, |l| deviation += (l - avg_brightness).abs());
        deviation / count as f64
    } else {
        0.0
    };

    CellStats {
        avg_brightness,
        edge_strength,
    }
}

#[inline]
fn for_each_luminance(raster: &Raster, cell: &Cell, mut f: impl FnMut(f64)) {
    for y in cell.y..cell.y + cell.height {
        for x in cell.x..cell.x + cell.width {
            f(raster.luminance(x, y));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn whole(raster: &Raster) -> Cell {
        Cell {
            x: 0,
            y: 0,
            width: raster.width(),
            height: raster.height(),
        }
    }

    /// Left half black, right half white.
    fn split_raster() -> Raster {
        let mut data = Vec::new();
        for _y in 0..2 {
            for x in 0..4 {
                let v = if x < 2 { 0 } else { 255 };
                data.extend_from_slice(&[v, v, v, 255]);
            }
        }
        Raster::from_rgba(4, 2, data).unwrap()
    }

    #[test]
    fn test_uniform_cell() {
        let raster = Raster::filled(4, 4, [90, 90, 90, 255]);
        let stats = sample_cell(&raster, &whole(&raster), true);
        assert_eq!(stats.avg_brightness, 90.0);
        assert_eq!(stats.edge_strength, 0.0);
    }

    #[test]
    fn test_split_cell_has_edge_strength() {
        let raster = split_raster();
        let stats = sample_cell(&raster, &whole(&raster), true);
        assert_eq!(stats.avg_brightness, 127.5);
        assert_eq!(stats.edge_strength, 127.5);
    }

    #[test]
    fn test_edges_disabled_reports_zero() {
        let raster = split_raster();
        let stats = sample_cell(&raster, &whole(&raster), false);
        assert_eq!(stats.avg_brightness, 127.5);
        assert_eq!(stats.edge_strength, 0.0);
    }

    #[test]
    fn test_sub_cell_only_reads_its_bounds() {
        let raster = split_raster();
        let right = Cell {
            x: 2,
            y: 0,
            width: 2,
            height: 2,
        };
        let stats = sample_cell(&raster, &right, true);
        assert_eq!(stats.avg_brightness, 255.0);
        assert_eq!(stats.edge_strength, 0.0);
    }

    #[test]
    fn test_channel_mean_is_unweighted() {
        let raster = Raster::filled(2, 2, [255, 0, 0, 255]);
        let stats = sample_cell(&raster, &whole(&raster), false);
        assert_eq!(stats.avg_brightness, 85.0);
    }
}
