//! The per-frame raster transform.

use tiny_skia::Pixmap;

use crate::grid::CellGrid;
use crate::raster::Raster;
use crate::sample::sample_cell;
use crate::settings::Settings;
use crate::shape::draw_shape;
use crate::tone::shape_size;

/// Render `source` into a new raster of the same dimensions.
///
/// Identical inputs always produce byte-identical output. A zero-area
/// source yields an empty (transparent) raster of the same dimensions.
///
/// # Example
///
/// ```
/// use halftone::{render, Color, Raster, Settings};
///
/// let black = Raster::filled(4, 4, [0, 0, 0, 255]);
/// let settings = Settings::new()
///     .cell_size(4)
///     .contrast(1.0)
///     .overlap(0.0)
///     .foreground(Color::WHITE)
///     .background(Color::BLACK);
///
/// let out = render(&black, &settings);
/// assert_eq!((out.width(), out.height()), (4, 4));
/// // A radius-2 disc sits on the middle of the single cell
/// assert_eq!(out.pixel(1, 1), [255, 255, 255, 255]);
/// ```
pub fn render(source: &Raster, settings: &Settings) -> Raster {
    let mut target = Raster::new(source.width(), source.height());
    render_into(source, &mut target, settings);
    target
}

/// Render `source` into `target`, replacing its contents and dimensions.
///
/// Steps, in order:
/// 1. Fill the canvas with the background (or leave it transparent).
/// 2. Walk the cell grid row by row, left to right.
/// 3. Sample each cell's brightness (and edge strength when enabled).
/// 4. Map brightness to a size and draw the shape at the cell center.
///
/// A zero-area source leaves `target` untouched.
pub fn render_into(source: &Raster, target: &mut Raster, settings: &Settings) {
    if source.is_empty() {
        return;
    }
    let (width, height) = (source.width(), source.height());
    let Some(mut pixmap) = Pixmap::new(width, height) else {
        return;
    };

    // Pixmap::new starts fully transparent
    if !settings.background.is_transparent() {
        let [r, g, b, a] = settings.background.to_rgba();
        pixmap.fill(tiny_skia::Color::from_rgba8(r, g, b, a));
    }

    // With no ink there is nothing to size
    if !settings.foreground.is_transparent() {
        let grid = CellGrid::new(width, height, settings.cell_size);
        for cell in grid.cells() {
            let stats = sample_cell(source, &cell, settings.edge_detection);
            let size = shape_size(&stats, &cell, settings);
            if size > 0.0 {
                draw_shape(
                    &mut pixmap,
                    settings.shape,
                    cell.center(),
                    size,
                    settings.foreground,
                );
            }
        }
    }

    *target = Raster::from_pixmap(&pixmap);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::shape::ShapeKind;

    fn plain() -> Settings {
        Settings::new()
            .contrast(1.0)
            .overlap(0.0)
            .edge_detection(false)
            .foreground(Color::rgb(255, 0, 0))
            .background(Color::rgb(0, 0, 255))
    }

    #[test]
    fn test_target_adopts_source_dimensions() {
        let source = Raster::filled(7, 3, [0, 0, 0, 255]);
        let mut target = Raster::new(1, 1);
        render_into(&source, &mut target, &plain().cell_size(2));
        assert_eq!((target.width(), target.height()), (7, 3));
        assert_eq!(target.as_bytes().len(), 7 * 3 * 4);
    }

    #[test]
    fn test_empty_source_leaves_target_untouched() {
        let source = Raster::new(0, 4);
        let mut target = Raster::filled(2, 2, [9, 9, 9, 9]);
        render_into(&source, &mut target, &plain());
        assert_eq!(target, Raster::filled(2, 2, [9, 9, 9, 9]));

        let out = render(&source, &plain());
        assert_eq!((out.width(), out.height()), (0, 4));
    }

    #[test]
    fn test_previous_target_contents_are_discarded() {
        let source = Raster::filled(4, 4, [255, 255, 255, 255]);
        let mut target = Raster::filled(4, 4, [1, 2, 3, 4]);
        render_into(&source, &mut target, &plain().cell_size(4));
        assert_eq!(target, Raster::filled(4, 4, [0, 0, 255, 255]));
    }

    #[test]
    fn test_transparent_foreground_draws_background_only() {
        let source = Raster::filled(8, 8, [0, 0, 0, 255]);
        let out = render(&source, &plain().cell_size(4).foreground(Color::Transparent));
        assert_eq!(out, Raster::filled(8, 8, [0, 0, 255, 255]));
    }

    #[test]
    fn test_transparent_background_leaves_canvas_clear() {
        let source = Raster::filled(8, 8, [255, 255, 255, 255]);
        let out = render(&source, &plain().cell_size(4).background(Color::Transparent));
        assert_eq!(out, Raster::new(8, 8));
    }

    #[test]
    fn test_zero_cell_size_draws_background_only() {
        let source = Raster::filled(8, 8, [0, 0, 0, 255]);
        let out = render(&source, &plain().cell_size(0));
        assert_eq!(out, Raster::filled(8, 8, [0, 0, 255, 255]));
    }

    #[test]
    fn test_overlap_spreads_shapes_past_cell_bounds() {
        let source = Raster::filled(8, 4, [0, 0, 0, 255]);

        // Radius 2 discs only graze the cell corners
        let out = render(&source, &plain().cell_size(4));
        assert_ne!(out.pixel(0, 0), [255, 0, 0, 255]);

        // Overlap 1.0 doubles the radius, covering the corners
        let out = render(&source, &plain().cell_size(4).overlap(1.0));
        assert_eq!(out.pixel(0, 0), [255, 0, 0, 255]);
        assert_eq!(out.pixel(7, 3), [255, 0, 0, 255]);
    }

    #[test]
    fn test_square_cells_tile_the_raster() {
        let source = Raster::filled(8, 4, [0, 0, 0, 255]);
        let settings = plain().cell_size(4).shape(ShapeKind::Square);
        let out = render(&source, &settings);
        assert_eq!(out, Raster::filled(8, 4, [255, 0, 0, 255]));
    }
}
