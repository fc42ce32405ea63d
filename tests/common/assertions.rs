//! Assertion helpers for tests.

use halftone::Raster;
use pretty_assertions::assert_eq;
use reticulate::rendering::{decode_png, is_png};
use std::path::Path;

/// Assert the file is a PNG and decode it
pub fn read_png(path: &Path) -> Raster {
    let bytes = std::fs::read(path)
        .unwrap_or_else(|e| panic!("Failed to read {}: {e}", path.display()));
    assert!(
        is_png(&bytes),
        "Expected PNG at {}, got {} bytes starting with {:?}",
        path.display(),
        bytes.len(),
        &bytes[..8.min(bytes.len())]
    );
    decode_png(&bytes).unwrap()
}

/// Assert raster dimensions
pub fn assert_dimensions(raster: &Raster, width: u32, height: u32) {
    assert_eq!(
        (raster.width(), raster.height()),
        (width, height),
        "Unexpected raster dimensions"
    );
}

/// Assert every pixel in the column range `xs` has the given color
pub fn assert_columns(raster: &Raster, xs: std::ops::Range<u32>, rgba: [u8; 4]) {
    for y in 0..raster.height() {
        for x in xs.clone() {
            assert_eq!(raster.pixel(x, y), rgba, "pixel ({x}, {y})");
        }
    }
}
