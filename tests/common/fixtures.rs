//! Test fixtures: source images and frame directories.

use halftone::Raster;
use reticulate::rendering::encode_png;
use std::path::{Path, PathBuf};

/// Background used by [`style_yaml`]
pub const PAPER: [u8; 4] = [0, 0, 0, 255];

/// Foreground used by [`style_yaml`]
pub const INK: [u8; 4] = [255, 255, 255, 255];

/// Linear, edge-free square style: black cells become solid ink, white
/// cells stay background.
pub fn style_yaml(cell_size: u32) -> String {
    format!(
        r##"cell_size: {cell_size}
contrast: 1.0
foreground: "#ffffff"
background: "#000000"
shape: square
overlap: 0.0
edge_detection: false
"##
    )
}

/// Left half black, right half white
pub fn split_image(width: u32, height: u32) -> Raster {
    let mut data = Vec::with_capacity((width * height * 4) as usize);
    for _ in 0..height {
        for x in 0..width {
            let v = if x < width / 2 { 0 } else { 255 };
            data.extend_from_slice(&[v, v, v, 255]);
        }
    }
    Raster::from_rgba(width, height, data).unwrap()
}

/// A solid grey frame whose level encodes its index
pub fn numbered_frame(index: usize, width: u32, height: u32) -> Raster {
    let level = (index * 40 % 256) as u8;
    Raster::filled(width, height, [level, level, level, 255])
}

/// Write a raster as PNG
pub fn write_png(path: &Path, raster: &Raster) {
    std::fs::write(path, encode_png(raster).unwrap()).unwrap();
}

/// Write `count` numbered frames (`src_000.png`, ...) into `dir`
pub fn write_frames(dir: &Path, count: usize, width: u32, height: u32) -> Vec<PathBuf> {
    (0..count)
        .map(|i| {
            let path = dir.join(format!("src_{i:03}.png"));
            write_png(&path, &numbered_frame(i, width, height));
            path
        })
        .collect()
}
