//! halftone: brightness-driven shape stylization of raster images
//!
//! This library turns a source raster into a halftone / pointillism-style
//! image: the source is divided into a grid of square cells, each cell's
//! brightness is sampled, and a shape (disc, square, star, heart, ...) is
//! drawn at the cell center with a size derived from that brightness.
//!
//! # Quick Start
//!
//! ```
//! use halftone::{render, Raster, Settings, ShapeKind};
//!
//! let source = Raster::filled(32, 32, [40, 40, 40, 255]);
//! let settings = Settings::new().cell_size(8).shape(ShapeKind::Hexagon);
//!
//! let out = render(&source, &settings);
//! assert_eq!((out.width(), out.height()), (32, 32));
//! ```
//!
//! # Pipeline
//!
//! ```text
//! source Raster (RGBA8)
//!     |
//!     v
//! background fill        (color, or cleared to transparent)
//!     |
//!     v
//! CellGrid               ceil(W / cell) x ceil(H / cell), edge cells clipped,
//!     |                  visited row by row, left to right
//!     v
//! ╔═══════════════════════════════════════════════╗
//! ║  per cell                                     ║
//! ║                                               ║
//! ║  sample_cell()   mean of (R + G + B) / 3      ║
//! ║      |           [+ mean |l - mean| if edges] ║
//! ║      v                                        ║
//! ║  shape_size()    contrast, invert, threshold  ║
//! ║      |           or continuous, edge boost,   ║
//! ║      |           overlap                      ║
//! ║      v                                        ║
//! ║  draw_shape()    anti-aliased fill/stroke     ║
//! ╚═══════════════════════════════════════════════╝
//!     |
//!     v
//! target Raster (same dimensions, fully overwritten)
//! ```
//!
//! # Determinism
//!
//! [`render`] is a pure function of its inputs: there is no state between
//! calls, so repeated calls with the same source and [`Settings`] produce
//! byte-identical rasters, and independent calls may run concurrently on
//! different threads.
//!
//! # Degenerate inputs
//!
//! Nothing here returns an error. Zero-area sources are a no-op, a zero cell
//! size draws only the background, and non-finite parameters simply produce
//! no shapes. This keeps interactive parameter sweeps glitch-free.

pub mod color;
pub mod grid;
pub mod raster;
pub mod render;
pub mod sample;
pub mod settings;
pub mod shape;
pub mod tone;


pub use color::{Color, ParseColorError};
pub use grid::{Cell, CellGrid};
pub use raster::Raster;
pub use render::{render, render_into};
pub use sample::{sample_cell, CellStats};
pub use settings::Settings;
pub use shape::{draw_shape, ParseShapeError, ShapeKind};
pub use tone::shape_size;
