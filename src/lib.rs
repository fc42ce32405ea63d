//! Reticulate - halftone and pointillism stylizer
//!
//! Application layer around the `halftone` rasterizer: PNG I/O, style
//! configuration, frame-sequence export and video encoding.
//! This library exposes modules for integration testing.

pub mod error;
pub mod models;
pub mod rendering;
pub mod services;
