pub mod png_io;
pub mod resize;

pub use png_io::{decode_png, encode_png, is_png, optimize_png};
pub use resize::{downscale, fit_within};
