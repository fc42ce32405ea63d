//! RGBA pixel buffers.

use tiny_skia::{ColorU8, Pixmap};

/// A width x height grid of straight (non-premultiplied) RGBA8 samples in
/// row-major order.
///
/// Source rasters are read-only inputs to [`render`](crate::render); target
/// rasters are fully overwritten on each call.
///
/// # Example
///
/// ```
/// use halftone::Raster;
///
/// let raster = Raster::filled(4, 2, [255, 0, 0, 255]);
/// assert_eq!(raster.pixel(3, 1), [255, 0, 0, 255]);
/// assert_eq!(raster.luminance(0, 0), 85.0);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Raster {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Raster {
    /// Create a fully transparent raster.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; byte_len(width, height)],
        }
    }

    /// Create a raster where every sample is `rgba`.
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let pixels = width as usize * height as usize;
        Self {
            width,
            height,
            data: rgba.repeat(pixels),
        }
    }

    /// Wrap an existing RGBA buffer.
    ///
    /// Returns `None` if `data.len() != width * height * 4`.
    pub fn from_rgba(width: u32, height: u32, data: Vec<u8>) -> Option<Self> {
        if data.len() != byte_len(width, height) {
            return None;
        }
        Some(Self {
            width,
            height,
            data,
        })
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// True when the raster has zero area.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// RGBA sample at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if the coordinate is out of bounds.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = self.offset(x, y);
        [
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ]
    }

    /// Unweighted mean of the R, G and B channels at `(x, y)`. Alpha is ignored.
    #[inline]
    pub fn luminance(&self, x: u32, y: u32) -> f64 {
        let i = self.offset(x, y);
        let sum = self.data[i] as u32 + self.data[i + 1] as u32 + self.data[i + 2] as u32;
        sum as f64 / 3.0
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Copy a pixmap, un-premultiplying its samples.
    pub fn from_pixmap(pixmap: &Pixmap) -> Self {
        let mut data = Vec::with_capacity(pixmap.data().len());
        for pixel in pixmap.pixels() {
            let c = pixel.demultiply();
            data.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
        }
        Self {
            width: pixmap.width(),
            height: pixmap.height(),
            data,
        }
    }

    /// Copy into a premultiplied pixmap.
    ///
    /// Returns `None` for a zero-area raster, which tiny-skia cannot hold.
    pub fn to_pixmap(&self) -> Option<Pixmap> {
        let mut pixmap = Pixmap::new(self.width, self.height)?;
        for (dst, src) in pixmap.pixels_mut().iter_mut().zip(self.data.chunks_exact(4)) {
            *dst = ColorU8::from_rgba(src[0], src[1], src[2], src[3]).premultiply();
        }
        Some(pixmap)
    }

    #[inline]
    fn offset(&self, x: u32, y: u32) -> usize {
        assert!(
            x < self.width && y < self.height,
            "pixel ({x}, {y}) out of bounds for {}x{} raster",
            self.width,
            self.height
        );
        (y as usize * self.width as usize + x as usize) * 4
    }
}

#[inline]
fn byte_len(width: u32, height: u32) -> usize {
    width as usize * height as usize * 4
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_transparent() {
        let raster = Raster::new(3, 2);
        assert_eq!(raster.as_bytes().len(), 24);
        assert!(raster.as_bytes().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_from_rgba_checks_length() {
        assert!(Raster::from_rgba(2, 2, vec![0; 16]).is_some());
        assert!(Raster::from_rgba(2, 2, vec![0; 15]).is_none());
    }

    #[test]
    fn test_pixel_is_row_major() {
        let mut data = vec![0u8; 2 * 2 * 4];
        // (1, 0) is the second pixel, (0, 1) the third
        data[4] = 10;
        data[8] = 20;
        let raster = Raster::from_rgba(2, 2, data).unwrap();
        assert_eq!(raster.pixel(1, 0)[0], 10);
        assert_eq!(raster.pixel(0, 1)[0], 20);
    }

    #[test]
    fn test_luminance_ignores_alpha() {
        let opaque = Raster::filled(1, 1, [30, 60, 90, 255]);
        let clear = Raster::filled(1, 1, [30, 60, 90, 0]);
        assert_eq!(opaque.luminance(0, 0), 60.0);
        assert_eq!(clear.luminance(0, 0), 60.0);
    }

    #[test]
    fn test_is_empty() {
        assert!(Raster::new(0, 5).is_empty());
        assert!(Raster::new(5, 0).is_empty());
        assert!(!Raster::new(1, 1).is_empty());
    }

    #[test]
    fn test_pixmap_conversion_keeps_opaque_samples() {
        let raster = Raster::filled(3, 2, [12, 200, 99, 255]);
        let pixmap = raster.to_pixmap().unwrap();
        assert_eq!((pixmap.width(), pixmap.height()), (3, 2));
        assert_eq!(Raster::from_pixmap(&pixmap), raster);
    }

    #[test]
    fn test_to_pixmap_rejects_empty() {
        assert!(Raster::new(0, 3).to_pixmap().is_none());
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn test_pixel_out_of_bounds_panics() {
        Raster::new(2, 2).pixel(2, 0);
    }
}
