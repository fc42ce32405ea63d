//! Input size capping

use halftone::Raster;
use tiny_skia::{FilterQuality, Pixmap, PixmapPaint, Transform};

use crate::error::ImageError;

/// Scale `(width, height)` so the longer side is at most `max`, keeping the
/// aspect ratio. Never upscales; `max == 0` disables the cap.
pub fn fit_within(width: u32, height: u32, max: u32) -> (u32, u32) {
    let longest = width.max(height);
    if max == 0 || longest <= max {
        return (width, height);
    }
    let scale = max as f64 / longest as f64;
    let scaled = |v: u32| ((v as f64 * scale).round() as u32).max(1);
    (scaled(width), scaled(height))
}

/// Bilinear downscale so the longer side is at most `max`. Rasters that
/// already fit are returned unchanged.
pub fn downscale(raster: Raster, max: u32) -> Result<Raster, ImageError> {
    let (width, height) = fit_within(raster.width(), raster.height(), max);
    if (width, height) == (raster.width(), raster.height()) {
        return Ok(raster);
    }

    let source = raster.to_pixmap().ok_or(ImageError::PixmapAllocation)?;
    let mut target = Pixmap::new(width, height).ok_or(ImageError::PixmapAllocation)?;

    let sx = width as f32 / raster.width() as f32;
    let sy = height as f32 / raster.height() as f32;
    target.draw_pixmap(
        0,
        0,
        source.as_ref(),
        &PixmapPaint {
            quality: FilterQuality::Bilinear,
            ..Default::default()
        },
        Transform::from_scale(sx, sy),
        None,
    );

    tracing::debug!(
        from_width = raster.width(),
        from_height = raster.height(),
        to_width = width,
        to_height = height,
        "Downscaled input image"
    );
    Ok(Raster::from_pixmap(&target))
}
