//! PNG decoding and encoding for halftone rasters

use std::io::Cursor;

use halftone::Raster;

use crate::error::ImageError;

/// Decode a PNG into a straight RGBA8 raster.
///
/// Palette, grayscale and 16-bit images are normalized to 8-bit RGBA.
pub fn decode_png(bytes: &[u8]) -> Result<Raster, ImageError> {
    let mut decoder = png::Decoder::new(Cursor::new(bytes));
    decoder.set_transformations(png::Transformations::normalize_to_color8());
    let mut reader = decoder.read_info()?;
    let mut buf = vec![0; reader.output_buffer_size()];
    let info = reader.next_frame(&mut buf)?;
    buf.truncate(info.buffer_size());

    if info.width == 0 || info.height == 0 {
        return Err(ImageError::EmptyImage {
            width: info.width,
            height: info.height,
        });
    }

    let rgba = match info.color_type {
        png::ColorType::Rgba => buf,
        png::ColorType::Rgb => buf
            .chunks_exact(3)
            .flat_map(|p| [p[0], p[1], p[2], 255])
            .collect(),
        png::ColorType::GrayscaleAlpha => buf
            .chunks_exact(2)
            .flat_map(|p| [p[0], p[0], p[0], p[1]])
            .collect(),
        png::ColorType::Grayscale => buf.iter().flat_map(|&v| [v, v, v, 255]).collect(),
        other => {
            return Err(ImageError::UnsupportedFormat(format!(
                "{other:?} after normalization"
            )))
        }
    };

    Raster::from_rgba(info.width, info.height, rgba).ok_or_else(|| {
        ImageError::PngDecode(format!(
            "pixel data does not match {}x{}",
            info.width, info.height
        ))
    })
}

/// Encode a raster as an 8-bit RGBA PNG.
pub fn encode_png(raster: &Raster) -> Result<Vec<u8>, ImageError> {
    if raster.is_empty() {
        return Err(ImageError::EmptyImage {
            width: raster.width(),
            height: raster.height(),
        });
    }

    let mut buf = Cursor::new(Vec::new());
    {
        let mut encoder = png::Encoder::new(&mut buf, raster.width(), raster.height());
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        encoder.set_compression(png::Compression::Fast);
        let mut writer = encoder.write_header()?;
        writer.write_image_data(raster.as_bytes())?;
    }
    Ok(buf.into_inner())
}

/// Re-compress a PNG with oxipng. Returns the input unchanged if oxipng
/// rejects it.
pub fn optimize_png(bytes: Vec<u8>) -> Vec<u8> {
    oxipng::optimize_from_memory(
        &bytes,
        &oxipng::Options {
            strip: oxipng::StripChunks::Safe,
            optimize_alpha: false,
            ..Default::default()
        },
    )
    .unwrap_or(bytes)
}

/// Sniff the PNG signature.
pub fn is_png(bytes: &[u8]) -> bool {
    bytes.starts_with(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A])
}
