use crate::error::{ConfigError, ImageError};
use crate::models::StyleConfig;
use crate::rendering::{decode_png, downscale, encode_png, is_png, optimize_png};
use halftone::{Raster, Settings};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

/// Result of rendering one image file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOutcome {
    pub width: u32,
    pub height: u32,
    /// Size of the written PNG in bytes
    pub bytes: usize,
}

/// Image-in, image-out rendering: decode, cap, stylize, encode
#[derive(Debug, Clone)]
pub struct RenderService {
    settings: Arc<Settings>,
    max_dimension: u32,
    optimize: bool,
}

impl RenderService {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings: Arc::new(settings),
            max_dimension: 0,
            optimize: false,
        }
    }

    /// Build from a style config, validating colors and shape
    pub fn from_config(config: &StyleConfig) -> Result<Self, ConfigError> {
        Ok(Self::new(config.to_settings()?)
            .max_dimension(config.max_dimension)
            .optimize_png(config.optimize_png))
    }

    /// Longest side allowed for loaded images (0 = uncapped)
    #[inline]
    pub fn max_dimension(mut self, max: u32) -> Self {
        self.max_dimension = max;
        self
    }

    /// Re-compress output PNGs with oxipng
    #[inline]
    pub fn optimize_png(mut self, enabled: bool) -> Self {
        self.optimize = enabled;
        self
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Decode PNG bytes and apply the size cap
    pub fn load_png(&self, bytes: &[u8]) -> Result<Raster, ImageError> {
        if !is_png(bytes) {
            return Err(ImageError::UnsupportedFormat(
                "expected a PNG file".to_string(),
            ));
        }
        let raster = decode_png(bytes)?;
        downscale(raster, self.max_dimension)
    }

    /// Read and decode an image file
    pub fn load_image(&self, path: &Path) -> Result<Raster, ImageError> {
        let bytes = std::fs::read(path)?;
        self.load_png(&bytes)
    }

    /// Stylize a raster with the configured settings
    pub fn render_raster(&self, source: &Raster) -> Raster {
        halftone::render(source, &self.settings)
    }

    /// Stylize a raster and encode the result as PNG
    pub fn render_to_png(&self, source: &Raster) -> Result<Vec<u8>, ImageError> {
        let start = Instant::now();
        let rendered = self.render_raster(source);
        let render_ms = start.elapsed().as_millis();

        let mut png = encode_png(&rendered)?;
        if self.optimize {
            let before = png.len();
            png = optimize_png(png);
            tracing::debug!(before, after = png.len(), "Optimized PNG");
        }

        tracing::debug!(
            width = rendered.width(),
            height = rendered.height(),
            shape = %self.settings.shape,
            cell_size = self.settings.cell_size,
            render_ms,
            "Rendered raster"
        );
        Ok(png)
    }

    /// Load `input`, render it and write the PNG to `output`
    pub fn render_file_blocking(
        &self,
        input: &Path,
        output: &Path,
    ) -> Result<RenderOutcome, ImageError> {
        let source = self.load_image(input)?;
        let png = self.render_to_png(&source)?;
        std::fs::write(output, &png)?;

        tracing::info!(
            input = %input.display(),
            output = %output.display(),
            width = source.width(),
            height = source.height(),
            bytes = png.len(),
            "Wrote stylized image"
        );
        Ok(RenderOutcome {
            width: source.width(),
            height: source.height(),
            bytes: png.len(),
        })
    }

    /// Render a file off the async runtime
    ///
    /// Uses spawn_blocking since decoding, rasterizing and PNG compression
    /// are CPU-bound.
    pub async fn render_file(
        &self,
        input: &Path,
        output: &Path,
    ) -> Result<RenderOutcome, ImageError> {
        let service = self.clone();
        let input = input.to_path_buf();
        let output = output.to_path_buf();

        tokio::task::spawn_blocking(move || service.render_file_blocking(&input, &output))
            .await
            .map_err(|e| ImageError::Io(std::io::Error::other(format!("Render task failed: {e}"))))?
    }
}
