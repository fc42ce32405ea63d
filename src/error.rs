use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("PNG decode error: {0}")]
    PngDecode(String),

    #[error("PNG encode error: {0}")]
    PngEncode(String),

    #[error("Unsupported image format: {0}")]
    UnsupportedFormat(String),

    #[error("Image has no pixels ({width}x{height})")]
    EmptyImage { width: u32, height: u32 },

    #[error("Failed to allocate pixmap")]
    PixmapAllocation,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<png::DecodingError> for ImageError {
    fn from(e: png::DecodingError) -> Self {
        ImageError::PngDecode(e.to_string())
    }
}

impl From<png::EncodingError> for ImageError {
    fn from(e: png::EncodingError) -> Self {
        ImageError::PngEncode(e.to_string())
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid color for {field}: {source}")]
    InvalidColor {
        field: &'static str,
        #[source]
        source: halftone::ParseColorError,
    },

    #[error("Invalid shape: {0}")]
    InvalidShape(#[from] halftone::ParseShapeError),
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("No frames found in {0}")]
    NoFrames(String),

    #[error("Output directory is the input directory: {0}")]
    SameDirectory(String),

    #[error("Video encoder not available: {0}")]
    EncoderUnavailable(String),

    #[error("Video encoder failed with {status}: {stderr}")]
    EncoderFailed { status: String, stderr: String },

    #[error("Frame error: {0}")]
    Image(#[from] ImageError),

    #[error("Render task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
