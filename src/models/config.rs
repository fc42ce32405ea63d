use crate::error::ConfigError;
use halftone::{Color, Settings, ShapeKind};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable consulted when no `--config` flag is given
pub const CONFIG_ENV: &str = "RETICULATE_CONFIG";

/// Style configuration loaded from a YAML file
///
/// Mirrors [`halftone::Settings`] with string colors and shape names, plus
/// the knobs of the surrounding application (input size cap, preview rate,
/// PNG optimization).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleConfig {
    /// Grid cell size in pixels
    #[serde(default = "default_cell_size")]
    pub cell_size: u32,

    /// Contrast exponent (1.0 = linear)
    #[serde(default = "default_contrast")]
    pub contrast: f64,

    /// Shape color ("#rrggbb", "#rgb", "rgb(...)" or "transparent")
    #[serde(default = "default_foreground")]
    pub foreground: String,

    /// Canvas color
    #[serde(default = "default_background")]
    pub background: String,

    /// Shape name (circle, square, triangle, diamond, star, heart, hex, parallel)
    #[serde(default = "default_shape")]
    pub shape: String,

    #[serde(default)]
    pub invert: bool,

    /// Binary on/off sizing
    #[serde(default)]
    pub threshold: bool,

    /// Size multiplier is `1 + overlap`
    #[serde(default = "default_overlap")]
    pub overlap: f64,

    #[serde(default = "default_edge_detection")]
    pub edge_detection: bool,

    #[serde(default = "default_edge_sensitivity")]
    pub edge_sensitivity: f64,

    /// Longest side of the source image after loading (larger inputs are
    /// scaled down)
    #[serde(default = "default_max_dimension")]
    pub max_dimension: u32,

    /// Preview frame rate, also the default export rate
    #[serde(default = "default_preview_fps")]
    pub preview_fps: u32,

    /// Re-compress PNG output with oxipng
    #[serde(default)]
    pub optimize_png: bool,
}

fn default_cell_size() -> u32 {
    Settings::default().cell_size
}

fn default_contrast() -> f64 {
    Settings::default().contrast
}

fn default_foreground() -> String {
    Settings::default().foreground.to_string()
}

fn default_background() -> String {
    Settings::default().background.to_string()
}

fn default_shape() -> String {
    Settings::default().shape.to_string()
}

fn default_overlap() -> f64 {
    Settings::default().overlap
}

fn default_edge_detection() -> bool {
    Settings::default().edge_detection
}

fn default_edge_sensitivity() -> f64 {
    Settings::default().edge_sensitivity
}

fn default_max_dimension() -> u32 {
    1200
}

fn default_preview_fps() -> u32 {
    15
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

impl StyleConfig {
    /// Snapshot rasterizer settings, with default application knobs
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            cell_size: settings.cell_size,
            contrast: settings.contrast,
            foreground: settings.foreground.to_string(),
            background: settings.background.to_string(),
            shape: settings.shape.to_string(),
            invert: settings.invert,
            threshold: settings.threshold,
            overlap: settings.overlap,
            edge_detection: settings.edge_detection,
            edge_sensitivity: settings.edge_sensitivity,
            max_dimension: default_max_dimension(),
            preview_fps: default_preview_fps(),
            optimize_png: false,
        }
    }

    /// Load configuration from a YAML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&content)?;
        tracing::info!(
            path = %path.display(),
            shape = %config.shape,
            cell_size = config.cell_size,
            "Loaded style configuration"
        );
        Ok(config)
    }

    /// Load from the explicit path, else from `RETICULATE_CONFIG`, else
    /// use defaults
    pub fn resolve(path: Option<&Path>) -> Result<Self, ConfigError> {
        match Self::config_path(path) {
            Some(p) => Self::load(&p),
            None => {
                tracing::debug!("No config file configured, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// The config file that [`resolve`](Self::resolve) would read
    pub fn config_path(path: Option<&Path>) -> Option<PathBuf> {
        path.map(Path::to_path_buf)
            .or_else(|| std::env::var(CONFIG_ENV).ok().map(PathBuf::from))
    }

    /// Validate colors and shape and build rasterizer settings
    pub fn to_settings(&self) -> Result<Settings, ConfigError> {
        let foreground: Color =
            self.foreground
                .parse()
                .map_err(|source| ConfigError::InvalidColor {
                    field: "foreground",
                    source,
                })?;
        let background: Color =
            self.background
                .parse()
                .map_err(|source| ConfigError::InvalidColor {
                    field: "background",
                    source,
                })?;
        let shape: ShapeKind = self.shape.parse()?;

        Ok(Settings::new()
            .cell_size(self.cell_size)
            .contrast(self.contrast)
            .foreground(foreground)
            .background(background)
            .shape(shape)
            .invert(self.invert)
            .threshold(self.threshold)
            .overlap(self.overlap)
            .edge_detection(self.edge_detection)
            .edge_sensitivity(self.edge_sensitivity))
    }

    /// Serialize the configuration as a static YAML snapshot
    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Apply command-line overrides on top of file values
    pub fn apply(&mut self, overrides: &StyleOverrides) {
        if let Some(v) = overrides.cell_size {
            self.cell_size = v;
        }
        if let Some(v) = overrides.contrast {
            self.contrast = v;
        }
        if let Some(v) = &overrides.foreground {
            self.foreground = v.clone();
        }
        if let Some(v) = &overrides.background {
            self.background = v.clone();
        }
        if let Some(v) = &overrides.shape {
            self.shape = v.clone();
        }
        if let Some(v) = overrides.invert {
            self.invert = v;
        }
        if let Some(v) = overrides.threshold {
            self.threshold = v;
        }
        if let Some(v) = overrides.overlap {
            self.overlap = v;
        }
        if let Some(v) = overrides.edge_detection {
            self.edge_detection = v;
        }
        if let Some(v) = overrides.edge_sensitivity {
            self.edge_sensitivity = v;
        }
        if let Some(v) = overrides.max_dimension {
            self.max_dimension = v;
        }
        if let Some(v) = overrides.preview_fps {
            self.preview_fps = v;
        }
        if overrides.optimize_png {
            self.optimize_png = true;
        }
        if overrides.swap_colors {
            std::mem::swap(&mut self.foreground, &mut self.background);
        }
    }
}

/// Per-invocation overrides (unset fields keep the configured value)
#[derive(Debug, Clone, Default)]
pub struct StyleOverrides {
    pub cell_size: Option<u32>,
    pub contrast: Option<f64>,
    pub foreground: Option<String>,
    pub background: Option<String>,
    pub shape: Option<String>,
    pub invert: Option<bool>,
    pub threshold: Option<bool>,
    pub overlap: Option<f64>,
    pub edge_detection: Option<bool>,
    pub edge_sensitivity: Option<f64>,
    pub max_dimension: Option<u32>,
    pub preview_fps: Option<u32>,
    pub optimize_png: bool,
    /// Exchange foreground and background after the other overrides
    pub swap_colors: bool,
}
