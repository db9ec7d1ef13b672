//! Sub-configuration structs with defaults.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::types::{OutputFormat, WatermarkPosition};

/// Output sizing, naming and encoding.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Originals wider than this are downsized to fit
    pub max_width: u32,

    /// Originals taller than this are downsized to fit
    pub max_height: u32,

    /// Format for single-frame sources (animated sources are always gif)
    pub format: OutputFormat,

    /// Appended to the file stem before the extension
    pub suffix: String,

    /// Write here instead of next to the original
    #[serde(skip_serializing_if = "Option::is_none")]
    pub saving_path: Option<PathBuf>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            max_width: 1920,
            max_height: 1080,
            format: OutputFormat::Jpg,
            suffix: "_wm".to_string(),
            saving_path: None,
        }
    }
}

/// Watermark image, scale, opacity and placement.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WatermarkConfig {
    /// Watermark image file (supports ~)
    pub filename: PathBuf,

    /// Watermark box width as a fraction of the output width
    pub max_scale_width: f32,

    /// Watermark box height as a fraction of the output height
    pub max_scale_height: f32,

    /// Blend weight: 0.0 invisible, 1.0 fully opaque
    pub opacity: f32,

    /// Edge offset in pixels, relative to `output.max_width`.
    pub offset_width: u32,

    /// Kept for config compatibility. Placement reuses the scaled
    /// `offset_width` on both axes.
    pub offset_height: u32,

    /// Anchor for the watermark
    pub position: WatermarkPosition,
}

impl Default for WatermarkConfig {
    fn default() -> Self {
        Self {
            filename: PathBuf::from("~/.quickmark/watermark.png"),
            max_scale_width: 0.2,
            max_scale_height: 0.2,
            opacity: 0.8,
            offset_width: 20,
            offset_height: 20,
            position: WatermarkPosition::RightBottom,
        }
    }
}

/// EXIF fields stamped into outputs. Empty strings leave the field untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MetadataConfig {
    /// Written to the EXIF Artist tag
    pub author_name: String,

    /// Written to the EXIF Copyright tag
    pub copyright: String,
}

/// Front-end preferences persisted alongside the pipeline settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Graphical front ends open the file picker on launch when set
    pub open_file_dialog_on_startup: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            open_file_dialog_on_startup: true,
        }
    }
}

/// Batch processing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessingConfig {
    /// Photos processed concurrently (1 = sequential)
    pub parallel_workers: usize,

    /// Extensions picked up when discovering a directory
    pub supported_formats: Vec<String>,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            parallel_workers: 1,
            supported_formats: vec![
                "jpg".to_string(),
                "jpeg".to_string(),
                "png".to_string(),
                "gif".to_string(),
            ],
        }
    }
}

/// Resource limits to protect against problematic inputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum file size in megabytes
    pub max_file_size_mb: u64,

    /// Maximum source dimension (width or height)
    pub max_image_dimension: u32,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_file_size_mb: 100,
            max_image_dimension: 20000,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace
    pub level: String,

    /// Log format: "pretty" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
