//! Core data types for the Quickmark pipeline.
//!
//! A [`Photo`] is the unit of work: it identifies a source file and carries its
//! observable lifecycle status. The enums here are closed sets; parsing an
//! unknown name is an error rather than a silent fallback.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::PipelineError;

/// Anchor for the watermark's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum WatermarkPosition {
    LeftTop,
    LeftBottom,
    RightTop,
    RightBottom,
    TopMiddle,
    BottomMiddle,
    Center,
}

impl WatermarkPosition {
    /// Every supported anchor, in declaration order.
    pub const ALL: [WatermarkPosition; 7] = [
        Self::LeftTop,
        Self::LeftBottom,
        Self::RightTop,
        Self::RightBottom,
        Self::TopMiddle,
        Self::BottomMiddle,
        Self::Center,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::LeftTop => "LeftTop",
            Self::LeftBottom => "LeftBottom",
            Self::RightTop => "RightTop",
            Self::RightBottom => "RightBottom",
            Self::TopMiddle => "TopMiddle",
            Self::BottomMiddle => "BottomMiddle",
            Self::Center => "Center",
        }
    }
}

impl fmt::Display for WatermarkPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for WatermarkPosition {
    type Err = PipelineError;

    /// Case-insensitive; `-` and `_` separators are ignored so `left-top`,
    /// `left_top` and `LeftTop` all parse.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect::<String>()
            .to_lowercase();
        Self::ALL
            .into_iter()
            .find(|p| p.name().to_lowercase() == normalized)
            .ok_or_else(|| PipelineError::UnsupportedPosition(s.to_string()))
    }
}

impl TryFrom<String> for WatermarkPosition {
    type Error = PipelineError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Encoded output format for saved photos.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Jpg,
    Png,
    Gif,
}

impl OutputFormat {
    /// File extension written for this format (without the dot).
    pub fn extension(self) -> &'static str {
        match self {
            Self::Jpg => "jpg",
            Self::Png => "png",
            Self::Gif => "gif",
        }
    }

    /// Whether the container can carry an EXIF profile.
    pub fn supports_exif(self) -> bool {
        !matches!(self, Self::Gif)
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "jpg" | "jpeg" => Ok(Self::Jpg),
            "png" => Ok(Self::Png),
            "gif" => Ok(Self::Gif),
            other => Err(format!("unknown output format: {other}")),
        }
    }
}

/// Lifecycle state of a photo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhotoStatus {
    Loaded,
    Watermarking,
    Saving,
    Success,
    /// Terminal failure with a human-readable reason
    Failed(String),
}

impl PhotoStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Success | Self::Failed(_))
    }
}

impl fmt::Display for PhotoStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Loaded => f.write_str("Loaded"),
            Self::Watermarking => f.write_str("Watermarking"),
            Self::Saving => f.write_str("Saving"),
            Self::Success => f.write_str("Success"),
            Self::Failed(reason) => write!(f, "Failed: {reason}"),
        }
    }
}

/// One selected image and its processing state.
#[derive(Debug, Clone)]
pub struct Photo {
    path: PathBuf,
    file_name: String,
    status: PhotoStatus,
    dimensions: Option<(u32, u32)>,
    frame_count: Option<usize>,
    output_path: Option<PathBuf>,
}

impl Photo {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown")
            .to_string();
        tracing::debug!("{:?} loaded", path);
        Self {
            path,
            file_name,
            status: PhotoStatus::Loaded,
            dimensions: None,
            frame_count: None,
            output_path: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Display name (file name portion of the path).
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn status(&self) -> &PhotoStatus {
        &self.status
    }

    /// Source dimensions, available once the photo has been decoded.
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        self.dimensions
    }

    /// Source frame count, available once the photo has been decoded.
    pub fn frame_count(&self) -> Option<usize> {
        self.frame_count
    }

    /// Written file, set on success.
    pub fn output_path(&self) -> Option<&Path> {
        self.output_path.as_deref()
    }

    pub(crate) fn set_status(&mut self, status: PhotoStatus) {
        self.status = status;
    }

    pub(crate) fn record_decoded(&mut self, width: u32, height: u32, frames: usize) {
        self.dimensions = Some((width, height));
        self.frame_count = Some(frames);
    }

    pub(crate) fn set_output_path(&mut self, path: PathBuf) {
        self.output_path = Some(path);
    }
}

/// The caller's collection of selected photos, unique by path.
#[derive(Debug, Clone, Default)]
pub struct PhotoSet {
    photos: Vec<Photo>,
}

impl PhotoSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a photo by path. Returns `false` if the path is already present.
    pub fn add(&mut self, path: impl Into<PathBuf>) -> bool {
        let path = path.into();
        if self.photos.iter().any(|p| p.path == path) {
            return false;
        }
        self.photos.push(Photo::new(path));
        true
    }

    pub fn len(&self) -> usize {
        self.photos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.photos.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Photo> {
        self.photos.iter()
    }

    pub fn into_photos(self) -> Vec<Photo> {
        self.photos
    }
}

impl<P: Into<PathBuf>> FromIterator<P> for PhotoSet {
    fn from_iter<I: IntoIterator<Item = P>>(iter: I) -> Self {
        let mut set = PhotoSet::new();
        for path in iter {
            set.add(path);
        }
        set
    }
}

/// Serializable summary of one processed photo.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhotoReport {
    /// Source file path
    pub source: PathBuf,

    /// Just the filename portion
    pub file_name: String,

    /// Final status string ("Success" or "Failed: ...")
    pub status: String,

    /// Written file, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,

    /// Source width in pixels
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,

    /// Source height in pixels
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,

    /// Source frame count
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frames: Option<usize>,

    /// Failure reason, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<&Photo> for PhotoReport {
    fn from(photo: &Photo) -> Self {
        let error = match &photo.status {
            PhotoStatus::Failed(reason) => Some(reason.clone()),
            _ => None,
        };
        Self {
            source: photo.path.clone(),
            file_name: photo.file_name.clone(),
            status: photo.status.to_string(),
            output: photo.output_path.clone(),
            width: photo.dimensions.map(|(w, _)| w),
            height: photo.dimensions.map(|(_, h)| h),
            frames: photo.frame_count,
            error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_parse_variants() {
        assert_eq!(
            "LeftTop".parse::<WatermarkPosition>().unwrap(),
            WatermarkPosition::LeftTop
        );
        assert_eq!(
            "bottom-middle".parse::<WatermarkPosition>().unwrap(),
            WatermarkPosition::BottomMiddle
        );
        assert_eq!(
            "RIGHT_BOTTOM".parse::<WatermarkPosition>().unwrap(),
            WatermarkPosition::RightBottom
        );
    }

    #[test]
    fn test_position_parse_rejects_unknown() {
        let err = "Middle".parse::<WatermarkPosition>().unwrap_err();
        assert!(matches!(err, PipelineError::UnsupportedPosition(ref s) if s == "Middle"));
    }

    #[test]
    fn test_position_display_roundtrips_through_parse() {
        for pos in WatermarkPosition::ALL {
            assert_eq!(pos.to_string().parse::<WatermarkPosition>().unwrap(), pos);
        }
    }

    #[test]
    fn test_output_format_parse() {
        assert_eq!("JPEG".parse::<OutputFormat>().unwrap(), OutputFormat::Jpg);
        assert_eq!("png".parse::<OutputFormat>().unwrap(), OutputFormat::Png);
        assert!("webp".parse::<OutputFormat>().is_err());
        assert_eq!(OutputFormat::Gif.extension(), "gif");
        assert!(!OutputFormat::Gif.supports_exif());
    }

    #[test]
    fn test_photo_starts_loaded() {
        let photo = Photo::new("/photos/beach.jpg");
        assert_eq!(photo.status(), &PhotoStatus::Loaded);
        assert_eq!(photo.file_name(), "beach.jpg");
        assert!(photo.dimensions().is_none());
    }

    #[test]
    fn test_status_display() {
        assert_eq!(PhotoStatus::Saving.to_string(), "Saving");
        assert_eq!(
            PhotoStatus::Failed("bad header".into()).to_string(),
            "Failed: bad header"
        );
        assert!(PhotoStatus::Success.is_terminal());
        assert!(!PhotoStatus::Watermarking.is_terminal());
    }

    #[test]
    fn test_photo_set_deduplicates_paths() {
        let mut set = PhotoSet::new();
        assert!(set.add("/a.jpg"));
        assert!(set.add("/b.jpg"));
        assert!(!set.add("/a.jpg"));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_report_from_failed_photo() {
        let mut photo = Photo::new("/x/y.png");
        photo.record_decoded(10, 20, 1);
        photo.set_status(PhotoStatus::Failed("boom".into()));
        let report = PhotoReport::from(&photo);
        assert_eq!(report.status, "Failed: boom");
        assert_eq!(report.error.as_deref(), Some("boom"));
        assert_eq!(report.width, Some(10));
        assert!(report.output.is_none());
    }
}
