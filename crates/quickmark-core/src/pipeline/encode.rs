//! Output naming, format selection, encoding and atomic writes.

use image::codecs::gif::{GifEncoder, Repeat};
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{DynamicImage, Frame};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::error::{PipelineError, PipelineResult};
use crate::pipeline::composite::WatermarkedImage;
use crate::types::OutputFormat;

/// Lossy quality for JPEG output.
pub const JPEG_QUALITY: u8 = 80;

/// Writes watermarked images next to their source (or to an override directory).
pub struct ImageSaver {
    saving_dir: Option<PathBuf>,
    suffix: String,
    format: OutputFormat,
}

impl ImageSaver {
    pub fn new(config: &Config) -> Self {
        Self {
            saving_dir: config.saving_dir(),
            suffix: config.output.suffix.clone(),
            format: config.output.format,
        }
    }

    /// Format that will actually be written.
    ///
    /// Animated sources are always written as GIF regardless of the
    /// configured format.
    pub fn resolve_format(&self, animated: bool) -> OutputFormat {
        if animated {
            if self.format != OutputFormat::Gif {
                tracing::debug!(
                    "Animated source: writing gif instead of configured {}",
                    self.format
                );
            }
            OutputFormat::Gif
        } else {
            self.format
        }
    }

    /// Directory the output for `source` goes to.
    pub fn output_dir(&self, source: &Path) -> PathBuf {
        match &self.saving_dir {
            Some(dir) => dir.clone(),
            None => match source.parent() {
                Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
                _ => PathBuf::from("."),
            },
        }
    }

    /// `<dir>/<stem><suffix>.<ext>`
    pub fn output_path(&self, source: &Path, format: OutputFormat) -> PathBuf {
        let stem = source
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());
        let name = format!("{}{}.{}", stem, self.suffix, format.extension());
        self.output_dir(source).join(name)
    }

    /// Encode and write the image, returning the written path.
    ///
    /// The image is consumed, so its buffers are released whether or not the
    /// write succeeds. Output goes to a temporary file in the destination
    /// directory first and is renamed into place only once fully written.
    pub fn save(&self, image: WatermarkedImage, source: &Path) -> PipelineResult<PathBuf> {
        let format = self.resolve_format(image.is_animated());
        let target = self.output_path(source, format);
        check_collision(&target, source)?;

        let WatermarkedImage { frames, exif, .. } = image;
        let mut encoded = encode_frames(frames, format, &target)?;
        if let Some(profile) = exif {
            if format.supports_exif() {
                encoded = profile
                    .embed_into(encoded, format)
                    .map_err(|message| PipelineError::Encode {
                        path: target.clone(),
                        message: format!("Cannot embed EXIF: {}", message),
                    })?;
            } else if !profile.is_empty() {
                tracing::debug!("{} has no EXIF container; metadata dropped", format);
            }
        }

        write_atomic(&target, &encoded)?;
        Ok(target)
    }
}

fn check_collision(target: &Path, source: &Path) -> PipelineResult<()> {
    if target.is_dir() {
        return Err(PipelineError::Io {
            path: target.to_path_buf(),
            message: "Output path is an existing directory".to_string(),
        });
    }
    if target.exists() {
        let same = match (target.canonicalize(), source.canonicalize()) {
            (Ok(a), Ok(b)) => a == b,
            _ => false,
        };
        if same {
            return Err(PipelineError::Io {
                path: target.to_path_buf(),
                message: "Output would overwrite the source image (set a suffix or saving path)"
                    .to_string(),
            });
        }
    }
    Ok(())
}

/// Encode frames into an in-memory file of the given format.
pub fn encode_frames(
    frames: Vec<Frame>,
    format: OutputFormat,
    target: &Path,
) -> PipelineResult<Vec<u8>> {
    let encode_err = |e: image::ImageError| PipelineError::Encode {
        path: target.to_path_buf(),
        message: e.to_string(),
    };

    let mut out = Vec::new();
    match format {
        OutputFormat::Gif => {
            let animated = frames.len() > 1;
            let mut encoder = GifEncoder::new(&mut out);
            if animated {
                encoder.set_repeat(Repeat::Infinite).map_err(encode_err)?;
            }
            encoder.encode_frames(frames).map_err(encode_err)?;
        }
        OutputFormat::Png => {
            let buffer = first_buffer(frames, target)?;
            buffer
                .write_with_encoder(PngEncoder::new(&mut out))
                .map_err(encode_err)?;
        }
        OutputFormat::Jpg => {
            let rgb = DynamicImage::ImageRgba8(first_buffer(frames, target)?).into_rgb8();
            rgb.write_with_encoder(JpegEncoder::new_with_quality(&mut out, JPEG_QUALITY))
                .map_err(encode_err)?;
        }
    }
    Ok(out)
}

fn first_buffer(frames: Vec<Frame>, target: &Path) -> PipelineResult<image::RgbaImage> {
    frames
        .into_iter()
        .next()
        .map(Frame::into_buffer)
        .ok_or_else(|| PipelineError::Encode {
            path: target.to_path_buf(),
            message: "No frames to encode".to_string(),
        })
}

fn write_atomic(target: &Path, bytes: &[u8]) -> PipelineResult<()> {
    let dir = target.parent().unwrap_or_else(|| Path::new("."));
    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(|e| PipelineError::io(dir, &e))?;
    tmp.write_all(bytes)
        .and_then(|()| tmp.as_file().sync_all())
        .map_err(|e| PipelineError::io(target, &e))?;
    tmp.persist(target)
        .map_err(|e| PipelineError::io(target, &e.error))?;
    Ok(())
}
