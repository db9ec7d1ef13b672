//! Pipeline orchestration - wires together all processing stages.

use std::path::{Path, PathBuf};

use crate::config::{Config, MetadataConfig};
use crate::error::PipelineResult;
use crate::geometry::{Layout, Size};
use crate::types::{Photo, PhotoStatus};

use super::composite::{self, WatermarkedImage};
use super::decode::ImageDecoder;
use super::encode::ImageSaver;
use super::metadata::{ExifProfile, MetadataStamper};
use super::validate::Validator;

/// The watermark processor that runs one photo through the full pipeline.
pub struct WatermarkProcessor {
    decoder: ImageDecoder,
    validator: Validator,
}

impl WatermarkProcessor {
    /// Create a new processor with the limits from the given configuration.
    pub fn new(config: &Config) -> Self {
        Self {
            decoder: ImageDecoder::new(config.limits.clone()),
            validator: Validator::new(config.limits.clone()),
        }
    }

    /// Load the photo and the watermark, then produce the composited image.
    ///
    /// Records the source dimensions and frame count on the photo. Nothing is
    /// written to disk.
    pub fn watermark(
        &self,
        photo: &mut Photo,
        watermark_path: &Path,
        config: &Config,
    ) -> PipelineResult<WatermarkedImage> {
        let start = std::time::Instant::now();
        let source = photo.path().to_path_buf();

        self.validator.validate(&source)?;
        let decoded = self.decoder.decode(&source)?;
        photo.record_decoded(decoded.width, decoded.height, decoded.frame_count());
        tracing::trace!("  Decode: {:?}", start.elapsed());

        self.validator.validate(watermark_path)?;
        let watermark = self.decoder.decode(watermark_path)?.into_first_frame();

        let original = Size::new(decoded.width, decoded.height);
        let (wm_w, wm_h) = watermark.dimensions();
        let layout = Layout::compute(original, Size::new(wm_w, wm_h), config);
        tracing::debug!(
            "{}: {}x{} -> {}x{}, watermark {}x{} at ({}, {})",
            photo.file_name(),
            original.width,
            original.height,
            layout.image.width,
            layout.image.height,
            layout.watermark.width,
            layout.watermark.height,
            layout.x,
            layout.y
        );

        let mut image = composite::apply(
            decoded.frames,
            &watermark,
            layout,
            config.watermark.opacity,
        );
        image.exif = ExifProfile::read_from(&source);
        tracing::trace!("  Composite: {:?}", start.elapsed());
        Ok(image)
    }

    /// Stamp the configured copyright and author onto the image's EXIF profile.
    pub fn add_copyright(&self, image: &mut WatermarkedImage, metadata: &MetadataConfig) {
        MetadataStamper::add_copyright(image, metadata);
    }

    /// Encode and write the image for `photo`, returning the output path.
    pub fn save(
        &self,
        image: WatermarkedImage,
        photo: &Photo,
        config: &Config,
    ) -> PipelineResult<PathBuf> {
        ImageSaver::new(config).save(image, photo.path())
    }

    /// Run the full pipeline for one photo, updating its status as it goes.
    pub fn process(&self, photo: &mut Photo, watermark_path: &Path, config: &Config) {
        self.process_with_observer(photo, watermark_path, config, |_| {});
    }

    /// Like [`process`](Self::process), calling `observer` after every status
    /// transition.
    ///
    /// Errors never escape: any failure leaves the photo in
    /// [`PhotoStatus::Failed`] with the rendered error message.
    pub fn process_with_observer<F>(
        &self,
        photo: &mut Photo,
        watermark_path: &Path,
        config: &Config,
        mut observer: F,
    ) where
        F: FnMut(&Photo),
    {
        let start = std::time::Instant::now();
        match self.run(photo, watermark_path, config, &mut observer) {
            Ok(output) => {
                tracing::debug!(
                    "Watermarked {:?} -> {:?} in {:?}",
                    photo.path(),
                    output,
                    start.elapsed()
                );
                photo.set_output_path(output);
                transition(photo, PhotoStatus::Success, &mut observer);
            }
            Err(e) => {
                tracing::warn!("Failed to watermark {:?}: {}", photo.path(), e);
                transition(photo, PhotoStatus::Failed(e.to_string()), &mut observer);
            }
        }
    }

    fn run<F>(
        &self,
        photo: &mut Photo,
        watermark_path: &Path,
        config: &Config,
        observer: &mut F,
    ) -> PipelineResult<PathBuf>
    where
        F: FnMut(&Photo),
    {
        transition(photo, PhotoStatus::Watermarking, observer);
        let mut image = self.watermark(photo, watermark_path, config)?;
        self.add_copyright(&mut image, &config.metadata);

        transition(photo, PhotoStatus::Saving, observer);
        self.save(image, photo, config)
    }
}

fn transition<F>(photo: &mut Photo, status: PhotoStatus, observer: &mut F)
where
    F: FnMut(&Photo),
{
    photo.set_status(status);
    observer(photo);
}
