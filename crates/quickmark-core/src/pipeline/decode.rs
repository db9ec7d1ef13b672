//! Image decoding with format detection and animation support.
//!
//! Every decoded image is a list of full-canvas RGBA frames. Still images
//! have exactly one frame; animated GIF and APNG sources keep all frames
//! with their delays.

use image::codecs::gif::GifDecoder;
use image::codecs::png::PngDecoder;
use image::{AnimationDecoder, DynamicImage, Frame, ImageFormat, RgbaImage};
use std::io::Cursor;
use std::path::Path;

use crate::config::LimitsConfig;
use crate::error::{PipelineError, PipelineResult};

/// Image decoder with configurable limits.
pub struct ImageDecoder {
    limits: LimitsConfig,
}

/// Result of decoding an image.
pub struct DecodedImage {
    /// Decoded frames, never empty
    pub frames: Vec<Frame>,
    /// Detected image format
    pub format: ImageFormat,
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Original file size in bytes
    pub file_size: u64,
}

impl DecodedImage {
    /// More than one frame.
    pub fn is_animated(&self) -> bool {
        self.frames.len() > 1
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Consume the image and keep only the first frame's pixels.
    pub fn into_first_frame(self) -> RgbaImage {
        self.frames
            .into_iter()
            .next()
            .map(Frame::into_buffer)
            .unwrap_or_default()
    }
}

impl ImageDecoder {
    /// Create a new decoder with the given limits.
    pub fn new(limits: LimitsConfig) -> Self {
        Self { limits }
    }

    /// Read and decode an image file.
    pub fn decode(&self, path: &Path) -> PipelineResult<DecodedImage> {
        let bytes = std::fs::read(path).map_err(|e| PipelineError::Decode {
            path: path.to_path_buf(),
            message: format!("Cannot read file: {}", e),
        })?;
        self.decode_from_bytes(bytes, path)
    }

    /// Decode an image from an in-memory byte buffer, enforcing the dimension limit.
    pub fn decode_from_bytes(
        &self,
        bytes: Vec<u8>,
        path: &Path,
    ) -> PipelineResult<DecodedImage> {
        let decoded = Self::decode_bytes_sync(bytes, path)?;
        if decoded.width > self.limits.max_image_dimension
            || decoded.height > self.limits.max_image_dimension
        {
            return Err(PipelineError::ImageTooLarge {
                path: path.to_path_buf(),
                width: decoded.width,
                height: decoded.height,
                max_dim: self.limits.max_image_dimension,
            });
        }
        Ok(decoded)
    }

    fn decode_bytes_sync(bytes: Vec<u8>, path: &Path) -> PipelineResult<DecodedImage> {
        let decode_err = |e: image::ImageError| PipelineError::Decode {
            path: path.to_path_buf(),
            message: e.to_string(),
        };

        let file_size = bytes.len() as u64;
        let reader = image::ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(|e| PipelineError::Decode {
                path: path.to_path_buf(),
                message: format!("Cannot detect image format: {}", e),
            })?;
        let format = match reader.format() {
            Some(f) => f,
            None => ImageFormat::from_path(path).map_err(|_| PipelineError::UnsupportedFormat {
                path: path.to_path_buf(),
                format: path
                    .extension()
                    .and_then(|e| e.to_str())
                    .unwrap_or("unknown")
                    .to_string(),
            })?,
        };
        let cursor = reader.into_inner();

        let frames = match format {
            ImageFormat::Gif => GifDecoder::new(cursor)
                .map_err(decode_err)?
                .into_frames()
                .collect_frames()
                .map_err(decode_err)?,
            ImageFormat::Png => {
                let decoder = PngDecoder::new(cursor).map_err(decode_err)?;
                if decoder.is_apng().map_err(decode_err)? {
                    decoder
                        .apng()
                        .map_err(decode_err)?
                        .into_frames()
                        .collect_frames()
                        .map_err(decode_err)?
                } else {
                    let image = DynamicImage::from_decoder(decoder).map_err(decode_err)?;
                    vec![Frame::new(image.into_rgba8())]
                }
            }
            _ => {
                let image = image::ImageReader::with_format(cursor, format)
                    .decode()
                    .map_err(decode_err)?;
                vec![Frame::new(image.into_rgba8())]
            }
        };

        let (width, height) = match frames.first() {
            Some(frame) => frame.buffer().dimensions(),
            None => {
                return Err(PipelineError::Decode {
                    path: path.to_path_buf(),
                    message: "Image contains no frames".to_string(),
                })
            }
        };

        Ok(DecodedImage {
            frames,
            format,
            width,
            height,
            file_size,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::test_support::{write_animated_gif, write_png};

    #[test]
    fn test_decode_still_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_png(dir.path(), "still.png", 40, 30);

        let decoder = ImageDecoder::new(LimitsConfig::default());
        let decoded = decoder.decode(&path).unwrap();
        assert_eq!(decoded.format, ImageFormat::Png);
        assert_eq!((decoded.width, decoded.height), (40, 30));
        assert!(!decoded.is_animated());
    }

    #[test]
    fn test_decode_animated_gif_keeps_frames() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_animated_gif(dir.path(), "anim.gif", 16, 12, 3);

        let decoder = ImageDecoder::new(LimitsConfig::default());
        let decoded = decoder.decode(&path).unwrap();
        assert_eq!(decoded.format, ImageFormat::Gif);
        assert_eq!(decoded.frame_count(), 3);
        assert!(decoded.is_animated());
        assert_eq!((decoded.width, decoded.height), (16, 12));
    }

    #[test]
    fn test_format_detected_by_content() {
        // A PNG saved with a .jpg extension is still decoded as PNG.
        let dir = tempfile::tempdir().unwrap();
        let png = write_png(dir.path(), "real.png", 8, 8);
        let misnamed = dir.path().join("misnamed.jpg");
        std::fs::copy(&png, &misnamed).unwrap();

        let bytes = std::fs::read(&misnamed).unwrap();
        let result = ImageDecoder::decode_bytes_sync(bytes, &misnamed).unwrap();
        assert_eq!(result.format, ImageFormat::Png);
    }

    #[test]
    fn test_corrupt_file_is_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.png");
        let mut bytes = vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
        bytes.extend_from_slice(&[0u8; 16]);
        std::fs::write(&path, bytes).unwrap();

        let decoder = ImageDecoder::new(LimitsConfig::default());
        let err = decoder.decode(&path).err().unwrap();
        assert!(matches!(err, PipelineError::Decode { .. }));
    }

    #[test]
    fn test_dimension_limit_enforced() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_png(dir.path(), "wide.png", 64, 8);

        let decoder = ImageDecoder::new(LimitsConfig {
            max_file_size_mb: 10,
            max_image_dimension: 32,
        });
        let err = decoder.decode(&path).err().unwrap();
        assert!(matches!(err, PipelineError::ImageTooLarge { width: 64, .. }));
    }
}
