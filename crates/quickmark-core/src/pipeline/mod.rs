//! Watermarking pipeline components.
//!
//! This module contains all the stages of the pipeline:
//! - **validate**: Pre-decode checks (existence, size, signature)
//! - **decode**: Load still and animated images as RGBA frames
//! - **composite**: Resize and alpha-blend the watermark onto every frame
//! - **metadata**: Read, stamp and embed EXIF copyright/author
//! - **encode**: Pick the output format and write the file atomically
//! - **processor**: Runs one photo through the stages
//! - **batch**: Bounded-parallel runner with cancellation
//! - **discovery**: Find image files in directories

pub mod batch;
pub mod composite;
pub mod decode;
pub mod discovery;
pub mod encode;
pub mod metadata;
pub mod processor;
pub mod validate;

#[cfg(test)]
pub(crate) mod test_support;

// Re-exports for convenient access
pub use batch::{BatchOutcome, BatchRunner, BatchSummary};
pub use composite::WatermarkedImage;
pub use decode::{DecodedImage, ImageDecoder};
pub use discovery::FileDiscovery;
pub use encode::{ImageSaver, JPEG_QUALITY};
pub use metadata::{ExifProfile, MetadataStamper};
pub use processor::WatermarkProcessor;
pub use validate::Validator;
