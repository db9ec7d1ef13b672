//! Quickmark Core - batch photo watermarking library.
//!
//! Quickmark overlays a watermark image onto photos, downsizing oversized
//! originals, stamping copyright/author EXIF fields and writing the result
//! in the configured format.
//!
//! # Architecture
//!
//! ```text
//! Photo → Validate → Decode → Layout → Composite → Stamp EXIF → Encode → File
//! ```
//!
//! Layout arithmetic lives in [`geometry`] and is integer-exact, so the same
//! inputs and config always produce byte-identical composited frames.
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use quickmark_core::{BatchRunner, Config, PhotoSet};
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), quickmark_core::ConfigError> {
//!     let config = Arc::new(Config::load()?);
//!     let runner = BatchRunner::new(config, CancellationToken::new())?;
//!
//!     let photos: PhotoSet = ["./beach.jpg", "./party.gif"].into_iter().collect();
//!     let outcome = runner.run(photos, |photo| println!("{}: {}", photo.file_name(), photo.status())).await;
//!     println!("{} written", outcome.summary.succeeded);
//!     Ok(())
//! }
//! ```

// Module declarations
pub mod config;
pub mod error;
pub mod geometry;
pub mod pipeline;
pub mod report;
pub mod types;

// Re-exports for convenient access
pub use config::Config;
pub use error::{ConfigError, PipelineError, PipelineResult};
pub use geometry::{Layout, Size};
pub use pipeline::{BatchOutcome, BatchRunner, BatchSummary, WatermarkProcessor};
pub use report::{ReportFormat, ReportWriter};
pub use types::{OutputFormat, Photo, PhotoReport, PhotoSet, PhotoStatus, WatermarkPosition};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
