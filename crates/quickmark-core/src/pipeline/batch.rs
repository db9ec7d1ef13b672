//! Concurrent batch runner over a [`PhotoSet`].
//!
//! Each photo is processed on the blocking pool, bounded by a semaphore of
//! `processing.parallel_workers` permits. Photos never share buffers; the only
//! shared state is the frozen config snapshot.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::error::{ConfigError, PipelineError};
use crate::types::{Photo, PhotoReport, PhotoSet, PhotoStatus};

use super::processor::WatermarkProcessor;

/// Counts for a finished batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub succeeded: usize,
    pub failed: usize,
    /// Photos that never started because the batch was cancelled
    pub cancelled: usize,
    pub elapsed: Duration,
}

impl BatchSummary {
    pub fn total(&self) -> usize {
        self.succeeded + self.failed + self.cancelled
    }
}

/// Photos in their final state, in input order.
#[derive(Debug)]
pub struct BatchOutcome {
    pub photos: Vec<Photo>,
    pub summary: BatchSummary,
}

impl BatchOutcome {
    pub fn reports(&self) -> Vec<PhotoReport> {
        self.photos.iter().map(PhotoReport::from).collect()
    }
}

/// Runs the watermark pipeline over many photos.
pub struct BatchRunner {
    config: Arc<Config>,
    processor: Arc<WatermarkProcessor>,
    watermark_path: Arc<PathBuf>,
    cancel: CancellationToken,
}

impl BatchRunner {
    /// Validate the snapshot and prepare a runner.
    pub fn new(config: Arc<Config>, cancel: CancellationToken) -> Result<Self, ConfigError> {
        config.check()?;
        let processor = Arc::new(WatermarkProcessor::new(&config));
        let watermark_path = Arc::new(config.watermark_path());
        Ok(Self {
            config,
            processor,
            watermark_path,
            cancel,
        })
    }

    /// Token that stops the batch between photos.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Process every photo in the set.
    ///
    /// `on_update` is called after every status transition of every photo,
    /// including the `Failed` mark given to photos skipped by cancellation.
    /// Photos already in flight when the token fires run to completion.
    pub async fn run<F>(&self, photos: PhotoSet, on_update: F) -> BatchOutcome
    where
        F: Fn(&Photo) + Send + Sync + 'static,
    {
        let start = Instant::now();
        let parallel = self.config.processing.parallel_workers.max(1);
        let semaphore = Arc::new(Semaphore::new(parallel));
        let on_update = Arc::new(on_update);

        let photos = photos.into_photos();
        tracing::info!(
            "Watermarking {} photo(s) with {} worker(s)",
            photos.len(),
            parallel
        );

        let mut slots: Vec<Option<Photo>> = Vec::with_capacity(photos.len());
        let mut handles = Vec::with_capacity(photos.len());
        let mut cancelled = 0usize;

        for (index, mut photo) in photos.into_iter().enumerate() {
            let permit = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => None,
                permit = semaphore.clone().acquire_owned() => permit.ok(),
            };

            let Some(permit) = permit else {
                let reason = PipelineError::Cancelled(photo.path().to_path_buf());
                tracing::debug!("{}", reason);
                photo.set_status(PhotoStatus::Failed(reason.to_string()));
                on_update(&photo);
                cancelled += 1;
                slots.push(Some(photo));
                continue;
            };

            let source = photo.path().to_path_buf();
            let processor = self.processor.clone();
            let config = self.config.clone();
            let watermark_path = self.watermark_path.clone();
            let on_update = on_update.clone();

            let handle = tokio::task::spawn_blocking(move || {
                let _permit = permit;
                processor.process_with_observer(&mut photo, &watermark_path, &config, |p| {
                    on_update(p)
                });
                photo
            });
            handles.push((index, source, handle));
            slots.push(None);
        }

        for (index, source, handle) in handles {
            let photo = match handle.await {
                Ok(photo) => photo,
                Err(e) => {
                    tracing::error!("Watermark task for {:?} panicked: {e}", source);
                    let mut photo = Photo::new(source);
                    photo.set_status(PhotoStatus::Failed(format!("Worker panicked: {e}")));
                    on_update(&photo);
                    photo
                }
            };
            slots[index] = Some(photo);
        }

        let photos: Vec<Photo> = slots.into_iter().flatten().collect();
        let succeeded = photos
            .iter()
            .filter(|p| p.status() == &PhotoStatus::Success)
            .count();
        let summary = BatchSummary {
            succeeded,
            failed: photos.len() - succeeded - cancelled,
            cancelled,
            elapsed: start.elapsed(),
        };
        tracing::info!(
            "Batch finished: {} succeeded, {} failed, {} cancelled in {:?}",
            summary.succeeded,
            summary.failed,
            summary.cancelled,
            summary.elapsed
        );

        BatchOutcome { photos, summary }
    }
}
