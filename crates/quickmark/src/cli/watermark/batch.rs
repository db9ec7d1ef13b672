//! Batch execution with progress, Ctrl-C cancellation, summary and report output.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Arc;

use indicatif::{ProgressBar, ProgressStyle};
use quickmark_core::{
    BatchRunner, BatchSummary, Config, PhotoReport, PhotoSet, ReportFormat, ReportWriter,
};
use tokio_util::sync::CancellationToken;

use super::WatermarkArgs;

/// Run the batch and write the optional report.
///
/// Returns the summary; a batch with failures is still `Ok` so the caller
/// decides on the exit status.
pub async fn run_batch(
    config: Config,
    photos: PhotoSet,
    args: &WatermarkArgs,
) -> anyhow::Result<BatchSummary> {
    let token = CancellationToken::new();
    let runner = BatchRunner::new(Arc::new(config), token.clone())?;

    let interrupt = tokio::spawn(cancel_on_ctrl_c(token));

    let progress = create_progress_bar(photos.len() as u64, args.quiet);
    let bar = progress.clone();
    let outcome = runner
        .run(photos, move |photo| {
            if photo.status().is_terminal() {
                bar.inc(1);
                bar.set_message(photo.file_name().to_string());
            }
        })
        .await;
    interrupt.abort();
    progress.finish_and_clear();

    print_summary(&outcome.summary);

    if let Some(path) = &args.report {
        write_report(path, args.report_format.into(), &outcome.reports())?;
    }

    Ok(outcome.summary)
}

async fn cancel_on_ctrl_c(token: CancellationToken) {
    if tokio::signal::ctrl_c().await.is_ok() {
        tracing::warn!("Interrupted: finishing photos in flight, skipping the rest");
        token.cancel();
    }
}

/// Write the report to a file, or to stdout when the path is `-`.
pub fn write_report(
    path: &Path,
    format: ReportFormat,
    reports: &[PhotoReport],
) -> anyhow::Result<()> {
    if path == Path::new("-") {
        let stdout = std::io::stdout();
        let mut writer = ReportWriter::new(stdout.lock(), format, true);
        writer.write_all(reports)?;
        writer.flush()?;
    } else {
        let file = File::create(path)?;
        let mut writer = ReportWriter::new(BufWriter::new(file), format, true);
        writer.write_all(reports)?;
        writer.flush()?;
        tracing::info!("Report written to {:?}", path);
    }
    Ok(())
}

/// Create a progress bar for batch processing.
fn create_progress_bar(total: u64, hidden: bool) -> ProgressBar {
    if hidden {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new(total);
    let style = ProgressStyle::default_bar()
        .template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("##-");
    pb.set_style(style);
    pb.set_message("starting...");
    pb
}

/// Print a formatted summary table after batch processing.
fn print_summary(summary: &BatchSummary) {
    let stderr = std::io::stderr();
    let _ = write_summary(&mut stderr.lock(), summary);
}

fn write_summary<W: Write>(out: &mut W, summary: &BatchSummary) -> std::io::Result<()> {
    let secs = summary.elapsed.as_secs_f64();
    let rate = if secs > 0.0 {
        summary.succeeded as f64 / secs
    } else {
        0.0
    };

    writeln!(out)?;
    writeln!(out, "  ====================================")?;
    writeln!(out, "               Summary")?;
    writeln!(out, "  ====================================")?;
    writeln!(out, "    Succeeded:    {:>8}", summary.succeeded)?;
    if summary.failed > 0 {
        writeln!(out, "    Failed:       {:>8}", summary.failed)?;
    }
    if summary.cancelled > 0 {
        writeln!(out, "    Cancelled:    {:>8}", summary.cancelled)?;
    }
    writeln!(out, "  ------------------------------------")?;
    writeln!(out, "    Total:        {:>8}", summary.total())?;
    writeln!(out, "    Duration:     {:>7.1}s", secs)?;
    writeln!(out, "    Rate:         {:>7.1} photos/sec", rate)?;
    writeln!(out, "  ====================================")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};
    use quickmark_core::{Photo, PhotoStatus};
    use std::time::Duration;

    fn reports() -> Vec<PhotoReport> {
        vec![
            PhotoReport::from(&Photo::new("/photos/a.jpg")),
            PhotoReport::from(&Photo::new("/photos/b.gif")),
        ]
    }

    #[test]
    fn test_write_report_jsonl_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.jsonl");

        write_report(&path, ReportFormat::JsonLines, &reports()).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 2);
        let first: PhotoReport = serde_json::from_str(content.lines().next().unwrap()).unwrap();
        assert_eq!(first.file_name, "a.jpg");
    }

    #[test]
    fn test_write_report_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");

        write_report(&path, ReportFormat::Json, &reports()).unwrap();
        let parsed: Vec<PhotoReport> =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed.len(), 2);
    }

    #[test]
    fn test_summary_lists_failures_and_cancellations() {
        let summary = BatchSummary {
            succeeded: 3,
            failed: 1,
            cancelled: 2,
            elapsed: Duration::from_secs(2),
        };
        let mut out = Vec::new();
        write_summary(&mut out, &summary).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Failed:"));
        assert!(text.contains("Cancelled:"));
        assert!(text.contains("       6"));
    }

    #[test]
    fn test_summary_hides_zero_rows() {
        let summary = BatchSummary {
            succeeded: 2,
            ..BatchSummary::default()
        };
        let mut out = Vec::new();
        write_summary(&mut out, &summary).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(!text.contains("Failed:"));
        assert!(!text.contains("Cancelled:"));
    }

    #[tokio::test]
    async fn test_run_batch_writes_outputs_and_report() {
        let dir = tempfile::tempdir().unwrap();
        let logo = dir.path().join("logo.png");
        RgbaImage::from_pixel(10, 10, Rgba([255, 255, 255, 200]))
            .save(&logo)
            .unwrap();
        let photo = dir.path().join("shot.png");
        RgbaImage::from_pixel(40, 30, Rgba([0, 0, 0, 255]))
            .save(&photo)
            .unwrap();
        let report = dir.path().join("report.json");

        let mut config = Config::default();
        config.watermark.filename = logo;
        config.output.format = quickmark_core::OutputFormat::Png;
        let args = WatermarkArgs {
            inputs: vec![photo.clone()],
            report: Some(report.clone()),
            quiet: true,
            ..WatermarkArgs::default()
        };
        let photos: PhotoSet = [photo].into_iter().collect();

        let summary = run_batch(config, photos, &args).await.unwrap();
        assert_eq!(summary.succeeded, 1);
        assert!(dir.path().join("shot_wm.png").exists());

        let parsed: Vec<PhotoReport> =
            serde_json::from_str(&std::fs::read_to_string(&report).unwrap()).unwrap();
        assert_eq!(parsed[0].status, PhotoStatus::Success.to_string());
        assert_eq!(parsed[0].width, Some(40));
    }
}
