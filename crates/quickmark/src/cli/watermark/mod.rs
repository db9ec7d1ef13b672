//! The `quickmark watermark` command.

mod batch;
mod setup;
pub mod types;

use clap::Args;
use quickmark_core::pipeline::FileDiscovery;
use quickmark_core::{BatchSummary, Config};
use std::path::PathBuf;

use types::{FormatArg, PositionArg, ReportFormatArg};

/// Arguments for the `watermark` command.
#[derive(Args, Debug)]
pub struct WatermarkArgs {
    /// Photos or directories to watermark
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Config file to use instead of the default location
    #[arg(long, env = "QUICKMARK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Watermark image (overrides watermark.filename)
    #[arg(short, long)]
    pub watermark: Option<PathBuf>,

    /// Write outputs here instead of next to each original
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Output format for still images (animated sources are always gif)
    #[arg(short, long, value_enum)]
    pub format: Option<FormatArg>,

    /// Watermark anchor
    #[arg(long, value_enum)]
    pub position: Option<PositionArg>,

    /// Watermark opacity from 0.0 (invisible) to 1.0 (opaque)
    #[arg(long)]
    pub opacity: Option<f32>,

    /// Suffix appended to the output file stem
    #[arg(long)]
    pub suffix: Option<String>,

    /// EXIF Artist to stamp
    #[arg(long)]
    pub author: Option<String>,

    /// EXIF Copyright to stamp
    #[arg(long)]
    pub copyright: Option<String>,

    /// Maximum output width
    #[arg(long)]
    pub max_width: Option<u32>,

    /// Maximum output height
    #[arg(long)]
    pub max_height: Option<u32>,

    /// Number of photos processed concurrently
    #[arg(short, long)]
    pub parallel: Option<usize>,

    /// Write a per-photo report to this file (`-` for stdout)
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Report format
    #[arg(long, value_enum, default_value = "json")]
    pub report_format: ReportFormatArg,

    /// Hide the progress bar
    #[arg(short, long)]
    pub quiet: bool,
}

/// Manual Default impl for constructing WatermarkArgs outside of clap.
///
/// Values match the clap defaults above.
impl Default for WatermarkArgs {
    fn default() -> Self {
        Self {
            inputs: Vec::new(),
            config: None,
            watermark: None,
            output_dir: None,
            format: None,
            position: None,
            opacity: None,
            suffix: None,
            author: None,
            copyright: None,
            max_width: None,
            max_height: None,
            parallel: None,
            report: None,
            report_format: ReportFormatArg::Json,
            quiet: false,
        }
    }
}

/// Execute the watermark command.
pub async fn execute(args: WatermarkArgs, base: Config) -> anyhow::Result<()> {
    let config = setup::build_config(&args, base)?;

    let photos = FileDiscovery::new(config.processing.clone())
        .skip_suffix(&config.output.suffix)
        .collect(&args.inputs);
    if photos.is_empty() {
        tracing::warn!("No supported image files found in {:?}", args.inputs);
        return Ok(());
    }
    tracing::info!("Found {} photo(s) to watermark", photos.len());

    let summary = batch::run_batch(config, photos, &args).await?;
    check_summary(&summary)
}

/// Cancelled photos count as failures for the exit status.
fn check_summary(summary: &BatchSummary) -> anyhow::Result<()> {
    let unfinished = summary.failed + summary.cancelled;
    if unfinished > 0 {
        anyhow::bail!(
            "{} of {} photo(s) failed ({} cancelled)",
            unfinished,
            summary.total(),
            summary.cancelled
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        args: WatermarkArgs,
    }

    fn parse(argv: &[&str]) -> WatermarkArgs {
        TestCli::try_parse_from(std::iter::once("quickmark").chain(argv.iter().copied()))
            .unwrap()
            .args
    }

    #[test]
    fn test_parse_minimal() {
        let args = parse(&["a.jpg", "photos/"]);
        assert_eq!(args.inputs.len(), 2);
        assert!(args.format.is_none());
        assert_eq!(args.report_format, ReportFormatArg::Json);
    }

    #[test]
    fn test_parse_overrides() {
        let args = parse(&[
            "a.jpg",
            "--format",
            "jpeg",
            "--position",
            "bottom-middle",
            "--opacity",
            "0.4",
            "-p",
            "4",
            "--report",
            "-",
            "--report-format",
            "jsonl",
        ]);
        assert_eq!(args.format, Some(FormatArg::Jpg));
        assert_eq!(args.position, Some(PositionArg::BottomMiddle));
        assert_eq!(args.opacity, Some(0.4));
        assert_eq!(args.parallel, Some(4));
        assert_eq!(args.report, Some(PathBuf::from("-")));
        assert_eq!(args.report_format, ReportFormatArg::Jsonl);
    }

    #[test]
    fn test_inputs_required() {
        assert!(TestCli::try_parse_from(["quickmark"]).is_err());
    }

    #[test]
    fn test_unknown_position_rejected() {
        assert!(TestCli::try_parse_from(["quickmark", "a.jpg", "--position", "middle"]).is_err());
    }

    #[test]
    fn test_check_summary_fails_on_cancelled_batch() {
        let cancelled = BatchSummary {
            succeeded: 2,
            cancelled: 3,
            ..BatchSummary::default()
        };
        let err = check_summary(&cancelled).unwrap_err();
        assert!(err.to_string().contains("3 of 5"));

        let failed = BatchSummary {
            failed: 1,
            ..BatchSummary::default()
        };
        assert!(check_summary(&failed).is_err());

        let clean = BatchSummary {
            succeeded: 4,
            ..BatchSummary::default()
        };
        assert!(check_summary(&clean).is_ok());
    }

    #[test]
    fn test_default_matches_clap_defaults() {
        let args = WatermarkArgs::default();
        assert_eq!(args.report_format, ReportFormatArg::Json);
        assert!(!args.quiet);
        assert!(args.inputs.is_empty());
    }
}
