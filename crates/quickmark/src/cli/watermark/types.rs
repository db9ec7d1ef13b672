//! CLI enum types for the watermark command: output format, position, report format.

use clap::ValueEnum;
use quickmark_core::{OutputFormat, ReportFormat, WatermarkPosition};

/// Encoded output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    /// Lossy JPEG at quality 80
    #[value(alias = "jpeg")]
    Jpg,
    /// Lossless PNG
    Png,
    /// Palette GIF
    Gif,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Jpg => OutputFormat::Jpg,
            FormatArg::Png => OutputFormat::Png,
            FormatArg::Gif => OutputFormat::Gif,
        }
    }
}

/// Watermark anchor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum PositionArg {
    LeftTop,
    LeftBottom,
    RightTop,
    RightBottom,
    TopMiddle,
    BottomMiddle,
    Center,
}

impl From<PositionArg> for WatermarkPosition {
    fn from(arg: PositionArg) -> Self {
        match arg {
            PositionArg::LeftTop => WatermarkPosition::LeftTop,
            PositionArg::LeftBottom => WatermarkPosition::LeftBottom,
            PositionArg::RightTop => WatermarkPosition::RightTop,
            PositionArg::RightBottom => WatermarkPosition::RightBottom,
            PositionArg::TopMiddle => WatermarkPosition::TopMiddle,
            PositionArg::BottomMiddle => WatermarkPosition::BottomMiddle,
            PositionArg::Center => WatermarkPosition::Center,
        }
    }
}

/// Batch report format.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum ReportFormatArg {
    /// Single JSON array
    #[default]
    Json,
    /// One JSON object per line (newline-delimited)
    Jsonl,
}

impl From<ReportFormatArg> for ReportFormat {
    fn from(arg: ReportFormatArg) -> Self {
        match arg {
            ReportFormatArg::Json => ReportFormat::Json,
            ReportFormatArg::Jsonl => ReportFormat::JsonLines,
        }
    }
}

impl std::fmt::Display for ReportFormatArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportFormatArg::Json => write!(f, "json"),
            ReportFormatArg::Jsonl => write!(f, "jsonl"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_position_maps_to_its_core_name() {
        for arg in PositionArg::value_variants() {
            let cli_name = arg.to_possible_value().unwrap().get_name().to_string();
            let core: WatermarkPosition = (*arg).into();
            assert_eq!(cli_name.parse::<WatermarkPosition>().unwrap(), core);
        }
    }

    #[test]
    fn test_format_mapping() {
        assert_eq!(OutputFormat::from(FormatArg::Gif), OutputFormat::Gif);
        assert_eq!(ReportFormat::from(ReportFormatArg::Jsonl), ReportFormat::JsonLines);
    }
}
