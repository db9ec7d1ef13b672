//! Batch report output in JSON or JSONL.
//!
//! Writes one [`PhotoReport`](crate::types::PhotoReport) per photo, either as
//! a single JSON array or as newline-delimited objects.

use serde::Serialize;
use std::io::{self, Write};
use std::str::FromStr;

/// Report format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    /// Single JSON array
    #[default]
    Json,
    /// One JSON object per line (newline-delimited JSON)
    JsonLines,
}

impl FromStr for ReportFormat {
    type Err = String;

    /// Parse format from string (case-insensitive).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "jsonl" | "jsonlines" | "ndjson" => Ok(Self::JsonLines),
            other => Err(format!("unknown report format: {other}")),
        }
    }
}

/// A writer that serializes report entries to JSON or JSONL.
pub struct ReportWriter<W: Write> {
    writer: W,
    format: ReportFormat,
    pretty: bool,
    items_written: usize,
}

impl<W: Write> ReportWriter<W> {
    /// `pretty` only affects the JSON format.
    pub fn new(writer: W, format: ReportFormat, pretty: bool) -> Self {
        Self {
            writer,
            format,
            pretty,
            items_written: 0,
        }
    }

    /// Write all entries: a JSON array, or one line each for JSONL.
    pub fn write_all<T: Serialize>(&mut self, items: &[T]) -> io::Result<()> {
        match self.format {
            ReportFormat::Json => {
                if self.pretty {
                    serde_json::to_writer_pretty(&mut self.writer, items)
                        .map_err(io::Error::other)?;
                } else {
                    serde_json::to_writer(&mut self.writer, items).map_err(io::Error::other)?;
                }
                writeln!(self.writer)?;
                self.items_written += items.len();
            }
            ReportFormat::JsonLines => {
                for item in items {
                    serde_json::to_writer(&mut self.writer, item).map_err(io::Error::other)?;
                    writeln!(self.writer)?;
                    self.items_written += 1;
                }
            }
        }
        Ok(())
    }

    pub fn items_written(&self) -> usize {
        self.items_written
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Photo, PhotoReport};

    fn reports() -> Vec<PhotoReport> {
        vec![
            PhotoReport::from(&Photo::new("/photos/a.jpg")),
            PhotoReport::from(&Photo::new("/photos/b.png")),
        ]
    }

    #[test]
    fn test_write_all_json_array() {
        let mut buffer = Vec::new();
        let mut writer = ReportWriter::new(&mut buffer, ReportFormat::Json, false);
        writer.write_all(&reports()).unwrap();
        assert_eq!(writer.items_written(), 2);

        let output = String::from_utf8(buffer).unwrap();
        assert!(output.starts_with('['));
        assert!(output.trim().ends_with(']'));
        let parsed: Vec<PhotoReport> = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed[1].file_name, "b.png");
    }

    #[test]
    fn test_write_jsonl() {
        let mut buffer = Vec::new();
        let mut writer = ReportWriter::new(&mut buffer, ReportFormat::JsonLines, true);
        writer.write_all(&reports()).unwrap();

        let output = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = output.trim().split('\n').collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("\"status\":\"Loaded\""));
        assert!(!lines[0].contains("\"error\""));
    }

    #[test]
    fn test_format_parse() {
        assert_eq!("json".parse(), Ok(ReportFormat::Json));
        assert_eq!("jsonl".parse(), Ok(ReportFormat::JsonLines));
        assert_eq!("NDJSON".parse(), Ok(ReportFormat::JsonLines));
        assert!("yaml".parse::<ReportFormat>().is_err());
    }
}
