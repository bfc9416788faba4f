//! JSON output formatter

use super::OutputFormatter;
use anyhow::Result;
use csrsplit_core::ValidationReport;
use csrsplit_engine::RunReport;
use serde::Serialize;
use std::io::Write;
use std::path::Path;

/// JSON formatter - collects every report into one object written on finish
pub struct JsonFormatter<W: Write> {
    writer: W,
    document: serde_json::Map<String, serde_json::Value>,
}

/// Validation section of the JSON document
#[derive(Debug, Serialize)]
pub struct ValidationData<'a> {
    /// Directory that was validated
    pub output_dir: &'a Path,
    /// True when every check passed
    pub passed: bool,
    /// Per-check results and violations
    #[serde(flatten)]
    pub report: &'a ValidationReport,
}

impl<W: Write> JsonFormatter<W> {
    /// Create a new JSON formatter
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            document: serde_json::Map::new(),
        }
    }

    /// Consume the formatter and return the writer
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write + Send + Sync> OutputFormatter for JsonFormatter<W> {
    fn format_extraction(&mut self, report: &RunReport) -> Result<()> {
        self.document
            .insert("extraction".to_string(), serde_json::to_value(report)?);
        Ok(())
    }

    fn format_validation(&mut self, output_dir: &Path, report: &ValidationReport) -> Result<()> {
        let data = ValidationData {
            output_dir,
            passed: report.passed(),
            report,
        };
        self.document
            .insert("validation".to_string(), serde_json::to_value(data)?);
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        serde_json::to_writer_pretty(&mut self.writer, &self.document)?;
        writeln!(self.writer)?;
        self.writer.flush()?;
        Ok(())
    }
}
