//! Markdown output formatter

use super::OutputFormatter;
use anyhow::Result;
use csrsplit_core::ValidationReport;
use csrsplit_engine::RunReport;
use std::io::Write;
use std::path::Path;

/// Markdown formatter - outputs the manifest as a table
pub struct MarkdownFormatter<W: Write> {
    writer: W,
    tfl_count: usize,
}

impl<W: Write> MarkdownFormatter<W> {
    /// Create a new markdown formatter
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            tfl_count: 0,
        }
    }

    /// Consume the formatter and return the writer
    pub fn into_inner(self) -> W {
        self.writer
    }
}

fn cell(text: &str) -> String {
    text.replace('|', "\\|")
}

impl<W: Write + Send + Sync> OutputFormatter for MarkdownFormatter<W> {
    fn format_extraction(&mut self, report: &RunReport) -> Result<()> {
        let manifest = &report.manifest;
        let w = &mut self.writer;

        writeln!(w, "# {}", manifest.source_file)?;
        writeln!(w)?;
        writeln!(
            w,
            "{} pages, extracted {}",
            manifest.source_pages, manifest.extraction_date
        )?;
        writeln!(w)?;
        writeln!(w, "| ID | Type | Pages | Count | Title | Population |")?;
        writeln!(w, "|----|------|-------|-------|-------|------------|")?;
        if let Some(narrative) = &manifest.narrative {
            writeln!(
                w,
                "| narrative_body | narrative | {} | {} | | |",
                narrative.pages_in_source, narrative.page_count
            )?;
        }
        for tfl in &manifest.tlfs {
            self.tfl_count += 1;
            writeln!(
                w,
                "| {} | {} | {} | {} | {} | {} |",
                cell(&tfl.id),
                tfl.kind.as_str(),
                tfl.pages_in_source,
                tfl.page_count,
                cell(&tfl.title),
                cell(&tfl.population)
            )?;
        }

        if !report.diagnostics.is_empty() {
            writeln!(w)?;
            writeln!(w, "## Warnings")?;
            writeln!(w)?;
            for diagnostic in &report.diagnostics {
                writeln!(w, "- {diagnostic}")?;
            }
        }
        writeln!(w)?;
        Ok(())
    }

    fn format_validation(&mut self, output_dir: &Path, report: &ValidationReport) -> Result<()> {
        let w = &mut self.writer;
        writeln!(w, "## Validation of `{}`", output_dir.display())?;
        writeln!(w)?;
        writeln!(w, "| Check | Result |")?;
        writeln!(w, "|-------|--------|")?;
        for result in &report.checks {
            let outcome = if result.passed { "pass" } else { "**fail**" };
            writeln!(w, "| {} | {outcome} |", result.check)?;
        }
        if !report.violations.is_empty() {
            writeln!(w)?;
            for violation in &report.violations {
                writeln!(w, "- {}", cell(&violation.to_string()))?;
            }
        }
        writeln!(w)?;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        writeln!(self.writer, "---")?;
        writeln!(self.writer, "*Total TFLs: {}*", self.tfl_count)?;
        self.writer.flush()?;
        Ok(())
    }
}
