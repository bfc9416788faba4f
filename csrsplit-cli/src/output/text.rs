//! Plain text output formatter

use super::{counted, OutputFormatter};
use anyhow::Result;
use csrsplit_core::{TflKind, ValidationReport};
use csrsplit_engine::RunReport;
use std::io::{self, Write};
use std::path::Path;

/// Plain text formatter - a summary block followed by one line per TFL
pub struct TextFormatter<W: Write> {
    writer: W,
}

impl<W: Write> TextFormatter<W> {
    /// Create a new text formatter
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Consume the formatter and return the writer
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl TextFormatter<io::Stdout> {
    /// Create a formatter that writes to stdout
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send + Sync> OutputFormatter for TextFormatter<W> {
    fn format_extraction(&mut self, report: &RunReport) -> Result<()> {
        let manifest = &report.manifest;
        let w = &mut self.writer;

        writeln!(w, "=== Extraction Summary ===")?;
        writeln!(
            w,
            "Source: {} ({} pages)",
            manifest.source_file, manifest.source_pages
        )?;
        match &manifest.narrative {
            Some(narrative) => writeln!(
                w,
                "Narrative: pages {} -> {}",
                narrative.pages_in_source, narrative.file
            )?,
            None => writeln!(w, "Narrative: none")?,
        }
        writeln!(
            w,
            "TFLs extracted: {} ({}, {}, {})",
            manifest.tlfs.len(),
            counted(manifest.count_of(TflKind::Table), "table"),
            counted(manifest.count_of(TflKind::Listing), "listing"),
            counted(manifest.count_of(TflKind::Figure), "figure"),
        )?;
        writeln!(w, "Total TFL pages: {}", manifest.tfl_pages())?;
        if let Some(back_matter) = report.back_matter {
            writeln!(w, "Back matter: pages {back_matter} (not extracted)")?;
        }
        writeln!(w, "Warnings: {}", report.diagnostics.len())?;
        if report.dry_run {
            writeln!(w, "Dry run: nothing written")?;
        } else {
            writeln!(w, "Output: {}", report.output_dir.display())?;
        }

        if !manifest.tlfs.is_empty() {
            writeln!(w)?;
        }
        for tfl in &manifest.tlfs {
            let pages = format!("({}p)", tfl.page_count);
            writeln!(w, "{:<14} {:<6} {}", tfl.id, pages, tfl.title)?;
        }

        if !report.diagnostics.is_empty() {
            writeln!(w)?;
            for diagnostic in &report.diagnostics {
                writeln!(w, "warning: {diagnostic}")?;
            }
        }
        Ok(())
    }

    fn format_validation(&mut self, output_dir: &Path, report: &ValidationReport) -> Result<()> {
        let w = &mut self.writer;
        writeln!(w, "=== Validation: {} ===", output_dir.display())?;
        for result in &report.checks {
            let mark = if result.passed { "✓" } else { "✗" };
            writeln!(w, "{mark} {}", result.check)?;
        }
        for violation in &report.violations {
            writeln!(w, "  - {violation}")?;
        }

        let total = report.checks.len();
        let passed = report.passed_count();
        if report.passed() {
            writeln!(w, "Validation PASSED ({passed}/{total} checks)")?;
        } else {
            writeln!(w, "Validation FAILED ({passed}/{total} checks passed)")?;
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::fixtures;

    fn render(f: impl FnOnce(&mut TextFormatter<Vec<u8>>)) -> String {
        let mut formatter = TextFormatter::new(Vec::new());
        f(&mut formatter);
        formatter.finish().unwrap();
        String::from_utf8(formatter.into_inner()).unwrap()
    }

    #[test]
    fn test_extraction_summary() {
        let out = render(|f| f.format_extraction(&fixtures::run_report()).unwrap());
        assert!(out.starts_with("=== Extraction Summary ===\n"));
        assert!(out.contains("Source: csr.pdf (6 pages)\n"));
        assert!(out.contains("Narrative: pages 1-2 -> pdf/narrative_body.pdf\n"));
        assert!(out.contains("TFLs extracted: 2 (1 table, 0 listings, 1 figure)\n"));
        assert!(out.contains("Total TFL pages: 3\n"));
        assert!(out.contains("Back matter: pages 6-6 (not extracted)\n"));
        assert!(out.contains("Table 14-1.01  (2p)   Summary of Populations\n"));
        assert!(out.contains("warning: Table 14-1.01 (page 3): "));
    }

    #[test]
    fn test_dry_run_line() {
        let mut report = fixtures::run_report();
        report.dry_run = true;
        report.written = None;
        let out = render(|f| f.format_extraction(&report).unwrap());
        assert!(out.contains("Dry run: nothing written"));
        assert!(!out.contains("Output: "));
    }

    #[test]
    fn test_validation_failed() {
        let out = render(|f| {
            f.format_validation(Path::new("out"), &fixtures::failed_validation())
                .unwrap()
        });
        assert!(out.contains("✗ files_exist\n"));
        assert!(out.contains("✓ unique_ids\n"));
        assert!(out.contains("Validation FAILED (7/8 checks passed)"));
    }
}
