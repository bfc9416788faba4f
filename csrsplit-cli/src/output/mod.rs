//! Output formatting module
//!
//! Formatters render run and validation reports to stdout. Files under the
//! output directory are written by the engine, never by a formatter.

use anyhow::Result;
use csrsplit_core::ValidationReport;
use csrsplit_engine::RunReport;
use std::io;
use std::path::Path;

/// Trait for output formatters
pub trait OutputFormatter: Send + Sync {
    /// Format the result of an extraction run
    fn format_extraction(&mut self, report: &RunReport) -> Result<()>;

    /// Format the validation of an output directory
    fn format_validation(&mut self, output_dir: &Path, report: &ValidationReport) -> Result<()>;

    /// Finalize output (e.g., write the collected JSON document)
    fn finish(&mut self) -> Result<()>;
}

pub mod json;
pub mod markdown;
pub mod text;

pub use json::JsonFormatter;
pub use markdown::MarkdownFormatter;
pub use text::TextFormatter;

/// Supported summary formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable summary
    Text,
    /// Machine-readable report
    Json,
    /// Markdown tables
    Markdown,
}

impl OutputFormat {
    /// Formatter writing to stdout
    pub fn stdout_formatter(self) -> Box<dyn OutputFormatter> {
        match self {
            OutputFormat::Text => Box::new(TextFormatter::new(io::stdout())),
            OutputFormat::Json => Box::new(JsonFormatter::new(io::stdout())),
            OutputFormat::Markdown => Box::new(MarkdownFormatter::new(io::stdout())),
        }
    }
}

/// `n word` with a plural `s` when `n != 1`
pub(crate) fn counted(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{n} {word}")
    } else {
        format!("{n} {word}s")
    }
}
