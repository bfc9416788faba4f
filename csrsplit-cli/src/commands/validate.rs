//! Validate command implementation

use super::init_logging;
use crate::error::CliError;
use crate::output::OutputFormat;
use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

/// Arguments for the validate command
#[derive(Debug, Args)]
pub struct ValidateArgs {
    /// Output directory produced by `extract`
    #[arg(short, long, value_name = "DIR", required = true)]
    pub output: PathBuf,

    /// Report format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Suppress log output
    #[arg(short, long)]
    pub quiet: bool,

    /// Increase verbosity
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl ValidateArgs {
    /// Execute the validate command
    pub fn execute(&self) -> Result<()> {
        init_logging(self.verbose, self.quiet);
        log::debug!("Arguments: {:?}", self);

        if !self.output.is_dir() {
            return Err(CliError::FileNotFound(self.output.display().to_string()).into());
        }

        let report = csrsplit_engine::validate_output_dir(&self.output)
            .with_context(|| format!("Failed to validate {}", self.output.display()))?;

        let mut formatter = self.format.stdout_formatter();
        formatter.format_validation(&self.output, &report)?;
        formatter.finish()?;

        if report.passed() {
            Ok(())
        } else {
            Err(CliError::ValidationFailed {
                passed: report.passed_count(),
                total: report.checks.len(),
            }
            .into())
        }
    }
}
