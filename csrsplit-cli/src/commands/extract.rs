//! Extract command implementation

use super::init_logging;
use crate::config::CliConfig;
use crate::error::CliError;
use crate::output::OutputFormat;
use crate::progress::ProgressReporter;
use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use csrsplit_engine::{EngineError, Extractor, ExtractorConfig};
use std::path::PathBuf;

/// Arguments for the extract command
#[derive(Debug, Args)]
pub struct ExtractArgs {
    /// Input CSR (PDF, or form-feed separated text for dry runs)
    #[arg(short, long, value_name = "FILE", required = true)]
    pub input: PathBuf,

    /// Output directory
    #[arg(short, long, value_name = "DIR", required = true)]
    pub output: PathBuf,

    /// Detect and report without writing any files
    #[arg(long)]
    pub dry_run: bool,

    /// Skip the raw text dumps
    #[arg(long)]
    pub no_text: bool,

    /// Validate the output directory after writing
    #[arg(long)]
    pub validate: bool,

    /// Pattern configuration replacing the built-in ICH E3 catalog
    #[arg(short, long, value_name = "FILE")]
    pub patterns: Option<PathBuf>,

    /// Configuration file
    #[arg(short, long, value_name = "FILE", env = "CSRSPLIT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Rendering threads (default: one per CPU)
    #[arg(short, long, value_name = "N")]
    pub threads: Option<usize>,

    /// Succeed even when no TFL is detected
    #[arg(long)]
    pub allow_no_tfls: bool,

    /// Summary format (default: text, or the config file's choice)
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Suppress progress and log output
    #[arg(short, long)]
    pub quiet: bool,

    /// Increase verbosity
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl ExtractArgs {
    /// Execute the extract command
    pub fn execute(&self) -> Result<()> {
        init_logging(self.verbose, self.quiet);

        log::info!("Starting extraction");
        log::debug!("Arguments: {:?}", self);

        if !self.input.exists() {
            return Err(CliError::FileNotFound(self.input.display().to_string()).into());
        }

        let cli_config = CliConfig::load(self.config.as_deref())?;
        let format = self.resolve_format(&cli_config)?;
        let config = self.extractor_config(&cli_config)?;
        let validate = self.validate && !config.dry_run;

        let extractor = Extractor::new(config).map_err(|e| match e {
            EngineError::Patterns(e) => CliError::ConfigError(e.to_string()),
            other => CliError::ProcessingError(other.to_string()),
        })?;

        if !extractor.config().dry_run {
            std::fs::create_dir_all(&self.output).with_context(|| {
                format!("Failed to create output directory {}", self.output.display())
            })?;
        }

        let progress = ProgressReporter::new(self.quiet);
        let report = extractor
            .run(&self.input, &self.output, &progress)
            .with_context(|| format!("Failed to extract {}", self.input.display()))?;
        progress.finish();

        let mut formatter = format.stdout_formatter();
        formatter.format_extraction(&report)?;

        let mut validation_failure = None;
        if validate {
            let validation = csrsplit_engine::validate_output_dir(&self.output)
                .with_context(|| format!("Failed to validate {}", self.output.display()))?;
            formatter.format_validation(&self.output, &validation)?;
            if !validation.passed() {
                validation_failure = Some(CliError::ValidationFailed {
                    passed: validation.passed_count(),
                    total: validation.checks.len(),
                });
            }
        }
        formatter.finish()?;

        if let Some(failure) = validation_failure {
            return Err(failure.into());
        }
        if report.no_tfls() && !(self.allow_no_tfls || cli_config.extraction.allow_no_tfls) {
            return Err(CliError::NoTflsDetected(report.manifest.source_file.clone()).into());
        }

        log::info!(
            "Extracted {} TFLs in {} ms",
            report.manifest.tlfs.len(),
            report.elapsed_ms
        );
        Ok(())
    }

    /// Command-line format, else the config file's, else text
    fn resolve_format(&self, cli_config: &CliConfig) -> Result<OutputFormat, CliError> {
        if let Some(format) = self.format {
            return Ok(format);
        }
        <OutputFormat as ValueEnum>::from_str(&cli_config.output.default_format, true).map_err(|_| {
            CliError::ConfigError(format!(
                "unknown output format '{}'",
                cli_config.output.default_format
            ))
        })
    }

    /// Merge the config file with command-line overrides
    fn extractor_config(&self, cli_config: &CliConfig) -> Result<ExtractorConfig, CliError> {
        let extraction = &cli_config.extraction;
        let output = &cli_config.output;
        let threads = self
            .threads
            .filter(|&n| n > 0)
            .or(cli_config.performance.threads())
            .unwrap_or_else(num_cpus::get);

        let mut builder = ExtractorConfig::builder()
            .max_tfl_pages(extraction.max_tfl_pages)
            .metadata_window(extraction.metadata_window)
            .stop_at_back_matter(extraction.stop_at_back_matter)
            .threads(Some(threads))
            .write_text(output.write_text && !self.no_text)
            .write_csv(output.write_csv)
            .pretty_json(output.pretty_json)
            .dry_run(self.dry_run);

        if let Some(path) = self.patterns.as_ref().or(extraction.patterns_file.as_ref()) {
            builder = builder
                .patterns_file(path)
                .map_err(|e| CliError::ConfigError(format!("{}: {e}", path.display())))?;
        }
        Ok(builder.build())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> ExtractArgs {
        ExtractArgs {
            input: PathBuf::from("csr.pdf"),
            output: PathBuf::from("out"),
            dry_run: false,
            no_text: false,
            validate: false,
            patterns: None,
            config: None,
            threads: None,
            allow_no_tfls: false,
            format: None,
            quiet: true,
            verbose: 0,
        }
    }

    #[test]
    fn test_flags_override_config() {
        let mut cli_config = CliConfig::default();
        cli_config.performance.worker_threads = 8;
        cli_config.extraction.max_tfl_pages = 40;

        let mut a = args();
        a.threads = Some(2);
        a.no_text = true;
        a.dry_run = true;
        let config = a.extractor_config(&cli_config).unwrap();

        assert_eq!(config.threads, Some(2));
        assert_eq!(config.detector.max_tfl_pages, 40);
        assert!(!config.write_text);
        assert!(config.dry_run);
    }

    #[test]
    fn test_config_threads_used_when_flag_absent() {
        let mut cli_config = CliConfig::default();
        cli_config.performance.worker_threads = 3;
        let config = args().extractor_config(&cli_config).unwrap();
        assert_eq!(config.threads, Some(3));
    }

    #[test]
    fn test_missing_patterns_file_is_config_error() {
        let mut a = args();
        a.patterns = Some(PathBuf::from("/nonexistent/patterns.toml"));
        assert!(matches!(
            a.extractor_config(&CliConfig::default()),
            Err(CliError::ConfigError(_))
        ));
    }

    #[test]
    fn test_format_resolution() {
        let mut cli_config = CliConfig::default();
        assert_eq!(args().resolve_format(&cli_config).unwrap(), OutputFormat::Text);

        cli_config.output.default_format = "Markdown".to_string();
        assert_eq!(
            args().resolve_format(&cli_config).unwrap(),
            OutputFormat::Markdown
        );

        let mut a = args();
        a.format = Some(OutputFormat::Json);
        assert_eq!(a.resolve_format(&cli_config).unwrap(), OutputFormat::Json);

        cli_config.output.default_format = "yaml".to_string();
        assert!(args().resolve_format(&cli_config).is_err());
    }

    #[test]
    fn test_missing_input() {
        let err = args().execute().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CliError>(),
            Some(CliError::FileNotFound(_))
        ));
    }
}
