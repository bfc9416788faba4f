//! Error handling for the CLI application

use std::fmt;

/// Custom error type for CLI-specific errors
#[derive(Debug)]
pub enum CliError {
    /// File not found or inaccessible
    FileNotFound(String),
    /// Configuration error
    ConfigError(String),
    /// Processing error from the engine
    ProcessingError(String),
    /// The document contained no Section 14 headings
    NoTflsDetected(String),
    /// An output directory failed validation
    ValidationFailed {
        /// Checks that passed
        passed: usize,
        /// Checks run
        total: usize,
    },
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::FileNotFound(path) => write!(f, "File not found: {path}"),
            CliError::ConfigError(msg) => write!(f, "Configuration error: {msg}"),
            CliError::ProcessingError(msg) => write!(f, "Processing error: {msg}"),
            CliError::NoTflsDetected(source) => write!(
                f,
                "No TFLs detected in {source} (use --allow-no-tfls to accept)"
            ),
            CliError::ValidationFailed { passed, total } => {
                write!(f, "Validation failed ({passed}/{total} checks passed)")
            }
        }
    }
}

impl std::error::Error for CliError {}

/// Result type alias for CLI operations
pub type CliResult<T> = Result<T, anyhow::Error>;
