//! Core error types (deterministic only)

use thiserror::Error;

/// Errors raised while loading or compiling a pattern configuration
#[derive(Debug, Error)]
pub enum PatternError {
    /// TOML could not be parsed into a configuration
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// A configured regular expression does not compile
    #[error("Invalid pattern '{name}': {source}")]
    InvalidRegex {
        /// Which matcher the pattern belongs to
        name: String,
        /// Underlying regex error
        #[source]
        source: regex::Error,
    },

    /// A heading keyword list is empty
    #[error("Heading keywords for {0} must not be empty")]
    EmptyKeywords(String),
}

/// Result type for core operations
pub type Result<T> = std::result::Result<T, PatternError>;
