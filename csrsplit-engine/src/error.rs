//! Engine error types
//!
//! Input problems are fatal and surface before detection runs. Detection and
//! resolution never produce errors; they report through diagnostics instead.

use csrsplit_core::PatternError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while reading, rendering or persisting
#[derive(Error, Debug)]
pub enum EngineError {
    /// Input path does not exist
    #[error("input file not found: {}", .0.display())]
    InputNotFound(PathBuf),

    /// Input exists but is neither a PDF nor a page-separated text dump
    #[error("unsupported input {}: {reason}", path.display())]
    UnsupportedInput {
        /// Offending path
        path: PathBuf,
        /// Why it was rejected
        reason: String,
    },

    /// The PDF parser rejected the file
    #[error("failed to parse PDF {}: {reason}", path.display())]
    Pdf {
        /// Offending path
        path: PathBuf,
        /// Parser message
        reason: String,
    },

    /// Zero pages, or no page yielded any text
    #[error("no extractable pages in {}", .0.display())]
    NoExtractablePages(PathBuf),

    /// The source cannot produce PDF output
    #[error("source '{0}' cannot be rendered to PDF; run with --dry-run")]
    NotRenderable(String),

    /// Writing one output PDF failed
    #[error("failed to render {file}: {reason}")]
    Render {
        /// Output path relative to the output directory
        file: String,
        /// Underlying failure
        reason: String,
    },

    /// Filesystem error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Manifest JSON could not be written or parsed
    #[error("manifest JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Manifest CSV could not be written
    #[error("manifest CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Output directory has no manifest.json
    #[error("manifest.json not found in {}", .0.display())]
    ManifestMissing(PathBuf),

    /// Pattern configuration failed to load or compile
    #[error("pattern configuration error: {0}")]
    Patterns(#[from] PatternError),

    /// Worker pool could not be created
    #[error("failed to build thread pool: {0}")]
    ThreadPool(String),
}

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;
