//! PDF reading, rendering and output orchestration for csrsplit
//!
//! This crate wraps the pure detection logic of `csrsplit-core` with
//! everything that touches the filesystem: page text extraction, per-segment
//! PDF rendering on a worker pool, manifest persistence and validation of an
//! existing output directory.

#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod manifest_io;
pub mod pipeline;
pub mod source;
pub mod validator;
pub mod writer;

// Re-export key types
pub use config::{ExtractorConfig, ExtractorConfigBuilder};
pub use error::{EngineError, Result};
pub use manifest_io::{read_manifest, write_csv, write_json, MANIFEST_CSV, MANIFEST_JSON};
pub use pipeline::{Analysis, Extractor, NoProgress, RunObserver, RunReport};
pub use source::{
    ExtractedPages, PageRenderer, PageTextSource, PdfSource, SourceDocument, TextSource,
};
pub use validator::validate_output_dir;
pub use writer::{OutputWriter, WriteSummary};

// Re-export from core for convenience
pub use csrsplit_core::{
    Check, Diagnostic, DiagnosticKind, Manifest, OutputFile, PageRange, PatternConfig, TflKind,
    ValidationReport, Violation,
};
