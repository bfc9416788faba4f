//! Configuration module
//!
//! Optional TOML file passed with `--config` (or `CSRSPLIT_CONFIG`).
//! Command-line flags override anything set here.

use crate::error::CliError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// CLI configuration structure
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Default)]
pub struct CliConfig {
    /// Detection configuration
    #[serde(default)]
    pub extraction: ExtractionConfig,

    /// Output configuration
    #[serde(default)]
    pub output: OutputConfig,

    /// Performance configuration
    #[serde(default)]
    pub performance: PerformanceConfig,
}

impl CliConfig {
    /// Load a configuration file
    pub fn from_file(path: &Path) -> Result<Self, CliError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| CliError::ConfigError(format!("{}: {e}", path.display())))?;
        toml::from_str(&content)
            .map_err(|e| CliError::ConfigError(format!("{}: {e}", path.display())))
    }

    /// Load `path` if given, defaults otherwise
    pub fn load(path: Option<&Path>) -> Result<Self, CliError> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }
}

/// Detection-related configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Pattern file replacing the built-in ICH E3 catalog
    pub patterns_file: Option<PathBuf>,

    /// Warn about TFLs longer than this many pages
    pub max_tfl_pages: u32,

    /// Leading pages of a TFL searched for title and population
    pub metadata_window: u32,

    /// End the TFL run at the first section 15/16 heading
    pub stop_at_back_matter: bool,

    /// Exit successfully when no TFL is found
    pub allow_no_tfls: bool,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            patterns_file: None,
            max_tfl_pages: 100,
            metadata_window: 2,
            stop_at_back_matter: true,
            allow_no_tfls: false,
        }
    }
}

/// Output-related configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Default summary format
    pub default_format: String,

    /// Write raw text dumps next to the PDFs
    pub write_text: bool,

    /// Write `manifest.csv`
    pub write_csv: bool,

    /// Pretty print `manifest.json`
    pub pretty_json: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            default_format: "text".to_string(),
            write_text: true,
            write_csv: true,
            pretty_json: true,
        }
    }
}

/// Performance-related configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct PerformanceConfig {
    /// Number of rendering threads (0 = auto)
    pub worker_threads: usize,
}

impl PerformanceConfig {
    /// Configured thread count, None when automatic
    pub fn threads(&self) -> Option<usize> {
        (self.worker_threads > 0).then_some(self.worker_threads)
    }
}
