//! Configuration types for the extractor

use crate::error::Result;
use csrsplit_core::resolver::DEFAULT_METADATA_WINDOW;
use csrsplit_core::{DetectorConfig, PatternConfig};
use std::path::Path;

/// Extractor configuration
#[derive(Debug, Clone)]
pub struct ExtractorConfig {
    /// Pattern catalog source
    pub patterns: PatternConfig,
    /// State machine tuning
    pub detector: DetectorConfig,
    /// Leading pages of a TFL searched for captions
    pub metadata_window: u32,
    /// Rendering threads (None = one per CPU)
    pub threads: Option<usize>,
    /// Write `text/*.txt` dumps
    pub write_text: bool,
    /// Pretty-print `manifest.json`
    pub pretty_json: bool,
    /// Write `manifest.csv` next to the JSON manifest
    pub write_csv: bool,
    /// Detect and report without writing anything
    pub dry_run: bool,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            patterns: PatternConfig::default(),
            detector: DetectorConfig::default(),
            metadata_window: DEFAULT_METADATA_WINDOW,
            threads: None,
            write_text: true,
            pretty_json: true,
            write_csv: true,
            dry_run: false,
        }
    }
}

impl ExtractorConfig {
    /// Start a builder from the defaults
    pub fn builder() -> ExtractorConfigBuilder {
        ExtractorConfigBuilder::default()
    }

    /// Thread count with the CPU default applied
    pub fn effective_threads(&self) -> usize {
        self.threads.unwrap_or_else(num_cpus::get).max(1)
    }
}

/// Fluent construction of an [`ExtractorConfig`]
#[derive(Debug, Clone, Default)]
pub struct ExtractorConfigBuilder {
    config: ExtractorConfig,
}

impl ExtractorConfigBuilder {
    /// Use a pattern configuration
    pub fn patterns(mut self, patterns: PatternConfig) -> Self {
        self.config.patterns = patterns;
        self
    }

    /// Load the pattern configuration from a TOML file
    pub fn patterns_file(mut self, path: &Path) -> Result<Self> {
        self.config.patterns = PatternConfig::from_file(path)?;
        Ok(self)
    }

    /// Oversized-segment warning threshold
    pub fn max_tfl_pages(mut self, pages: u32) -> Self {
        self.config.detector.max_tfl_pages = pages;
        self
    }

    /// Whether section 15/16 headings end the TFL run
    pub fn stop_at_back_matter(mut self, enabled: bool) -> Self {
        self.config.detector.stop_at_back_matter = enabled;
        self
    }

    /// Caption window in pages
    pub fn metadata_window(mut self, pages: u32) -> Self {
        self.config.metadata_window = pages.max(1);
        self
    }

    /// Rendering threads (None = one per CPU)
    pub fn threads(mut self, threads: Option<usize>) -> Self {
        self.config.threads = threads;
        self
    }

    /// Write raw text dumps
    pub fn write_text(mut self, enabled: bool) -> Self {
        self.config.write_text = enabled;
        self
    }

    /// Pretty-print the JSON manifest
    pub fn pretty_json(mut self, enabled: bool) -> Self {
        self.config.pretty_json = enabled;
        self
    }

    /// Write the CSV manifest
    pub fn write_csv(mut self, enabled: bool) -> Self {
        self.config.write_csv = enabled;
        self
    }

    /// Detect without writing
    pub fn dry_run(mut self, enabled: bool) -> Self {
        self.config.dry_run = enabled;
        self
    }

    /// Finish the configuration
    pub fn build(self) -> ExtractorConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ExtractorConfig::default();
        assert_eq!(config.metadata_window, 2);
        assert_eq!(config.detector.max_tfl_pages, 100);
        assert!(config.write_text);
        assert!(!config.dry_run);
        assert!(config.effective_threads() >= 1);
    }

    #[test]
    fn test_builder_overrides() {
        let config = ExtractorConfig::builder()
            .threads(Some(3))
            .write_text(false)
            .dry_run(true)
            .metadata_window(0)
            .stop_at_back_matter(false)
            .build();
        assert_eq!(config.effective_threads(), 3);
        assert!(!config.write_text);
        assert!(config.dry_run);
        assert_eq!(config.metadata_window, 1);
        assert!(!config.detector.stop_at_back_matter);
    }

    #[test]
    fn test_missing_patterns_file() {
        let result = ExtractorConfig::builder().patterns_file(Path::new("/nonexistent/p.toml"));
        assert!(result.is_err());
    }
}
