//! TOML configuration for the pattern catalog

use crate::error::{PatternError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;

/// Embedded default configuration
pub const DEFAULT_PATTERNS_TOML: &str = include_str!("../../configs/default_patterns.toml");

static DEFAULT_CONFIG: OnceLock<PatternConfig> = OnceLock::new();

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternConfig {
    pub metadata: MetadataConfig,
    pub headings: HeadingConfig,
    #[serde(default)]
    pub titles: TitleConfig,
    pub captions: CaptionConfig,
    pub pagination: PaginationConfig,
    #[serde(default)]
    pub back_matter: BackMatterConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetadataConfig {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeadingConfig {
    #[serde(default)]
    pub sections: Vec<String>,
    #[serde(default = "default_heading_scan_lines")]
    pub scan_lines: usize,
    pub keywords: KeywordConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordConfig {
    pub table: Vec<String>,
    pub listing: Vec<String>,
    pub figure: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TitleConfig {
    #[serde(default = "default_title_lines")]
    pub max_lines: usize,
}

impl Default for TitleConfig {
    fn default() -> Self {
        Self {
            max_lines: default_title_lines(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptionConfig {
    #[serde(default)]
    pub population: Vec<String>,
    #[serde(default)]
    pub program: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaginationConfig {
    pub pattern: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackMatterConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_back_matter_scan_lines")]
    pub scan_lines: usize,
    #[serde(default)]
    pub patterns: Vec<String>,
}

impl Default for BackMatterConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            scan_lines: default_back_matter_scan_lines(),
            patterns: Vec::new(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_heading_scan_lines() -> usize {
    10
}

fn default_title_lines() -> usize {
    2
}

fn default_back_matter_scan_lines() -> usize {
    20
}

impl PatternConfig {
    /// Parse a configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| {
            PatternError::ConfigurationError(format!("Failed to parse pattern config: {e}"))
        })
    }

    /// Load a configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            PatternError::ConfigurationError(format!(
                "Failed to read {}: {e}",
                path.display()
            ))
        })?;
        Self::from_toml(&content)
    }

    /// The embedded ICH E3 defaults
    pub fn embedded() -> &'static PatternConfig {
        DEFAULT_CONFIG.get_or_init(|| {
            Self::from_toml(DEFAULT_PATTERNS_TOML)
                .expect("embedded pattern config must parse")
        })
    }
}

impl Default for PatternConfig {
    fn default() -> Self {
        Self::embedded().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_config_parses() {
        let config = PatternConfig::embedded();
        assert_eq!(config.metadata.name, "ICH E3 default");
        assert_eq!(config.headings.sections, vec!["14".to_string()]);
        assert_eq!(config.headings.scan_lines, 10);
        assert_eq!(config.titles.max_lines, 2);
        assert!(config.back_matter.enabled);
        assert_eq!(config.captions.program.len(), 3);
    }

    #[test]
    fn test_embedded_is_cached() {
        let first = PatternConfig::embedded();
        let second = PatternConfig::embedded();
        assert!(std::ptr::eq(first, second));
    }

    #[test]
    fn test_minimal_config_uses_defaults() {
        let toml = r#"
[metadata]
name = "minimal"

[headings.keywords]
table = ["Table"]
listing = ["Listing"]
figure = ["Figure"]

[captions]

[pagination]
pattern = 'page (?P<page>\d+) of (?P<total>\d+)'
"#;
        let config = PatternConfig::from_toml(toml).unwrap();
        assert!(config.headings.sections.is_empty());
        assert_eq!(config.headings.scan_lines, 10);
        assert_eq!(config.titles.max_lines, 2);
        assert!(!config.back_matter.enabled);
    }

    #[test]
    fn test_invalid_toml_is_configuration_error() {
        match PatternConfig::from_toml("[metadata") {
            Err(PatternError::ConfigurationError(msg)) => {
                assert!(msg.contains("Failed to parse pattern config"));
            }
            other => panic!("Expected ConfigurationError, got {other:?}"),
        }
    }
}
