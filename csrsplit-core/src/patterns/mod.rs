//! Regular-expression matchers over a single page of text
//!
//! The catalog is a set of independent, stateless matchers compiled from a
//! [`PatternConfig`]. New heading conventions are added through the
//! configuration; the detector only sees the matcher results.

pub mod config;

pub use config::{PatternConfig, DEFAULT_PATTERNS_TOML};

use crate::error::{PatternError, Result};
use crate::types::TflKind;
use regex::Regex;

/// A TFL heading found on a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadingMatch {
    /// Kind implied by the keyword
    pub kind: TflKind,
    /// Matched text exactly as it appears on the page
    pub raw_text: String,
    /// Numeric part with whitespace removed, punctuation kept (`14-1.01`)
    pub number: String,
    /// Byte offset just past the match in the page text
    pub end: usize,
}

impl HeadingMatch {
    /// Canonical identifier: canonical keyword plus the collapsed number
    pub fn canonical_id(&self) -> String {
        format!("{} {}", self.kind.keyword(), self.number)
    }
}

/// A "Page X of Y" footer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// X
    pub page: u32,
    /// Y
    pub total: u32,
}

/// Compiled matchers
#[derive(Debug, Clone)]
pub struct PatternCatalog {
    name: String,
    heading: Regex,
    heading_scan_lines: usize,
    title_max_lines: usize,
    population: Vec<Regex>,
    program: Vec<Regex>,
    pagination: Regex,
    back_matter: Vec<Regex>,
    back_matter_scan_lines: usize,
}

impl PatternCatalog {
    /// Compile a catalog from a configuration
    pub fn new(config: &PatternConfig) -> Result<Self> {
        let heading = compile("headings", &heading_pattern(config)?)?;

        let population = compile_captions("captions.population", &config.captions.population)?;
        let program = compile_captions("captions.program", &config.captions.program)?;

        let pagination = compile("pagination.pattern", &config.pagination.pattern)?;
        for group in ["page", "total"] {
            require_group("pagination.pattern", &pagination, group)?;
        }

        let back_matter = if config.back_matter.enabled {
            config
                .back_matter
                .patterns
                .iter()
                .enumerate()
                .map(|(i, p)| compile(&format!("back_matter.patterns[{i}]"), p))
                .collect::<Result<Vec<_>>>()?
        } else {
            Vec::new()
        };

        log::debug!(
            "compiled pattern catalog '{}' ({} population, {} program, {} back-matter patterns)",
            config.metadata.name,
            population.len(),
            program.len(),
            back_matter.len()
        );

        Ok(Self {
            name: config.metadata.name.clone(),
            heading,
            heading_scan_lines: config.headings.scan_lines,
            title_max_lines: config.titles.max_lines,
            population,
            program,
            pagination,
            back_matter,
            back_matter_scan_lines: config.back_matter.scan_lines,
        })
    }

    /// Catalog compiled from the embedded ICH E3 defaults
    pub fn ich_e3() -> Self {
        Self::new(PatternConfig::embedded()).expect("embedded patterns must compile")
    }

    /// Configuration name the catalog was built from
    pub fn name(&self) -> &str {
        &self.name
    }

    /// First TFL heading in reading order within the heading scan window
    pub fn match_tfl_heading(&self, text: &str) -> Option<HeadingMatch> {
        let limit = scan_limit(text, self.heading_scan_lines);
        let caps = self.heading.captures(text)?;
        let whole = caps.get(0)?;
        if whole.start() >= limit {
            return None;
        }

        let kind = if caps.name("table").is_some() {
            TflKind::Table
        } else if caps.name("listing").is_some() {
            TflKind::Listing
        } else {
            TflKind::Figure
        };
        let number: String = caps
            .name("number")?
            .as_str()
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();

        Some(HeadingMatch {
            kind,
            raw_text: whole.as_str().trim().to_string(),
            number,
            end: whole.end(),
        })
    }

    /// Last "Page X of Y" footer on the page
    pub fn match_pagination(&self, text: &str) -> Option<Pagination> {
        let caps = self.pagination.captures_iter(text).last()?;
        let page = caps.name("page")?.as_str().parse().ok()?;
        let total = caps.name("total")?.as_str().parse().ok()?;
        Some(Pagination { page, total })
    }

    /// Caption text following a heading match on the same page
    pub fn match_title(&self, text: &str, heading: &HeadingMatch) -> Option<String> {
        let end = heading.end.min(text.len());
        let line_end = text[end..].find('\n').map_or(text.len(), |i| end + i);

        let mut parts = Vec::new();
        let first = text[end..line_end]
            .trim()
            .trim_start_matches([':', '-', '\u{2013}', '\u{2014}'])
            .trim();
        if !first.is_empty() {
            parts.push(first.to_string());
        }

        if line_end < text.len() {
            for line in text[line_end + 1..].lines() {
                if parts.len() >= self.title_max_lines {
                    break;
                }
                let line = line.trim();
                if line.is_empty() || self.is_caption_line(line) {
                    break;
                }
                parts.push(line.to_string());
            }
        }

        let title = collapse_whitespace(&parts.join(" "));
        (!title.is_empty()).then_some(title)
    }

    /// Population caption value
    pub fn match_population(&self, text: &str) -> Option<String> {
        first_value(&self.population, text)
    }

    /// Program path printed on the page
    ///
    /// Footers are laid out in columns, so the value is cut at the first run
    /// of two or more spaces (tabs count as two). A path that itself contains
    /// a double space is truncated there.
    pub fn match_program_path(&self, text: &str) -> Option<String> {
        first_value(&self.program, text)
            .map(|value| {
                value
                    .replace('\t', "  ")
                    .split("  ")
                    .next()
                    .unwrap_or_default()
                    .trim()
                    .to_string()
            })
            .filter(|value| !value.is_empty())
    }

    /// Whether the page opens section 15 or 16
    pub fn match_back_matter(&self, text: &str) -> bool {
        if self.back_matter.is_empty() {
            return false;
        }
        let limit = scan_limit(text, self.back_matter_scan_lines);
        self.back_matter
            .iter()
            .any(|re| re.find(text).is_some_and(|m| m.start() < limit))
    }

    fn is_caption_line(&self, line: &str) -> bool {
        self.population.iter().any(|re| re.is_match(line))
            || self.program.iter().any(|re| re.is_match(line))
            || self.pagination.is_match(line)
            || self.heading.is_match(line)
    }
}

impl Default for PatternCatalog {
    fn default() -> Self {
        Self::ich_e3()
    }
}

fn heading_pattern(config: &PatternConfig) -> Result<String> {
    let keywords = &config.headings.keywords;
    let alternatives = |name: &str, list: &[String]| -> Result<String> {
        if list.is_empty() {
            return Err(PatternError::EmptyKeywords(name.to_string()));
        }
        Ok(list.join("|"))
    };
    let table = alternatives("table", &keywords.table)?;
    let listing = alternatives("listing", &keywords.listing)?;
    let figure = alternatives("figure", &keywords.figure)?;

    let section = if config.headings.sections.is_empty() {
        r"\d+".to_string()
    } else {
        config
            .headings
            .sections
            .iter()
            .map(|s| regex::escape(s.trim()))
            .collect::<Vec<_>>()
            .join("|")
    };

    Ok(format!(
        r"(?im)^[ \t]*(?:(?P<table>{table})|(?P<listing>{listing})|(?P<figure>{figure}))\s+(?P<number>(?:{section})(?:[ \t]*[.\-][ \t]*\d+)+)"
    ))
}

fn compile(name: &str, pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|source| PatternError::InvalidRegex {
        name: name.to_string(),
        source,
    })
}

fn compile_captions(name: &str, patterns: &[String]) -> Result<Vec<Regex>> {
    patterns
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let name = format!("{name}[{i}]");
            let re = compile(&name, p)?;
            require_group(&name, &re, "value")?;
            Ok(re)
        })
        .collect()
}

fn require_group(name: &str, re: &Regex, group: &str) -> Result<()> {
    if re.capture_names().flatten().any(|n| n == group) {
        Ok(())
    } else {
        Err(PatternError::ConfigurationError(format!(
            "pattern '{name}' must define a named group '{group}'"
        )))
    }
}

fn first_value(patterns: &[Regex], text: &str) -> Option<String> {
    patterns.iter().find_map(|re| {
        re.captures(text)
            .and_then(|caps| caps.name("value"))
            .map(|m| m.as_str().trim().to_string())
            .filter(|v| !v.is_empty())
    })
}

/// Byte offset just past the `lines`-th non-blank line
fn scan_limit(text: &str, lines: usize) -> usize {
    let mut seen = 0;
    let mut offset = 0;
    for line in text.split_inclusive('\n') {
        offset += line.len();
        if !line.trim().is_empty() {
            seen += 1;
            if seen >= lines {
                return offset;
            }
        }
    }
    text.len()
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
