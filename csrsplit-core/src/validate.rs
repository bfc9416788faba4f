//! Read-only consistency checks over a manifest
//!
//! The checks here need nothing but the manifest itself. File-level checks
//! (existence, size, rendered page counts) live in the engine and report
//! through the same [`Violation`] and [`ValidationReport`] types.

use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

use crate::manifest::Manifest;
use crate::naming::NARRATIVE_STEM;
use crate::types::PageRange;

/// A named validation check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Check {
    FilesExist,
    FilesNonEmpty,
    PdfsReadable,
    PageRangesValid,
    PageCountMatch,
    NoPageGaps,
    NoPageOverlaps,
    UniqueIds,
}

impl Check {
    /// Checks that only need the manifest
    pub const MANIFEST: [Check; 5] = [
        Check::PageRangesValid,
        Check::PageCountMatch,
        Check::NoPageGaps,
        Check::NoPageOverlaps,
        Check::UniqueIds,
    ];

    /// Every check, in report order
    pub const ALL: [Check; 8] = [
        Check::FilesExist,
        Check::FilesNonEmpty,
        Check::PdfsReadable,
        Check::PageRangesValid,
        Check::PageCountMatch,
        Check::NoPageGaps,
        Check::NoPageOverlaps,
        Check::UniqueIds,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Check::FilesExist => "files_exist",
            Check::FilesNonEmpty => "files_non_empty",
            Check::PdfsReadable => "pdfs_readable",
            Check::PageRangesValid => "page_ranges_valid",
            Check::PageCountMatch => "page_count_match",
            Check::NoPageGaps => "no_page_gaps",
            Check::NoPageOverlaps => "no_page_overlaps",
            Check::UniqueIds => "unique_ids",
        }
    }
}

impl fmt::Display for Check {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One consistency problem
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "violation", rename_all = "snake_case")]
pub enum Violation {
    /// `start > end` or `start < 1`
    MalformedRange { id: String, range: PageRange },
    /// Span reaches past the source document
    OutOfBounds {
        id: String,
        range: PageRange,
        source_pages: u32,
    },
    /// Declared `page_count` disagrees with the span
    PageCountMismatch {
        id: String,
        declared: u32,
        computed: u32,
    },
    /// Two entries share pages
    Overlap {
        first: String,
        second: String,
        first_range: PageRange,
        second_range: PageRange,
    },
    /// Pages between two consecutive entries belong to neither
    Gap {
        after: String,
        before: String,
        missing: PageRange,
    },
    /// Identifier used more than once
    DuplicateId { id: String, occurrences: usize },
    /// Referenced file does not exist
    MissingFile { file: String },
    /// Referenced file is empty
    EmptyFile { file: String },
    /// Rendered PDF cannot be parsed
    UnreadablePdf { file: String, reason: String },
    /// Rendered PDF page count disagrees with the manifest
    RenderedPageCount {
        file: String,
        expected: u32,
        actual: u32,
    },
}

impl Violation {
    /// Check this violation fails
    pub fn check(&self) -> Check {
        match self {
            Violation::MalformedRange { .. } | Violation::OutOfBounds { .. } => {
                Check::PageRangesValid
            }
            Violation::PageCountMismatch { .. } | Violation::RenderedPageCount { .. } => {
                Check::PageCountMatch
            }
            Violation::Overlap { .. } => Check::NoPageOverlaps,
            Violation::Gap { .. } => Check::NoPageGaps,
            Violation::DuplicateId { .. } => Check::UniqueIds,
            Violation::MissingFile { .. } => Check::FilesExist,
            Violation::EmptyFile { .. } => Check::FilesNonEmpty,
            Violation::UnreadablePdf { .. } => Check::PdfsReadable,
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::MalformedRange { id, range } => write!(
                f,
                "{id}: malformed page range [{}, {}]",
                range.start, range.end
            ),
            Violation::OutOfBounds {
                id,
                range,
                source_pages,
            } => write!(
                f,
                "{id}: page range {range} outside source pages 1-{source_pages}"
            ),
            Violation::PageCountMismatch {
                id,
                declared,
                computed,
            } => write!(
                f,
                "{id}: page_count is {declared} but the range spans {computed} pages"
            ),
            Violation::Overlap {
                first,
                second,
                first_range,
                second_range,
            } => write!(
                f,
                "{first} ({first_range}) overlaps {second} ({second_range})"
            ),
            Violation::Gap {
                after,
                before,
                missing,
            } => write!(f, "pages {missing} between {after} and {before} are not covered"),
            Violation::DuplicateId { id, occurrences } => {
                write!(f, "{id}: identifier appears {occurrences} times")
            }
            Violation::MissingFile { file } => write!(f, "missing file: {file}"),
            Violation::EmptyFile { file } => write!(f, "empty file: {file}"),
            Violation::UnreadablePdf { file, reason } => {
                write!(f, "unreadable PDF: {file} ({reason})")
            }
            Violation::RenderedPageCount {
                file,
                expected,
                actual,
            } => write!(f, "{file}: expected {expected} pages, found {actual}"),
        }
    }
}

/// Outcome of one check
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckResult {
    pub check: Check,
    pub passed: bool,
}

/// Pass/fail per check plus every violation found
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub checks: Vec<CheckResult>,
    pub violations: Vec<Violation>,
}

impl ValidationReport {
    /// Build a report for `checks` from the violations they produced
    pub fn new(checks: &[Check], violations: Vec<Violation>) -> Self {
        let checks = checks
            .iter()
            .map(|&check| CheckResult {
                check,
                passed: !violations.iter().any(|v| v.check() == check),
            })
            .collect();
        Self { checks, violations }
    }

    /// No violations at all
    pub fn passed(&self) -> bool {
        self.violations.is_empty()
    }

    /// Checks that passed
    pub fn passed_count(&self) -> usize {
        self.checks.iter().filter(|c| c.passed).count()
    }
}

struct Entry<'a> {
    label: &'a str,
    range: PageRange,
    page_count: u32,
}

fn entries(manifest: &Manifest) -> Vec<Entry<'_>> {
    manifest
        .narrative
        .iter()
        .map(|n| Entry {
            label: NARRATIVE_STEM,
            range: n.pages_in_source,
            page_count: n.page_count,
        })
        .chain(manifest.tlfs.iter().map(|t| Entry {
            label: t.id.as_str(),
            range: t.pages_in_source,
            page_count: t.page_count,
        }))
        .collect()
}

/// Run every manifest-only check
pub fn check_manifest(manifest: &Manifest) -> Vec<Violation> {
    let entries = entries(manifest);
    let mut violations = Vec::new();

    for entry in &entries {
        if !entry.range.is_well_formed() {
            violations.push(Violation::MalformedRange {
                id: entry.label.to_string(),
                range: entry.range,
            });
            continue;
        }
        if entry.range.end > manifest.source_pages {
            violations.push(Violation::OutOfBounds {
                id: entry.label.to_string(),
                range: entry.range,
                source_pages: manifest.source_pages,
            });
        }
        if entry.page_count != entry.range.page_count() {
            violations.push(Violation::PageCountMismatch {
                id: entry.label.to_string(),
                declared: entry.page_count,
                computed: entry.range.page_count(),
            });
        }
    }

    let mut valid: Vec<&Entry> = entries
        .iter()
        .filter(|e| e.range.is_well_formed() && e.range.end <= manifest.source_pages)
        .collect();

    for (i, a) in valid.iter().enumerate() {
        for b in &valid[i + 1..] {
            if a.range.overlaps(&b.range) {
                violations.push(Violation::Overlap {
                    first: a.label.to_string(),
                    second: b.label.to_string(),
                    first_range: a.range,
                    second_range: b.range,
                });
            }
        }
    }

    valid.sort_by_key(|e| e.range.start);
    if let Some(first) = valid.first() {
        let mut reach = first.range.end;
        let mut last_label = first.label;
        for entry in &valid[1..] {
            if entry.range.start > reach.saturating_add(1) {
                violations.push(Violation::Gap {
                    after: last_label.to_string(),
                    before: entry.label.to_string(),
                    missing: PageRange::new(reach + 1, entry.range.start - 1),
                });
            }
            if entry.range.end >= reach {
                reach = entry.range.end;
                last_label = entry.label;
            }
        }
    }

    let mut counts: HashMap<&str, usize> = HashMap::new();
    for tfl in &manifest.tlfs {
        *counts.entry(tfl.id.as_str()).or_default() += 1;
    }
    let mut reported = Vec::new();
    for tfl in &manifest.tlfs {
        let occurrences = counts[tfl.id.as_str()];
        if occurrences > 1 && !reported.contains(&tfl.id.as_str()) {
            reported.push(tfl.id.as_str());
            violations.push(Violation::DuplicateId {
                id: tfl.id.clone(),
                occurrences,
            });
        }
    }

    violations
}
