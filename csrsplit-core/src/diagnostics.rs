//! Warnings accumulated alongside each pipeline stage
//!
//! Detection and resolution never fail on incomplete input. Anything worth
//! reporting becomes a [`Diagnostic`] that travels next to the result, scoped
//! either to the whole run or to one record.

use serde::Serialize;
use std::fmt;

/// Metadata field of a TFL record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MetadataField {
    /// Caption text
    Title,
    /// Population descriptor
    Population,
    /// Footer program path
    SourceProgram,
}

impl MetadataField {
    /// Field name as it appears in the manifest
    pub fn as_str(&self) -> &'static str {
        match self {
            MetadataField::Title => "title",
            MetadataField::Population => "population",
            MetadataField::SourceProgram => "source_program",
        }
    }
}

impl fmt::Display for MetadataField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a diagnostic is about
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// No TFL heading was found anywhere in the document
    NoTflsDetected,
    /// A TFL spans more pages than is plausible
    OversizedSegment {
        /// Pages in the segment
        pages: u32,
        /// Configured limit
        limit: u32,
    },
    /// A continuation page restarts footer pagination without a heading
    PaginationRestart {
        /// Page carrying "Page 1 of N"
        page: u32,
    },
    /// Text could not be extracted from a page
    UnreadablePage {
        /// Affected page
        page: u32,
    },
    /// A metadata field was not found in the caption window
    MissingMetadata {
        /// Field left empty
        field: MetadataField,
    },
    /// A metadata field only appears after the caption window
    MetadataBeyondWindow {
        /// Field left empty
        field: MetadataField,
        /// Page where it appears
        page: u32,
    },
    /// Another record already uses this identifier
    DuplicateId {
        /// First page of the earlier record
        first_start_page: u32,
    },
    /// Footer pagination disagrees with the detected span
    PageCountMismatch {
        /// Total printed in "Page X of Y"
        printed: u32,
        /// Pages in the detected span
        computed: u32,
    },
    /// Segments do not cover the whole document
    CoverageMismatch {
        /// Pages covered by segments
        covered: u32,
        /// Pages in the source
        total: u32,
    },
}

/// Where a diagnostic applies
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "scope", rename_all = "snake_case")]
pub enum Scope {
    /// The whole run
    Run,
    /// A single TFL record
    Record {
        /// Record identifier
        id: String,
        /// First source page of the record
        start_page: u32,
    },
}

/// One warning produced by detection, resolution or manifest assembly
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// Run- or record-level scope
    #[serde(flatten)]
    pub scope: Scope,
    /// What happened
    #[serde(flatten)]
    pub kind: DiagnosticKind,
}

impl Diagnostic {
    /// Run-level diagnostic
    pub fn run(kind: DiagnosticKind) -> Self {
        Self {
            scope: Scope::Run,
            kind,
        }
    }

    /// Record-level diagnostic
    pub fn record(id: impl Into<String>, start_page: u32, kind: DiagnosticKind) -> Self {
        Self {
            scope: Scope::Record {
                id: id.into(),
                start_page,
            },
            kind,
        }
    }

    /// Whether the diagnostic belongs to the record starting at `start_page`
    pub fn applies_to(&self, id: &str, start_page: u32) -> bool {
        matches!(&self.scope, Scope::Record { id: rid, start_page: sp } if rid == id && *sp == start_page)
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticKind::NoTflsDetected => {
                write!(f, "no TFLs detected; whole document treated as narrative")
            }
            DiagnosticKind::OversizedSegment { pages, limit } => {
                write!(f, "segment spans {pages} pages (limit {limit})")
            }
            DiagnosticKind::PaginationRestart { page } => write!(
                f,
                "page {page} restarts footer pagination without a new heading"
            ),
            DiagnosticKind::UnreadablePage { page } => {
                write!(f, "text extraction failed on page {page}")
            }
            DiagnosticKind::MissingMetadata { field } => write!(f, "{field} not found"),
            DiagnosticKind::MetadataBeyondWindow { field, page } => write!(
                f,
                "{field} only found on page {page}, outside the caption window; left empty"
            ),
            DiagnosticKind::DuplicateId { first_start_page } => write!(
                f,
                "identifier already used by the record starting on page {first_start_page}"
            ),
            DiagnosticKind::PageCountMismatch { printed, computed } => write!(
                f,
                "footer says {printed} pages but {computed} were detected"
            ),
            DiagnosticKind::CoverageMismatch { covered, total } => {
                write!(f, "segments cover {covered} of {total} pages")
            }
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.scope {
            Scope::Run => write!(f, "{}", self.kind),
            Scope::Record { id, start_page } => {
                write!(f, "{id} (page {start_page}): {}", self.kind)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_display_includes_id() {
        let diagnostic = Diagnostic::record(
            "Figure 14-2",
            10,
            DiagnosticKind::MissingMetadata {
                field: MetadataField::Title,
            },
        );
        assert_eq!(diagnostic.to_string(), "Figure 14-2 (page 10): title not found");
    }

    #[test]
    fn test_applies_to_matches_id_and_page() {
        let diagnostic = Diagnostic::record(
            "Table 14-3.01",
            12,
            DiagnosticKind::DuplicateId {
                first_start_page: 8,
            },
        );
        assert!(diagnostic.applies_to("Table 14-3.01", 12));
        assert!(!diagnostic.applies_to("Table 14-3.01", 8));
        assert!(!Diagnostic::run(DiagnosticKind::NoTflsDetected).applies_to("Table 14-3.01", 12));
    }

    #[test]
    fn test_serializes_flat() {
        let diagnostic = Diagnostic::run(DiagnosticKind::UnreadablePage { page: 3 });
        let json = serde_json::to_value(&diagnostic).unwrap();
        assert_eq!(json["scope"], "run");
        assert_eq!(json["kind"], "unreadable_page");
        assert_eq!(json["page"], 3);
    }
}
