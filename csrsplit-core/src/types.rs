//! Core value types shared by the detection pipeline

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::patterns::HeadingMatch;

/// Plain text of one source page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    /// 1-indexed page number in the source document
    pub number: u32,
    /// Extracted text, possibly empty
    pub text: String,
}

impl Page {
    /// Create a page from its number and text
    pub fn new(number: u32, text: impl Into<String>) -> Self {
        Self {
            number,
            text: text.into(),
        }
    }
}

/// Inclusive, 1-indexed page span
///
/// Serialized as a two-element array `[start, end]`. Deserialization accepts
/// any pair so that malformed manifests can still be loaded and validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "[u32; 2]", into = "[u32; 2]")]
pub struct PageRange {
    /// First page of the span
    pub start: u32,
    /// Last page of the span
    pub end: u32,
}

impl PageRange {
    /// Create a page range
    pub const fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// A range covering a single page
    pub const fn single(page: u32) -> Self {
        Self::new(page, page)
    }

    /// Number of pages in the span, zero when malformed
    pub fn page_count(&self) -> u32 {
        if self.end < self.start {
            0
        } else {
            self.end - self.start + 1
        }
    }

    /// `start <= end` and the span starts at page 1 or later
    pub fn is_well_formed(&self) -> bool {
        self.start >= 1 && self.start <= self.end
    }

    /// Whether `page` lies inside the span
    pub fn contains(&self, page: u32) -> bool {
        self.start <= page && page <= self.end
    }

    /// Whether two spans share at least one page
    pub fn overlaps(&self, other: &PageRange) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    /// Iterate over the page numbers of the span
    pub fn pages(&self) -> impl Iterator<Item = u32> {
        self.start..=self.end
    }
}

impl From<[u32; 2]> for PageRange {
    fn from([start, end]: [u32; 2]) -> Self {
        Self { start, end }
    }
}

impl From<PageRange> for [u32; 2] {
    fn from(range: PageRange) -> Self {
        [range.start, range.end]
    }
}

impl fmt::Display for PageRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// Kind of a Table/Listing/Figure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TflKind {
    /// Summary table
    Table,
    /// Data listing
    Listing,
    /// Graphical figure
    Figure,
}

impl TflKind {
    /// All kinds in canonical order
    pub const ALL: [TflKind; 3] = [TflKind::Table, TflKind::Listing, TflKind::Figure];

    /// Lowercase name used in manifests
    pub fn as_str(&self) -> &'static str {
        match self {
            TflKind::Table => "table",
            TflKind::Listing => "listing",
            TflKind::Figure => "figure",
        }
    }

    /// Capitalized keyword used in canonical identifiers
    pub fn keyword(&self) -> &'static str {
        match self {
            TflKind::Table => "Table",
            TflKind::Listing => "Listing",
            TflKind::Figure => "Figure",
        }
    }
}

impl fmt::Display for TflKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classification of a detected segment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind {
    /// Narrative body preceding the first TFL
    Narrative,
    /// A single Table, Listing or Figure
    Tfl(TflKind),
    /// Sections 15/16 and everything after them
    BackMatter,
}

/// Contiguous page range recognized as one logical unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    /// What the pages contain
    pub kind: SegmentKind,
    /// Source pages covered
    pub range: PageRange,
    /// Heading that opened the segment (TFL segments only)
    pub heading: Option<HeadingMatch>,
    /// `Y` of a "Page X of Y" footer on the first page
    pub printed_total: Option<u32>,
}

impl Segment {
    /// Create a narrative segment
    pub fn narrative(range: PageRange) -> Self {
        Self {
            kind: SegmentKind::Narrative,
            range,
            heading: None,
            printed_total: None,
        }
    }

    /// Create a back-matter segment
    pub fn back_matter(range: PageRange) -> Self {
        Self {
            kind: SegmentKind::BackMatter,
            range,
            heading: None,
            printed_total: None,
        }
    }

    /// Create a TFL segment from the heading that opened it
    pub fn tfl(heading: HeadingMatch, range: PageRange, printed_total: Option<u32>) -> Self {
        Self {
            kind: SegmentKind::Tfl(heading.kind),
            range,
            heading: Some(heading),
            printed_total,
        }
    }

    /// Verbatim heading text used for detection
    pub fn raw_heading_text(&self) -> Option<&str> {
        self.heading.as_ref().map(|h| h.raw_text.as_str())
    }

    /// Whether this is a TFL segment
    pub fn is_tfl(&self) -> bool {
        matches!(self.kind, SegmentKind::Tfl(_))
    }
}

/// Fully resolved TFL derived from a TFL segment
///
/// Records are built complete by the resolver and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TflRecord {
    /// Canonical identifier, e.g. `Table 14-1.01`
    pub id: String,
    /// Table, listing or figure
    pub kind: TflKind,
    /// Caption text, empty when undetectable
    pub title: String,
    /// Population descriptor, empty when undetectable
    pub population: String,
    /// Program path printed in the footer
    pub source_program: Option<String>,
    /// Pages in the source document
    pub pages: PageRange,
    /// Heading text as matched on the first page
    pub raw_heading: String,
    /// Printed page total from the first page footer
    pub printed_total: Option<u32>,
}

impl TflRecord {
    /// Number of source pages, always `end - start + 1`
    pub fn page_count(&self) -> u32 {
        self.pages.page_count()
    }
}
