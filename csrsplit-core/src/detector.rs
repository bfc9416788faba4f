//! Page-by-page boundary detection
//!
//! The detector is a small explicit state machine. Each page is first reduced
//! to [`PageSignals`] by the pattern catalog, then [`transition`] decides
//! whether the page continues the open segment or starts a new one. The
//! transition function is pure so every rule can be tested in isolation.

use crate::diagnostics::{Diagnostic, DiagnosticKind};
use crate::patterns::{HeadingMatch, Pagination, PatternCatalog};
use crate::types::{Page, PageRange, Segment};

/// Detector tuning
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectorConfig {
    /// TFLs longer than this are reported as implausible
    pub max_tfl_pages: u32,
    /// Close the TFL run at the first section 15/16 heading
    pub stop_at_back_matter: bool,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            max_tfl_pages: 100,
            stop_at_back_matter: true,
        }
    }
}

/// Everything the catalog recognized on one page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageSignals {
    /// First TFL heading in reading order
    pub heading: Option<HeadingMatch>,
    /// Footer pagination
    pub pagination: Option<Pagination>,
    /// Page opens section 15 or 16
    pub back_matter: bool,
}

impl PageSignals {
    /// Run the catalog matchers over a page
    pub fn observe(catalog: &PatternCatalog, text: &str) -> Self {
        Self {
            heading: catalog.match_tfl_heading(text),
            pagination: catalog.match_pagination(text),
            back_matter: catalog.match_back_matter(text),
        }
    }
}

/// A TFL whose end page is not known yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenTfl {
    /// Heading on the first page
    pub heading: HeadingMatch,
    /// Canonical identifier used for repeat suppression
    pub id: String,
    /// First page
    pub start_page: u32,
    /// Footer total on the first page
    pub printed_total: Option<u32>,
}

impl OpenTfl {
    fn open(heading: HeadingMatch, page: u32, pagination: Option<Pagination>) -> Self {
        Self {
            id: heading.canonical_id(),
            heading,
            start_page: page,
            printed_total: pagination.map(|p| p.total),
        }
    }

    fn close(self, end_page: u32) -> Segment {
        Segment::tfl(
            self.heading,
            PageRange::new(self.start_page, end_page),
            self.printed_total,
        )
    }
}

/// Detector state between pages
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetectorState {
    /// No heading seen yet
    InNarrative,
    /// Inside a TFL
    InTfl(OpenTfl),
    /// Back matter reached; the rest of the document is not split further
    Done {
        /// First back-matter page
        start_page: u32,
    },
}

/// Result of feeding one page to the state machine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    /// State after the page
    pub next: DetectorState,
    /// Segment closed by this page, if any
    pub emitted: Option<Segment>,
    /// Warning raised by this page, if any
    pub diagnostic: Option<Diagnostic>,
}

impl Step {
    fn stay(next: DetectorState) -> Self {
        Self {
            next,
            emitted: None,
            diagnostic: None,
        }
    }

    fn emit(next: DetectorState, segment: Option<Segment>) -> Self {
        Self {
            next,
            emitted: segment,
            diagnostic: None,
        }
    }
}

/// Transition for one page
pub fn transition(
    state: DetectorState,
    page: u32,
    signals: &PageSignals,
    config: &DetectorConfig,
) -> Step {
    match state {
        DetectorState::InNarrative => match &signals.heading {
            Some(heading) => {
                let narrative =
                    (page > 1).then(|| Segment::narrative(PageRange::new(1, page - 1)));
                let open = OpenTfl::open(heading.clone(), page, signals.pagination);
                log::debug!("page {page}: first heading {}", open.id);
                Step::emit(DetectorState::InTfl(open), narrative)
            }
            None => Step::stay(DetectorState::InNarrative),
        },
        DetectorState::InTfl(open) => {
            if config.stop_at_back_matter && signals.back_matter {
                log::debug!("page {page}: back matter closes {}", open.id);
                let closed = open.close(page - 1);
                return Step::emit(DetectorState::Done { start_page: page }, Some(closed));
            }

            match &signals.heading {
                Some(heading) if heading.canonical_id() != open.id => {
                    let next = OpenTfl::open(heading.clone(), page, signals.pagination);
                    log::debug!("page {page}: {} follows {}", next.id, open.id);
                    let closed = open.close(page - 1);
                    Step::emit(DetectorState::InTfl(next), Some(closed))
                }
                _ => {
                    log::trace!("page {page}: continues {}", open.id);
                    let diagnostic = match signals.pagination {
                        Some(Pagination { page: 1, .. }) if page > open.start_page => {
                            Some(Diagnostic::record(
                                open.id.clone(),
                                open.start_page,
                                DiagnosticKind::PaginationRestart { page },
                            ))
                        }
                        _ => None,
                    };
                    Step {
                        next: DetectorState::InTfl(open),
                        emitted: None,
                        diagnostic,
                    }
                }
            }
        }
        done @ DetectorState::Done { .. } => Step::stay(done),
    }
}

/// Close whatever is open at the end of input
pub fn finish(state: DetectorState, total_pages: u32) -> Option<Segment> {
    if total_pages == 0 {
        return None;
    }
    match state {
        DetectorState::InNarrative => Some(Segment::narrative(PageRange::new(1, total_pages))),
        DetectorState::InTfl(open) => Some(open.close(total_pages)),
        DetectorState::Done { start_page } => {
            Some(Segment::back_matter(PageRange::new(start_page, total_pages)))
        }
    }
}

/// Ordered segments plus detection warnings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Detection {
    /// Segments in page order, covering every page exactly once
    pub segments: Vec<Segment>,
    /// Signals per page, index `n - 1` for page `n`
    pub signals: Vec<PageSignals>,
    /// Pages scanned
    pub total_pages: u32,
    /// Detection-level warnings
    pub diagnostics: Vec<Diagnostic>,
}

impl Detection {
    /// TFL segments in page order
    pub fn tfl_segments(&self) -> impl Iterator<Item = &Segment> {
        self.segments.iter().filter(|s| s.is_tfl())
    }

    /// The narrative segment, if the document has narrative pages
    pub fn narrative(&self) -> Option<&Segment> {
        self.segments
            .first()
            .filter(|s| s.kind == crate::types::SegmentKind::Narrative)
    }

    /// The back-matter segment, if one was detected
    pub fn back_matter(&self) -> Option<&Segment> {
        self.segments
            .last()
            .filter(|s| s.kind == crate::types::SegmentKind::BackMatter)
    }

    /// Signals for a 1-indexed page
    pub fn signals_for(&self, page: u32) -> Option<&PageSignals> {
        page.checked_sub(1)
            .and_then(|i| self.signals.get(i as usize))
    }
}

/// Drives the state machine over a document
#[derive(Debug, Clone)]
pub struct BoundaryDetector<'a> {
    catalog: &'a PatternCatalog,
    config: DetectorConfig,
}

impl<'a> BoundaryDetector<'a> {
    /// Create a detector over a compiled catalog
    pub fn new(catalog: &'a PatternCatalog, config: DetectorConfig) -> Self {
        Self { catalog, config }
    }

    /// Segment a document
    ///
    /// Pages are numbered by position, so the output always covers
    /// `[1, pages.len()]`.
    pub fn detect(&self, pages: &[Page]) -> Detection {
        let total_pages = pages.len() as u32;
        let mut segments = Vec::new();
        let mut diagnostics = Vec::new();
        let mut signals = Vec::with_capacity(pages.len());
        let mut state = DetectorState::InNarrative;

        for (index, page) in pages.iter().enumerate() {
            let number = index as u32 + 1;
            if page.number != number {
                log::warn!(
                    "page at position {number} reports number {}; using position",
                    page.number
                );
            }

            let observed = PageSignals::observe(self.catalog, &page.text);
            let step = transition(state, number, &observed, &self.config);
            segments.extend(step.emitted);
            diagnostics.extend(step.diagnostic);
            signals.push(observed);
            state = step.next;
        }
        segments.extend(finish(state, total_pages));

        for segment in segments.iter().filter(|s| s.is_tfl()) {
            let pages = segment.range.page_count();
            if pages > self.config.max_tfl_pages {
                let id = segment
                    .heading
                    .as_ref()
                    .map(HeadingMatch::canonical_id)
                    .unwrap_or_default();
                diagnostics.push(Diagnostic::record(
                    id,
                    segment.range.start,
                    DiagnosticKind::OversizedSegment {
                        pages,
                        limit: self.config.max_tfl_pages,
                    },
                ));
            }
        }

        if !segments.iter().any(Segment::is_tfl) {
            log::warn!("no TFL headings found in {total_pages} pages");
            diagnostics.push(Diagnostic::run(DiagnosticKind::NoTflsDetected));
        }

        Detection {
            segments,
            signals,
            total_pages,
            diagnostics,
        }
    }
}
