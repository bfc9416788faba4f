//! Metadata resolution for detected TFL segments
//!
//! Captions sit next to the heading, so only the first pages of each segment
//! (the caption window) are consulted. Fields that cannot be found stay empty
//! and produce a diagnostic; nothing is inferred.

use std::collections::HashMap;

use crate::detector::Detection;
use crate::diagnostics::{Diagnostic, DiagnosticKind, MetadataField};
use crate::patterns::PatternCatalog;
use crate::types::{Page, Segment, TflKind, TflRecord};

/// Default number of leading segment pages searched for captions
pub const DEFAULT_METADATA_WINDOW: u32 = 2;

/// Records derived from a detection plus resolution warnings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// One record per TFL segment, in detection order
    pub records: Vec<TflRecord>,
    /// Record-level warnings
    pub diagnostics: Vec<Diagnostic>,
}

/// Turns TFL segments into [`TflRecord`]s
#[derive(Debug, Clone)]
pub struct MetadataResolver<'a> {
    catalog: &'a PatternCatalog,
    window: u32,
}

impl<'a> MetadataResolver<'a> {
    pub fn new(catalog: &'a PatternCatalog) -> Self {
        Self {
            catalog,
            window: DEFAULT_METADATA_WINDOW,
        }
    }

    /// Set the caption window, at least one page
    pub fn with_window(mut self, pages: u32) -> Self {
        self.window = pages.max(1);
        self
    }

    /// Resolve every TFL segment of `detection` against the page texts
    pub fn resolve(&self, detection: &Detection, pages: &[Page]) -> Resolution {
        let segments: Vec<&Segment> = detection.tfl_segments().collect();
        let mut diagnostics = Vec::new();

        // ids first, so duplicate warnings are known before records are built
        let ids: Vec<String> = segments
            .iter()
            .map(|s| {
                s.heading
                    .as_ref()
                    .map(|h| h.canonical_id())
                    .unwrap_or_default()
            })
            .collect();
        let mut first_seen: HashMap<&str, u32> = HashMap::new();
        for (segment, id) in segments.iter().zip(&ids) {
            match first_seen.get(id.as_str()) {
                Some(&first_start_page) => {
                    log::warn!(
                        "duplicate id {id} at page {} (first at page {first_start_page})",
                        segment.range.start
                    );
                    diagnostics.push(Diagnostic::record(
                        id.clone(),
                        segment.range.start,
                        DiagnosticKind::DuplicateId { first_start_page },
                    ));
                }
                None => {
                    first_seen.insert(id.as_str(), segment.range.start);
                }
            }
        }

        let records = segments
            .iter()
            .zip(ids)
            .map(|(segment, id)| {
                self.resolve_segment(segment, id, detection, pages, &mut diagnostics)
            })
            .collect();

        Resolution {
            records,
            diagnostics,
        }
    }

    fn resolve_segment(
        &self,
        segment: &Segment,
        id: String,
        detection: &Detection,
        pages: &[Page],
        diagnostics: &mut Vec<Diagnostic>,
    ) -> TflRecord {
        let range = segment.range;
        let window_end = range
            .start
            .saturating_add(self.window - 1)
            .min(range.end);
        let text_of = |page: u32| page_text(pages, page);

        let title_on = |page: u32| -> Option<String> {
            let heading = detection.signals_for(page)?.heading.as_ref()?;
            if heading.canonical_id() != id {
                return None;
            }
            self.catalog.match_title(text_of(page), heading)
        };
        let population_on = |page: u32| self.catalog.match_population(text_of(page));
        let program_on = |page: u32| self.catalog.match_program_path(text_of(page));

        let in_window = range.start..=window_end;
        let beyond = window_end + 1..=range.end;

        let mut resolve_field = |field: MetadataField, find: &dyn Fn(u32) -> Option<String>| {
            if let Some(value) = in_window.clone().find_map(find) {
                return Some(value);
            }
            let kind = match beyond.clone().find(|&p| find(p).is_some()) {
                Some(page) => DiagnosticKind::MetadataBeyondWindow { field, page },
                None => DiagnosticKind::MissingMetadata { field },
            };
            log::debug!("{id} (page {}): {kind}", range.start);
            diagnostics.push(Diagnostic::record(id.clone(), range.start, kind));
            None
        };

        let title = resolve_field(MetadataField::Title, &title_on);
        let population = resolve_field(MetadataField::Population, &population_on);
        let source_program = resolve_field(MetadataField::SourceProgram, &program_on);

        TflRecord {
            kind: segment
                .heading
                .as_ref()
                .map(|h| h.kind)
                .unwrap_or(TflKind::Table),
            title: title.unwrap_or_default(),
            population: population.unwrap_or_default(),
            source_program,
            pages: range,
            raw_heading: segment.raw_heading_text().unwrap_or_default().to_string(),
            printed_total: segment.printed_total,
            id,
        }
    }
}

fn page_text(pages: &[Page], page: u32) -> &str {
    page.checked_sub(1)
        .and_then(|i| pages.get(i as usize))
        .map_or("", |p| p.text.as_str())
}
