//! Property tests for the boundary detector

use csrsplit_core::{
    BoundaryDetector, DetectorConfig, MetadataResolver, Page, PatternCatalog, SegmentKind,
};
use proptest::prelude::*;
use std::collections::HashSet;

const IDS: [&str; 4] = ["Table 14-1.01", "Table 14-1.02", "Listing 14-2.01", "Figure 14-3"];

/// What a generated page carries at the top
#[derive(Debug, Clone)]
enum PageShape {
    Prose,
    Heading(usize),
    Footer(u32, u32),
}

fn page_shape() -> impl Strategy<Value = PageShape> {
    prop_oneof![
        3 => Just(PageShape::Prose),
        2 => (0..IDS.len()).prop_map(PageShape::Heading),
        1 => (1u32..4, 1u32..4).prop_map(|(p, t)| PageShape::Footer(p, t)),
    ]
}

fn render(shapes: &[PageShape]) -> Vec<Page> {
    shapes
        .iter()
        .enumerate()
        .map(|(i, shape)| {
            let text = match shape {
                PageShape::Prose => "The study enrolled subjects as shown in Table 14-1.01.".to_string(),
                PageShape::Heading(id) => format!("{}\nCaption text\n\nrows", IDS[*id]),
                PageShape::Footer(p, t) => format!("rows\nPage {p} of {t}"),
            };
            Page::new(i as u32 + 1, text)
        })
        .collect()
}

/// Heading changes seen while scanning, i.e. the expected TFL count
fn heading_changes(shapes: &[PageShape]) -> usize {
    let mut current = None;
    let mut changes = 0;
    for shape in shapes {
        if let PageShape::Heading(id) = shape {
            if current != Some(*id) {
                changes += 1;
                current = Some(*id);
            }
        }
    }
    changes
}

/// Whether every id's heading pages form one run, ignoring pages without headings
fn headings_grouped(shapes: &[PageShape]) -> bool {
    let mut closed = HashSet::new();
    let mut current = None;
    for shape in shapes {
        if let PageShape::Heading(id) = shape {
            if current != Some(*id) {
                if closed.contains(id) {
                    return false;
                }
                if let Some(previous) = current {
                    closed.insert(previous);
                }
                current = Some(*id);
            }
        }
    }
    true
}

proptest! {
    #[test]
    fn segments_cover_every_page_once(shapes in prop::collection::vec(page_shape(), 0..40)) {
        let catalog = PatternCatalog::ich_e3();
        let pages = render(&shapes);
        let detection = BoundaryDetector::new(&catalog, DetectorConfig::default()).detect(&pages);

        let mut next = 1;
        for segment in &detection.segments {
            prop_assert_eq!(segment.range.start, next);
            prop_assert!(segment.range.start <= segment.range.end);
            next = segment.range.end + 1;
        }
        prop_assert_eq!(next, pages.len() as u32 + 1);

        let narratives = detection
            .segments
            .iter()
            .filter(|s| s.kind == SegmentKind::Narrative)
            .count();
        prop_assert!(narratives <= 1);
        if narratives == 1 {
            prop_assert_eq!(detection.segments[0].kind, SegmentKind::Narrative);
        }
    }

    #[test]
    fn repeated_headings_never_split(shapes in prop::collection::vec(page_shape(), 1..40)) {
        let catalog = PatternCatalog::ich_e3();
        let pages = render(&shapes);
        let detection = BoundaryDetector::new(&catalog, DetectorConfig::default()).detect(&pages);

        prop_assert_eq!(detection.tfl_segments().count(), heading_changes(&shapes));

        if headings_grouped(&shapes) {
            let distinct: HashSet<usize> = shapes
                .iter()
                .filter_map(|s| match s {
                    PageShape::Heading(id) => Some(*id),
                    _ => None,
                })
                .collect();
            prop_assert!(detection.segments.len() <= distinct.len() + 1);
        }
    }

    #[test]
    fn records_match_segments(shapes in prop::collection::vec(page_shape(), 1..40)) {
        let catalog = PatternCatalog::ich_e3();
        let pages = render(&shapes);
        let detection = BoundaryDetector::new(&catalog, DetectorConfig::default()).detect(&pages);
        let resolution = MetadataResolver::new(&catalog).resolve(&detection, &pages);

        let spans: Vec<_> = detection.tfl_segments().map(|s| s.range).collect();
        let records: Vec<_> = resolution.records.iter().map(|r| r.pages).collect();
        prop_assert_eq!(spans, records);

        let mut previous = 0;
        for record in &resolution.records {
            prop_assert!(record.pages.start > previous);
            prop_assert_eq!(record.page_count(), record.pages.end - record.pages.start + 1);
            previous = record.pages.start;
        }
    }

    #[test]
    fn detection_is_repeatable(shapes in prop::collection::vec(page_shape(), 0..30)) {
        let catalog = PatternCatalog::ich_e3();
        let pages = render(&shapes);
        let detector = BoundaryDetector::new(&catalog, DetectorConfig::default());
        prop_assert_eq!(detector.detect(&pages), detector.detect(&pages));
    }
}
