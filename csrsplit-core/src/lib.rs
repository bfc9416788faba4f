//! Boundary detection and TFL classification for Clinical Study Reports
//!
//! A CSR following the ICH E3 layout is a narrative body (sections 1-13)
//! followed by section 14 Tables, Listings and Figures (TFLs). This crate
//! takes the per-page text of such a document and decides where the narrative
//! ends and where every TFL starts and stops, then resolves each TFL's
//! metadata and assembles the extraction manifest.
//!
//! # Architecture
//!
//! - **patterns**: stateless regex matchers compiled from TOML
//! - **detector**: the page-by-page state machine
//! - **resolver**: title, population and program lookup per TFL
//! - **manifest**: manifest assembly and consistency pass
//! - **validate**: read-only checks over a finished manifest
//!
//! Nothing here touches the filesystem beyond loading pattern files; PDF
//! parsing and rendering live in `csrsplit-engine`.
//!
//! # Example
//!
//! ```rust
//! use csrsplit_core::{BoundaryDetector, DetectorConfig, MetadataResolver, Page, PatternCatalog};
//!
//! let catalog = PatternCatalog::ich_e3();
//! let pages = vec![
//!     Page::new(1, "1. TITLE PAGE"),
//!     Page::new(2, "Table 14-1.01\nSummary of Populations\n\nPopulation: All Randomized"),
//!     Page::new(3, "Table 14-1.01 (continued)"),
//! ];
//!
//! let detection = BoundaryDetector::new(&catalog, DetectorConfig::default()).detect(&pages);
//! let resolution = MetadataResolver::new(&catalog).resolve(&detection, &pages);
//!
//! assert_eq!(detection.segments.len(), 2);
//! assert_eq!(resolution.records[0].id, "Table 14-1.01");
//! assert_eq!(resolution.records[0].page_count(), 2);
//! ```

pub mod detector;
pub mod diagnostics;
pub mod error;
pub mod manifest;
pub mod naming;
pub mod patterns;
pub mod resolver;
pub mod types;
pub mod validate;

pub use detector::{BoundaryDetector, Detection, DetectorConfig, DetectorState, PageSignals};
pub use diagnostics::{Diagnostic, DiagnosticKind, MetadataField, Scope};
pub use error::{PatternError, Result};
pub use manifest::{Manifest, ManifestBuilder, NarrativeEntry, OutputFile, TflEntry};
pub use naming::FileNamer;
pub use patterns::{HeadingMatch, Pagination, PatternCatalog, PatternConfig};
pub use resolver::{MetadataResolver, Resolution};
pub use types::{Page, PageRange, Segment, SegmentKind, TflKind, TflRecord};
pub use validate::{check_manifest, Check, CheckResult, ValidationReport, Violation};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pipeline_end_to_end() {
        let catalog = PatternCatalog::default();
        let pages = vec![
            Page::new(1, "Synopsis"),
            Page::new(2, "Table 14-1.01\nDemographics\n\nPopulation: Safety\nPage 1 of 1"),
            Page::new(3, "Figure 14-2\nSurvival\n\nPopulation: ITT"),
        ];
        let detection = BoundaryDetector::new(&catalog, DetectorConfig::default()).detect(&pages);
        let resolution = MetadataResolver::new(&catalog).resolve(&detection, &pages);
        let (manifest, diagnostics) = ManifestBuilder::new("csr.pdf", 3)
            .build(&detection, &resolution.records);

        assert!(diagnostics.is_empty());
        assert!(check_manifest(&manifest).is_empty());
        assert_eq!(manifest.count_of(TflKind::Table), 1);
        assert_eq!(manifest.count_of(TflKind::Figure), 1);
        assert_eq!(manifest.tfl_pages(), 2);
    }
}
