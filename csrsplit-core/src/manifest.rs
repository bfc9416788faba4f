//! Manifest assembly
//!
//! The manifest is the durable contract consumed by downstream tools. Its
//! field names and nesting are fixed:
//!
//! ```json
//! {
//!   "source_file": "csr.pdf",
//!   "source_pages": 9,
//!   "extraction_date": "2024-05-01T12:00:00Z",
//!   "narrative": { "file": "pdf/narrative_body.pdf", "pages_in_source": [1, 5], "page_count": 5 },
//!   "tlfs": [
//!     { "id": "Table 14-1.01", "type": "table", "title": "...", "file": "pdf/Table_14_1_01.pdf",
//!       "pages_in_source": [6, 7], "page_count": 2, "population": "...", "source_program": "..." }
//!   ]
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::detector::Detection;
use crate::diagnostics::{Diagnostic, DiagnosticKind};
use crate::naming::{self, FileNamer, NARRATIVE_STEM};
use crate::types::{PageRange, TflKind, TflRecord};

/// Narrative body entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NarrativeEntry {
    pub file: String,
    pub pages_in_source: PageRange,
    pub page_count: u32,
}

/// One TFL entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TflEntry {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: TflKind,
    #[serde(default)]
    pub title: String,
    pub file: String,
    pub pages_in_source: PageRange,
    pub page_count: u32,
    #[serde(default)]
    pub population: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_program: Option<String>,
}

/// Extraction manifest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    pub source_file: String,
    pub source_pages: u32,
    pub extraction_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub narrative: Option<NarrativeEntry>,
    #[serde(default)]
    pub tlfs: Vec<TflEntry>,
}

/// A file to render: output path plus the source pages it holds
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputFile {
    /// Path of the rendered PDF, relative to the output directory
    pub pdf: String,
    /// Path of the raw text dump, relative to the output directory
    pub text: String,
    /// Source pages
    pub pages: PageRange,
}

impl OutputFile {
    fn for_entry(file: &str, pages: PageRange) -> Self {
        let stem = naming::stem_of(file);
        Self {
            pdf: file.to_string(),
            text: naming::text_path(stem),
            pages,
        }
    }
}

impl Manifest {
    /// Number of TFLs of a kind
    pub fn count_of(&self, kind: TflKind) -> usize {
        self.tlfs.iter().filter(|t| t.kind == kind).count()
    }

    /// Total pages across all TFL entries
    pub fn tfl_pages(&self) -> u32 {
        self.tlfs.iter().map(|t| t.pages_in_source.page_count()).sum()
    }

    /// Every file the manifest references, narrative first
    pub fn output_files(&self) -> Vec<OutputFile> {
        self.narrative
            .iter()
            .map(|n| OutputFile::for_entry(&n.file, n.pages_in_source))
            .chain(
                self.tlfs
                    .iter()
                    .map(|t| OutputFile::for_entry(&t.file, t.pages_in_source)),
            )
            .collect()
    }

    /// Same manifest with a blank extraction date, for comparisons
    pub fn without_date(&self) -> Self {
        Self {
            extraction_date: String::new(),
            ..self.clone()
        }
    }
}

/// Builds a [`Manifest`] from a detection and its resolved records
#[derive(Debug, Clone)]
pub struct ManifestBuilder {
    source_file: String,
    source_pages: u32,
    extraction_date: String,
}

impl ManifestBuilder {
    pub fn new(source_file: impl Into<String>, source_pages: u32) -> Self {
        Self {
            source_file: source_file.into(),
            source_pages,
            extraction_date: String::new(),
        }
    }

    /// Timestamp recorded in the manifest
    pub fn extraction_date(mut self, date: impl Into<String>) -> Self {
        self.extraction_date = date.into();
        self
    }

    /// Assemble the manifest and run the consistency pass
    ///
    /// `records` must be the resolution of `detection`'s TFL segments, in
    /// detection order.
    pub fn build(
        &self,
        detection: &Detection,
        records: &[TflRecord],
    ) -> (Manifest, Vec<Diagnostic>) {
        let mut diagnostics = Vec::new();
        let mut namer = FileNamer::new();

        let narrative = detection.narrative().map(|segment| NarrativeEntry {
            file: naming::pdf_path(NARRATIVE_STEM),
            pages_in_source: segment.range,
            page_count: segment.range.page_count(),
        });

        let tlfs: Vec<TflEntry> = records
            .iter()
            .map(|record| TflEntry {
                id: record.id.clone(),
                kind: record.kind,
                title: record.title.clone(),
                file: naming::pdf_path(&namer.stem_for(&record.id)),
                pages_in_source: record.pages,
                page_count: record.page_count(),
                population: record.population.clone(),
                source_program: record.source_program.clone(),
            })
            .collect();

        let covered: u32 = detection
            .segments
            .iter()
            .map(|s| s.range.page_count())
            .sum();
        if covered != self.source_pages {
            log::warn!(
                "segments cover {covered} pages, source has {}",
                self.source_pages
            );
            diagnostics.push(Diagnostic::run(DiagnosticKind::CoverageMismatch {
                covered,
                total: self.source_pages,
            }));
        }

        for record in records {
            if let Some(printed) = record.printed_total {
                let computed = record.page_count();
                if printed != computed {
                    diagnostics.push(Diagnostic::record(
                        record.id.clone(),
                        record.pages.start,
                        DiagnosticKind::PageCountMismatch { printed, computed },
                    ));
                }
            }
        }

        let manifest = Manifest {
            source_file: self.source_file.clone(),
            source_pages: self.source_pages,
            extraction_date: self.extraction_date.clone(),
            narrative,
            tlfs,
        };
        (manifest, diagnostics)
    }
}
