//! End-to-end extraction
//!
//! PageTextSource -> BoundaryDetector -> MetadataResolver -> ManifestBuilder
//! -> OutputWriter. Input errors abort before detection; everything after
//! that is best effort with diagnostics collected alongside.

use crate::config::ExtractorConfig;
use crate::error::{EngineError, Result};
use crate::manifest_io::{self, extraction_timestamp};
use crate::source::{PageTextSource, SourceDocument};
use crate::writer::{OutputWriter, WriteSummary};
use csrsplit_core::{
    BoundaryDetector, Detection, Diagnostic, DiagnosticKind, Manifest, ManifestBuilder,
    MetadataResolver, OutputFile, Page, PageRange, PatternCatalog, TflRecord,
};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Detection and resolution results for one document, before any output
#[derive(Debug, Clone)]
pub struct Analysis {
    /// Per-page text
    pub pages: Vec<Page>,
    /// Segments and detection warnings
    pub detection: Detection,
    /// Resolved TFL records
    pub records: Vec<TflRecord>,
    /// Assembled manifest
    pub manifest: Manifest,
    /// Every warning from extraction, detection, resolution and assembly
    pub diagnostics: Vec<Diagnostic>,
}

/// What a run did
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// The manifest (written unless dry run)
    pub manifest: Manifest,
    /// All warnings, run-level first
    pub diagnostics: Vec<Diagnostic>,
    /// Pages from the first section 15/16 heading onward
    pub back_matter: Option<PageRange>,
    /// Files written, None on dry runs
    pub written: Option<WriteSummary>,
    /// Output directory
    pub output_dir: PathBuf,
    /// Whether this was a dry run
    pub dry_run: bool,
    /// Wall-clock time in milliseconds
    pub elapsed_ms: u128,
}

impl RunReport {
    /// Whether no TFL was found
    pub fn no_tfls(&self) -> bool {
        self.manifest.tlfs.is_empty()
    }
}

/// Receives rendering progress
///
/// Both methods may be called from worker threads.
pub trait RunObserver: Sync {
    /// Segment boundaries are fixed and `count` files are about to be written
    fn files_planned(&self, _count: usize) {}

    /// One output file finished
    fn file_written(&self, _file: &OutputFile) {}
}

/// Observer that ignores everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl RunObserver for NoProgress {}

/// Runs the extraction pipeline with a compiled pattern catalog
#[derive(Debug)]
pub struct Extractor {
    config: ExtractorConfig,
    catalog: PatternCatalog,
}

impl Extractor {
    /// Compile the configured patterns
    pub fn new(config: ExtractorConfig) -> Result<Self> {
        let catalog = PatternCatalog::new(&config.patterns)?;
        Ok(Self { config, catalog })
    }

    /// Configuration in use
    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Detect, resolve and assemble the manifest for a text source
    pub fn analyze(&self, source: &dyn PageTextSource) -> Result<Analysis> {
        let extracted = source.extract_pages()?;
        if extracted.pages.is_empty() || extracted.is_blank() {
            return Err(EngineError::NoExtractablePages(PathBuf::from(source.name())));
        }

        let mut diagnostics: Vec<Diagnostic> = extracted
            .unreadable
            .iter()
            .map(|&page| Diagnostic::run(DiagnosticKind::UnreadablePage { page }))
            .collect();

        Ok(self.analyze_pages(source.name(), extracted.pages, &mut diagnostics))
    }

    fn analyze_pages(
        &self,
        name: &str,
        pages: Vec<Page>,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Analysis {
        let detection =
            BoundaryDetector::new(&self.catalog, self.config.detector.clone()).detect(&pages);
        let resolution = MetadataResolver::new(&self.catalog)
            .with_window(self.config.metadata_window)
            .resolve(&detection, &pages);
        let (manifest, assembly) = ManifestBuilder::new(name, detection.total_pages)
            .extraction_date(extraction_timestamp())
            .build(&detection, &resolution.records);

        log::info!(
            "{name}: {} segments, {} TFLs",
            detection.segments.len(),
            resolution.records.len()
        );

        diagnostics.extend(detection.diagnostics.iter().cloned());
        diagnostics.extend(resolution.diagnostics);
        diagnostics.extend(assembly);
        diagnostics.sort_by_key(|d| match &d.scope {
            csrsplit_core::Scope::Run => 0,
            csrsplit_core::Scope::Record { start_page, .. } => *start_page,
        });

        Analysis {
            pages,
            detection,
            records: resolution.records,
            manifest,
            diagnostics: std::mem::take(diagnostics),
        }
    }

    /// Full run: open, detect, and (unless dry run) render and persist
    pub fn run(
        &self,
        input: &Path,
        output_dir: &Path,
        observer: &dyn RunObserver,
    ) -> Result<RunReport> {
        let started = Instant::now();
        let document = SourceDocument::open(input)?;
        let renderer = document.renderer();
        if !self.config.dry_run && renderer.is_none() {
            return Err(EngineError::NotRenderable(
                document.text_source().name().to_string(),
            ));
        }

        let analysis = self.analyze(document.text_source())?;
        for diagnostic in &analysis.diagnostics {
            log::debug!("{diagnostic}");
        }

        let written = match renderer {
            Some(renderer) if !self.config.dry_run => {
                let writer = OutputWriter::new(output_dir)
                    .threads(self.config.effective_threads())
                    .write_text(self.config.write_text);
                let files = analysis.manifest.output_files();
                observer.files_planned(files.len());
                let summary =
                    writer.write_all(&files, &analysis.pages, renderer, &|file: &OutputFile| {
                        observer.file_written(file)
                    })?;
                manifest_io::write_json(&analysis.manifest, output_dir, self.config.pretty_json)?;
                if self.config.write_csv {
                    manifest_io::write_csv(&analysis.manifest, output_dir)?;
                }
                Some(summary)
            }
            _ => None,
        };

        Ok(RunReport {
            back_matter: analysis.detection.back_matter().map(|s| s.range),
            manifest: analysis.manifest,
            diagnostics: analysis.diagnostics,
            written,
            output_dir: output_dir.to_path_buf(),
            dry_run: self.config.dry_run,
            elapsed_ms: started.elapsed().as_millis(),
        })
    }
}
