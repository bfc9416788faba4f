//! End-to-end runs against small generated PDFs

use csrsplit_engine::{
    validate_output_dir, EngineError, Extractor, ExtractorConfig, NoProgress, OutputFile,
    PageRange, RunObserver, TflKind, MANIFEST_CSV, MANIFEST_JSON,
};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use tempfile::TempDir;

#[derive(Default)]
struct Counter {
    planned: AtomicUsize,
    written: AtomicUsize,
}

impl RunObserver for Counter {
    fn files_planned(&self, count: usize) {
        self.planned.store(count, Ordering::SeqCst);
    }

    fn file_written(&self, _file: &OutputFile) {
        self.written.fetch_add(1, Ordering::SeqCst);
    }
}

/// Write a PDF with one text line per entry on each page
fn write_pdf(dir: &Path, name: &str, pages: &[&[&str]]) -> PathBuf {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids: Vec<Object> = Vec::new();
    for lines in pages {
        let mut operations = Vec::new();
        for (i, line) in lines.iter().enumerate() {
            operations.push(Operation::new("BT", vec![]));
            operations.push(Operation::new("Tf", vec!["F1".into(), 10.into()]));
            operations.push(Operation::new(
                "Td",
                vec![50.into(), (780 - 14 * i as i64).into()],
            ));
            operations.push(Operation::new("Tj", vec![Object::string_literal(*line)]));
            operations.push(Operation::new("ET", vec![]));
        }
        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let path = dir.join(name);
    doc.save(&path).unwrap();
    path
}

fn sample_csr(dir: &Path) -> PathBuf {
    write_pdf(
        dir,
        "csr.pdf",
        &[
            &["1. TITLE PAGE"],
            &["2. SYNOPSIS", "Results are summarised below."],
            &[
                "Table 14-1.01",
                "Summary of Populations",
                "Population: All Randomized",
                "Page 1 of 2",
            ],
            &["Table 14-1.01 (continued)", "Page 2 of 2"],
            &[
                "Figure 14-2.01",
                "Kaplan-Meier Plot",
                "Population: ITT",
                "Page 1 of 1",
            ],
        ],
    )
}

#[test]
fn test_pdf_run_writes_valid_output() {
    let input_dir = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    let input = sample_csr(input_dir.path());

    let extractor = Extractor::new(ExtractorConfig::builder().threads(Some(2)).build()).unwrap();
    let counter = Counter::default();
    let report = extractor.run(&input, out.path(), &counter).unwrap();

    let manifest = &report.manifest;
    assert_eq!(manifest.source_file, "csr.pdf");
    assert_eq!(manifest.source_pages, 5);
    assert_eq!(
        manifest.narrative.as_ref().map(|n| n.pages_in_source),
        Some(PageRange::new(1, 2))
    );
    assert_eq!(manifest.tlfs.len(), 2);
    assert_eq!(manifest.tlfs[0].id, "Table 14-1.01");
    assert_eq!(manifest.tlfs[0].pages_in_source, PageRange::new(3, 4));
    assert_eq!(manifest.tlfs[0].population, "All Randomized");
    assert_eq!(manifest.tlfs[1].kind, TflKind::Figure);
    assert_eq!(manifest.tlfs[1].file, "pdf/Figure_14_2_01.pdf");
    assert_eq!(counter.planned.load(Ordering::SeqCst), 3);
    assert_eq!(counter.written.load(Ordering::SeqCst), 3);
    assert_eq!(report.written.map(|w| w.pdf_files), Some(3));

    assert!(out.path().join(MANIFEST_JSON).is_file());
    assert!(out.path().join(MANIFEST_CSV).is_file());
    assert!(out.path().join("text/Table_14_1_01.txt").is_file());

    let rendered = Document::load(out.path().join("pdf/Table_14_1_01.pdf")).unwrap();
    assert_eq!(rendered.get_pages().len(), 2);

    let validation = validate_output_dir(out.path()).unwrap();
    assert!(validation.passed(), "{:?}", validation.violations);
}

#[test]
fn test_dry_run_writes_nothing() {
    let input_dir = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    let input = sample_csr(input_dir.path());

    let extractor = Extractor::new(ExtractorConfig::builder().dry_run(true).build()).unwrap();
    let report = extractor.run(&input, out.path(), &NoProgress).unwrap();

    assert!(report.dry_run);
    assert!(report.written.is_none());
    assert_eq!(report.manifest.tlfs.len(), 2);
    assert_eq!(fs::read_dir(out.path()).unwrap().count(), 0);
}

#[test]
fn test_text_input_dry_run() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("csr.txt");
    fs::write(
        &input,
        "Synopsis\u{c}Listing 14-3.01\nAdverse Events\n\u{c}Listing 14-3.01\n\u{c}",
    )
    .unwrap();

    let extractor = Extractor::new(ExtractorConfig::builder().dry_run(true).build()).unwrap();
    let report = extractor.run(&input, dir.path(), &NoProgress).unwrap();
    assert_eq!(report.manifest.source_pages, 3);
    assert_eq!(report.manifest.tlfs[0].kind, TflKind::Listing);
    assert_eq!(report.manifest.tlfs[0].page_count, 2);
}

#[test]
fn test_text_input_cannot_render() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("csr.txt");
    fs::write(&input, "Table 14-1.01\n").unwrap();

    let extractor = Extractor::new(ExtractorConfig::default()).unwrap();
    let result = extractor.run(&input, dir.path(), &NoProgress);
    assert!(matches!(result, Err(EngineError::NotRenderable(_))));
}

#[test]
fn test_input_errors() {
    let dir = TempDir::new().unwrap();
    let extractor = Extractor::new(ExtractorConfig::default()).unwrap();

    let missing = extractor.run(&dir.path().join("absent.pdf"), dir.path(), &NoProgress);
    assert!(matches!(missing, Err(EngineError::InputNotFound(_))));

    let bogus = dir.path().join("bogus.pdf");
    fs::write(&bogus, "plain text").unwrap();
    let unsupported = extractor.run(&bogus, dir.path(), &NoProgress);
    assert!(matches!(unsupported, Err(EngineError::UnsupportedInput { .. })));
}

#[test]
fn test_no_tfls_still_writes_narrative() {
    let input_dir = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    let input = write_pdf(
        input_dir.path(),
        "narrative.pdf",
        &[&["1. TITLE PAGE"], &["2. SYNOPSIS"]],
    );

    let extractor = Extractor::new(ExtractorConfig::default()).unwrap();
    let report = extractor.run(&input, out.path(), &NoProgress).unwrap();
    assert!(report.no_tfls());
    assert_eq!(
        report.manifest.narrative.as_ref().map(|n| n.page_count),
        Some(2)
    );
    assert!(validate_output_dir(out.path()).unwrap().passed());
}
