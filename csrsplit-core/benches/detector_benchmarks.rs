//! Performance benchmarks for boundary detection
//!
//! Run with: cargo bench --bench detector_benchmarks

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use csrsplit_core::{BoundaryDetector, DetectorConfig, MetadataResolver, Page, PatternCatalog};
use std::hint::black_box;

/// Generate a synthetic CSR: a narrative body followed by two-page tables
fn generate_document(tfls: u32) -> Vec<Page> {
    let narrative = "9.1 Overall Study Design\nThis was a randomized, double-blind study. \
                     Results are summarized in Table 14-1.01 and Figure 14-2.\n"
        .repeat(20);
    let mut pages: Vec<Page> = (1..=40).map(|n| Page::new(n, narrative.clone())).collect();

    for t in 1..=tfls {
        let heading = format!("Table 14-{}.{:02}", t / 20 + 1, t % 20 + 1);
        let number = pages.len() as u32 + 1;
        pages.push(Page::new(
            number,
            format!(
                "{heading}\nSummary of Adverse Events by System Organ Class\n\n\
                 Population: Safety Set\n{}\nProgram: /study/pgm/t_ae_{t}.sas\nPage 1 of 2",
                "  row   12 (34.5%)   10 (28.6%)\n".repeat(30)
            ),
        ));
        pages.push(Page::new(
            number + 1,
            format!(
                "{heading} (continued)\n{}\nPage 2 of 2",
                "  row   12 (34.5%)   10 (28.6%)\n".repeat(30)
            ),
        ));
    }
    pages
}

/// Benchmark detection across document sizes
fn bench_detection(c: &mut Criterion) {
    let mut group = c.benchmark_group("detect");
    let catalog = PatternCatalog::ich_e3();
    let detector = BoundaryDetector::new(&catalog, DetectorConfig::default());

    for tfls in [10, 100, 500] {
        let pages = generate_document(tfls);
        group.throughput(Throughput::Elements(pages.len() as u64));
        group.bench_with_input(BenchmarkId::new("pages", pages.len()), &pages, |b, pages| {
            b.iter(|| detector.detect(black_box(pages)));
        });
    }

    group.finish();
}

/// Benchmark detection plus metadata resolution
fn bench_resolution(c: &mut Criterion) {
    let catalog = PatternCatalog::ich_e3();
    let detector = BoundaryDetector::new(&catalog, DetectorConfig::default());
    let resolver = MetadataResolver::new(&catalog);
    let pages = generate_document(200);

    c.bench_function("detect_and_resolve_200", |b| {
        b.iter(|| {
            let detection = detector.detect(black_box(&pages));
            resolver.resolve(&detection, &pages)
        });
    });
}

criterion_group!(benches, bench_detection, bench_resolution);
criterion_main!(benches);
