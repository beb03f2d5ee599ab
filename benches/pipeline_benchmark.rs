//! Benchmarks for the outline pipeline.
//!
//! Run with: cargo bench
//!
//! Documents are synthetic page dumps, so no extraction backend is needed.

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use docoutline::backend::{DumpPage, PageDump};
use docoutline::model::{BBox, LayoutRegion, RawBlock, RawLine, RegionKind, TextSpan};
use docoutline::{
    detect_language, DumpSource, NoLayoutEngine, OutlineBuilder, OutlineOptions,
    RecordedLayoutEngine,
};

fn line(text: &str, size: f32, font: &str, y: f32) -> RawBlock {
    RawBlock::from_lines(vec![RawLine::from_spans(vec![TextSpan::new(
        text,
        BBox::new(72.0, y, 540.0, y + size),
        size,
        font,
    )])])
}

/// Creates a synthetic dump with a heading and ten body lines per page.
fn create_test_dump(page_count: u32, with_layout: bool) -> DumpSource {
    let pages = (1..=page_count)
        .map(|n| {
            let heading = format!("{}. Section {}", n, n);
            let mut blocks = vec![line(&heading, 16.0, "Helvetica-Bold", 60.0)];
            let mut regions = vec![LayoutRegion::new(
                RegionKind::Title,
                BBox::new(72.0, 60.0, 540.0, 76.0),
                heading.as_str(),
            )];
            for i in 0..10 {
                let y = 100.0 + i as f32 * 14.0;
                let text = format!("Body line {} of page {} with ordinary running text.", i, n);
                blocks.push(line(&text, 10.0, "Helvetica", y));
                regions.push(LayoutRegion::new(
                    RegionKind::Text,
                    BBox::new(72.0, y, 540.0, y + 10.0),
                    text,
                ));
            }
            DumpPage {
                number: n,
                width: 612.0,
                height: 792.0,
                blocks,
                layout: with_layout.then_some(regions),
                ..Default::default()
            }
        })
        .collect();

    DumpSource::from_dump(
        "bench",
        PageDump {
            pages,
            ..Default::default()
        },
    )
    .unwrap()
}

/// Benchmark language detection on short and sampled inputs.
fn bench_language_detection(c: &mut Criterion) {
    let english = "The quarterly report summarizes revenue, costs and outlook. ".repeat(10);
    let chinese = "机器学习的基本概念与方法";

    c.bench_function("detect_sampled_latin", |b| {
        b.iter(|| detect_language(black_box(&english)));
    });

    c.bench_function("detect_script_cjk", |b| {
        b.iter(|| detect_language(black_box(chinese)));
    });
}

/// Benchmark outline builds at various sizes.
fn bench_outline_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("outline_build");

    for page_count in [1, 10, 50].iter() {
        let raw = create_test_dump(*page_count, false);
        let builder = OutlineBuilder::new(Arc::new(NoLayoutEngine))
            .with_options(OutlineOptions::new().with_language("en"));
        group.bench_function(format!("raw_lines_{}_pages", page_count), |b| {
            b.iter(|| builder.build(black_box(&raw)));
        });

        let recorded = create_test_dump(*page_count, true);
        let engine = RecordedLayoutEngine::new().with_source(&recorded);
        let builder = OutlineBuilder::new(Arc::new(engine))
            .with_options(OutlineOptions::new().with_language("en"));
        group.bench_function(format!("layout_{}_pages", page_count), |b| {
            b.iter(|| builder.build(black_box(&recorded)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_language_detection, bench_outline_build);
criterion_main!(benches);
