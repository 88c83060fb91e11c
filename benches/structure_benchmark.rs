//! Benchmarks for medstruct structuring performance.
//!
//! Run with: cargo bench
//!
//! These benchmarks use synthetic labeled reports.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use medstruct::{
    LabeledToken, NoteBlock, NotePlace, ProcessingContext, ProcessingOptions, ReportInput,
};

/// Creates a synthetic report with the given number of sections.
fn create_test_report(section_count: usize) -> ReportInput {
    let mut tokens = Vec::new();
    let mut push = |text: &str, label: &str| {
        let index = tokens.len();
        tokens.push(LabeledToken::new(text, label, index));
    };

    push("Compte rendu de consultation", "<title>");
    for i in 0..section_count {
        push(&format!("{}. Section {}", i + 1, i + 1), "<section>");
        for word in "Le patient présente une fièvre depuis trois jours. Voir la".split(' ') {
            push(word, "<paragraph>");
            push(" ", "<paragraph>");
        }
        push("figure 1", "<figure_marker>");
        push(". Le Dr. Martin propose un traitement. Suivi dans un mois.", "<paragraph>");
        push("- paracétamol", "<item>");
    }

    let notes = (0..section_count)
        .map(|page| {
            NoteBlock::new(
                NotePlace::Headnote,
                vec![
                    LabeledToken::new((page + 1).to_string(), "<header>", 0),
                    LabeledToken::new(" CHU de Lyon", "<header>", 1),
                ],
            )
        })
        .collect();

    ReportInput {
        tokens,
        notes,
        ..Default::default()
    }
}

/// Benchmark the whole pipeline at various sizes.
fn bench_structuring(c: &mut Criterion) {
    let mut group = c.benchmark_group("structuring");
    let context = ProcessingContext::new();

    for section_count in [1, 10, 50].iter() {
        let input = create_test_report(*section_count);
        let options = ProcessingOptions::new().with_sentences(true);

        group.bench_function(format!("{}_sections", section_count), |b| {
            b.iter(|| medstruct::process_document(black_box(&input), &context, &options).unwrap());
        });
    }

    group.finish();
}

/// Benchmark TEI rendering.
fn bench_tei_rendering(c: &mut Criterion) {
    let input = create_test_report(10);
    let doc = medstruct::process_document(
        &input,
        &ProcessingContext::new(),
        &ProcessingOptions::new().with_sentences(true),
    )
    .unwrap();
    let options = medstruct::RenderOptions::default();

    c.bench_function("tei_10_sections", |b| {
        b.iter(|| medstruct::render::to_tei(black_box(&doc), &options).unwrap());
    });
}

/// Benchmark batch processing.
fn bench_batch(c: &mut Criterion) {
    let inputs: Vec<ReportInput> = (0..16).map(|_| create_test_report(5)).collect();
    let context = ProcessingContext::new();
    let options = ProcessingOptions::new().with_sentences(true);

    c.bench_function("batch_16_reports", |b| {
        b.iter(|| medstruct::process_batch(black_box(&inputs), &context, &options));
    });
}

criterion_group!(benches, bench_structuring, bench_tei_rendering, bench_batch);
criterion_main!(benches);
