//! Performance benchmarks for exintools
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use exintools::core::{
    classify, AlignedRecord, Annotation, GeneModels, GenomicInterval, Strand, WindowIter,
};
use std::convert::Infallible;

/// Synthetic gene models: two-exon genes every 10 kb along one sequence
fn build_models(gene_count: u64) -> GeneModels {
    let genes = (0..gene_count).map(|i| {
        let offset = i * 10_000;
        Ok::<_, Infallible>(Annotation::new(vec![
            GenomicInterval::new("chr1", offset + 1_000, offset + 2_000, Strand::Plus),
            GenomicInterval::new("chr1", offset + 5_000, offset + 6_000, Strand::Plus),
        ]))
    });
    match GeneModels::build(genes, 0, false) {
        Ok(models) => models,
        Err(e) => match e {},
    }
}

fn bench_model_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("model_build");
    for count in [1_000u64, 10_000].iter() {
        group.throughput(Throughput::Elements(*count));
        group.bench_with_input(BenchmarkId::from_parameter(count), count, |b, &count| {
            b.iter(|| black_box(build_models(count)))
        });
    }
    group.finish();
}

fn bench_classify(c: &mut Criterion) {
    let models = build_models(10_000);
    let reads: Vec<AlignedRecord> = (0..1_000u64)
        .map(|i| {
            AlignedRecord::new(
                GenomicInterval::new("chr1", i * 97, i * 97 + 150, Strand::Both),
                "read",
                i % 7 == 0,
            )
        })
        .collect();

    let mut group = c.benchmark_group("classify");
    group.throughput(Throughput::Elements(reads.len() as u64));
    group.bench_function("reads_1000", |b| {
        b.iter(|| {
            for read in &reads {
                black_box(classify(read, &models));
            }
        })
    });
    group.finish();
}

fn bench_window_sweep(c: &mut Criterion) {
    let items: Vec<GenomicInterval> = (0..100_000u64)
        .map(|i| GenomicInterval::new("chr1", i * 50, i * 50 + 200, Strand::Both))
        .collect();

    let mut group = c.benchmark_group("window_sweep");
    group.throughput(Throughput::Elements(items.len() as u64));
    group.bench_function("items_100k", |b| {
        b.iter(|| {
            let records = items.iter().cloned().map(Ok);
            let windows = WindowIter::new(records, 10_000, 10_000).unwrap();
            let mut tiles = 0usize;
            for tile in windows {
                tiles += tile.unwrap().population.len();
            }
            black_box(tiles)
        })
    });
    group.finish();
}

criterion_group!(benches, bench_model_build, bench_classify, bench_window_sweep);
criterion_main!(benches);
