use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use tessera_sync::{signature, Dataset, MemoryCanvas, Reconciler, Record, StyleSettings};
use tessera_text::FontCatalog;

fn dataset(n: usize) -> Dataset {
    (0..n)
        .map(|i| Record::new(format!("C{i:03}"), format!("Headline {i}"), "Limited time sale"))
        .collect()
}

fn bench_signature(c: &mut Criterion) {
    let mut settings = StyleSettings::default();
    settings.keyword.keywords = "sale, today, free".into();

    c.bench_function("signature", |b| {
        b.iter(|| signature(black_box("  Headline 42 "), black_box("Limited time sale"), &settings))
    });
}

/// Second run over an unchanged dataset: signature checks only.
fn bench_idempotent_run(c: &mut Criterion) {
    let mut group = c.benchmark_group("idempotent_run");
    let settings = StyleSettings::default();
    let fonts = FontCatalog::with_defaults();

    for count in [50, 500] {
        let data = dataset(count);
        let mut canvas = MemoryCanvas::new();
        pollster::block_on(
            Reconciler::new(&mut canvas, &fonts, Vec::new()).run(&data, &settings, "Bench"),
        )
        .unwrap();

        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &data, |b, data| {
            b.iter(|| {
                let summary = pollster::block_on(
                    Reconciler::new(&mut canvas, &fonts, Vec::new()).run(data, &settings, "Bench"),
                )
                .unwrap();
                black_box(summary);
            })
        });
    }
    group.finish();
}

/// First run: every frame created and laid out.
fn bench_full_run(c: &mut Criterion) {
    let settings = StyleSettings::default();
    let fonts = FontCatalog::with_defaults();
    let data = dataset(100);

    c.bench_function("full_run_100", |b| {
        b.iter(|| {
            let mut canvas = MemoryCanvas::new();
            pollster::block_on(
                Reconciler::new(&mut canvas, &fonts, Vec::new()).run(&data, &settings, "Bench"),
            )
            .unwrap();
            black_box(canvas.node_mutations());
        })
    });
}

criterion_group!(benches, bench_signature, bench_idempotent_run, bench_full_run);
criterion_main!(benches);
