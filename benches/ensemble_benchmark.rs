//! Benchmarks for MinHash sketching and ensemble build/query throughput.

use std::hint::black_box;
use std::sync::Arc;

use criterion::{criterion_group, criterion_main, Criterion};

use setsketch_ensemble::bootstrap::bootstrap_equi_depth;
use setsketch_ensemble::codec::HashValueWidth;
use setsketch_ensemble::domain::DomainRecord;
use setsketch_ensemble::forest::LshForest;
use setsketch_ensemble::minhash::Minhash;

fn generate_records(count: usize) -> Vec<DomainRecord<usize>> {
    (0..count)
        .map(|i| {
            let size = 10 + (i % 50);
            let mut mh = Minhash::new(1, 128);
            for j in 0..size {
                mh.push(format!("domain-{i}-value-{j}").as_bytes());
            }
            DomainRecord::new(i, size, mh.signature())
        })
        .collect()
}

fn benchmark_minhash_push(c: &mut Criterion) {
    let values: Vec<String> = (0..500).map(|i| format!("value-{i}")).collect();

    c.bench_function("minhash_push_500_values_h128", |b| {
        b.iter(|| {
            let mut mh = Minhash::new(1, 128);
            for v in &values {
                mh.push(black_box(v.as_bytes()));
            }
            black_box(mh.signature());
        })
    });
}

fn benchmark_bootstrap_equi_depth(c: &mut Criterion) {
    let records = generate_records(500);

    c.bench_function("bootstrap_equi_depth_500_records", |b| {
        b.iter(|| {
            let ensemble = bootstrap_equi_depth::<usize, LshForest<usize>>(
                black_box(8),
                black_box(128),
                black_box(4),
                HashValueWidth::Eight,
                records.len(),
                black_box(records.clone()),
            )
            .expect("records are sorted by size");
            black_box(ensemble);
        })
    });
}

fn benchmark_ensemble_query(c: &mut Criterion) {
    let mut records = generate_records(2000);
    records.sort_by_key(|r| r.size);
    let total = records.len();
    let ensemble = bootstrap_equi_depth::<usize, LshForest<usize>>(
        16,
        128,
        4,
        HashValueWidth::Eight,
        total,
        records.clone(),
    )
    .expect("records are sorted by size");
    let ensemble = Arc::new(ensemble);
    let query = records[total / 2].clone();

    c.bench_function("ensemble_query_2000_domains", |b| {
        b.iter(|| {
            let hits: Vec<usize> = ensemble
                .query(black_box(query.signature.clone()), query.size, 0.8)
                .collect();
            black_box(hits);
        })
    });
}

criterion_group!(
    benches,
    benchmark_minhash_push,
    benchmark_bootstrap_equi_depth,
    benchmark_ensemble_query,
);
criterion_main!(benches);
