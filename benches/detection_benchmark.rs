use criterion::{black_box, criterion_group, criterion_main, Criterion};
use fraud_engine::core::config::DetectionConfig;
use fraud_engine::pipeline::DetectionEngine;
use fraud_engine::simulation::generator::{generate_random_batch, BatchConfig};

fn bench_analyze_50_accounts(c: &mut Criterion) {
    let config = BatchConfig {
        account_count: 50,
        avg_transactions_per_account: 5,
        ..Default::default()
    };
    let batch = generate_random_batch(&config);
    let rules = DetectionConfig::default();

    c.bench_function("analyze_50_accounts", |b| {
        b.iter(|| DetectionEngine::analyze(black_box(&batch), black_box(&rules)))
    });
}

fn bench_analyze_200_accounts(c: &mut Criterion) {
    let config = BatchConfig {
        account_count: 200,
        avg_transactions_per_account: 10,
        ..Default::default()
    };
    let batch = generate_random_batch(&config);
    let rules = DetectionConfig::default();

    c.bench_function("analyze_200_accounts", |b| {
        b.iter(|| DetectionEngine::analyze(black_box(&batch), black_box(&rules)))
    });
}

fn bench_analyze_full_batch(c: &mut Criterion) {
    // The upstream contract caps a batch at 10,000 transactions.
    let config = BatchConfig {
        account_count: 1000,
        avg_transactions_per_account: 10,
        ..Default::default()
    };
    let batch = generate_random_batch(&config);
    let rules = DetectionConfig::default();

    c.bench_function("analyze_full_batch", |b| {
        b.iter(|| DetectionEngine::analyze(black_box(&batch), black_box(&rules)))
    });
}

criterion_group!(
    benches,
    bench_analyze_50_accounts,
    bench_analyze_200_accounts,
    bench_analyze_full_batch
);
criterion_main!(benches);
