//! Scoring benchmark: probabilities → predictions, tiers, and alert rows.

use chrono::Utc;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use netriage::ingest::{RecordData, RecordSet};
use netriage::report::AlertBuilder;
use netriage::scoring::{AlertLevel, ScoreResult};

fn make_probabilities(n: usize) -> Vec<f32> {
    (0..n).map(|i| (i % 100) as f32 / 100.0).collect()
}

fn bench_threshold_predictions(c: &mut Criterion) {
    let probabilities = make_probabilities(10_000);

    c.bench_function("threshold_10k_probabilities", |b| {
        b.iter(|| {
            black_box(ScoreResult::from_probabilities(
                black_box(probabilities.clone()),
                0.85,
            ))
        })
    });
}

fn bench_alert_levels(c: &mut Criterion) {
    let probabilities = make_probabilities(10_000);

    c.bench_function("tier_10k_probabilities", |b| {
        b.iter(|| {
            let levels: Vec<AlertLevel> = probabilities
                .iter()
                .map(|&p| AlertLevel::from_probability(black_box(p)))
                .collect();
            black_box(levels)
        })
    });
}

fn bench_alert_build(c: &mut Criterion) {
    let n = 1000;
    let records = RecordSet {
        source_file: "bench.log".to_string(),
        data: RecordData::RawLines(
            (0..n).map(|i| format!("event {} from 10.0.0.1", i)).collect(),
        ),
    };
    let scores = ScoreResult::from_probabilities(make_probabilities(n), 0.85);

    c.bench_function("build_1000_alerts", |b| {
        b.iter(|| black_box(AlertBuilder::build(&records, &scores, Utc::now())))
    });
}

criterion_group!(
    benches,
    bench_threshold_predictions,
    bench_alert_levels,
    bench_alert_build
);
criterion_main!(benches);
