// ─────────────────────────────────────────────────────────────────────
// ZX Coherence Kernel — Scheduling Benchmarks
// ─────────────────────────────────────────────────────────────────────
//! Criterion benchmarks for the ΔC calculators and batch scheduling,
//! serial and rayon-backed.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use serde_json::{json, Value};

use zx_core::{color_flip_delta, detect_candidates, fusion_delta, RewriteScheduler};
use zx_types::{
    NodeLabel, RewriteCandidate, SchedulerConfig, SpiderGraph, SpiderKind, SpiderSignature,
};

fn spider(kind: SpiderKind, n: i64, d: u32, degree: u32) -> SpiderSignature {
    SpiderSignature {
        kind,
        phase_numerator: n,
        phase_denominator: d,
        degree,
    }
}

fn mixed_batch(len: usize) -> Vec<RewriteCandidate> {
    (0..len as i64)
        .map(|i| match i % 3 {
            0 => RewriteCandidate::fusion(
                spider(SpiderKind::Z, i % 8, 8, 2),
                spider(SpiderKind::Z, 3, 4, 3),
            ),
            1 => RewriteCandidate::color_flip(spider(SpiderKind::X, i % 16, 16, 4)),
            _ => RewriteCandidate::other("external").with_precomputed((i % 7) as f64 * 0.1),
        })
        .collect()
}

/// Ring of alternating-colour runs, enough to produce both site kinds.
fn ring(len: u64) -> SpiderGraph {
    let mut g = SpiderGraph::new();
    for id in 0..len {
        let kind = if (id / 3) % 2 == 0 { SpiderKind::Z } else { SpiderKind::X };
        g.add_node(id, NodeLabel::new(kind, (id % 8) as i64, 8, "bench"));
    }
    for id in 0..len {
        g.add_edge(id, (id + 1) % len);
    }
    g
}

// ── Calculators ─────────────────────────────────────────────────────

fn bench_fusion_delta(c: &mut Criterion) {
    let a = spider(SpiderKind::Z, 1, 4, 3);
    let b = spider(SpiderKind::Z, 3, 8, 2);
    c.bench_function("fusion_delta", |bench| {
        bench.iter(|| fusion_delta(black_box(&a), black_box(&b)))
    });
}

fn bench_color_flip_delta(c: &mut Criterion) {
    let s = spider(SpiderKind::X, 1, 2, 3);
    c.bench_function("color_flip_delta", |bench| {
        bench.iter(|| color_flip_delta(black_box(&s)))
    });
}

// ── RewriteScheduler.schedule() ─────────────────────────────────────

fn bench_schedule_serial_1000(c: &mut Criterion) {
    let scheduler = RewriteScheduler::new(SchedulerConfig {
        parallel_threshold: 0,
        log_drops: false,
        ..Default::default()
    });
    let batch = mixed_batch(1000);
    c.bench_function("schedule_serial_1000", |b| {
        b.iter(|| scheduler.schedule(black_box(batch.clone())))
    });
}

fn bench_schedule_parallel_1000(c: &mut Criterion) {
    let scheduler = RewriteScheduler::new(SchedulerConfig {
        parallel_threshold: 1,
        log_drops: false,
        ..Default::default()
    });
    let batch = mixed_batch(1000);
    c.bench_function("schedule_parallel_1000", |b| {
        b.iter(|| scheduler.schedule(black_box(batch.clone())))
    });
}

fn bench_schedule_records_100(c: &mut Criterion) {
    let scheduler = RewriteScheduler::default();
    let records: Value = Value::Array(
        (0..100)
            .map(|i| {
                json!({
                    "type": "color_flip",
                    "signature": {"kind": "Z", "phase_numer": i % 8, "phase_denom": 8, "degree": 3},
                })
            })
            .collect(),
    );
    c.bench_function("schedule_records_100", |b| {
        b.iter(|| scheduler.schedule_records(black_box(&records)))
    });
}

// ── Full pipeline: detect + schedule ────────────────────────────────

fn bench_detect_and_schedule(c: &mut Criterion) {
    let graph = ring(300);
    let scheduler = RewriteScheduler::default();
    c.bench_function("detect_and_schedule_300", |b| {
        b.iter(|| scheduler.schedule(detect_candidates(black_box(&graph))))
    });
}

criterion_group!(
    benches,
    bench_fusion_delta,
    bench_color_flip_delta,
    bench_schedule_serial_1000,
    bench_schedule_parallel_1000,
    bench_schedule_records_100,
    bench_detect_and_schedule,
);
criterion_main!(benches);
