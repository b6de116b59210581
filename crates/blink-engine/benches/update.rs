use blink_engine::BlinkEngine;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

const DT: f64 = 1.0 / 30.0;

/// One minute of 30fps samples with a blink every 3 seconds
fn synthetic_stream() -> Vec<(f64, f64, f64)> {
    (0..1800)
        .map(|i| {
            let t = i as f64 * DT;
            let ear = if i % 90 < 4 { 0.1 } else { 0.3 };
            (ear, ear, t)
        })
        .collect()
}

fn bench_update(c: &mut Criterion) {
    let stream = synthetic_stream();

    c.bench_function("update_one_minute_30fps", |b| {
        b.iter(|| {
            let mut engine = BlinkEngine::default();
            for &(left, right, t) in &stream {
                black_box(engine.update(left, right, t));
            }
            engine.total_blinks()
        })
    });

    c.bench_function("metrics_full_window", |b| {
        let mut engine = BlinkEngine::default();
        for &(left, right, t) in &stream {
            engine.update(left, right, t);
        }
        let now = stream.last().map(|s| s.2).unwrap_or_default();
        b.iter(|| black_box(engine.metrics(black_box(now))))
    });
}

criterion_group!(benches, bench_update);
criterion_main!(benches);
