//! End-to-end blink scenarios and properties

use blink_engine::{BlinkConfig, BlinkEngine, ClosureOutcome, EarSample, RejectReason};
use proptest::prelude::*;

const DT: f64 = 1.0 / 30.0;
const CLOSED: f64 = 0.10;
const OPEN: f64 = 0.30;

fn engine_with_threshold(threshold: f64) -> BlinkEngine {
    BlinkEngine::new(BlinkConfig {
        threshold,
        min_consecutive_frames: 3,
        ..Default::default()
    })
    .unwrap()
}

/// Closed frames followed by one reopening frame, starting at `t0`
fn closure_frames(t0: f64, closed: usize) -> Vec<EarSample> {
    let mut samples: Vec<EarSample> = (0..closed)
        .map(|i| EarSample {
            left_ear: CLOSED,
            right_ear: CLOSED,
            timestamp: t0 + i as f64 * DT,
        })
        .collect();
    samples.push(EarSample {
        left_ear: OPEN,
        right_ear: OPEN,
        timestamp: t0 + closed as f64 * DT,
    });
    samples
}

#[test]
fn test_four_closed_frames_count_one_blink() {
    let mut engine = engine_with_threshold(0.23);

    for i in 0..4 {
        assert!(engine.update(CLOSED, CLOSED, i as f64 * DT));
        assert_eq!(engine.total_blinks(), 0);
    }

    assert!(!engine.update(OPEN, OPEN, 4.0 * DT));
    assert_eq!(engine.total_blinks(), 1);

    let events: Vec<_> = engine.accepted_events().copied().collect();
    assert_eq!(events.len(), 1);
    assert!((events[0].duration_ms - 133.3).abs() < 0.5);
}

#[test]
fn test_two_closed_frames_are_noise() {
    let mut engine = engine_with_threshold(0.23);

    engine.update(CLOSED, CLOSED, 0.0);
    engine.update(CLOSED, CLOSED, DT);
    assert!(!engine.update(OPEN, OPEN, 2.0 * DT));
    assert_eq!(engine.total_blinks(), 0);
    assert_eq!(engine.diagnostics().too_few_frames, 1);
}

#[test]
fn test_six_hundred_ms_closure_never_counts() {
    let mut engine = engine_with_threshold(0.23);

    for sample in closure_frames(0.0, 18) {
        engine.push(&sample);
    }

    assert_eq!(engine.total_blinks(), 0);
    assert_eq!(engine.diagnostics().exceeded_max_closure, 1);
}

#[test]
fn test_closed_frames_past_ceiling_do_not_start_new_blink() {
    // once the ceiling trips, a blink-length tail of closed frames must not count
    let mut engine = BlinkEngine::default();
    let mut t = 0.0;
    for _ in 0..18 {
        engine.update(CLOSED, CLOSED, t);
        t += DT;
    }
    for _ in 0..6 {
        engine.update(CLOSED, CLOSED, t);
        t += DT;
    }
    engine.update(OPEN, OPEN, t);
    assert_eq!(engine.total_blinks(), 0);
}

#[test]
fn test_window_eviction_boundary() {
    let mut engine = BlinkEngine::default();
    for sample in closure_frames(0.0, 4) {
        engine.push(&sample);
    }
    let event_time = engine.accepted_events().next().unwrap().timestamp;
    let window = engine.config().window_size_s;
    let eps = 1e-3;

    assert_eq!(engine.metrics(event_time + window - eps).blink_count, 1);
    assert_eq!(engine.metrics(event_time + window + eps).blink_count, 0);
    // lifetime count survives eviction
    assert_eq!(engine.total_blinks(), 1);
}

#[test]
fn test_metrics_over_session() {
    let mut engine = BlinkEngine::default();
    for t0 in [1.0, 2.0, 10.0, 20.0] {
        for sample in closure_frames(t0, 4) {
            engine.push(&sample);
        }
    }

    let metrics = engine.metrics(25.0);
    assert_eq!(metrics.blink_count, 4);
    assert_eq!(metrics.total_blinks, 4);
    assert!((metrics.blink_rate_per_min - 8.0).abs() < 1e-9);
    assert!((metrics.mean_duration_ms - 133.33).abs() < 0.1);
    assert!(metrics.duration_variance < 1e-6);
    assert!((metrics.inter_blink_interval_s - (25.0 - (20.0 + 4.0 * DT))).abs() < 1e-9);
    assert!((metrics.burst_index - 0.25).abs() < 1e-9);
}

#[test]
fn test_single_event_variance_is_zero() {
    let mut engine = BlinkEngine::default();
    for sample in closure_frames(0.0, 5) {
        engine.push(&sample);
    }
    assert_eq!(engine.metrics(1.0).duration_variance, 0.0);
}

#[test]
fn test_outcome_reported_on_reopening_frame_only() {
    let mut engine = BlinkEngine::default();
    let samples = closure_frames(0.0, 4);
    let (reopen, closing) = samples.split_last().unwrap();

    for sample in closing {
        assert_eq!(engine.push(sample).outcome, None);
    }
    assert!(matches!(
        engine.push(reopen).outcome,
        Some(ClosureOutcome::Accepted(_))
    ));
}

/// Closed frames at the given times, then reopen at `reopen`
fn timed_closure(
    engine: &mut BlinkEngine,
    closed_at: &[f64],
    reopen: f64,
) -> Option<ClosureOutcome> {
    for &t in closed_at {
        engine.update(CLOSED, CLOSED, t);
    }
    engine.process(OPEN, OPEN, reopen).outcome
}

#[test]
fn test_duration_bounds_are_inclusive() {
    let no_guard = BlinkConfig {
        max_closed_ms: None,
        ..Default::default()
    };

    let mut engine = BlinkEngine::new(no_guard.clone()).unwrap();
    let outcome = timed_closure(&mut engine, &[0.0, 0.1, 0.2, 0.3], 0.4);
    assert!(matches!(outcome, Some(ClosureOutcome::Accepted(e)) if e.duration_ms == 400.0));
    assert_eq!(engine.total_blinks(), 1);

    let mut engine = BlinkEngine::new(no_guard).unwrap();
    let outcome = timed_closure(&mut engine, &[0.0, 0.02, 0.04], 0.07);
    assert!(matches!(outcome, Some(ClosureOutcome::Accepted(e)) if e.duration_ms == 70.0));
    assert_eq!(engine.total_blinks(), 1);
}

#[test]
fn test_just_below_min_duration_is_too_short() {
    let mut engine = BlinkEngine::default();
    let outcome = timed_closure(&mut engine, &[0.0, 0.02, 0.04], 0.069);
    assert!(matches!(
        outcome,
        Some(ClosureOutcome::Rejected(RejectReason::TooShort { .. }))
    ));
    assert_eq!(engine.total_blinks(), 0);
}

#[test]
fn test_ear_stability_drops_expired_open_samples() {
    let mut engine = BlinkEngine::default();
    engine.update(0.6, 0.6, 0.0);
    for (i, ear) in [0.28, 0.32, 0.28, 0.32].into_iter().enumerate() {
        engine.update(ear, ear, 40.0 + i as f64);
    }

    let metrics = engine.metrics(43.0);
    assert!((metrics.ear_stability_index - 0.02).abs() < 1e-9);
}

proptest! {
    #[test]
    fn prop_open_frames_never_report_closed(
        left in 0.0f64..0.6,
        right in 0.0f64..0.6,
        closed_before in 0usize..20,
    ) {
        prop_assume!(left >= 0.22 || right >= 0.22);
        let mut engine = BlinkEngine::default();
        for i in 0..closed_before {
            engine.update(CLOSED, CLOSED, i as f64 * DT);
        }

        prop_assert!(!engine.update(left, right, closed_before as f64 * DT));
        prop_assert_eq!(engine.consecutive_closed_frames(), 0);
        prop_assert_eq!(engine.closure_start_time(), None);
    }

    #[test]
    fn prop_short_closures_never_count(closed in 0usize..3, gaps in 1usize..10) {
        let mut engine = BlinkEngine::default();
        let mut t = 0.0;
        for _ in 0..gaps {
            for sample in closure_frames(t, closed) {
                engine.push(&sample);
            }
            t += 1.0;
        }
        prop_assert_eq!(engine.total_blinks(), 0);
    }

    #[test]
    fn prop_overlong_closures_never_count(closed in 13usize..60, guard in any::<bool>()) {
        let config = BlinkConfig {
            max_closed_ms: guard.then_some(500.0),
            ..Default::default()
        };
        let mut engine = BlinkEngine::new(config).unwrap();
        for sample in closure_frames(0.0, closed) {
            engine.push(&sample);
        }
        prop_assert_eq!(engine.total_blinks(), 0);
    }

    #[test]
    fn prop_metrics_idempotent(starts in proptest::collection::vec(0.5f64..3.0, 0..12), now_offset in 0.0f64..40.0) {
        let mut engine = BlinkEngine::default();
        let mut t = 0.0;
        for gap in starts {
            t += gap;
            for sample in closure_frames(t, 4) {
                engine.push(&sample);
            }
        }
        let now = t + now_offset;

        let first = engine.metrics(now);
        let second = engine.metrics(now);
        prop_assert_eq!(first, second);
        prop_assert!(engine.total_blinks() >= first.blink_count as u64);
    }
}
