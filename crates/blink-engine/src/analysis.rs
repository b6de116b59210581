//! Windowed blink metrics

use serde::{Deserialize, Serialize};

use crate::state::BlinkEvent;
use crate::statistics::{burst_onsets, mean_gap, Summary};

/// Aggregate metrics over the trailing window
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BlinkMetrics {
    /// Accepted blinks in the window
    pub blink_count: usize,

    /// Lifetime accepted blinks
    pub total_blinks: u64,

    /// Blinks per minute, normalized to the full window length
    pub blink_rate_per_min: f64,

    /// Mean closure duration (ms)
    pub mean_duration_ms: f64,

    /// Population variance of closure duration (ms^2)
    pub duration_variance: f64,

    /// Seconds since the most recent accepted blink in the window
    pub inter_blink_interval_s: f64,

    /// Mean gap between consecutive blinks in the window (seconds)
    pub mean_blink_gap_s: f64,

    /// Fraction of windowed blinks that start a burst
    pub burst_index: f64,

    /// Standard deviation of open-eye EAR over the window
    pub ear_stability_index: f64,
}

impl BlinkMetrics {
    /// Compute metrics from the already-evicted window contents.
    pub(crate) fn compute(
        events: &[BlinkEvent],
        open_ears: &[f64],
        now: f64,
        window_size_s: f64,
        burst_gap_s: f64,
        total_blinks: u64,
    ) -> Self {
        let n = events.len();
        let stability = Summary::compute(open_ears).std_dev;

        if n == 0 {
            return Self {
                total_blinks,
                ear_stability_index: stability,
                ..Default::default()
            };
        }

        let durations: Vec<f64> = events.iter().map(|e| e.duration_ms).collect();
        let times: Vec<f64> = events.iter().map(|e| e.timestamp).collect();
        let durations = Summary::compute(&durations);

        let last = times[n - 1];

        Self {
            blink_count: n,
            total_blinks,
            blink_rate_per_min: n as f64 / (window_size_s / 60.0),
            mean_duration_ms: durations.mean,
            duration_variance: durations.variance,
            inter_blink_interval_s: (now - last).max(0.0),
            mean_blink_gap_s: mean_gap(&times),
            burst_index: burst_onsets(&times, burst_gap_s) as f64 / n as f64,
            ear_stability_index: stability,
        }
    }
}
