//! Blink engine configuration

use serde::{Deserialize, Serialize};

use crate::BlinkError;

/// Blink engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlinkConfig {
    /// EAR below which an eye counts as closed
    pub threshold: f64,

    /// Minimum consecutive closed frames before a closure is evaluated
    pub min_consecutive_frames: u32,

    /// Shortest closure accepted as a blink (milliseconds)
    pub min_blink_duration_ms: f64,

    /// Longest closure accepted as a blink (milliseconds)
    pub max_blink_duration_ms: f64,

    /// Closure ceiling after which the closure is treated as deliberate
    /// and discarded before the eyes reopen (milliseconds). `None` disables
    /// the guard.
    pub max_closed_ms: Option<f64>,

    /// Trailing window for aggregate metrics (seconds)
    pub window_size_s: f64,

    /// Maximum gap between consecutive blinks that still counts as a burst (seconds)
    pub burst_gap_s: f64,
}

impl Default for BlinkConfig {
    fn default() -> Self {
        Self {
            threshold: 0.22,
            min_consecutive_frames: 3,
            min_blink_duration_ms: 70.0,
            max_blink_duration_ms: 400.0,
            max_closed_ms: Some(500.0),
            window_size_s: 30.0,
            burst_gap_s: 2.0,
        }
    }
}

impl BlinkConfig {
    /// Create strict config (tighter physiological bounds)
    pub fn strict() -> Self {
        Self {
            min_blink_duration_ms: 100.0,
            max_blink_duration_ms: 300.0,
            max_closed_ms: Some(400.0),
            ..Default::default()
        }
    }

    /// Create lenient config (accepts slower blinks, shorter runs)
    pub fn lenient() -> Self {
        Self {
            min_consecutive_frames: 2,
            min_blink_duration_ms: 50.0,
            max_blink_duration_ms: 500.0,
            max_closed_ms: Some(700.0),
            ..Default::default()
        }
    }

    /// Reject configurations that can never describe a plausible blink.
    pub fn validate(&self) -> Result<(), BlinkError> {
        if !self.threshold.is_finite() || self.threshold <= 0.0 {
            return Err(BlinkError::Config(format!(
                "threshold must be a positive finite value, got {}",
                self.threshold
            )));
        }

        if self.min_consecutive_frames == 0 {
            return Err(BlinkError::Config(
                "min_consecutive_frames must be at least 1".into(),
            ));
        }

        if !self.min_blink_duration_ms.is_finite() || self.min_blink_duration_ms < 0.0 {
            return Err(BlinkError::Config(format!(
                "min_blink_duration_ms must be non-negative, got {}",
                self.min_blink_duration_ms
            )));
        }

        if !self.max_blink_duration_ms.is_finite()
            || self.min_blink_duration_ms > self.max_blink_duration_ms
        {
            return Err(BlinkError::Config(format!(
                "blink duration bounds [{}, {}] ms are inverted",
                self.min_blink_duration_ms, self.max_blink_duration_ms
            )));
        }

        if let Some(ceiling) = self.max_closed_ms {
            if !ceiling.is_finite() || ceiling < self.max_blink_duration_ms {
                return Err(BlinkError::Config(format!(
                    "max_closed_ms ({}) must not be below max_blink_duration_ms ({})",
                    ceiling, self.max_blink_duration_ms
                )));
            }
        }

        if !self.window_size_s.is_finite() || self.window_size_s <= 0.0 {
            return Err(BlinkError::Config(format!(
                "window_size_s must be positive, got {}",
                self.window_size_s
            )));
        }

        if !self.burst_gap_s.is_finite() || self.burst_gap_s < 0.0 {
            return Err(BlinkError::Config(format!(
                "burst_gap_s must be non-negative, got {}",
                self.burst_gap_s
            )));
        }

        Ok(())
    }
}
