//! Closure tracking state and blink events

use serde::{Deserialize, Serialize};

use crate::window::Timestamped;

/// Per-frame closure state of the engine
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ClosureState {
    /// Eyes open, no closure in progress
    #[default]
    Open,
    /// Both eyes below threshold since `started_at` for `frames` frames
    Closed { started_at: f64, frames: u32 },
    /// Closure exceeded the long-closure ceiling; waiting for the eyes to open
    Suppressed,
}

impl ClosureState {
    /// Frames counted toward the current closure
    pub fn consecutive_closed_frames(&self) -> u32 {
        match self {
            ClosureState::Closed { frames, .. } => *frames,
            _ => 0,
        }
    }

    /// Timestamp of the first closed frame of the current closure
    pub fn closure_start_time(&self) -> Option<f64> {
        match self {
            ClosureState::Closed { started_at, .. } => Some(*started_at),
            _ => None,
        }
    }
}

/// An accepted blink
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlinkEvent {
    /// Time the eyes reopened (seconds)
    pub timestamp: f64,
    /// First closed frame (seconds)
    pub start: f64,
    /// Closure duration (milliseconds)
    pub duration_ms: f64,
    /// Closed frames in the closure
    pub frames: u32,
}

impl Timestamped for BlinkEvent {
    fn timestamp(&self) -> f64 {
        self.timestamp
    }
}

/// Why a closure was not counted as a blink
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum RejectReason {
    /// Fewer closed frames than `min_consecutive_frames`
    TooFewFrames { frames: u32 },
    /// Shorter than `min_blink_duration_ms`
    TooShort { duration_ms: f64 },
    /// Longer than `max_blink_duration_ms`
    TooLong { duration_ms: f64 },
    /// Still closed past the long-closure ceiling
    ExceededMaxClosure { duration_ms: f64 },
}

impl RejectReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            RejectReason::TooFewFrames { .. } => "too_few_frames",
            RejectReason::TooShort { .. } => "too_short",
            RejectReason::TooLong { .. } => "too_long",
            RejectReason::ExceededMaxClosure { .. } => "exceeded_max_closure",
        }
    }
}

/// Result of evaluating a closure
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "detail", rename_all = "snake_case")]
pub enum ClosureOutcome {
    Accepted(BlinkEvent),
    Rejected(RejectReason),
}

impl ClosureOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClosureOutcome::Accepted(_) => "accepted",
            ClosureOutcome::Rejected(reason) => reason.as_str(),
        }
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self, ClosureOutcome::Accepted(_))
    }
}

/// Per-frame result of feeding one sample to the engine
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameReport {
    /// Raw detection: both eyes below threshold on this frame
    pub closed: bool,
    /// Closure evaluated on this frame, if any
    pub outcome: Option<ClosureOutcome>,
}

/// Lifetime closure counters, by outcome
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClosureDiagnostics {
    pub accepted: u64,
    pub too_few_frames: u64,
    pub too_short: u64,
    pub too_long: u64,
    pub exceeded_max_closure: u64,
    /// Samples skipped for a non-finite or backwards timestamp
    pub out_of_order_samples: u64,
}

impl ClosureDiagnostics {
    pub(crate) fn record(&mut self, outcome: &ClosureOutcome) {
        match outcome {
            ClosureOutcome::Accepted(_) => self.accepted += 1,
            ClosureOutcome::Rejected(RejectReason::TooFewFrames { .. }) => self.too_few_frames += 1,
            ClosureOutcome::Rejected(RejectReason::TooShort { .. }) => self.too_short += 1,
            ClosureOutcome::Rejected(RejectReason::TooLong { .. }) => self.too_long += 1,
            ClosureOutcome::Rejected(RejectReason::ExceededMaxClosure { .. }) => {
                self.exceeded_max_closure += 1
            }
        }
    }

    /// Total closures rejected for any reason
    pub fn rejected(&self) -> u64 {
        self.too_few_frames + self.too_short + self.too_long + self.exceeded_max_closure
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closure_state_accessors() {
        assert_eq!(ClosureState::Open.consecutive_closed_frames(), 0);
        assert_eq!(ClosureState::Open.closure_start_time(), None);

        let closed = ClosureState::Closed {
            started_at: 1.5,
            frames: 4,
        };
        assert_eq!(closed.consecutive_closed_frames(), 4);
        assert_eq!(closed.closure_start_time(), Some(1.5));

        assert_eq!(ClosureState::Suppressed.consecutive_closed_frames(), 0);
        assert_eq!(ClosureState::Suppressed.closure_start_time(), None);
    }

    #[test]
    fn test_diagnostics_record() {
        let mut diag = ClosureDiagnostics::default();
        diag.record(&ClosureOutcome::Rejected(RejectReason::TooShort { duration_ms: 40.0 }));
        diag.record(&ClosureOutcome::Rejected(RejectReason::TooFewFrames { frames: 1 }));
        diag.record(&ClosureOutcome::Accepted(BlinkEvent {
            timestamp: 1.0,
            start: 0.9,
            duration_ms: 100.0,
            frames: 3,
        }));

        assert_eq!(diag.accepted, 1);
        assert_eq!(diag.rejected(), 2);
    }

    #[test]
    fn test_outcome_labels() {
        let outcome = ClosureOutcome::Rejected(RejectReason::ExceededMaxClosure { duration_ms: 600.0 });
        assert_eq!(outcome.as_str(), "exceeded_max_closure");
        assert!(!outcome.is_accepted());
    }
}
