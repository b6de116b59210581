//! Blink segmentation state machine

use metrics::{counter, gauge};
use tracing::{debug, info, warn};

use crate::analysis::BlinkMetrics;
use crate::config::BlinkConfig;
use crate::state::{BlinkEvent, ClosureDiagnostics, ClosureOutcome, ClosureState, FrameReport, RejectReason};
use crate::window::{TimeWindow, Timestamped};
use crate::{BlinkError, EarSample};

/// Mean EAR of both eyes on an open frame
#[derive(Debug, Clone, Copy)]
struct OpenEarSample {
    timestamp: f64,
    ear: f64,
}

impl Timestamped for OpenEarSample {
    fn timestamp(&self) -> f64 {
        self.timestamp
    }
}

/// Blink detector for one subject.
///
/// Feed one sample per processed frame with [`BlinkEngine::update`] (or
/// [`BlinkEngine::process`] for the closure outcome) and pull aggregates
/// with [`BlinkEngine::metrics`]. Instances share nothing, so one engine per
/// camera or user is enough to keep their counts apart.
#[derive(Debug, Clone)]
pub struct BlinkEngine {
    config: BlinkConfig,
    state: ClosureState,
    total_blinks: u64,
    accepted_events: TimeWindow<BlinkEvent>,
    open_ears: TimeWindow<OpenEarSample>,
    last_timestamp: Option<f64>,
    diagnostics: ClosureDiagnostics,
}

impl BlinkEngine {
    /// Create a new engine, rejecting invalid configuration
    pub fn new(config: BlinkConfig) -> Result<Self, BlinkError> {
        config.validate()?;
        info!("Creating blink engine with config: {:?}", config);
        Ok(Self::build(config))
    }

    fn build(config: BlinkConfig) -> Self {
        Self {
            state: ClosureState::Open,
            total_blinks: 0,
            accepted_events: TimeWindow::new(config.window_size_s),
            open_ears: TimeWindow::new(config.window_size_s),
            last_timestamp: None,
            diagnostics: ClosureDiagnostics::default(),
            config,
        }
    }

    /// Push one frame's EAR values. Returns `true` when both eyes are below
    /// threshold on this frame, regardless of whether the closure is later
    /// counted.
    pub fn update(&mut self, left_ear: f64, right_ear: f64, timestamp: f64) -> bool {
        self.process(left_ear, right_ear, timestamp).closed
    }

    /// Push one frame's EAR values and report any closure evaluated on it.
    pub fn process(&mut self, left_ear: f64, right_ear: f64, timestamp: f64) -> FrameReport {
        let closed = left_ear < self.config.threshold && right_ear < self.config.threshold;

        if !timestamp.is_finite() || self.last_timestamp.is_some_and(|last| timestamp < last) {
            self.diagnostics.out_of_order_samples += 1;
            counter!("blink_samples_out_of_order_total").increment(1);
            warn!(
                "Skipping sample with timestamp {} (last accepted {:?})",
                timestamp, self.last_timestamp
            );
            return FrameReport {
                closed,
                outcome: None,
            };
        }
        self.last_timestamp = Some(timestamp);

        let outcome = self.step(closed, timestamp);

        if !closed {
            let ear = (left_ear + right_ear) / 2.0;
            if ear.is_finite() {
                self.open_ears.push(OpenEarSample { timestamp, ear });
            }
        }

        self.evict(timestamp);

        if let Some(outcome) = &outcome {
            self.record(outcome);
        }

        FrameReport { closed, outcome }
    }

    /// Push a whole sample, see [`BlinkEngine::process`]
    pub fn push(&mut self, sample: &EarSample) -> FrameReport {
        self.process(sample.left_ear, sample.right_ear, sample.timestamp)
    }

    fn step(&mut self, closed: bool, timestamp: f64) -> Option<ClosureOutcome> {
        match (self.state, closed) {
            (ClosureState::Open, true) => {
                self.state = ClosureState::Closed {
                    started_at: timestamp,
                    frames: 1,
                };
                None
            }
            (ClosureState::Open, false) => None,
            (ClosureState::Closed { started_at, frames }, true) => {
                let elapsed_ms = (timestamp - started_at) * 1000.0;
                match self.config.max_closed_ms {
                    Some(ceiling) if elapsed_ms > ceiling => {
                        self.state = ClosureState::Suppressed;
                        Some(ClosureOutcome::Rejected(RejectReason::ExceededMaxClosure {
                            duration_ms: elapsed_ms,
                        }))
                    }
                    _ => {
                        self.state = ClosureState::Closed {
                            started_at,
                            frames: frames.saturating_add(1),
                        };
                        None
                    }
                }
            }
            (ClosureState::Closed { started_at, frames }, false) => {
                self.state = ClosureState::Open;
                Some(self.evaluate(started_at, frames, timestamp))
            }
            (ClosureState::Suppressed, true) => None,
            (ClosureState::Suppressed, false) => {
                self.state = ClosureState::Open;
                None
            }
        }
    }

    /// Decide whether a finished closure is a blink.
    fn evaluate(&mut self, started_at: f64, frames: u32, reopened_at: f64) -> ClosureOutcome {
        if frames < self.config.min_consecutive_frames {
            return ClosureOutcome::Rejected(RejectReason::TooFewFrames { frames });
        }

        let duration_ms = (reopened_at - started_at) * 1000.0;
        if duration_ms < self.config.min_blink_duration_ms {
            return ClosureOutcome::Rejected(RejectReason::TooShort { duration_ms });
        }
        if duration_ms > self.config.max_blink_duration_ms {
            return ClosureOutcome::Rejected(RejectReason::TooLong { duration_ms });
        }

        let event = BlinkEvent {
            timestamp: reopened_at,
            start: started_at,
            duration_ms,
            frames,
        };
        self.total_blinks += 1;
        self.accepted_events.push(event);
        ClosureOutcome::Accepted(event)
    }

    fn record(&mut self, outcome: &ClosureOutcome) {
        self.diagnostics.record(outcome);
        counter!("blink_closures_total", "outcome" => outcome.as_str()).increment(1);

        match outcome {
            ClosureOutcome::Accepted(event) => {
                gauge!("blink_total").set(self.total_blinks as f64);
                debug!(
                    "Blink {}: {:.1}ms over {} frames (accepted)",
                    self.total_blinks, event.duration_ms, event.frames
                );
            }
            ClosureOutcome::Rejected(reason) => {
                debug!("Discarded closure: {:?}", reason);
            }
        }
    }

    fn evict(&mut self, now: f64) {
        self.accepted_events.evict(now);
        self.open_ears.evict(now);
    }

    /// Aggregate metrics over the window ending at `now`.
    ///
    /// Evicts expired entries first; calling twice with the same `now` and no
    /// update in between yields identical results.
    pub fn metrics(&mut self, now: f64) -> BlinkMetrics {
        self.evict(now);

        let events: Vec<BlinkEvent> = self.accepted_events.iter().copied().collect();
        let open_ears: Vec<f64> = self.open_ears.iter().map(|s| s.ear).collect();

        BlinkMetrics::compute(
            &events,
            &open_ears,
            now,
            self.config.window_size_s,
            self.config.burst_gap_s,
            self.total_blinks,
        )
    }

    /// Lifetime accepted blinks since construction or the last [`reset_total`](Self::reset_total)
    pub fn total_blinks(&self) -> u64 {
        self.total_blinks
    }

    /// Zero the lifetime counter. The metrics window is left untouched.
    pub fn reset_total(&mut self) {
        info!("Resetting lifetime blink count (was {})", self.total_blinks);
        self.total_blinks = 0;
        gauge!("blink_total").set(0.0);
    }

    /// Clear all tracking state, keeping the configuration (on subject change)
    pub fn reset(&mut self) {
        info!("Resetting blink engine state");
        self.state = ClosureState::Open;
        self.total_blinks = 0;
        self.accepted_events.clear();
        self.open_ears.clear();
        self.last_timestamp = None;
        self.diagnostics = ClosureDiagnostics::default();
        gauge!("blink_total").set(0.0);
    }

    pub fn config(&self) -> &BlinkConfig {
        &self.config
    }

    pub fn state(&self) -> ClosureState {
        self.state
    }

    pub fn consecutive_closed_frames(&self) -> u32 {
        self.state.consecutive_closed_frames()
    }

    pub fn closure_start_time(&self) -> Option<f64> {
        self.state.closure_start_time()
    }

    /// Accepted blinks still inside the window, oldest first
    pub fn accepted_events(&self) -> impl Iterator<Item = &BlinkEvent> {
        self.accepted_events.iter()
    }

    pub fn diagnostics(&self) -> ClosureDiagnostics {
        self.diagnostics
    }
}

impl Default for BlinkEngine {
    fn default() -> Self {
        Self::build(BlinkConfig::default())
    }
}
