//! Blink Engine
//!
//! Turns a per-frame eye-aspect-ratio (EAR) signal into blink events and
//! rolling physiological metrics:
//! - EAR estimation from eye landmarks
//! - Closed/open state machine with physiological plausibility filters
//! - Time-windowed blink rate, duration statistics, burstiness and EAR stability

pub mod analysis;
pub mod config;
pub mod ear;
pub mod engine;
pub mod state;
pub mod statistics;
pub mod window;

pub use analysis::BlinkMetrics;
pub use config::BlinkConfig;
pub use ear::{eye_aspect_ratio, eye_aspect_ratio_from_mesh, EyeIndices, EyeLandmarks, Point};
pub use engine::BlinkEngine;
pub use state::{
    BlinkEvent, ClosureDiagnostics, ClosureOutcome, ClosureState, FrameReport, RejectReason,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Blink engine error types
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BlinkError {
    #[error("Configuration error: {0}")]
    Config(String),
}

/// One frame's EAR reading for both eyes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EarSample {
    pub left_ear: f64,
    pub right_ear: f64,
    /// Monotonic capture time (seconds)
    pub timestamp: f64,
}

