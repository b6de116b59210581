//! Blink Replay
//!
//! Reference caller for the blink engine: reads a recorded stream of EAR
//! samples, drives the engine frame by frame and reports windowed metrics
//! as JSON lines.

pub mod input;
pub mod replay;
pub mod settings;

pub use input::parse_sample;
pub use replay::{replay, MetricsReport, ReplaySummary};
pub use settings::{load_settings, Settings};

use blink_engine::BlinkError;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Replay error types
#[derive(Error, Debug)]
pub enum ReplayError {
    #[error("Configuration source error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Invalid settings: {0}")]
    Settings(String),

    #[error("Engine rejected configuration: {0}")]
    Engine(#[from] BlinkError),

    #[error("Invalid sample: {0}")]
    InvalidSample(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Logging setup failed: {0}")]
    Logging(String),
}

/// Initialize logging to stderr, leaving stdout for reports.
///
/// The filter comes from `RUST_LOG`, defaulting to `info`.
pub fn init_logging(json: bool) -> Result<(), ReplayError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);

    let result = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    result.map_err(|e| ReplayError::Logging(e.to_string()))
}
