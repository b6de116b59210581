//! Layered replay settings

use std::path::Path;

use blink_engine::BlinkConfig;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::ReplayError;

/// Environment variable prefix, e.g. `BLINK_ENGINE__THRESHOLD=0.25`
pub const ENV_PREFIX: &str = "BLINK";

/// Replay settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Blink engine parameters
    pub engine: BlinkConfig,

    /// Stream-time interval between metrics reports (seconds, 0 disables)
    pub report_every_s: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            engine: BlinkConfig::default(),
            report_every_s: 5.0,
        }
    }
}

/// Load settings: defaults, then an optional config file, then `BLINK_*`
/// environment variables. The engine section is validated before returning.
pub fn load_settings(path: Option<&Path>) -> Result<Settings, ReplayError> {
    load_settings_with(path, environment())
}

/// `BLINK_` prefix, `__` between nested keys
fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

fn load_settings_with(path: Option<&Path>, env: Environment) -> Result<Settings, ReplayError> {
    let mut builder = Config::builder().add_source(Config::try_from(&Settings::default())?);

    if let Some(path) = path {
        info!("Loading settings from {}", path.display());
        builder = builder.add_source(File::from(path));
    }

    let settings: Settings = builder
        .add_source(env)
        .build()?
        .try_deserialize()?;

    settings.engine.validate()?;

    if !settings.report_every_s.is_finite() || settings.report_every_s < 0.0 {
        return Err(ReplayError::Settings(format!(
            "report_every_s must be non-negative, got {}",
            settings.report_every_s
        )));
    }

    Ok(settings)
}
