//! Blink Replay - Main Entry Point

use std::path::PathBuf;

use anyhow::Context;
use blink_engine::BlinkEngine;
use blink_replay::{init_logging, load_settings, replay};
use clap::Parser;
use metrics_exporter_prometheus::PrometheusBuilder;
use tokio::io::{AsyncWriteExt, BufReader};
use tracing::info;

#[derive(Parser)]
#[command(name = "blink-replay", version, about = "Replay EAR samples through the blink engine")]
struct Cli {
    /// Settings file (TOML, JSON or YAML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Sample file, one JSON object or `left,right,timestamp` per line (stdin if omitted)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Override the report interval in seconds of stream time (0 for final report only)
    #[arg(long)]
    report_every: Option<f64>,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,

    /// Print Prometheus text metrics after the replay
    #[arg(long)]
    prometheus: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.json_logs)?;

    info!("=== Blink Replay v{} ===", env!("CARGO_PKG_VERSION"));

    let mut settings = load_settings(cli.config.as_deref()).context("failed to load settings")?;
    if let Some(interval) = cli.report_every {
        settings.report_every_s = interval;
    }

    let prometheus = if cli.prometheus {
        Some(
            PrometheusBuilder::new()
                .install_recorder()
                .context("failed to install Prometheus recorder")?,
        )
    } else {
        None
    };

    let mut engine = BlinkEngine::new(settings.engine.clone())?;
    let mut stdout = tokio::io::stdout();

    let summary = match &cli.input {
        Some(path) => {
            let file = tokio::fs::File::open(path)
                .await
                .with_context(|| format!("failed to open {}", path.display()))?;
            replay(BufReader::new(file), &mut stdout, &mut engine, settings.report_every_s).await?
        }
        None => {
            replay(
                BufReader::new(tokio::io::stdin()),
                &mut stdout,
                &mut engine,
                settings.report_every_s,
            )
            .await?
        }
    };

    if summary.skipped_lines > 0 {
        info!("{} input lines could not be parsed", summary.skipped_lines);
    }

    if let Some(handle) = prometheus {
        stdout.write_all(handle.render().as_bytes()).await?;
        stdout.flush().await?;
    }

    Ok(())
}
