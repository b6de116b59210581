//! Stream replay loop

use blink_engine::{BlinkEngine, BlinkMetrics, ClosureDiagnostics};
use serde::Serialize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info, warn};

use crate::{parse_sample, ReplayError};

/// One JSON report line
#[derive(Debug, Clone, Serialize)]
pub struct MetricsReport {
    /// Stream time the metrics were computed at
    pub now: f64,
    /// Last report of the stream
    pub last: bool,
    #[serde(flatten)]
    pub metrics: BlinkMetrics,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnostics: Option<ClosureDiagnostics>,
}

/// Totals for a finished replay
#[derive(Debug, Clone, Default)]
pub struct ReplaySummary {
    /// Samples fed to the engine
    pub samples: u64,
    /// Lines that failed to parse
    pub skipped_lines: u64,
    /// Reports written, including the final one
    pub reports: u64,
    /// Metrics at the last sample, if any sample was read
    pub final_metrics: Option<BlinkMetrics>,
}

/// Feed every sample from `reader` through `engine`, writing a report line
/// to `out` every `report_every_s` seconds of stream time and once at the end.
///
/// Unparseable lines are logged and skipped; only I/O failures abort.
pub async fn replay<R, W>(
    reader: R,
    out: &mut W,
    engine: &mut BlinkEngine,
    report_every_s: f64,
) -> Result<ReplaySummary, ReplayError>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = reader.lines();
    let mut summary = ReplaySummary::default();
    let mut next_report_at: Option<f64> = None;
    let mut last_timestamp: Option<f64> = None;
    let mut line_no = 0usize;

    while let Some(line) = lines.next_line().await? {
        line_no += 1;
        let sample = match parse_sample(&line) {
            Ok(Some(sample)) => sample,
            Ok(None) => continue,
            Err(e) => {
                warn!("Skipping line {}: {}", line_no, e);
                summary.skipped_lines += 1;
                continue;
            }
        };

        let frame = engine.push(&sample);
        summary.samples += 1;
        // mirror the engine: only finite, non-decreasing timestamps advance stream time
        let advanced = sample.timestamp.is_finite()
            && last_timestamp.map_or(true, |last| sample.timestamp >= last);
        if advanced {
            last_timestamp = Some(sample.timestamp);
        }

        if let Some(outcome) = frame.outcome {
            debug!("t={:.3}s closure {}", sample.timestamp, outcome.as_str());
        }

        if report_every_s <= 0.0 || !advanced {
            continue;
        }

        let due = *next_report_at.get_or_insert(sample.timestamp + report_every_s);
        if sample.timestamp >= due {
            let report = MetricsReport {
                now: sample.timestamp,
                last: false,
                metrics: engine.metrics(sample.timestamp),
                diagnostics: None,
            };
            write_report(out, &report).await?;
            summary.reports += 1;
            next_report_at = Some(sample.timestamp + report_every_s);
        }
    }

    if let Some(now) = last_timestamp {
        let metrics = engine.metrics(now);
        let report = MetricsReport {
            now,
            last: true,
            metrics,
            diagnostics: Some(engine.diagnostics()),
        };
        write_report(out, &report).await?;
        summary.reports += 1;
        summary.final_metrics = Some(metrics);
    }

    out.flush().await?;

    info!(
        "Replay finished: {} samples, {} skipped lines, {} blinks",
        summary.samples,
        summary.skipped_lines,
        engine.total_blinks()
    );

    Ok(summary)
}

async fn write_report<W: AsyncWrite + Unpin>(
    out: &mut W,
    report: &MetricsReport,
) -> Result<(), ReplayError> {
    let mut line = serde_json::to_vec(report)?;
    line.push(b'\n');
    out.write_all(&line).await?;
    Ok(())
}
