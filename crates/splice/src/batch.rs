//! Batch runs over a ticker universe.

use crate::config::{ConfigError, PipelineConfig};
use crate::pipeline::ticker_outcome;
use splice_output::{OutcomeStatus, RunReport, TickerOutcome};
use tracing::{info, warn};

fn run_one<F>(ticker: &str, config: &PipelineConfig, on_outcome: &F) -> TickerOutcome
where
    F: Fn(&TickerOutcome) + Sync,
{
    let outcome = ticker_outcome(ticker, config);
    match &outcome.status {
        OutcomeStatus::Written { output, rows, .. } => {
            info!(ticker, rows, output = %output.display(), "wrote fused table");
        }
        OutcomeStatus::Skipped { reason } => {
            warn!(ticker, %reason, "skipping security");
        }
    }
    on_outcome(&outcome);
    outcome
}

/// Process every ticker in `config`.
///
/// Per-security failures are recorded as skipped outcomes and never abort the
/// run. Outcomes are in ticker order whether or not `config.parallel` is set;
/// `on_outcome` sees them in completion order.
///
/// # Errors
///
/// Only [`ConfigError`]s, raised before any ticker is processed.
pub fn run_batch<F>(config: &PipelineConfig, on_outcome: F) -> Result<RunReport, ConfigError>
where
    F: Fn(&TickerOutcome) + Sync,
{
    config.validate()?;
    let tickers = config.tickers()?;
    info!(
        count = tickers.len(),
        input = %config.input_root.display(),
        parallel = config.parallel,
        "processing tickers"
    );

    let outcomes = process_all(&tickers, config, &on_outcome);
    let report = RunReport::new(config.input_root.clone(), outcomes);
    info!(
        written = report.written(),
        skipped = report.skipped(),
        "batch finished"
    );
    Ok(report)
}

#[cfg(feature = "parallel")]
fn process_all<F>(tickers: &[String], config: &PipelineConfig, on_outcome: &F) -> Vec<TickerOutcome>
where
    F: Fn(&TickerOutcome) + Sync,
{
    use rayon::prelude::*;

    if config.parallel {
        tickers
            .par_iter()
            .map(|ticker| run_one(ticker, config, on_outcome))
            .collect()
    } else {
        tickers
            .iter()
            .map(|ticker| run_one(ticker, config, on_outcome))
            .collect()
    }
}

#[cfg(not(feature = "parallel"))]
fn process_all<F>(tickers: &[String], config: &PipelineConfig, on_outcome: &F) -> Vec<TickerOutcome>
where
    F: Fn(&TickerOutcome) + Sync,
{
    if config.parallel {
        warn!("built without the parallel feature, processing sequentially");
    }
    tickers
        .iter()
        .map(|ticker| run_one(ticker, config, on_outcome))
        .collect()
}
