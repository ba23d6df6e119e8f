//! Per-security pipeline: load, normalize, fuse, align, derive, write.

use crate::config::PipelineConfig;
use splice_data::{
    DailySeries, DataError, RawStatementTable, SecurityFiles, StatementTable, normalize,
};
use splice_engine::{EngineError, FusedDailyTable, fuse};
use splice_output::{ExportError, ExportFormat, Exporter, TickerOutcome};
use std::path::PathBuf;
use thiserror::Error;
use tracing::debug;

/// Errors that skip one security. None of them stop the batch.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Input files missing or unreadable, or a date did not parse
    #[error(transparent)]
    Data(#[from] DataError),

    /// Fusion, alignment or ratio failure
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// Output could not be written
    #[error(transparent)]
    Export(#[from] ExportError),
}

/// A written output file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenTable {
    /// Output path
    pub path: PathBuf,
    /// Trading-day rows
    pub rows: usize,
    /// Columns including `Date`
    pub columns: usize,
}

/// Load and normalize the four statements.
///
/// # Errors
///
/// Read errors and, under [`splice_data::QuarterlyDatePolicy::Reject`],
/// unparseable period labels.
pub fn load_statements(
    files: &SecurityFiles,
    config: &PipelineConfig,
) -> Result<Vec<StatementTable>, PipelineError> {
    files
        .statements
        .iter()
        .map(|(kind, path)| -> Result<StatementTable, PipelineError> {
            let raw = RawStatementTable::from_path(*kind, path)?;
            Ok(normalize(&raw, config.date_policy)?)
        })
        .collect()
}

/// Build the fused daily table for `ticker` without writing it.
///
/// # Errors
///
/// Any [`PipelineError`] except [`PipelineError::Export`].
pub fn build_table(ticker: &str, config: &PipelineConfig) -> Result<FusedDailyTable, PipelineError> {
    let files = SecurityFiles::locate(&config.input_root, ticker)?;
    let statements = load_statements(&files, config)?;
    let fused = fuse(&statements)?;
    let daily = DailySeries::from_path(&files.daily)?;
    debug!(ticker, periods = fused.frame.height(), days = daily.len(), "loaded inputs");

    Ok(FusedDailyTable::build(fused, &daily, &config.engine)?)
}

/// Build and write `ticker`'s table.
///
/// # Errors
///
/// Any [`PipelineError`]; nothing is written on error.
pub fn process_ticker(ticker: &str, config: &PipelineConfig) -> Result<WrittenTable, PipelineError> {
    let table = build_table(ticker, config)?;
    let path = SecurityFiles::resolve(&config.input_root, ticker)
        .output_path(config.output_root.as_deref());
    table.export_to_file(&path, ExportFormat::Csv)?;

    Ok(WrittenTable {
        path,
        rows: table.height(),
        columns: table.column_names().len() + 1,
    })
}

/// Run [`process_ticker`] and fold the result into an outcome.
pub fn ticker_outcome(ticker: &str, config: &PipelineConfig) -> TickerOutcome {
    match process_ticker(ticker, config) {
        Ok(written) => TickerOutcome::written(ticker, written.path, written.rows, written.columns),
        Err(e) => TickerOutcome::skipped(ticker, e.to_string()),
    }
}
