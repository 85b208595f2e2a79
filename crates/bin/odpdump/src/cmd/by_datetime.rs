//! Temporal split command.
//!
//! Downloads a table one year (or quarter, or month) at a time by:
//! 1. Probing the table's columns and checking that the split column is date-typed
//! 2. Writing `summary.json` with the column's bounds and per-partition row counts
//! 3. Fetching each partition's rows and writing them to CSV and/or the SQLite store
//!
//! When `--split-by` is omitted, the table's conventional split from the schema catalog
//! is used (e.g. `rtt_summary` splits on `recording_date year`).
//!
//! # Configuration
//!
//! - SQL URL: `--sql-url` flag or `ODP_SQL_URL` env var (default: `https://phl.carto.com/api/v2/sql`)
//! - Store: `--db-filepath` flag or `ODP_DB_FILEPATH` env var (default: `open_data_philly.db`)
//! - CSV root: `--csv-dir` flag or `ODP_CSV_DIR` env var (default: `csvs`)
//! - Logging: `ODP_LOG` env var (`error`, `warn`, `info`, `debug`, `trace`)

use dump::{DatePart, PartitionExpr, partition::UnknownDatePartError};

use crate::args::{GlobalArgs, SplitArgs};

/// Command-line arguments for the `by-datetime` command.
#[derive(Debug, clap::Args)]
pub struct Args {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(flatten)]
    pub split: SplitArgs,

    /// Date column and granularity to split by, e.g. `initialissuedate year`
    ///
    /// The granularity is one of `year`, `quarter` or `month`.
    #[arg(long, num_args = 2, value_names = ["COLUMN", "PART"])]
    pub split_by: Option<Vec<String>>,
}

/// Split a table by a date part of one of its date columns.
///
/// # Errors
///
/// Returns [`Error`] when no split can be determined, the column is not a date column,
/// a remote query fails, or a sink fails without `--keep-going`.
#[tracing::instrument(skip_all, fields(table = %split.table))]
pub async fn run(
    Args {
        global,
        split,
        split_by,
    }: Args,
) -> Result<(), Error> {
    let expr = partition_expr(&split.table, split_by)?;
    tracing::debug!(partition = %expr, "splitting by date part");

    let client = global.build_client();
    let job = split.job(expr);
    let stats = job.run(&client).await.map_err(Error::Split)?;

    crate::success!(
        "Split {} into {} partitions ({} rows)",
        job.table,
        stats.partitions,
        stats.rows
    );
    if stats.sink_failures > 0 {
        crate::warning!("{} sink writes failed; see the log", stats.sink_failures);
    }

    Ok(())
}

/// Use the explicit `--split-by` pair, or fall back to the catalog's split hint.
fn partition_expr(table: &str, split_by: Option<Vec<String>>) -> Result<PartitionExpr, Error> {
    if let Some([column, part]) = split_by.as_deref() {
        let part = part.parse::<DatePart>().map_err(Error::DatePart)?;
        return Ok(PartitionExpr::date_part(column.clone(), part));
    }

    let hint = table_catalog::catalog()
        .get(table)
        .ok()
        .and_then(|schema| schema.split_hint())
        .ok_or_else(|| Error::MissingSplitBy {
            table: table.to_string(),
        })?;
    let part = hint.date_part.parse::<DatePart>().map_err(Error::DatePart)?;
    Ok(PartitionExpr::date_part(hint.column, part))
}

/// Errors for the temporal split command.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No `--split-by` given and the table has no conventional split
    #[error("--split-by is required for table `{table}`")]
    MissingSplitBy { table: String },

    /// The granularity is not a supported date part
    #[error("invalid --split-by granularity")]
    DatePart(#[source] UnknownDatePartError),

    /// The split pipeline failed
    #[error("failed to split table by date")]
    Split(#[source] dump::Error),
}
