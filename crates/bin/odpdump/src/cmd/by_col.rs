//! Categorical split command.
//!
//! Downloads a table one distinct column value at a time by:
//! 1. Probing the table's columns and checking that `--csv-split-col` exists
//! 2. Resolving the column's distinct values, NULL included
//! 3. Fetching each value's rows and writing them to CSV and/or the SQLite store
//!
//! # Configuration
//!
//! - SQL URL: `--sql-url` flag or `ODP_SQL_URL` env var (default: `https://phl.carto.com/api/v2/sql`)
//! - Store: `--db-filepath` flag or `ODP_DB_FILEPATH` env var (default: `open_data_philly.db`)
//! - CSV root: `--csv-dir` flag or `ODP_CSV_DIR` env var (default: `csvs`)
//! - Logging: `ODP_LOG` env var (`error`, `warn`, `info`, `debug`, `trace`)

use dump::PartitionExpr;

use crate::args::{GlobalArgs, SplitArgs};

/// Command-line arguments for the `by-col` command.
#[derive(Debug, clap::Args)]
pub struct Args {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(flatten)]
    pub split: SplitArgs,

    /// Column whose distinct values define the partitions
    #[arg(long, value_name = "COLUMN")]
    pub csv_split_col: String,
}

/// Split a table by the distinct values of one column.
///
/// # Errors
///
/// Returns [`Error`] when the column does not exist, a remote query fails, or a sink
/// fails without `--keep-going`.
#[tracing::instrument(skip_all, fields(table = %split.table, column = %csv_split_col))]
pub async fn run(
    Args {
        global,
        split,
        csv_split_col,
    }: Args,
) -> Result<(), Error> {
    let client = global.build_client();
    let job = split.job(PartitionExpr::column(csv_split_col));

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

/// Errors for the categorical split command.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The split pipeline failed
    #[error("failed to split table by column")]
    Split(#[source] dump::Error),
}
