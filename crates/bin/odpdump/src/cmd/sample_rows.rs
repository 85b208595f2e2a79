//! Row sampling command.
//!
//! Writes the first rows of a table to `<json-dir>/<table>/<value>.json`, one file per row,
//! named after the row's value in `--column`. Useful for eyeballing a table's shape before
//! registering its schema.
//!
//! # Configuration
//!
//! - SQL URL: `--sql-url` flag or `ODP_SQL_URL` env var (default: `https://phl.carto.com/api/v2/sql`)
//! - Logging: `ODP_LOG` env var (`error`, `warn`, `info`, `debug`, `trace`)

use std::path::PathBuf;

use dump::sample::{DEFAULT_SAMPLE_LIMIT, sample_rows};

use crate::args::GlobalArgs;

/// Command-line arguments for the `sample-rows` command.
#[derive(Debug, clap::Args)]
pub struct Args {
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Name of the remote table to sample
    #[arg(long, value_name = "TABLE")]
    pub table: String,

    /// Column whose value names each JSON file
    #[arg(long, value_name = "COLUMN")]
    pub column: String,

    /// Number of rows to sample
    #[arg(long, default_value_t = DEFAULT_SAMPLE_LIMIT)]
    pub limit: u64,

    /// Root directory of the JSON files
    #[arg(long, default_value = "json")]
    pub json_dir: PathBuf,
}

/// Sample rows of a table into individual JSON files.
///
/// # Errors
///
/// Returns [`Error`] when the column does not exist, a remote query fails, or a file
/// cannot be written.
#[tracing::instrument(skip_all, fields(table = %table, column = %column))]
pub async fn run(
    Args {
        global,
        table,
        column,
        limit,
        json_dir,
    }: Args,
) -> Result<(), Error> {
    let client = global.build_client();

    let paths = sample_rows(&client, &table, &column, limit, &json_dir)
        .await
        .map_err(Error::Sample)?;

    crate::success!("Wrote {} sample rows of {table}", paths.len());
    for path in &paths {
        crate::detail!("{}", path.display());
    }

    Ok(())
}

/// Errors for the row sampling command.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Sampling failed
    #[error("failed to sample rows")]
    Sample(#[source] dump::Error),
}
