//! Shared command-line arguments for odpdump commands.

use std::path::PathBuf;

use carto_client::Client;
use dump::{PartitionExpr, SplitJob, StoreOptions, WriteMode};
use url::Url;

/// Global arguments shared across all commands that talk to the SQL API.
///
/// Commands include these options with `#[command(flatten)]`.
#[derive(Debug, clap::Args)]
pub struct GlobalArgs {
    /// The URL of the SQL API endpoint
    #[arg(long, env = "ODP_SQL_URL", default_value = carto_client::DEFAULT_SQL_URL, value_parser = clap::value_parser!(Url))]
    pub sql_url: Url,
}

impl GlobalArgs {
    /// Create a client for the configured SQL endpoint.
    pub fn build_client(&self) -> Client {
        Client::new(self.sql_url.clone())
    }
}

/// Options of the commands that split a table into partitions.
#[derive(Debug, clap::Args)]
pub struct SplitArgs {
    /// Name of the remote table to download
    #[arg(long, value_name = "TABLE")]
    pub table: String,

    /// Extra SQL predicate ANDed onto every partition query, e.g. "cartodb_id > 100"
    ///
    /// Sent to the service verbatim.
    #[arg(long, value_name = "PREDICATE")]
    pub where_str: Option<String>,

    /// Path of the SQLite store; created if it does not exist
    #[arg(long, env = "ODP_DB_FILEPATH", default_value = "open_data_philly.db")]
    pub db_filepath: PathBuf,

    /// Root directory of the per-partition CSV files
    #[arg(long, env = "ODP_CSV_DIR", default_value = "csvs")]
    pub csv_dir: PathBuf,

    /// Write one CSV file per partition (default)
    #[arg(long, overrides_with = "skip_save_to_csv")]
    pub save_to_csv: bool,

    /// Do not write CSV files
    #[arg(long, overrides_with = "save_to_csv")]
    pub skip_save_to_csv: bool,

    /// Insert every partition into the SQLite store (default)
    #[arg(long, overrides_with = "skip_save_to_sqlite")]
    pub save_to_sqlite: bool,

    /// Do not touch the SQLite store
    #[arg(long, overrides_with = "save_to_sqlite")]
    pub skip_save_to_sqlite: bool,

    /// Commit records one at a time, logging and skipping the ones that fail
    ///
    /// Without this flag each partition is inserted in a single transaction and any bad
    /// record rejects the whole partition.
    #[arg(long, overrides_with = "do_not_debug")]
    pub debug_mode: bool,

    /// Insert each partition in a single transaction (default)
    #[arg(long, overrides_with = "debug_mode")]
    pub do_not_debug: bool,

    /// Keep going with the next partition after a sink fails
    #[arg(long)]
    pub keep_going: bool,
}

impl SplitArgs {
    /// Build the pipeline job for this table and split.
    pub fn job(&self, split: PartitionExpr) -> SplitJob {
        let mut job = SplitJob::new(self.table.clone(), split);
        job.where_str = self.where_str.clone();
        job.keep_going = self.keep_going;
        if !self.skip_save_to_csv {
            job.csv_dir = Some(self.csv_dir.clone());
        }
        if !self.skip_save_to_sqlite {
            job.store = Some(StoreOptions {
                path: self.db_filepath.clone(),
                mode: if self.debug_mode {
                    WriteMode::Strict
                } else {
                    WriteMode::Bulk
                },
            });
        }
        job
    }
}
