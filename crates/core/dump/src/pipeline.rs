//! One split-and-persist run over a single table.

use std::path::PathBuf;

use carto_client::Client;
use serde_json::Value;

use crate::{
    Error,
    csv_sink::CsvSink,
    fetch::fetch_partition,
    partition::{PartitionExpr, resolve_keys, validate_column},
    router::{Partition, Router},
    sql,
    store::{Store, StoreSink, WriteMode},
    summary::SummaryRecord,
};

/// Where and how the relational sink writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreOptions {
    pub path: PathBuf,
    pub mode: WriteMode,
}

/// Counters reported at the end of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    pub partitions: usize,
    pub rows: usize,
    pub sink_failures: usize,
}

/// Split one remote table into partitions and persist each to the requested sinks.
#[derive(Debug, Clone)]
pub struct SplitJob {
    pub table: String,
    pub split: PartitionExpr,
    /// Predicate ANDed verbatim onto every partition query.
    pub where_str: Option<String>,
    /// Root directory of the CSV sink; `None` disables it.
    pub csv_dir: Option<PathBuf>,
    /// Relational sink settings; `None` disables it.
    pub store: Option<StoreOptions>,
    /// Continue with the next partition after a sink failure instead of aborting.
    pub keep_going: bool,
}

impl SplitJob {
    /// A job that splits `table` on `split` and writes nowhere until sinks are configured.
    pub fn new(table: impl Into<String>, split: PartitionExpr) -> Self {
        Self {
            table: table.into(),
            split,
            where_str: None,
            csv_dir: None,
            store: None,
            keep_going: false,
        }
    }

    /// Run the job to completion.
    ///
    /// Every step finishes before the next one starts:
    ///
    /// 1. Resolve the table's registered schema if the relational sink is requested.
    /// 2. Probe the table's columns and validate the partition column.
    /// 3. Open the sinks.
    /// 4. For temporal splits, compute the summary and write it next to the CSV files.
    /// 5. Resolve the partition keys, then fetch and route one partition at a time.
    ///
    /// A sink failure aborts the run after every sink has seen the failing partition,
    /// unless `keep_going` is set.
    #[tracing::instrument(skip_all, fields(table = %self.table, partition = %self.split), err)]
    pub async fn run(&self, client: &Client) -> Result<RunStats, Error> {
        let table = sql::check_identifier(&self.table)?;
        sql::check_identifier(self.split.source_column())?;

        let schema = match &self.store {
            Some(_) => Some(table_catalog::catalog().get(table)?),
            None => None,
        };

        let probe = client.execute(&sql::probe(table)).await?;
        validate_column(table, &probe.fields, &self.split)?;

        let mut router = Router::default();
        if let Some(dir) = &self.csv_dir {
            let table_dir = dir.join(table);
            fs_err::create_dir_all(&table_dir).map_err(|err| Error::Io {
                path: table_dir,
                source: err,
            })?;
            router.push(Box::new(CsvSink::new(dir)));
        }
        if let (Some(options), Some(schema)) = (&self.store, schema) {
            let mut store = Store::open(&options.path)
                .await
                .map_err(Error::OpenStore)?;
            store
                .ensure_tables(table_catalog::catalog().tables())
                .await
                .map_err(Error::OpenStore)?;
            router.push(Box::new(StoreSink::new(store, schema, options.mode)));
        }
        if router.is_empty() {
            tracing::warn!("no sinks enabled; partitions will be fetched and discarded");
        }

        if matches!(self.split, PartitionExpr::DatePart { .. }) {
            let summary = SummaryRecord::fetch(client, table, &self.split).await?;
            tracing::info!(
                "Data ranges from {} to {}",
                display_value(&summary.first_dt),
                display_value(&summary.last_dt),
            );
            if let Some(dir) = &self.csv_dir {
                let path = summary.write(dir, table)?;
                tracing::debug!(path = %path.display(), "wrote summary");
            }
        }

        let keys = resolve_keys(client, table, &self.split).await?;
        tracing::info!(
            keys = keys.len(),
            sinks = ?router.sink_names(),
            "resolved partition keys"
        );

        let mut stats = RunStats::default();
        for key in &keys {
            let batch =
                fetch_partition(client, table, &self.split, key, self.where_str.as_deref())
                    .await?;
            stats.partitions += 1;
            stats.rows += batch.len();

            let failures = router
                .route(&Partition {
                    table,
                    expr: &self.split,
                    key,
                    batch: &batch,
                })
                .await;
            stats.sink_failures += failures.len();

            if self.keep_going {
                continue;
            }
            if let Some(failure) = failures.into_iter().next() {
                return Err(Error::Sink {
                    sink: failure.sink,
                    key: key.label(),
                    source: failure.error,
                });
            }
        }

        tracing::info!(
            partitions = stats.partitions,
            rows = stats.rows,
            sink_failures = stats.sink_failures,
            "Finished splitting {table}"
        );
        Ok(stats)
    }
}

/// Strings without their JSON quotes; everything else as JSON.
fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
