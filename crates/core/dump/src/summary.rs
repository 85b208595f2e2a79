//! Summary manifest of a temporal split.

use std::path::{Path, PathBuf};

use carto_client::{Client, RemoteQueryError};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::{
    Error,
    partition::{PartitionExpr, PartitionKey},
    sql,
};

/// File name of the manifest inside the table's CSV directory.
pub const SUMMARY_FILE_NAME: &str = "summary.json";

/// Bounds of the split column and the number of rows per partition key.
///
/// Computed before any partition is fetched, over the whole table.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SummaryRecord {
    pub first_dt: Value,
    pub last_dt: Value,
    /// Row count keyed by [`PartitionKey::file_label`], ascending by key.
    pub value_counts: Map<String, Value>,
}

impl SummaryRecord {
    /// Compute the summary of a temporal split with two remote queries.
    #[tracing::instrument(skip(client), fields(partition = %expr), err)]
    pub async fn fetch(
        client: &Client,
        table: &str,
        expr: &PartitionExpr,
    ) -> Result<Self, RemoteQueryError> {
        let bounds = client
            .execute(&sql::bounds(table, expr.source_column()))
            .await?;
        let mut first = bounds.rows.into_iter().next().unwrap_or_default();

        let counts = client.execute(&sql::value_counts(table, expr)).await?;
        let value_counts = counts
            .rows
            .into_iter()
            .map(|mut row| {
                let key = PartitionKey::from(row.remove("dt").unwrap_or(Value::Null));
                let count = row.remove("num_rows").unwrap_or(Value::Null);
                (key.file_label(), count)
            })
            .collect();

        Ok(Self {
            first_dt: first.remove("first_dt").unwrap_or(Value::Null),
            last_dt: first.remove("last_dt").unwrap_or(Value::Null),
            value_counts,
        })
    }

    /// Write the manifest as `<dir>/<table>/summary.json`, replacing any previous one.
    pub fn write(&self, dir: &Path, table: &str) -> Result<PathBuf, Error> {
        let table_dir = dir.join(table);
        fs_err::create_dir_all(&table_dir).map_err(|err| Error::Io {
            path: table_dir.clone(),
            source: err,
        })?;

        let path = table_dir.join(SUMMARY_FILE_NAME);
        let json = serde_json::to_vec(self).map_err(|err| Error::Serialize {
            path: path.clone(),
            source: err,
        })?;
        fs_err::write(&path, json).map_err(|err| Error::Io {
            path: path.clone(),
            source: err,
        })?;

        Ok(path)
    }
}
