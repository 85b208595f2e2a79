//! Sampling a few rows of a table into individual JSON files.

use std::path::{Path, PathBuf};

use carto_client::Client;
use serde_json::Value;

use crate::{Error, InvalidColumnError, partition::PartitionKey, sql};

/// Number of rows sampled when the caller does not say otherwise.
pub const DEFAULT_SAMPLE_LIMIT: u64 = 10;

/// Fetch the first `limit` rows of `table` and write each one as pretty-printed JSON to
/// `<dir>/<table>/<value of column>.json`, the value written as a
/// [`PartitionKey::file_label`].
///
/// Rows sharing a `column` value overwrite each other; the last one wins. Returns the paths
/// written, one per row.
#[tracing::instrument(skip(client, dir), err)]
pub async fn sample_rows(
    client: &Client,
    table: &str,
    column: &str,
    limit: u64,
    dir: &Path,
) -> Result<Vec<PathBuf>, Error> {
    let table = sql::check_identifier(table)?;

    let probe = client.execute(&sql::probe(table)).await?;
    if probe.fields.get(column).is_none() {
        return Err(InvalidColumnError::Missing {
            table: table.to_string(),
            column: column.to_string(),
            available: probe.fields.names(),
        }
        .into());
    }

    let response = client.execute(&sql::sample(table, limit)).await?;

    let table_dir = dir.join(table);
    fs_err::create_dir_all(&table_dir).map_err(|err| Error::Io {
        path: table_dir.clone(),
        source: err,
    })?;

    let mut paths = Vec::with_capacity(response.rows.len());
    for row in &response.rows {
        let key = PartitionKey::from(row.get(column).cloned().unwrap_or(Value::Null));
        let path = table_dir.join(format!("{}.json", key.file_label()));

        let json = serde_json::to_vec_pretty(row).map_err(|err| Error::Serialize {
            path: path.clone(),
            source: err,
        })?;
        fs_err::write(&path, json).map_err(|err| Error::Io {
            path: path.clone(),
            source: err,
        })?;
        paths.push(path);
    }

    tracing::info!(table, rows = paths.len(), dir = %table_dir.display(), "Wrote sample rows");
    Ok(paths)
}
