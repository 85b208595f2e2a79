//! One CSV file per partition.
//!
//! Files land at `<dir>/<table>/<table>_<field>_<key>.csv` and are overwritten on every run.
//! An empty partition still produces a file with the header row. The header comes from the
//! response's field metadata, so the file is zero bytes only when the service sends none.
//!
//! Null and the empty string both become an empty cell; the two are not distinguishable when
//! the file is read back.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::Value;

use crate::{
    fetch::RowBatch,
    partition::PartitionKey,
    router::{Partition, Sink, SinkError},
};

/// Failure writing a partition's CSV file.
#[derive(Debug, thiserror::Error)]
pub enum CsvSinkError {
    /// The file or its directory could not be created.
    #[error("failed to write {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A record could not be encoded.
    #[error("failed to encode CSV record into {}", path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

/// Writes every partition into a CSV file under a root directory.
#[derive(Debug, Clone)]
pub struct CsvSink {
    dir: PathBuf,
}

impl CsvSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[async_trait]
impl Sink for CsvSink {
    fn name(&self) -> &'static str {
        "csv"
    }

    async fn write(&mut self, partition: &Partition<'_>) -> Result<(), SinkError> {
        let path = write_csv(
            &self.dir,
            partition.batch,
            partition.table,
            partition.expr.field_label(),
            partition.key,
        )?;
        tracing::debug!(path = %path.display(), rows = partition.batch.len(), "wrote CSV");
        Ok(())
    }
}

/// Path of the CSV file for one partition.
///
/// The key is written with [`PartitionKey::file_label`], so every key maps to its own file
/// directly inside the table directory.
pub fn csv_path(dir: &Path, table: &str, field: &str, key: &PartitionKey) -> PathBuf {
    let key = key.file_label();
    dir.join(table).join(format!("{table}_{field}_{key}.csv"))
}

/// Serialize a batch to its partition file, replacing any previous file.
pub fn write_csv(
    dir: &Path,
    batch: &RowBatch,
    table: &str,
    field: &str,
    key: &PartitionKey,
) -> Result<PathBuf, CsvSinkError> {
    let path = csv_path(dir, table, field, key);
    let io_err = |source| CsvSinkError::Io {
        path: path.clone(),
        source,
    };
    let encode_err = |source| CsvSinkError::Encode {
        path: path.clone(),
        source,
    };

    if let Some(parent) = path.parent() {
        fs_err::create_dir_all(parent).map_err(io_err)?;
    }
    let file = fs_err::File::create(&path).map_err(io_err)?;
    let mut writer = csv::Writer::from_writer(file);

    if !batch.columns.is_empty() {
        writer.write_record(&batch.columns).map_err(encode_err)?;
    }
    for row in &batch.rows {
        let record = batch
            .columns
            .iter()
            .map(|column| render_cell(row.get(column)));
        writer.write_record(record).map_err(encode_err)?;
    }
    writer.flush().map_err(io_err)?;

    Ok(path)
}

fn render_cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}
