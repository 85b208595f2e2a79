//! The local SQLite store.
//!
//! One long-lived connection per invocation. Every catalog table is created up front with
//! `CREATE TABLE IF NOT EXISTS`, so the store file accumulates records across runs; there
//! are no migrations and a schema change needs a fresh file.
//!
//! Rows are written in one of two modes:
//!
//! - [`WriteMode::Strict`]: one record per statement, each committed on its own. A record
//!   that fails validation or violates a constraint is logged and skipped.
//! - [`WriteMode::Bulk`]: every record is validated first, then all are inserted in one
//!   transaction. Any failure leaves the store untouched.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use carto_client::Row;
use monitoring::logging;
use sqlx::{
    ConnectOptions as _, Connection as _, SqliteConnection,
    sqlite::{SqliteArguments, SqliteConnectOptions},
};
use table_catalog::{Record, RecordValidationError, SqlValue, TableSchema};

use crate::router::{Partition, Sink, SinkError};

/// How records are committed to the store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WriteMode {
    /// Commit each record on its own and skip the ones that fail.
    Strict,
    /// Commit the whole batch in one transaction, or nothing.
    #[default]
    Bulk,
}

/// Outcome of writing one batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteReport {
    pub inserted: usize,
    pub skipped: usize,
}

/// Failure opening the store or creating its tables.
#[derive(Debug, thiserror::Error)]
pub enum OpenStoreError {
    /// The database file could not be opened or created.
    #[error("failed to open {}", path.display())]
    Connect {
        path: PathBuf,
        #[source]
        source: sqlx::Error,
    },

    /// A table or index could not be created.
    #[error("failed to create table `{table}`")]
    CreateTable {
        table: &'static str,
        #[source]
        source: sqlx::Error,
    },
}

/// A bulk-mode batch was rejected as a whole.
///
/// Nothing from the batch is committed.
#[derive(Debug, thiserror::Error)]
pub enum BatchInsertError {
    /// A record failed type coercion or a non-null check.
    ///
    /// Detected before the transaction is opened.
    #[error("record {index} is invalid")]
    Validation {
        index: usize,
        #[source]
        source: RecordValidationError,
    },

    /// The store rejected a record, e.g. a duplicate primary key.
    ///
    /// The transaction is rolled back.
    #[error("failed to insert record {index}")]
    Insert {
        index: usize,
        #[source]
        source: sqlx::Error,
    },

    /// The transaction could not be started or committed.
    #[error("batch transaction failed")]
    Transaction(#[source] sqlx::Error),
}

/// A single-writer session on the store file.
#[derive(Debug)]
pub struct Store {
    conn: SqliteConnection,
    path: PathBuf,
}

impl Store {
    /// Open the store file, creating it if it does not exist.
    #[tracing::instrument(skip_all, fields(path = %path.as_ref().display()), err)]
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, OpenStoreError> {
        let path = path.as_ref().to_path_buf();
        let conn = SqliteConnectOptions::new()
            .filename(&path)
            .create_if_missing(true)
            .connect()
            .await
            .map_err(|err| OpenStoreError::Connect {
                path: path.clone(),
                source: err,
            })?;

        Ok(Self { conn, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create every given table, and its indexes, unless it already exists.
    pub async fn ensure_tables<'a>(
        &mut self,
        tables: impl IntoIterator<Item = &'a TableSchema>,
    ) -> Result<(), OpenStoreError> {
        for table in tables {
            let create_err = |err| OpenStoreError::CreateTable {
                table: table.name(),
                source: err,
            };

            sqlx::query(&create_table_sql(table))
                .execute(&mut self.conn)
                .await
                .map_err(create_err)?;
            for index in create_index_sql(table) {
                sqlx::query(&index)
                    .execute(&mut self.conn)
                    .await
                    .map_err(create_err)?;
            }
            tracing::debug!(table = table.name(), "ensured table");
        }
        Ok(())
    }

    /// Validate and insert a batch of raw rows into the schema's table.
    ///
    /// In strict mode this never fails: bad records are logged and counted as skipped.
    pub async fn insert(
        &mut self,
        schema: &TableSchema,
        rows: &[Row],
        mode: WriteMode,
    ) -> Result<WriteReport, BatchInsertError> {
        match mode {
            WriteMode::Strict => Ok(self.insert_strict(schema, rows).await),
            WriteMode::Bulk => self.insert_bulk(schema, rows).await,
        }
    }

    async fn insert_strict(&mut self, schema: &TableSchema, rows: &[Row]) -> WriteReport {
        let sql = insert_sql(schema);
        let mut report = WriteReport::default();

        for (index, row) in rows.iter().enumerate() {
            let record = match table_catalog::validate(schema, row) {
                Ok(record) => record,
                Err(err) => {
                    tracing::warn!(
                        table = schema.name(),
                        index,
                        record = %render_row(row),
                        error = %err,
                        "skipping invalid record",
                    );
                    report.skipped += 1;
                    continue;
                }
            };

            match bind_record(&sql, &record).execute(&mut self.conn).await {
                Ok(_) => report.inserted += 1,
                Err(err) => {
                    tracing::warn!(
                        table = schema.name(),
                        index,
                        record = %render_row(row),
                        error = %err,
                        error_source = logging::error_source(&err),
                        "skipping record rejected by the store",
                    );
                    report.skipped += 1;
                }
            }
        }

        report
    }

    async fn insert_bulk(
        &mut self,
        schema: &TableSchema,
        rows: &[Row],
    ) -> Result<WriteReport, BatchInsertError> {
        let records = rows
            .iter()
            .enumerate()
            .map(|(index, row)| {
                table_catalog::validate(schema, row)
                    .map_err(|err| BatchInsertError::Validation { index, source: err })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let sql = insert_sql(schema);
        let mut tx = self
            .conn
            .begin()
            .await
            .map_err(BatchInsertError::Transaction)?;
        for (index, record) in records.iter().enumerate() {
            // Dropping `tx` on the error path rolls the batch back.
            bind_record(&sql, record)
                .execute(&mut *tx)
                .await
                .map_err(|err| BatchInsertError::Insert { index, source: err })?;
        }
        tx.commit().await.map_err(BatchInsertError::Transaction)?;

        Ok(WriteReport {
            inserted: records.len(),
            skipped: 0,
        })
    }

    /// Number of rows currently stored in a table.
    pub async fn count(&mut self, table: &TableSchema) -> Result<i64, sqlx::Error> {
        let sql = format!("SELECT count(*) FROM {}", quote_ident(table.name()));
        sqlx::query_scalar(&sql).fetch_one(&mut self.conn).await
    }

    /// Close the connection, flushing any pending work.
    pub async fn close(self) -> Result<(), sqlx::Error> {
        self.conn.close().await
    }
}

/// Writes each partition into the store table registered for the remote table.
#[derive(Debug)]
pub struct StoreSink {
    store: Store,
    schema: &'static TableSchema,
    mode: WriteMode,
}

impl StoreSink {
    pub fn new(store: Store, schema: &'static TableSchema, mode: WriteMode) -> Self {
        Self {
            store,
            schema,
            mode,
        }
    }
}

#[async_trait]
impl Sink for StoreSink {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    async fn write(&mut self, partition: &Partition<'_>) -> Result<(), SinkError> {
        let report = self
            .store
            .insert(self.schema, &partition.batch.rows, self.mode)
            .await?;

        tracing::debug!(
            table = self.schema.name(),
            key = %partition.key,
            inserted = report.inserted,
            skipped = report.skipped,
            "wrote partition to store",
        );
        if report.skipped > 0 {
            tracing::warn!(
                table = self.schema.name(),
                key = %partition.key,
                skipped = report.skipped,
                "some records were not stored",
            );
        }
        Ok(())
    }
}

type InsertQuery<'q> = sqlx::query::Query<'q, sqlx::Sqlite, SqliteArguments<'q>>;

fn bind_record<'q>(sql: &'q str, record: &'q Record) -> InsertQuery<'q> {
    record
        .values()
        .iter()
        .fold(sqlx::query(sql), |query, value| match value {
            SqlValue::Null => query.bind(None::<String>),
            SqlValue::Integer(i) => query.bind(*i),
            SqlValue::Real(f) => query.bind(*f),
            SqlValue::Text(s) => query.bind(s.as_str()),
        })
}

fn render_row(row: &Row) -> String {
    serde_json::to_string(row).unwrap_or_else(|err| format!("<unprintable row: {err}>"))
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn create_table_sql(table: &TableSchema) -> String {
    let mut columns: Vec<String> = table
        .fields()
        .iter()
        .map(|field| {
            let null = if field.nullable { "" } else { " NOT NULL" };
            format!(
                "{} {}{null}",
                quote_ident(field.name),
                field.field_type.sql_type()
            )
        })
        .collect();

    let key: Vec<String> = table
        .primary_key()
        .map(|field| quote_ident(field.name))
        .collect();
    if !key.is_empty() {
        columns.push(format!("PRIMARY KEY ({})", key.join(", ")));
    }

    format!(
        "CREATE TABLE IF NOT EXISTS {} ({})",
        quote_ident(table.name()),
        columns.join(", ")
    )
}

fn create_index_sql(table: &TableSchema) -> Vec<String> {
    table
        .fields()
        .iter()
        .filter(|field| field.indexed)
        .map(|field| {
            format!(
                "CREATE INDEX IF NOT EXISTS {} ON {} ({})",
                quote_ident(&format!("ix_{}_{}", table.name(), field.name)),
                quote_ident(table.name()),
                quote_ident(field.name)
            )
        })
        .collect()
}

fn insert_sql(table: &TableSchema) -> String {
    let names: Vec<String> = table
        .fields()
        .iter()
        .map(|field| quote_ident(field.name))
        .collect();
    let placeholders = vec!["?"; names.len()].join(", ");
    format!(
        "INSERT INTO {} ({}) VALUES ({placeholders})",
        quote_ident(table.name()),
        names.join(", ")
    )
}
