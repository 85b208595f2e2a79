//! Fetching the rows of one partition.

use carto_client::{Client, QueryResponse, RemoteQueryError, Row};

use crate::{
    partition::{PartitionExpr, PartitionKey},
    sql,
};

/// The rows returned for one partition key, plus the column order to write them in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowBatch {
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

impl RowBatch {
    /// Build a batch from a query response.
    ///
    /// Columns come from the response's field metadata. When the service sends none, they
    /// are the row keys in first-seen order.
    pub fn from_response(response: QueryResponse) -> Self {
        let QueryResponse { rows, fields, .. } = response;
        let columns = if fields.is_empty() {
            columns_in_first_seen_order(&rows)
        } else {
            fields.names()
        };
        Self { columns, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn columns_in_first_seen_order(rows: &[Row]) -> Vec<String> {
    let mut columns: Vec<String> = Vec::new();
    for key in rows.iter().flat_map(|row| row.keys()) {
        if !columns.contains(key) {
            columns.push(key.clone());
        }
    }
    columns
}

/// Fetch every row of one partition in a single call.
///
/// There is no paging: if the service caps response size, large partitions come back
/// truncated.
#[tracing::instrument(skip_all, fields(table = %table, partition = %expr, key = %key), err)]
pub async fn fetch_partition(
    client: &Client,
    table: &str,
    expr: &PartitionExpr,
    key: &PartitionKey,
    extra_predicate: Option<&str>,
) -> Result<RowBatch, RemoteQueryError> {
    let query = sql::partition_rows(table, expr, key, extra_predicate);
    let batch = RowBatch::from_response(client.execute(&query).await?);

    tracing::info!(
        table,
        partition = %expr,
        key = %key,
        filter = extra_predicate.unwrap_or_default(),
        rows = batch.len(),
        "Downloaded from {table} for {expr}: {key} ({} rows)",
        batch.len(),
    );

    Ok(batch)
}
