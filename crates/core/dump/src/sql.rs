//! SQL text sent to the remote service.
//!
//! The remote endpoint takes a bare SQL string, so every statement is built by
//! interpolation. Table and column names must pass [`check_identifier`] first; partition
//! keys are rendered as quoted string literals by [`quote_literal`]. The caller-supplied
//! extra predicate is appended verbatim and is NOT sanitised.

use crate::partition::{PartitionExpr, PartitionKey};

/// Alias under which the distinct-keys query returns each key.
pub const SPLIT_FIELD: &str = "split_field";

/// A name that cannot be safely interpolated into SQL.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("`{name}` is not a valid SQL identifier")]
pub struct InvalidIdentifierError {
    pub name: String,
}

/// Accept `name` or `schema.name` where each part matches `[A-Za-z_][A-Za-z0-9_]*`.
pub fn check_identifier(name: &str) -> Result<&str, InvalidIdentifierError> {
    let is_plain = |part: &str| {
        let mut chars = part.chars();
        matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
            && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
    };

    let parts: Vec<&str> = name.split('.').collect();
    if parts.len() <= 2 && parts.iter().all(|part| is_plain(part)) {
        Ok(name)
    } else {
        Err(InvalidIdentifierError {
            name: name.to_string(),
        })
    }
}

/// Render a text value as a single-quoted SQL literal, doubling embedded quotes.
pub fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// Zero-row query used to discover a table's columns and their types.
pub fn probe(table: &str) -> String {
    format!("SELECT * FROM {table} LIMIT 0")
}

/// The first `limit` rows of a table.
pub fn sample(table: &str, limit: u64) -> String {
    format!("SELECT * FROM {table} LIMIT {limit}")
}

/// Distinct values of the partition expression, ascending.
pub fn distinct_keys(table: &str, expr: &PartitionExpr) -> String {
    format!("SELECT DISTINCT({expr}) AS {SPLIT_FIELD} FROM {table} ORDER BY {SPLIT_FIELD}")
}

/// All rows of one partition, optionally narrowed by an extra predicate.
///
/// A null key is matched with `IS NULL`; any other key is compared as a quoted literal.
pub fn partition_rows(
    table: &str,
    expr: &PartitionExpr,
    key: &PartitionKey,
    extra_predicate: Option<&str>,
) -> String {
    let mut sql = format!("SELECT * FROM {table} WHERE {expr} {}", key_predicate(key));
    if let Some(predicate) = extra_predicate {
        sql.push_str(" AND ");
        sql.push_str(predicate);
    }
    sql
}

/// Earliest and latest value of a column, as `first_dt` and `last_dt`.
pub fn bounds(table: &str, column: &str) -> String {
    format!("SELECT min({column}) AS first_dt, max({column}) AS last_dt FROM {table} LIMIT 1")
}

/// Row count per partition key, as `dt` and `num_rows`, ascending by key.
pub fn value_counts(table: &str, expr: &PartitionExpr) -> String {
    format!(
        "SELECT {expr} AS dt, count(*) AS num_rows FROM {table} GROUP BY {expr} ORDER BY {expr} ASC"
    )
}

fn key_predicate(key: &PartitionKey) -> String {
    match key.literal() {
        None => "IS NULL".to_string(),
        Some(value) => format!("= {}", quote_literal(&value)),
    }
}
