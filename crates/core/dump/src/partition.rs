//! Partition expressions, partition keys and key resolution.

use std::{fmt, str::FromStr};

use carto_client::{Client, Fields, RemoteQueryError};
use serde_json::{Number, Value};

use crate::{InvalidColumnError, sql};

/// A date part accepted by the remote engine's `extract()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatePart {
    Year,
    Quarter,
    Month,
}

impl DatePart {
    pub fn as_str(self) -> &'static str {
        match self {
            DatePart::Year => "year",
            DatePart::Quarter => "quarter",
            DatePart::Month => "month",
        }
    }
}

impl fmt::Display for DatePart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DatePart {
    type Err = UnknownDatePartError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "year" => Ok(DatePart::Year),
            "quarter" => Ok(DatePart::Quarter),
            "month" => Ok(DatePart::Month),
            _ => Err(UnknownDatePartError(s.to_string())),
        }
    }
}

/// The date part name is not one of `year`, `quarter` or `month`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown date part `{0}` (expected one of: year, quarter, month)")]
pub struct UnknownDatePartError(pub String);

/// What a table is split on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PartitionExpr {
    /// Each distinct value of a column is one partition.
    Column(String),
    /// Each distinct date part of a date-typed column is one partition.
    DatePart { column: String, part: DatePart },
}

impl PartitionExpr {
    pub fn column(column: impl Into<String>) -> Self {
        PartitionExpr::Column(column.into())
    }

    pub fn date_part(column: impl Into<String>, part: DatePart) -> Self {
        PartitionExpr::DatePart {
            column: column.into(),
            part,
        }
    }

    /// The underlying table column.
    pub fn source_column(&self) -> &str {
        match self {
            PartitionExpr::Column(column) | PartitionExpr::DatePart { column, .. } => column,
        }
    }

    /// Name used for the partition field in output file names: the column for categorical
    /// splits, the date part for temporal ones.
    pub fn field_label(&self) -> &str {
        match self {
            PartitionExpr::Column(column) => column,
            PartitionExpr::DatePart { part, .. } => part.as_str(),
        }
    }
}

impl fmt::Display for PartitionExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PartitionExpr::Column(column) => f.write_str(column),
            PartitionExpr::DatePart { column, part } => write!(f, "extract({part} from {column})"),
        }
    }
}

const NULL_LABEL: &str = "null";

/// One distinct value of a partition expression.
///
/// Null is a valid key of its own and is matched with `IS NULL`.
#[derive(Debug, Clone, PartialEq)]
pub enum PartitionKey {
    Null,
    Bool(bool),
    Number(Number),
    Text(String),
}

impl PartitionKey {
    /// The key's textual value for a SQL comparison, or `None` for the null key.
    pub fn literal(&self) -> Option<String> {
        match self {
            PartitionKey::Null => None,
            PartitionKey::Bool(b) => Some(b.to_string()),
            PartitionKey::Number(n) => Some(n.to_string()),
            PartitionKey::Text(s) => Some(s.clone()),
        }
    }

    /// The key as it appears in logs.
    pub fn label(&self) -> String {
        self.literal().unwrap_or_else(|| NULL_LABEL.to_string())
    }

    /// The key as it appears in file names and summary manifests.
    ///
    /// Distinct keys always get distinct labels: `%`, `/` and `\` are percent-encoded, and a
    /// text key spelled `null` is written `%6Eull` so it cannot clash with the null key.
    pub fn file_label(&self) -> String {
        let Some(literal) = self.literal() else {
            return NULL_LABEL.to_string();
        };
        if literal == NULL_LABEL {
            return "%6Eull".to_string();
        }

        let mut label = String::with_capacity(literal.len());
        for c in literal.chars() {
            match c {
                '%' => label.push_str("%25"),
                '/' => label.push_str("%2F"),
                '\\' => label.push_str("%5C"),
                c => label.push(c),
            }
        }
        label
    }

    pub fn is_null(&self) -> bool {
        matches!(self, PartitionKey::Null)
    }
}

impl From<Value> for PartitionKey {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => PartitionKey::Null,
            Value::Bool(b) => PartitionKey::Bool(b),
            Value::Number(n) => PartitionKey::Number(n),
            Value::String(s) => PartitionKey::Text(s),
            other => PartitionKey::Text(other.to_string()),
        }
    }
}

impl fmt::Display for PartitionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// Check the partition column against the columns discovered by a zero-row probe.
///
/// Temporal splits additionally require the column to be date-typed.
pub fn validate_column(
    table: &str,
    fields: &Fields,
    expr: &PartitionExpr,
) -> Result<(), InvalidColumnError> {
    let column = expr.source_column();
    let Some(info) = fields.get(column) else {
        return Err(InvalidColumnError::Missing {
            table: table.to_string(),
            column: column.to_string(),
            available: fields.names(),
        });
    };

    if matches!(expr, PartitionExpr::DatePart { .. }) && !info.is_date() {
        return Err(InvalidColumnError::NotDate {
            table: table.to_string(),
            column: column.to_string(),
            actual_type: info.field_type.clone(),
            available: fields.names(),
        });
    }

    Ok(())
}

/// Fetch the distinct partition keys of a table, in the order the remote engine sorts them.
///
/// The remote engine sorts NULL after every other value in ascending order.
#[tracing::instrument(skip(client), fields(partition = %expr), err)]
pub async fn resolve_keys(
    client: &Client,
    table: &str,
    expr: &PartitionExpr,
) -> Result<Vec<PartitionKey>, RemoteQueryError> {
    let response = client.execute(&sql::distinct_keys(table, expr)).await?;

    let keys: Vec<PartitionKey> = response
        .rows
        .into_iter()
        .map(|mut row| {
            row.remove(sql::SPLIT_FIELD)
                .map(PartitionKey::from)
                .unwrap_or(PartitionKey::Null)
        })
        .collect();

    tracing::debug!(count = keys.len(), "resolved partition keys");
    Ok(keys)
}
