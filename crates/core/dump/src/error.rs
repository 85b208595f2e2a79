//! Errors of the split-and-persist pipeline.

use std::path::PathBuf;

use carto_client::RemoteQueryError;
use table_catalog::UnregisteredTableError;

use crate::{router::SinkError, sql::InvalidIdentifierError, store::OpenStoreError};

/// Failure of a whole pipeline invocation.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A remote SQL call did not return rows.
    ///
    /// Aborts the invocation. A re-run starts over from the first partition key.
    #[error("remote query failed")]
    Query(#[source] RemoteQueryError),

    /// A table or column name is not a plain SQL identifier.
    #[error("refusing to build SQL from an unsafe identifier")]
    InvalidIdentifier(#[source] InvalidIdentifierError),

    /// The partition column does not exist or has the wrong type.
    ///
    /// Raised before any partition data is fetched.
    #[error("invalid partition column")]
    InvalidColumn(#[source] InvalidColumnError),

    /// The relational sink was requested for a table with no registered schema.
    ///
    /// Raised before any remote query is sent.
    #[error("cannot write table to the local store")]
    UnregisteredTable(#[source] UnregisteredTableError),

    /// The local store could not be opened or its tables could not be created.
    #[error("failed to open the local store")]
    OpenStore(#[source] OpenStoreError),

    /// A sink failed to persist a partition.
    #[error("{sink} sink failed for partition `{key}`")]
    Sink {
        sink: &'static str,
        key: String,
        #[source]
        source: SinkError,
    },

    /// A local file or directory could not be written.
    #[error("failed to write {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A JSON document could not be serialized.
    #[error("failed to serialize {}", path.display())]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl From<RemoteQueryError> for Error {
    fn from(err: RemoteQueryError) -> Self {
        Self::Query(err)
    }
}

impl From<InvalidIdentifierError> for Error {
    fn from(err: InvalidIdentifierError) -> Self {
        Self::InvalidIdentifier(err)
    }
}

impl From<InvalidColumnError> for Error {
    fn from(err: InvalidColumnError) -> Self {
        Self::InvalidColumn(err)
    }
}

impl From<UnregisteredTableError> for Error {
    fn from(err: UnregisteredTableError) -> Self {
        Self::UnregisteredTable(err)
    }
}

/// A caller-specified column is unusable for the requested split.
///
/// Both variants list the columns the table actually has, as discovered by the zero-row
/// probe.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidColumnError {
    /// The column does not exist in the table.
    #[error("column `{column}` not in `{table}`. Columns: [{}]", available.join(", "))]
    Missing {
        table: String,
        column: String,
        available: Vec<String>,
    },

    /// A temporal split was requested on a column that is not date-typed.
    #[error(
        "column `{column}` in `{table}` has type `{actual_type}`, not `date`. Columns: [{}]",
        available.join(", ")
    )]
    NotDate {
        table: String,
        column: String,
        actual_type: String,
        available: Vec<String>,
    },
}
