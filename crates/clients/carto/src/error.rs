//! Error types for the SQL API client.

/// The remote call did not produce the expected row-bearing response.
///
/// Every variant carries the SQL statement that was sent so the failure can be diagnosed
/// without re-running the invocation.
#[derive(Debug, thiserror::Error)]
pub enum RemoteQueryError {
    /// The request could not be sent or no response was received.
    ///
    /// Covers DNS failures, refused connections and dropped sockets.
    #[error("failed to send SQL request\n\n{sql}")]
    Network {
        sql: String,
        #[source]
        source: reqwest::Error,
    },

    /// The response body could not be read.
    #[error("failed to read SQL response body\n\n{sql}")]
    ReadBody {
        sql: String,
        #[source]
        source: reqwest::Error,
    },

    /// The response has no `rows` key.
    ///
    /// This is how the service reports malformed SQL, unknown relations and any other
    /// server-side failure. The raw response body is kept verbatim.
    #[error("{sql}\n\n{response}")]
    MissingRows { sql: String, response: String },

    /// The response has a `rows` key but its contents are not a list of row objects.
    #[error("malformed SQL response\n\n{sql}")]
    Decode {
        sql: String,
        #[source]
        source: serde_json::Error,
    },
}

impl RemoteQueryError {
    /// The SQL statement that triggered the error.
    pub fn sql(&self) -> &str {
        match self {
            Self::Network { sql, .. }
            | Self::ReadBody { sql, .. }
            | Self::MissingRows { sql, .. }
            | Self::Decode { sql, .. } => sql,
        }
    }
}
