//! HTTP client for the Carto SQL API.
//!
//! The remote service accepts a SQL statement as form data (`q=<sql>`) and answers with a
//! JSON document carrying a `rows` array and, for most statements, a `fields` mapping from
//! column name to column type. The client treats the service as opaque: it sends the
//! statement verbatim and only checks that the answer has the row-bearing shape.

pub mod error;
pub mod response;

use url::Url;

pub use self::{
    error::RemoteQueryError,
    response::{Field, FieldInfo, Fields, QueryResponse, Row},
};

/// Public SQL endpoint of the City of Philadelphia open data portal.
pub const DEFAULT_SQL_URL: &str = "https://phl.carto.com/api/v2/sql";

/// HTTP client for a Carto SQL API endpoint.
///
/// No retries and no request timeout are configured; a hung remote call hangs the caller.
#[derive(Debug, Clone)]
pub struct Client {
    /// The underlying HTTP client
    http: reqwest::Client,
    /// Full URL of the SQL endpoint
    sql_url: Url,
}

impl Client {
    /// Create a new client for the given SQL endpoint.
    pub fn new(sql_url: Url) -> Self {
        Self::with_http_client(sql_url, reqwest::Client::new())
    }

    /// Create a client that sends requests through a preconfigured reqwest client.
    pub fn with_http_client(sql_url: Url, http: reqwest::Client) -> Self {
        Self { http, sql_url }
    }

    /// Get a reference to the SQL endpoint URL.
    pub fn sql_url(&self) -> &Url {
        &self.sql_url
    }

    /// Execute a SQL statement and return the parsed response.
    ///
    /// The statement is sent exactly as given; callers are responsible for quoting.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteQueryError`] when the request cannot be sent or when the response
    /// does not contain a `rows` array. HTTP error statuses, malformed SQL and service-side
    /// errors all surface as [`RemoteQueryError::MissingRows`] carrying the raw body.
    #[tracing::instrument(skip(self), err)]
    pub async fn execute(&self, sql: &str) -> Result<QueryResponse, RemoteQueryError> {
        tracing::debug!("Sending SQL request");

        let response = self
            .http
            .post(self.sql_url.clone())
            .form(&[("q", sql)])
            .send()
            .await
            .map_err(|err| RemoteQueryError::Network {
                sql: sql.to_string(),
                source: err,
            })?;

        let status = response.status();
        tracing::debug!(status = %status, "Received SQL API response");

        let body = response
            .text()
            .await
            .map_err(|err| RemoteQueryError::ReadBody {
                sql: sql.to_string(),
                source: err,
            })?;

        response::parse(sql, &body)
    }
}
