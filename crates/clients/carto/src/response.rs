//! Response types of the SQL API.

use serde::{Deserialize, Deserializer, de::Error as _};
use serde_json::Value;

use crate::error::RemoteQueryError;

/// A single result row: column name to scalar value, in response order.
pub type Row = serde_json::Map<String, Value>;

/// Parsed body of a successful SQL API call.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QueryResponse {
    /// Result rows. Empty for `LIMIT 0` metadata probes.
    pub rows: Vec<Row>,
    /// Column metadata, in result order.
    #[serde(default, alias = "columns")]
    pub fields: Fields,
    /// Number of rows reported by the service.
    #[serde(default)]
    pub total_rows: Option<u64>,
    /// Server-side execution time in seconds.
    #[serde(default)]
    pub time: Option<f64>,
}

/// Type information for one column.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FieldInfo {
    /// Coarse type name, e.g. `number`, `string`, `date`, `geometry`.
    #[serde(rename = "type")]
    pub field_type: String,
    /// Underlying PostgreSQL type name, when reported.
    #[serde(default)]
    pub pgtype: Option<String>,
}

impl FieldInfo {
    /// Whether the column holds date or timestamp values.
    pub fn is_date(&self) -> bool {
        self.field_type == "date"
    }
}

/// A named column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    pub info: FieldInfo,
}

/// Ordered column metadata of a response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fields(Vec<Field>);

impl Fields {
    pub fn new(fields: Vec<Field>) -> Self {
        Self(fields)
    }

    /// Column names in result order.
    pub fn names(&self) -> Vec<String> {
        self.0.iter().map(|field| field.name.clone()).collect()
    }

    /// Look up a column by name.
    pub fn get(&self, name: &str) -> Option<&FieldInfo> {
        self.0
            .iter()
            .find(|field| field.name == name)
            .map(|field| &field.info)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Field> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'de> Deserialize<'de> for Fields {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let map = serde_json::Map::<String, Value>::deserialize(deserializer)?;
        map.into_iter()
            .map(|(name, info)| {
                serde_json::from_value::<FieldInfo>(info)
                    .map(|info| Field { name, info })
                    .map_err(D::Error::custom)
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Fields)
    }
}

/// Parse a raw response body.
///
/// Anything that is not a JSON object with a `rows` key is reported as
/// [`RemoteQueryError::MissingRows`] with the body attached.
pub(crate) fn parse(sql: &str, body: &str) -> Result<QueryResponse, RemoteQueryError> {
    let missing_rows = || RemoteQueryError::MissingRows {
        sql: sql.to_string(),
        response: body.to_string(),
    };

    let value: Value = serde_json::from_str(body).map_err(|_| missing_rows())?;
    if value.get("rows").is_none() {
        return Err(missing_rows());
    }

    serde_json::from_value(value).map_err(|err| RemoteQueryError::Decode {
        sql: sql.to_string(),
        source: err,
    })
}
