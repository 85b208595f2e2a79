//! Validation of raw result rows against a registered table schema.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::{Map, Number, Value};

use crate::{FieldDef, FieldType, TableSchema};

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// A typed scalar ready to be bound into an insert statement.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
}

/// A validated row: one value per schema field, in schema order.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    values: Vec<SqlValue>,
}

impl Record {
    pub fn values(&self) -> &[SqlValue] {
        &self.values
    }

    pub fn into_values(self) -> Vec<SqlValue> {
        self.values
    }
}

/// A single row could not be converted to the registered record shape.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("invalid value for field `{field}`: {kind}")]
pub struct RecordValidationError {
    pub field: &'static str,
    pub kind: ValidationErrorKind,
}

/// Why a field value was rejected.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationErrorKind {
    /// A non-nullable field is null or absent from the row.
    #[error("value is required but was null or missing")]
    Missing,

    /// The JSON value has a type that cannot be converted to the field type.
    #[error("expected {expected}, found JSON {found}")]
    TypeMismatch {
        expected: FieldType,
        found: &'static str,
    },

    /// The value does not represent a whole number.
    #[error("`{value}` is not an integer")]
    InvalidInteger { value: String },

    /// The value is a whole number outside the 64-bit signed range.
    #[error("`{value}` does not fit in a 64-bit integer")]
    IntegerOutOfRange { value: String },

    /// The value does not represent a number.
    #[error("`{value}` is not a number")]
    InvalidReal { value: String },

    /// The value is not a recognised date.
    #[error("`{value}` is not a date")]
    InvalidDate { value: String },

    /// The value is not a recognised timestamp.
    #[error("`{value}` is not a timestamp")]
    InvalidTimestamp { value: String },
}

/// Validate a raw row against a table schema.
///
/// Fields absent from the row are treated as null. Row entries that the schema does not
/// declare are ignored.
pub fn validate(
    schema: &TableSchema,
    row: &Map<String, Value>,
) -> Result<Record, RecordValidationError> {
    let values = schema
        .fields()
        .iter()
        .map(|field| {
            coerce_field(field, row.get(field.name)).map_err(|kind| RecordValidationError {
                field: field.name,
                kind,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Record { values })
}

fn coerce_field(field: &FieldDef, value: Option<&Value>) -> Result<SqlValue, ValidationErrorKind> {
    match value {
        None | Some(Value::Null) if field.nullable => Ok(SqlValue::Null),
        None | Some(Value::Null) => Err(ValidationErrorKind::Missing),
        Some(value) => coerce(field.field_type, value),
    }
}

fn coerce(field_type: FieldType, value: &Value) -> Result<SqlValue, ValidationErrorKind> {
    let mismatch = || ValidationErrorKind::TypeMismatch {
        expected: field_type,
        found: json_type_name(value),
    };

    match field_type {
        FieldType::Integer => match value {
            Value::Number(n) => integer_from_number(n),
            Value::Bool(b) => Ok(SqlValue::Integer(i64::from(*b))),
            Value::String(s) => s
                .trim()
                .parse::<i64>()
                .map(SqlValue::Integer)
                .map_err(|_| ValidationErrorKind::InvalidInteger { value: s.clone() }),
            _ => Err(mismatch()),
        },
        FieldType::Real => match value {
            Value::Number(n) => n
                .as_f64()
                .map(SqlValue::Real)
                .ok_or_else(|| ValidationErrorKind::InvalidReal {
                    value: n.to_string(),
                }),
            Value::Bool(b) => Ok(SqlValue::Real(if *b { 1.0 } else { 0.0 })),
            Value::String(s) => s
                .trim()
                .parse::<f64>()
                .map(SqlValue::Real)
                .map_err(|_| ValidationErrorKind::InvalidReal { value: s.clone() }),
            _ => Err(mismatch()),
        },
        FieldType::Text => match value {
            Value::String(s) => Ok(SqlValue::Text(s.clone())),
            other => Ok(SqlValue::Text(other.to_string())),
        },
        FieldType::Date => match value {
            Value::String(s) => parse_date(s)
                .map(|date| SqlValue::Text(date.format(DATE_FORMAT).to_string()))
                .ok_or_else(|| ValidationErrorKind::InvalidDate { value: s.clone() }),
            _ => Err(mismatch()),
        },
        FieldType::Timestamp => match value {
            Value::String(s) => parse_timestamp(s)
                .map(|ts| SqlValue::Text(ts.format(TIMESTAMP_FORMAT).to_string()))
                .ok_or_else(|| ValidationErrorKind::InvalidTimestamp { value: s.clone() }),
            _ => Err(mismatch()),
        },
    }
}

fn integer_from_number(n: &Number) -> Result<SqlValue, ValidationErrorKind> {
    if let Some(i) = n.as_i64() {
        return Ok(SqlValue::Integer(i));
    }
    if n.is_u64() {
        return Err(ValidationErrorKind::IntegerOutOfRange {
            value: n.to_string(),
        });
    }

    // Remaining case: a float. Accept it only when it is integral and in range.
    let f = n.as_f64().unwrap_or(f64::NAN);
    if f.fract() != 0.0 || !f.is_finite() {
        return Err(ValidationErrorKind::InvalidInteger {
            value: n.to_string(),
        });
    }
    if f < i64::MIN as f64 || f >= i64::MAX as f64 {
        return Err(ValidationErrorKind::IntegerOutOfRange {
            value: n.to_string(),
        });
    }
    Ok(SqlValue::Integer(f as i64))
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, DATE_FORMAT)
        .ok()
        .or_else(|| parse_timestamp(s).map(|ts| ts.date()))
}

/// Parse the timestamp spellings the remote service emits.
///
/// Offsets are normalised to UTC; a trailing `Z` without an offset is treated as UTC; a bare
/// date is midnight.
fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
        return Some(ts.naive_utc());
    }

    let naive = s.strip_suffix('Z').unwrap_or(s);
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(naive, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(naive, DATE_FORMAT)
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
