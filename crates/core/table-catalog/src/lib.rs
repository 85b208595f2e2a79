//! Static catalog of the record shapes that can be written to the local store.
//!
//! Each remote table that the relational sink supports is registered here by name with an
//! ordered list of typed fields. The catalog is plain data built once at startup; looking up
//! a table that is not registered is a usage error ([`UnregisteredTableError`]).

use std::{
    collections::BTreeMap,
    fmt::{self, Display},
    sync::LazyLock,
};

mod record;
pub mod tables;

pub use self::record::{Record, RecordValidationError, SqlValue, ValidationErrorKind, validate};

static CATALOG: LazyLock<Catalog> = LazyLock::new(|| Catalog::from_tables(tables::all()));

/// The registry of all built-in tables.
pub fn catalog() -> &'static Catalog {
    &CATALOG
}

/// Scalar type of a catalog field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Integer,
    Real,
    Text,
    /// Calendar date, stored as `YYYY-MM-DD`.
    Date,
    /// Naive UTC timestamp, stored as `YYYY-MM-DD HH:MM:SS.ffffff`.
    Timestamp,
}

impl FieldType {
    /// Column type used in the local store's DDL.
    pub fn sql_type(self) -> &'static str {
        match self {
            FieldType::Integer => "INTEGER",
            FieldType::Real => "REAL",
            FieldType::Text => "TEXT",
            FieldType::Date => "DATE",
            FieldType::Timestamp => "DATETIME",
        }
    }
}

impl Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FieldType::Integer => "integer",
            FieldType::Real => "real",
            FieldType::Text => "text",
            FieldType::Date => "date",
            FieldType::Timestamp => "timestamp",
        };
        f.write_str(name)
    }
}

/// One field of a record shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDef {
    pub name: &'static str,
    pub field_type: FieldType,
    pub nullable: bool,
    pub primary_key: bool,
    /// Whether the local store keeps a secondary index on this field.
    pub indexed: bool,
}

impl FieldDef {
    /// A non-null field that is part of the primary key.
    pub const fn key(name: &'static str, field_type: FieldType) -> Self {
        Self {
            name,
            field_type,
            nullable: false,
            primary_key: true,
            indexed: false,
        }
    }

    /// A non-null field outside the primary key.
    pub const fn required(name: &'static str, field_type: FieldType) -> Self {
        Self {
            name,
            field_type,
            nullable: false,
            primary_key: false,
            indexed: false,
        }
    }

    /// A nullable field.
    pub const fn optional(name: &'static str, field_type: FieldType) -> Self {
        Self {
            name,
            field_type,
            nullable: true,
            primary_key: false,
            indexed: false,
        }
    }

    /// Request a secondary index on this field.
    pub const fn indexed(mut self) -> Self {
        self.indexed = true;
        self
    }
}

/// The conventional temporal split of a table: a date column and the part to extract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitHint {
    pub column: &'static str,
    pub date_part: &'static str,
}

/// The registered shape of one table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSchema {
    name: &'static str,
    fields: &'static [FieldDef],
    split_hint: Option<SplitHint>,
}

impl TableSchema {
    pub const fn new(name: &'static str, fields: &'static [FieldDef]) -> Self {
        Self {
            name,
            fields,
            split_hint: None,
        }
    }

    pub fn with_split_hint(mut self, column: &'static str, date_part: &'static str) -> Self {
        self.split_hint = Some(SplitHint { column, date_part });
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn fields(&self) -> &'static [FieldDef] {
        self.fields
    }

    pub fn field(&self, name: &str) -> Option<&'static FieldDef> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// Fields forming the (possibly composite) primary key, in declaration order.
    pub fn primary_key(&self) -> impl Iterator<Item = &'static FieldDef> {
        self.fields.iter().filter(|field| field.primary_key)
    }

    pub fn split_hint(&self) -> Option<SplitHint> {
        self.split_hint
    }
}

/// A name-keyed registry of table schemas.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    tables: BTreeMap<&'static str, TableSchema>,
}

impl Catalog {
    pub fn from_tables(tables: impl IntoIterator<Item = TableSchema>) -> Self {
        let tables = tables
            .into_iter()
            .map(|table| (table.name(), table))
            .collect();
        Self { tables }
    }

    /// Look up the schema registered for a remote table name.
    pub fn get(&self, table: &str) -> Result<&TableSchema, UnregisteredTableError> {
        self.tables
            .get(table)
            .ok_or_else(|| UnregisteredTableError {
                table: table.to_string(),
                registered: self.names().into_iter().map(String::from).collect(),
            })
    }

    pub fn contains(&self, table: &str) -> bool {
        self.tables.contains_key(table)
    }

    /// All registered schemas, ordered by table name.
    pub fn tables(&self) -> impl Iterator<Item = &TableSchema> {
        self.tables.values()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.tables.keys().copied().collect()
    }
}

/// The relational sink was requested for a table with no registered schema.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("no schema registered for table `{table}` (registered tables: {})", registered.join(", "))]
pub struct UnregisteredTableError {
    pub table: String,
    pub registered: Vec<String>,
}
