//! `shootings`: Shooting victims reported by police.

use crate::{
    FieldDef,
    FieldType::{Integer, Real, Text, Timestamp},
    TableSchema,
};

pub const TABLE_NAME: &str = "shootings";

pub fn table() -> TableSchema {
    TableSchema::new(TABLE_NAME, FIELDS)
}

const FIELDS: &[FieldDef] = &[
    FieldDef::key("cartodb_id", Integer),
    FieldDef::key("objectid", Integer),
    FieldDef::key("date_", Timestamp),
    FieldDef::key("location", Text),
    FieldDef::optional("the_geom", Text),
    FieldDef::optional("the_geom_webmercator", Text),
    FieldDef::optional("year", Integer),
    FieldDef::optional("dc_key", Text),
    FieldDef::optional("code", Text),
    FieldDef::optional("time", Text),
    FieldDef::optional("race", Text),
    FieldDef::optional("sex", Text),
    FieldDef::optional("age", Text),
    FieldDef::optional("wound", Text),
    FieldDef::optional("officer_involved", Text),
    FieldDef::optional("offender_injured", Text),
    FieldDef::optional("offender_deceased", Text),
    FieldDef::optional("latino", Integer),
    FieldDef::optional("point_x", Real),
    FieldDef::optional("point_y", Real),
    FieldDef::optional("dist", Text),
    FieldDef::optional("inside", Integer),
    FieldDef::optional("outside", Integer),
    FieldDef::optional("fatal", Integer),
    // Computed from the_geom
    FieldDef::optional("lat", Real),
    FieldDef::optional("lng", Real),
];
