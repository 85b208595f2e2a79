//! `car_ped_stops`: Vehicle and pedestrian investigations by police.

use crate::{
    FieldDef,
    FieldType::{Integer, Real, Text, Timestamp},
    TableSchema,
};

pub const TABLE_NAME: &str = "car_ped_stops";

pub fn table() -> TableSchema {
    TableSchema::new(TABLE_NAME, FIELDS).with_split_hint("datetimeoccur", "year")
}

const FIELDS: &[FieldDef] = &[
    FieldDef::key("cartodb_id", Integer),
    FieldDef::key("objectid", Integer),
    FieldDef::key("id", Integer),
    FieldDef::required("datetimeoccur", Timestamp),
    FieldDef::required("weekday", Text),
    FieldDef::required("location", Text),
    FieldDef::optional("districtoccur", Text),
    FieldDef::optional("psa", Text),
    FieldDef::required("stopcode", Integer),
    FieldDef::required("stoptype", Text),
    FieldDef::required("inside_or_outside", Text),
    FieldDef::optional("gender", Text),
    FieldDef::required("race", Text),
    FieldDef::optional("age", Integer),
    FieldDef::required("individual_frisked", Integer),
    FieldDef::required("individual_searched", Integer),
    FieldDef::required("individual_arrested", Integer),
    FieldDef::required("individual_contraband", Integer),
    FieldDef::required("vehicle_frisked", Integer),
    FieldDef::required("vehicle_searched", Integer),
    FieldDef::required("vehicle_contraband", Integer),
    FieldDef::optional("vehicle_contraband_list", Text),
    FieldDef::optional("individual_contraband_list", Text),
    FieldDef::optional("mvc_code", Text),
    FieldDef::optional("mvc_reason", Text),
    FieldDef::optional("mvc_code_sec", Text),
    FieldDef::optional("mvc_code_sec_reason", Text),
    FieldDef::optional("point_x", Real),
    FieldDef::optional("point_y", Real),
    FieldDef::optional("the_geom", Text),
    FieldDef::optional("the_geom_webmercator", Text),
    // Computed from the_geom
    FieldDef::optional("lat", Real),
    FieldDef::optional("lng", Real),
];
