//! `opa_properties_public`: Property assessments published by the Office of Property Assessment.

use crate::{
    FieldDef,
    FieldType::{Date, Integer, Real, Text, Timestamp},
    TableSchema,
};

pub const TABLE_NAME: &str = "opa_properties_public";

pub fn table() -> TableSchema {
    TableSchema::new(TABLE_NAME, FIELDS)
}

const FIELDS: &[FieldDef] = &[
    FieldDef::key("cartodb_id", Integer),
    FieldDef::key("objectid", Real),
    FieldDef::key("parcel_number", Text),
    FieldDef::optional("zip_code", Text),
    FieldDef::required("pin", Integer),
    FieldDef::required("street_name", Text),
    FieldDef::required("house_number", Text),
    FieldDef::required("location", Text),
    FieldDef::optional("owner_1", Text),
    FieldDef::optional("owner_2", Text),
    FieldDef::optional("the_geom", Text),
    FieldDef::optional("the_geom_webmercator", Text),
    FieldDef::optional("assessment_date", Timestamp),
    FieldDef::optional("basements", Text),
    FieldDef::optional("beginning_point", Text),
    FieldDef::optional("book_and_page", Text),
    FieldDef::optional("building_code", Text),
    FieldDef::optional("building_code_description", Text),
    FieldDef::optional("category_code", Text),
    FieldDef::optional("category_code_description", Text),
    FieldDef::optional("census_tract", Text),
    FieldDef::optional("central_air", Text),
    FieldDef::optional("cross_reference", Text),
    FieldDef::optional("date_exterior_condition", Date),
    FieldDef::optional("depth", Real),
    FieldDef::optional("exempt_building", Real),
    FieldDef::optional("exempt_land", Real),
    FieldDef::optional("exterior_condition", Text),
    FieldDef::optional("fireplaces", Real),
    FieldDef::optional("frontage", Real),
    FieldDef::optional("fuel", Text),
    FieldDef::optional("garage_spaces", Real),
    FieldDef::optional("garage_type", Text),
    FieldDef::optional("general_construction", Text),
    FieldDef::optional("geographic_ward", Text),
    FieldDef::required("homestead_exemption", Real),
    FieldDef::optional("house_extension", Text),
    FieldDef::optional("interior_condition", Text),
    FieldDef::optional("mailing_address_1", Text),
    FieldDef::optional("mailing_address_2", Text),
    FieldDef::optional("mailing_care_of", Text),
    FieldDef::optional("mailing_city_state", Text),
    FieldDef::optional("mailing_street", Text),
    FieldDef::optional("mailing_zip", Text),
    FieldDef::optional("market_value", Real),
    FieldDef::optional("market_value_date", Date),
    FieldDef::optional("number_of_bathrooms", Real),
    FieldDef::optional("number_of_bedrooms", Real),
    FieldDef::optional("number_of_rooms", Real),
    FieldDef::optional("number_stories", Real),
    FieldDef::optional("off_street_open", Real),
    FieldDef::optional("other_building", Text),
    FieldDef::optional("parcel_shape", Text),
    FieldDef::optional("quality_grade", Text),
    FieldDef::optional("recording_date", Timestamp),
    FieldDef::optional("registry_number", Text),
    FieldDef::optional("sale_date", Text),
    FieldDef::optional("sale_price", Real),
    FieldDef::optional("separate_utilities", Text),
    FieldDef::optional("sewer", Text),
    FieldDef::optional("site_type", Text),
    FieldDef::optional("state_code", Text),
    FieldDef::optional("street_code", Text),
    FieldDef::optional("street_designation", Text),
    FieldDef::optional("street_direction", Text),
    FieldDef::optional("suffix", Text),
    FieldDef::optional("taxable_building", Real),
    FieldDef::optional("taxable_land", Real),
    FieldDef::optional("topography", Text),
    FieldDef::optional("total_area", Real),
    FieldDef::optional("total_livable_area", Real),
    FieldDef::optional("type_heater", Text),
    FieldDef::optional("unfinished", Text),
    FieldDef::optional("unit", Text),
    FieldDef::optional("utility", Text),
    FieldDef::optional("view_type", Text),
    FieldDef::optional("year_built", Text),
    FieldDef::optional("year_built_estimate", Text),
    FieldDef::optional("zoning", Text),
    FieldDef::optional("building_code_new", Text),
    FieldDef::optional("building_code_description_new", Text),
    // Computed from the_geom
    FieldDef::optional("lat", Real),
    FieldDef::optional("lng", Real),
];
