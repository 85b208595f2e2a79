//! `rtt_summary`: Real estate transfer tax filings.

use crate::{
    FieldDef,
    FieldType::{Integer, Real, Text, Timestamp},
    TableSchema,
};

pub const TABLE_NAME: &str = "rtt_summary";

pub fn table() -> TableSchema {
    TableSchema::new(TABLE_NAME, FIELDS).with_split_hint("recording_date", "year")
}

const FIELDS: &[FieldDef] = &[
    FieldDef::key("cartodb_id", Integer),
    FieldDef::key("objectid", Real),
    FieldDef::key("record_id", Text),
    FieldDef::required("property_count", Real),
    FieldDef::optional("recording_date", Timestamp),
    FieldDef::required("document_id", Real),
    FieldDef::optional("the_geom", Text),
    FieldDef::optional("address_low", Integer),
    FieldDef::optional("display_date", Text),
    FieldDef::optional("document_type", Text),
    FieldDef::optional("street_name", Text),
    FieldDef::optional("street_address", Text),
    FieldDef::optional("the_geom_webmercator", Text),
    FieldDef::optional("ward", Text),
    FieldDef::optional("grantees", Text).indexed(),
    FieldDef::optional("grantors", Text).indexed(),
    FieldDef::optional("reg_map_id", Text),
    FieldDef::optional("opa_account_num", Text),
    FieldDef::optional("receipt_date", Text),
    FieldDef::optional("address_high", Text),
    FieldDef::optional("address_low_frac", Text),
    FieldDef::optional("address_low_suffix", Text),
    FieldDef::optional("adjusted_assessed_value", Real),
    FieldDef::optional("adjusted_cash_consideration", Real),
    FieldDef::optional("adjusted_fair_market_value", Real),
    FieldDef::optional("adjusted_local_tax_amount", Real),
    FieldDef::optional("adjusted_other_consideration", Real),
    FieldDef::optional("adjusted_state_tax_amount", Real),
    FieldDef::optional("adjusted_total_consideration", Real),
    FieldDef::optional("assessed_value", Real),
    FieldDef::optional("cash_consideration", Real),
    FieldDef::optional("common_level_ratio", Real),
    FieldDef::optional("condo_name", Text),
    FieldDef::optional("discrepancy", Text),
    FieldDef::optional("document_date", Text),
    FieldDef::optional("fair_market_value", Real),
    FieldDef::optional("legal_remarks", Text),
    FieldDef::optional("local_tax_amount", Real),
    FieldDef::optional("local_tax_percent", Real),
    FieldDef::optional("matched_regmap", Text),
    FieldDef::optional("other_consideration", Real),
    FieldDef::optional("receipt_num", Text),
    FieldDef::optional("state_tax_amount", Real),
    FieldDef::optional("state_tax_percent", Real),
    FieldDef::optional("total_consideration", Real),
    FieldDef::optional("street_predir", Text),
    FieldDef::optional("street_suffix", Text),
    FieldDef::optional("street_postdir", Text),
    FieldDef::optional("unit_num", Text),
    FieldDef::optional("zip_code", Text),
    // Computed from the_geom
    FieldDef::optional("lat", Real),
    FieldDef::optional("lng", Real),
];
