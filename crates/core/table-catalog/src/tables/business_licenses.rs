//! `business_licenses`: Business and rental licenses issued by Licenses & Inspections.

use crate::{
    FieldDef,
    FieldType::{Integer, Real, Text},
    TableSchema,
};

pub const TABLE_NAME: &str = "business_licenses";

pub fn table() -> TableSchema {
    TableSchema::new(TABLE_NAME, FIELDS).with_split_hint("initialissuedate", "year")
}

const FIELDS: &[FieldDef] = &[
    FieldDef::key("cartodb_id", Integer),
    FieldDef::key("objectid", Integer),
    FieldDef::key("posse_jobid", Text),
    FieldDef::key("licensenum", Text),
    FieldDef::required("the_geom", Text),
    FieldDef::required("revenuecode", Text),
    FieldDef::required("licensetype", Text),
    FieldDef::required("initialissuedate", Text),
    FieldDef::required("mostrecentissuedate", Text),
    FieldDef::required("licensestatus", Text),
    FieldDef::optional("legalname", Text),
    FieldDef::optional("addressobjectid", Real),
    FieldDef::optional("the_geom_webmercator", Text),
    FieldDef::optional("address", Text),
    FieldDef::optional("unit_type", Text),
    FieldDef::optional("unit_num", Text),
    FieldDef::optional("zip", Text),
    FieldDef::optional("censustract", Text),
    FieldDef::optional("parcel_id_num", Text),
    FieldDef::optional("opa_account_num", Text),
    FieldDef::optional("opa_owner", Text),
    FieldDef::optional("rentalcategory", Text),
    FieldDef::optional("legalentitytype", Text),
    FieldDef::optional("business_name", Text),
    FieldDef::optional("business_mailing_address", Text),
    FieldDef::optional("expirationdate", Text),
    FieldDef::optional("inactivedate", Text),
    FieldDef::optional("numberofunits", Real),
    FieldDef::optional("owneroccupied", Text),
    FieldDef::optional("legalfirstname", Text),
    FieldDef::optional("legallastname", Text),
    FieldDef::optional("ownercontact1name", Text),
    FieldDef::optional("ownercontact1mailingaddress", Text),
    FieldDef::optional("ownercontact1city", Text),
    FieldDef::optional("ownercontact1state", Text),
    FieldDef::optional("ownercontact1zippostalcode", Text),
    FieldDef::optional("ownercontact2name", Text),
    FieldDef::optional("ownercontact2mailingaddress", Text),
    FieldDef::optional("ownercontact2city", Text),
    FieldDef::optional("ownercontact2state", Text),
    FieldDef::optional("ownercontact2zippostalcode", Text),
    FieldDef::optional("geocode_x", Real),
    FieldDef::optional("geocode_y", Real),
    FieldDef::optional("council_district", Text),
    // Computed from the_geom
    FieldDef::optional("lat", Real),
    FieldDef::optional("lng", Real),
];
