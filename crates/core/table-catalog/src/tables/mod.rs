//! Built-in table definitions.
//!
//! Field lists follow the column sets published by the remote service. `lat`/`lng` are not
//! returned by the service; they stay null unless a caller fills them in.

pub mod business_licenses;
pub mod car_ped_stops;
pub mod opa_properties_public;
pub mod rtt_summary;
pub mod shootings;

use crate::TableSchema;

/// Returns all built-in tables.
pub fn all() -> Vec<TableSchema> {
    vec![
        opa_properties_public::table(),
        business_licenses::table(),
        rtt_summary::table(),
        car_ped_stops::table(),
        shootings::table(),
    ]
}
