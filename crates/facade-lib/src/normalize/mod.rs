//! Normalization mappers
//!
//! Pure functions from native cluster objects to the canonical models. Both
//! source adapters hand their results to the same mapper, so a live object
//! and a fixture object with the same content produce identical output.

pub mod local_queue;
pub mod node;
pub mod pod;
pub mod queue;
pub mod resource_flavor;

use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::Time;
use std::collections::BTreeMap;

use crate::models::ResourceList;

/// Textual format for every timestamp in canonical output
pub const TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Format a native timestamp in UTC, second precision
pub fn format_time(time: &Time) -> String {
    time.0.format(TIME_FORMAT).to_string()
}

/// Format an optional timestamp; absence becomes an empty string
pub fn format_time_or_empty(time: Option<&Time>) -> String {
    time.map(format_time).unwrap_or_default()
}

/// Quantities are passed through in their upstream string form
pub(crate) fn resource_list(quantities: Option<&BTreeMap<String, Quantity>>) -> ResourceList {
    quantities
        .map(|q| q.iter().map(|(k, v)| (k.clone(), v.0.clone())).collect())
        .unwrap_or_default()
}
