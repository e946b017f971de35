/*
[INPUT]:  API schema definitions and serde requirements
[OUTPUT]: Typed Rust structs/enums with serialization support
[POS]:    Data layer - type definitions for API communication
[UPDATE]: When API schema changes or new types added
*/

pub mod enums;
pub mod models;
pub mod requests;
pub mod responses;

pub use enums::*;
pub use models::*;
pub use requests::*;
pub use responses::*;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::http::{DeribitError, Result};

/// Decode a successful `result` payload into a named record.
///
/// Extra fields are ignored; a missing or mistyped field is a `SchemaMismatch`
/// whose message names the offending field.
pub fn decode_record<T: DeserializeOwned>(record: &'static str, value: Value) -> Result<T> {
    serde_json::from_value(value).map_err(|err| DeribitError::SchemaMismatch {
        record,
        message: err.to_string(),
    })
}

/// Milliseconds since the Unix epoch as a UTC datetime. `None` when out of range.
pub fn millis_to_utc(millis: i64) -> Option<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp_millis(millis)
}
