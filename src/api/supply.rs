//! Supply readiness records.
//!
//! Before a supply record is sent, each `details` object is filled out so
//! the backend always receives the full set of validation flags, and the
//! legacy boolean `ok_nok` is rewritten as `"OK"` / `"NOK"`.

use serde_json::{Map, Value};

use super::Resource;
use crate::errors::ValidationError;
use crate::models::Record;
use crate::models::de;

pub struct Supplies;

impl Resource for Supplies {
    const PATH: &'static str = "/api/Supp";
    const NAME: &'static str = "supply";
    type Item = Record;

    fn before_send(item: Record) -> Result<Record, ValidationError> {
        Ok(normalize_supply_payload(item))
    }
}

/// Boolean flags every `details` object carries.
pub const DETAIL_FLAGS: [&str; 6] = ["tko", "ot", "ot_op", "is", "sop", "validation_check"];

/// String fields every `details` object carries.
pub const DETAIL_TEXTS: [&str; 3] = ["who", "when", "comment"];

/// Normalize one `details` value. `null` becomes the all-default object;
/// non-object values are left as they are.
///
/// Each key is handled on its own: missing or `null` keys get their default,
/// flags are coerced to booleans, `ok_nok` booleans become `"OK"` / `"NOK"`.
/// Values of any other shape, and unknown keys, pass through unchanged.
pub fn normalize_details(value: Value) -> Value {
    let mut map = match value {
        Value::Null => Map::new(),
        Value::Object(map) => map,
        other => return other,
    };
    for key in DETAIL_FLAGS {
        let flag = map.get(key).is_some_and(de::truthy);
        map.insert(key.into(), Value::Bool(flag));
    }
    for key in DETAIL_TEXTS {
        if map.get(key).is_none_or(Value::is_null) {
            map.insert(key.into(), Value::String(String::new()));
        }
    }
    match map.get("ok_nok") {
        Some(Value::Bool(ok)) => {
            let text = if *ok { "OK" } else { "NOK" };
            map.insert("ok_nok".into(), Value::String(text.into()));
        }
        Some(Value::Null) => {
            map.remove("ok_nok");
        }
        _ => {}
    }
    Value::Object(map)
}

/// Fill out every `details` object in a supply payload: the top-level one
/// and any found one level down inside a field.
pub fn normalize_supply_payload(record: Record) -> Record {
    let mut map = record.into_map();
    if let Some(details) = map.remove("details") {
        map.insert("details".into(), normalize_details(details));
    }
    for value in map.values_mut() {
        if let Value::Object(inner) = value
            && let Some(details) = inner.remove("details")
        {
            inner.insert("details".into(), normalize_details(details));
        }
    }
    Record::from(map)
}
