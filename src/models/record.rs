use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::de::id_from_value;
use super::progress::{ProgressField, Stage};
use crate::errors::ValidationError;

/// A backend resource kept as a flat JSON object: field name to primitive,
/// progress field or nested object. Unknown fields round-trip untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Map<String, Value>);

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap a JSON value, rejecting anything that is not an object.
    pub fn from_json(value: Value) -> Result<Self, ValidationError> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            _ => Err(ValidationError::NotAnObject),
        }
    }

    /// Backend id, taken from `id` or `_id`.
    pub fn id(&self) -> Option<String> {
        self.0
            .get("id")
            .and_then(id_from_value)
            .or_else(|| self.0.get("_id").and_then(id_from_value))
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.0.insert(key.into(), value)
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }

    pub fn str_field(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    /// Strict `=== true` test on a member.
    pub fn is_true(&self, key: &str) -> bool {
        matches!(self.0.get(key), Some(Value::Bool(true)))
    }

    pub fn progress_field(&self, key: &str) -> Option<ProgressField> {
        self.0.get(key).and_then(ProgressField::from_json)
    }

    pub fn stage(&self, key: &str) -> Option<Stage> {
        self.progress_field(key).map(Stage::from)
    }

    /// Every member shaped like a progress field, in key order.
    pub fn progress_fields(&self) -> Vec<(&str, ProgressField)> {
        self.0
            .iter()
            .filter_map(|(k, v)| ProgressField::from_json(v).map(|f| (k.as_str(), f)))
            .collect()
    }

    /// Share of completed progress fields, as a rounded percentage.
    /// `None` when the record has no progress fields at all.
    pub fn checklist_completion(&self) -> Option<u8> {
        let fields = self.progress_fields();
        if fields.is_empty() {
            return None;
        }
        let done = fields
            .iter()
            .filter(|(_, f)| f.stage().is_completed())
            .count();
        Some(percentage(done, fields.len()))
    }

    /// Whether this record, or any object directly inside it, carries a
    /// `check === true` or `value === true` marker.
    pub fn has_completion_marker(&self) -> bool {
        if self.is_true("check") || self.is_true("value") {
            return true;
        }
        self.0.values().any(|v| match v {
            Value::Object(inner) => {
                matches!(inner.get("check"), Some(Value::Bool(true)))
                    || matches!(inner.get("value"), Some(Value::Bool(true)))
            }
            _ => false,
        })
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Map<String, Value>> for Record {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl From<Record> for Value {
    fn from(record: Record) -> Self {
        Value::Object(record.0)
    }
}

/// `round(100 * done / total)`, 0 when `total` is 0.
pub fn percentage(done: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let pct = (100.0 * done as f64 / total as f64).round();
    pct.clamp(0.0, 100.0) as u8
}
