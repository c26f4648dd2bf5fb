use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::de;

/// Work-item metadata attached to one checklist item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Task {
    #[serde(default, deserialize_with = "de::lenient_bool")]
    pub check: bool,
    #[serde(default, deserialize_with = "de::null_as_default")]
    pub responsible: String,
    #[serde(
        default,
        deserialize_with = "de::date_or_empty",
        serialize_with = "de::serialize_date_or_empty"
    )]
    pub planned: Option<NaiveDate>,
    #[serde(
        default,
        deserialize_with = "de::date_or_empty",
        serialize_with = "de::serialize_date_or_empty"
    )]
    pub done: Option<NaiveDate>,
    #[serde(default, deserialize_with = "de::null_as_default")]
    pub comments: String,
    #[serde(rename = "filePath", default)]
    pub file_path: Option<String>,
}

impl Task {
    /// Whether anything has been recorded against this task.
    pub fn has_activity(&self) -> bool {
        self.check
            || !self.responsible.trim().is_empty()
            || self.planned.is_some()
            || self.done.is_some()
            || !self.comments.trim().is_empty()
            || self.file_path.as_deref().is_some_and(|p| !p.is_empty())
    }
}

/// One checklist item inside a larger resource, e.g. `control_plan` inside a
/// facility record. Missing data deserializes as "not started".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProgressField {
    #[serde(default, deserialize_with = "de::lenient_bool")]
    pub value: bool,
    #[serde(default, deserialize_with = "de::null_as_default")]
    pub task: Task,
}

impl ProgressField {
    /// Read a progress field out of arbitrary JSON.
    ///
    /// Only objects that carry a `value` or `task` member have this shape;
    /// anything else returns `None`.
    pub fn from_json(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;
        if !obj.contains_key("value") && !obj.contains_key("task") {
            return None;
        }
        if obj.get("task").is_some_and(|t| !t.is_object() && !t.is_null()) {
            return None;
        }
        serde_json::from_value(value.clone()).ok()
    }

    pub fn stage(&self) -> Stage {
        Stage::from(self.clone())
    }
}

/// Normalized progress of one checklist item.
///
/// `value` is the authoritative completion flag. A checked task whose
/// `value` is still false is in progress, not complete.
#[derive(Debug, Clone, PartialEq)]
pub enum Stage {
    NotStarted,
    InProgress(Task),
    Completed(Task),
}

impl Stage {
    pub fn is_completed(&self) -> bool {
        matches!(self, Stage::Completed(_))
    }

    pub fn task(&self) -> Option<&Task> {
        match self {
            Stage::NotStarted => None,
            Stage::InProgress(task) | Stage::Completed(task) => Some(task),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::NotStarted => "not_started",
            Stage::InProgress(_) => "in_progress",
            Stage::Completed(_) => "completed",
        }
    }
}

impl From<ProgressField> for Stage {
    fn from(field: ProgressField) -> Self {
        if field.value {
            Stage::Completed(field.task)
        } else if field.task.has_activity() {
            Stage::InProgress(field.task)
        } else {
            Stage::NotStarted
        }
    }
}

impl From<Stage> for ProgressField {
    fn from(stage: Stage) -> Self {
        match stage {
            Stage::NotStarted => ProgressField::default(),
            Stage::InProgress(task) => ProgressField { value: false, task },
            Stage::Completed(task) => ProgressField { value: true, task },
        }
    }
}
