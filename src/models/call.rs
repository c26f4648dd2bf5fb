use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::de;
use crate::timing;

/// Status of a call record. The backend uses Spanish status strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CallStatus {
    /// `Pendiente`: the call is waiting and its timer is running.
    Pending,
    /// `Realizada`: the call has been made.
    Completed,
    /// `Expirada`: the timer ran out before the call was made.
    Expired,
    Other(String),
}

impl CallStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Pending => "Pendiente",
            Self::Completed => "Realizada",
            Self::Expired => "Expirada",
            Self::Other(s) => s,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    /// No status on the record (`null`, missing or empty).
    pub fn is_unset(&self) -> bool {
        matches!(self, Self::Other(s) if s.is_empty())
    }
}

impl Default for CallStatus {
    fn default() -> Self {
        Self::Other(String::new())
    }
}

impl From<String> for CallStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "Pendiente" => Self::Pending,
            "Realizada" => Self::Completed,
            "Expirada" => Self::Expired,
            _ => Self::Other(s),
        }
    }
}

impl From<CallStatus> for String {
    fn from(status: CallStatus) -> Self {
        status.as_str().to_string()
    }
}

impl std::str::FromStr for CallStatus {
    type Err = String;

    /// Accepts the wire strings and their English aliases.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pendiente" | "pending" => Ok(Self::Pending),
            "realizada" | "completed" | "done" => Ok(Self::Completed),
            "expirada" | "expired" => Ok(Self::Expired),
            _ => Err(format!(
                "Invalid call status '{}'. Valid values: pending, completed, expired",
                s
            )),
        }
    }
}

impl std::fmt::Display for CallStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A call record with its derived countdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Call {
    #[serde(
        default,
        alias = "_id",
        deserialize_with = "de::lenient_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<String>,
    #[serde(
        default,
        deserialize_with = "de::null_as_default",
        skip_serializing_if = "CallStatus::is_unset"
    )]
    pub status: CallStatus,
    #[serde(rename = "callTime", default, skip_serializing_if = "Option::is_none")]
    pub call_time: Option<String>,
    /// Seconds left in the 90-minute window. Derived client-side.
    #[serde(rename = "remainingTime", default)]
    pub remaining_time: u64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Call {
    /// Parsed `callTime`, `None` when missing or unparsable.
    pub fn call_time(&self) -> Option<DateTime<Utc>> {
        timing::parse_call_time(self.call_time.as_deref()?)
    }

    /// Recompute `remaining_time` against `now`.
    pub fn refresh_remaining(&mut self, now: DateTime<Utc>) {
        self.remaining_time = timing::remaining_time(&self.status, self.call_time(), now);
    }

    pub fn progress(&self) -> f64 {
        timing::calculate_progress(Some(self.remaining_time as f64))
    }
}

/// Query filter for `GET /api/call`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CallFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(rename = "startDate", skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(rename = "endDate", skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
}
