use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use super::de;
use super::record::Record;

/// Reference from a mass production record to one of its sub-stage records:
/// either a bare id or the embedded (populated) record.
#[derive(Debug, Clone, PartialEq)]
pub enum StageRef {
    Id(String),
    Embedded(Record),
}

impl StageRef {
    /// Interpret a JSON slot. Falsy values (`null`, `""`, `false`, `0`) and
    /// arrays carry no reference.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(StageRef::Embedded(Record::from(map.clone()))),
            Value::Number(n) if n.as_f64() != Some(0.0) => Some(StageRef::Id(n.to_string())),
            Value::String(s) if !s.is_empty() => Some(StageRef::Id(s.clone())),
            _ => None,
        }
    }

    pub fn id(&self) -> Option<String> {
        match self {
            StageRef::Id(id) => Some(id.clone()),
            StageRef::Embedded(record) => record.id(),
        }
    }

    pub fn embedded(&self) -> Option<&Record> {
        match self {
            StageRef::Id(_) => None,
            StageRef::Embedded(record) => Some(record),
        }
    }
}

impl Serialize for StageRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            StageRef::Id(id) => serializer.serialize_str(id),
            StageRef::Embedded(record) => record.serialize(serializer),
        }
    }
}

fn stage_ref<'de, D>(deserializer: D) -> Result<Option<StageRef>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(StageRef::from_json(&Value::deserialize(deserializer)?))
}

/// The nine sub-stages of a mass production project, in lifecycle order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageSlot {
    Feasibility,
    ValidationForOffer,
    OkForLaunch,
    KickOff,
    Design,
    Facilities,
    PpTuning,
    ProcessQualif,
    QualificationConfirmation,
}

impl StageSlot {
    pub const ALL: [StageSlot; 9] = [
        StageSlot::Feasibility,
        StageSlot::ValidationForOffer,
        StageSlot::OkForLaunch,
        StageSlot::KickOff,
        StageSlot::Design,
        StageSlot::Facilities,
        StageSlot::PpTuning,
        StageSlot::ProcessQualif,
        StageSlot::QualificationConfirmation,
    ];

    /// Field name on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Feasibility => "feasibility",
            Self::ValidationForOffer => "validation_for_offer",
            Self::OkForLaunch => "ok_for_lunch",
            Self::KickOff => "kick_off",
            Self::Design => "design",
            Self::Facilities => "facilities",
            Self::PpTuning => "p_p_tuning",
            Self::ProcessQualif => "process_qualif",
            Self::QualificationConfirmation => "qualification_confirmation",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Feasibility => "Feasibility",
            Self::ValidationForOffer => "Validation for offer",
            Self::OkForLaunch => "OK for launch",
            Self::KickOff => "Kick-off",
            Self::Design => "Design",
            Self::Facilities => "Facilities",
            Self::PpTuning => "P/P tuning",
            Self::ProcessQualif => "Process qualification",
            Self::QualificationConfirmation => "Qualification confirmation",
        }
    }
}

impl std::str::FromStr for StageSlot {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "feasibility" | "feasability" => Ok(Self::Feasibility),
            "validation_for_offer" => Ok(Self::ValidationForOffer),
            "ok_for_lunch" | "ok_for_launch" => Ok(Self::OkForLaunch),
            "kick_off" => Ok(Self::KickOff),
            "design" => Ok(Self::Design),
            "facilities" => Ok(Self::Facilities),
            "p_p_tuning" => Ok(Self::PpTuning),
            "process_qualif" => Ok(Self::ProcessQualif),
            "qualification_confirmation" => Ok(Self::QualificationConfirmation),
            _ => Err(format!("Invalid stage: {}", s)),
        }
    }
}

/// A mass production project and its references to the nine sub-stages.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MassProduction {
    #[serde(
        default,
        alias = "_id",
        deserialize_with = "de::lenient_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_n: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer: Option<Value>,
    #[serde(default, deserialize_with = "de::null_as_default")]
    pub product_designation: Vec<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_request: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_review: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub closure_date: Option<String>,

    #[serde(default, deserialize_with = "stage_ref")]
    pub feasibility: Option<StageRef>,
    /// Older spelling of `feasibility`. Kept as its own field so documents
    /// carrying both keys decode, and written back under the key it came in.
    #[serde(
        default,
        deserialize_with = "stage_ref",
        skip_serializing_if = "Option::is_none"
    )]
    pub feasability: Option<StageRef>,
    #[serde(default, deserialize_with = "stage_ref")]
    pub validation_for_offer: Option<StageRef>,
    #[serde(default, deserialize_with = "stage_ref")]
    pub ok_for_lunch: Option<StageRef>,
    #[serde(default, deserialize_with = "stage_ref")]
    pub kick_off: Option<StageRef>,
    #[serde(default, deserialize_with = "stage_ref")]
    pub design: Option<StageRef>,
    #[serde(default, deserialize_with = "stage_ref")]
    pub facilities: Option<StageRef>,
    #[serde(default, deserialize_with = "stage_ref")]
    pub p_p_tuning: Option<StageRef>,
    #[serde(default, deserialize_with = "stage_ref")]
    pub process_qualif: Option<StageRef>,
    #[serde(default, deserialize_with = "stage_ref")]
    pub qualification_confirmation: Option<StageRef>,

    /// Backend fields this crate does not model.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl MassProduction {
    pub fn stage(&self, slot: StageSlot) -> Option<&StageRef> {
        match slot {
            StageSlot::Feasibility => self.feasibility.as_ref().or(self.feasability.as_ref()),
            StageSlot::ValidationForOffer => self.validation_for_offer.as_ref(),
            StageSlot::OkForLaunch => self.ok_for_lunch.as_ref(),
            StageSlot::KickOff => self.kick_off.as_ref(),
            StageSlot::Design => self.design.as_ref(),
            StageSlot::Facilities => self.facilities.as_ref(),
            StageSlot::PpTuning => self.p_p_tuning.as_ref(),
            StageSlot::ProcessQualif => self.process_qualif.as_ref(),
            StageSlot::QualificationConfirmation => self.qualification_confirmation.as_ref(),
        }
    }

    /// Customer reference as an id, whether given bare or embedded.
    pub fn customer_id(&self) -> Option<String> {
        match self.customer.as_ref()? {
            Value::Object(map) => map
                .get("id")
                .or_else(|| map.get("_id"))
                .and_then(de::id_from_value),
            other => de::id_from_value(other),
        }
    }
}

/// Query filter for `GET /api/massproduction`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MassProductionFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}
