//! Completion of a mass production project across its nine fixed stages.
//!
//! A stage slot counts as complete only when it holds an embedded record
//! that carries a completion marker: `check === true` or `value === true` on
//! the record itself or on any object directly inside it. Empty slots and
//! bare id references never count.

use serde::Serialize;

use crate::models::{MassProduction, StageRef, StageSlot, percentage};

/// Where one stage slot of a project stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotStatus {
    /// Nothing in the slot.
    Missing,
    /// Only an id; the record was not populated in the response.
    Referenced,
    /// Embedded record without a completion marker.
    InProgress,
    Complete,
}

impl SlotStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Missing => "missing",
            Self::Referenced => "referenced",
            Self::InProgress => "in_progress",
            Self::Complete => "complete",
        }
    }
}

pub fn slot_status(stage: Option<&StageRef>) -> SlotStatus {
    match stage {
        None => SlotStatus::Missing,
        Some(StageRef::Id(_)) => SlotStatus::Referenced,
        Some(StageRef::Embedded(record)) if record.has_completion_marker() => SlotStatus::Complete,
        Some(StageRef::Embedded(_)) => SlotStatus::InProgress,
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SlotReport {
    pub stage: &'static str,
    pub label: &'static str,
    pub status: SlotStatus,
    pub id: Option<String>,
    /// Checklist completion inside the embedded record, when it has one.
    pub checklist: Option<u8>,
}

/// Per-slot breakdown plus the overall percentage.
#[derive(Debug, Clone, Serialize)]
pub struct StageReport {
    pub slots: Vec<SlotReport>,
    pub completed: usize,
    pub total: usize,
    pub percentage: u8,
}

impl StageReport {
    pub fn for_project(mp: &MassProduction) -> Self {
        let slots: Vec<SlotReport> = StageSlot::ALL
            .iter()
            .map(|slot| {
                let stage = mp.stage(*slot);
                SlotReport {
                    stage: slot.as_str(),
                    label: slot.label(),
                    status: slot_status(stage),
                    id: stage.and_then(StageRef::id),
                    checklist: stage
                        .and_then(StageRef::embedded)
                        .and_then(|r| r.checklist_completion()),
                }
            })
            .collect();
        let completed = slots
            .iter()
            .filter(|s| s.status == SlotStatus::Complete)
            .count();
        let total = StageSlot::ALL.len();
        Self {
            slots,
            completed,
            total,
            percentage: percentage(completed, total),
        }
    }
}

/// `round(100 * completed / 9)` over the fixed stage slots.
pub fn completion_percentage(mp: &MassProduction) -> u8 {
    let completed = StageSlot::ALL
        .iter()
        .filter(|slot| slot_status(mp.stage(**slot)) == SlotStatus::Complete)
        .count();
    percentage(completed, StageSlot::ALL.len())
}
