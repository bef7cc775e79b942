use chrono::NaiveDate;
use serde::Serialize;
use shared::Shift;

use super::DayDemand;

/// Violation taxonomy. Declaration order is the reporting order for
/// violations sharing a date and shift.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    Shortage,
    Excess,
    NightLeaderMissing,
    NightTeamMix,
    ConsecutiveWork,
    ConsecutiveNight,
    ForbiddenAssigned,
    FixedViolated,
    NightCapExceeded,
    WeeklyCapExceeded,
    WeekendCapExceeded,
    NightAfterNightDay,
}

/// One broken rule, located as precisely as the rule allows.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Violation {
    pub date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shift: Option<Shift>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nurse_id: Option<String>,
    pub kind: ViolationKind,
    pub message: String,
    /// Signed gap to the bound, where the rule has one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difference: Option<i64>,
}

impl Violation {
    /// Sort key: date, then shift in enum order (day-level violations
    /// first), then kind, then nurse.
    pub fn sort_key(&self) -> (NaiveDate, Option<usize>, ViolationKind, Option<String>) {
        (
            self.date,
            self.shift.map(Shift::index),
            self.kind,
            self.nurse_id.clone(),
        )
    }
}

/// Deduplicated demand-bound violation cell, for grid highlighting.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
pub struct ViolationCell {
    pub date: NaiveDate,
    pub shift: Shift,
    pub kind: ViolationKind,
}

#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct ShiftCounts {
    pub day: u32,
    pub late: u32,
    pub night: u32,
}

/// Fill state of one date next to its original requirements.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct DaySummary {
    pub date: NaiveDate,
    pub filled: ShiftCounts,
    pub requirements: DayDemand,
}

/// Monthly counters for one nurse.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct NurseSummary {
    pub nurse_id: String,
    pub day: u32,
    pub late: u32,
    pub night: u32,
    pub off: u32,
    pub weekend_work: u32,
    pub total_work_days: u32,
}

impl NurseSummary {
    pub fn count(&self, shift: Shift) -> u32 {
        match shift {
            Shift::Day => self.day,
            Shift::Late => self.late,
            Shift::Night => self.night,
            Shift::Off => self.off,
        }
    }
}

/// One candidate single-cell repair.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Suggestion {
    pub nurse_id: String,
    pub current_shift: Shift,
    pub suggested_shift: Shift,
    pub reason: String,
    pub locked: bool,
}

/// Ranked repairs for one violated demand cell.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CellRecommendation {
    pub date: NaiveDate,
    pub shift: Shift,
    pub kind: ViolationKind,
    pub suggestions: Vec<Suggestion>,
}

/// Full re-examination of one assignment against the rule set.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AnalysisReport {
    pub ok: bool,
    pub per_day: Vec<DaySummary>,
    pub per_nurse: Vec<NurseSummary>,
    pub violations: Vec<Violation>,
    pub violation_cells: Vec<ViolationCell>,
    pub recommendations: Vec<CellRecommendation>,
    pub warnings: Vec<String>,
}
