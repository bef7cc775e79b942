use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use shared::{Shift, Team};

use crate::config::RuleDefaults;

/// A (date, shift) cell requirement as it appears in raw input.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub struct ShiftOnDate {
    pub date: NaiveDate,
    pub shift: Shift,
}

/// Per-nurse monthly limits and cell-level requirements with every
/// default resolved.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NurseRules {
    pub night_min: u32,
    pub night_max: u32,
    pub weekly_work_max: u32,
    pub weekend_holiday_max: u32,
    /// Dates on which an off day is preferred. Soft.
    #[serde(default)]
    pub requested_off: BTreeSet<NaiveDate>,
    /// Cells that must never be assigned. Hard.
    #[serde(default)]
    pub forbidden: BTreeSet<(NaiveDate, Shift)>,
    /// Cells that must be assigned, one per date. Hard.
    #[serde(default)]
    pub fixed: BTreeMap<NaiveDate, Shift>,
}

impl NurseRules {
    pub fn from_defaults(defaults: &RuleDefaults) -> Self {
        Self {
            night_min: defaults.night_min,
            night_max: defaults.night_max,
            weekly_work_max: defaults.weekly_work_max,
            weekend_holiday_max: defaults.weekend_holiday_max,
            requested_off: BTreeSet::new(),
            forbidden: BTreeSet::new(),
            fixed: BTreeMap::new(),
        }
    }
}

/// One nurse with resolved rules, as held by a compiled problem instance.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NurseRecord {
    pub id: String,
    pub name: Option<String>,
    pub team: Team,
    pub leader_ok: bool,
    pub rules: NurseRules,
}

/// Raw nurse record as supplied by the caller. Unset rule fields inherit
/// from the policy-level defaults during compilation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NurseInput {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    pub team: Team,
    #[serde(default)]
    pub leader_ok: bool,
    #[serde(default)]
    pub night_min: Option<u32>,
    #[serde(default)]
    pub night_max: Option<u32>,
    #[serde(default)]
    pub weekly_work_max: Option<u32>,
    #[serde(default)]
    pub weekend_holiday_max: Option<u32>,
    #[serde(default)]
    pub requested_off: Vec<NaiveDate>,
    #[serde(default)]
    pub forbidden_shifts: Vec<ShiftOnDate>,
    #[serde(default)]
    pub fixed_shifts: Vec<ShiftOnDate>,
}

impl NurseInput {
    /// Bare record with no overrides, mostly for tests and fixtures.
    pub fn new(id: impl Into<String>, team: Team, leader_ok: bool) -> Self {
        Self {
            id: id.into(),
            name: None,
            team,
            leader_ok,
            night_min: None,
            night_max: None,
            weekly_work_max: None,
            weekend_holiday_max: None,
            requested_off: Vec::new(),
            forbidden_shifts: Vec::new(),
            fixed_shifts: Vec::new(),
        }
    }
}
