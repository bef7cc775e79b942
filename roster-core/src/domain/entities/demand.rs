use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Staffing requirements and calendar flags for one date.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DayDemand {
    pub date: NaiveDate,
    pub day_min: u32,
    pub day_max: u32,
    /// Exact late duty count.
    pub late: u32,
    /// Exact night duty count.
    pub night: u32,
    /// 0 = Monday .. 6 = Sunday.
    pub weekday: u8,
    pub is_weekend: bool,
    pub is_holiday: bool,
}

impl DayDemand {
    pub fn is_weekend_or_holiday(&self) -> bool {
        self.is_weekend || self.is_holiday
    }
}

/// Caller-supplied override for one date; unset fields keep the defaults.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DemandOverride {
    pub date: NaiveDate,
    #[serde(default)]
    pub day_min: Option<u32>,
    #[serde(default)]
    pub day_max: Option<u32>,
    #[serde(default)]
    pub late: Option<u32>,
    #[serde(default)]
    pub night: Option<u32>,
}
