#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Once};

use chrono::NaiveDate;
use mockall::mock;
use roster_core::config::OptimizerConfig;
use roster_core::domain::entities::{AssignmentCell, DemandOverride, NurseInput};
use roster_core::domain::services::HolidayCalendar;
use roster_core::{NoHolidays, RosterService};
use shared::{Shift, Team};

// Generate a mock for the external holiday collaborator
mock! {
    pub Holidays {}

    impl HolidayCalendar for Holidays {
        fn is_holiday(&self, date: NaiveDate) -> bool;
    }
}

static TRACING: Once = Once::new();

pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .try_init();
    });
}

/// Solver settings trimmed down so the suite stays fast in debug builds.
pub fn test_config() -> OptimizerConfig {
    OptimizerConfig {
        improvement_rounds: 8,
        solve_budget_ms: 20_000,
        total_budget_ms: 40_000,
        ..OptimizerConfig::default()
    }
}

pub fn service() -> RosterService {
    init_tracing();
    RosterService::new(Arc::new(NoHolidays), test_config())
}

pub fn service_with_holidays(holidays: Arc<dyn HolidayCalendar>) -> RosterService {
    init_tracing();
    RosterService::new(holidays, test_config())
}

pub fn nurse(id: &str, team: Team, leader_ok: bool) -> NurseInput {
    NurseInput::new(id, team, leader_ok)
}

/// Four leaders across both ward teams with a six-day weekly allowance,
/// enough to staff a small demand profile for a whole month.
pub fn small_ward() -> Vec<NurseInput> {
    let mut nurses = vec![
        nurse("n1", Team::A, true),
        nurse("n2", Team::A, true),
        nurse("n3", Team::B, true),
        nurse("n4", Team::B, true),
    ];
    for record in &mut nurses {
        record.weekly_work_max = Some(6);
    }
    nurses
}

pub fn month_dates(year: i32, month: u32) -> Vec<NaiveDate> {
    (1..=31)
        .filter_map(|day| NaiveDate::from_ymd_opt(year, month, day))
        .collect()
}

/// The same demand on every date of the month.
pub fn uniform_demand(
    year: i32,
    month: u32,
    day_min: u32,
    day_max: u32,
    late: u32,
    night: u32,
) -> Vec<DemandOverride> {
    month_dates(year, month)
        .into_iter()
        .map(|date| DemandOverride {
            date,
            day_min: Some(day_min),
            day_max: Some(day_max),
            late: Some(late),
            night: Some(night),
        })
        .collect()
}

pub type Grid = HashMap<(String, NaiveDate), Shift>;

pub fn to_grid(cells: &[AssignmentCell]) -> Grid {
    cells
        .iter()
        .map(|cell| ((cell.nurse_id.clone(), cell.date), cell.shift))
        .collect()
}

/// Cells on which two grids disagree.
pub fn grid_distance(a: &Grid, b: &Grid) -> usize {
    assert_eq!(a.len(), b.len());
    a.iter()
        .filter(|(key, shift)| b.get(*key) != Some(shift))
        .count()
}
