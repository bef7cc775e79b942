use std::collections::{BTreeMap, BTreeSet, HashSet};

use chrono::{Datelike, NaiveDate, Weekday};
use shared::CompileError;

use crate::config::OptimizerConfig;
use crate::domain::entities::{
    DayDemand, DemandOverride, NurseInput, NurseRecord, NurseRules, ProblemInstance,
};

/// External collaborator answering holiday lookups. The core never owns a
/// calendar of its own.
pub trait HolidayCalendar: Send + Sync {
    fn is_holiday(&self, date: NaiveDate) -> bool;
}

/// Holiday calendar backed by an explicit date set.
#[derive(Debug, Clone, Default)]
pub struct FixedHolidays {
    dates: BTreeSet<NaiveDate>,
}

impl FixedHolidays {
    pub fn new(dates: impl IntoIterator<Item = NaiveDate>) -> Self {
        Self {
            dates: dates.into_iter().collect(),
        }
    }
}

impl HolidayCalendar for FixedHolidays {
    fn is_holiday(&self, date: NaiveDate) -> bool {
        self.dates.contains(&date)
    }
}

/// Calendar with no holidays at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHolidays;

impl HolidayCalendar for NoHolidays {
    fn is_holiday(&self, _date: NaiveDate) -> bool {
        false
    }
}

/// Normalizes raw roster input into an immutable problem instance with
/// every default resolved, rejecting inconsistent input with structured
/// errors.
pub struct RuleCompiler<'a> {
    config: &'a OptimizerConfig,
    holidays: &'a dyn HolidayCalendar,
}

impl<'a> RuleCompiler<'a> {
    pub fn new(config: &'a OptimizerConfig, holidays: &'a dyn HolidayCalendar) -> Self {
        Self { config, holidays }
    }

    pub fn compile(
        &self,
        year: i32,
        month: u32,
        nurses: &[NurseInput],
        overrides: &[DemandOverride],
    ) -> Result<ProblemInstance, CompileError> {
        let dates = Self::expand_month(year, month)?;

        if nurses.is_empty() {
            return Err(CompileError::EmptyRoster);
        }

        let mut seen_ids = HashSet::new();
        let mut records = Vec::with_capacity(nurses.len());
        for nurse in nurses {
            if !seen_ids.insert(nurse.id.clone()) {
                return Err(CompileError::DuplicateNurseId(nurse.id.clone()));
            }
            records.push(self.resolve_nurse(nurse, &dates)?);
        }

        let demand = self.resolve_demand(year, month, &dates, overrides)?;

        let night_demand: i64 = demand.iter().map(|d| d.night as i64).sum();
        let night_min_sum: i64 = records.iter().map(|n| n.rules.night_min as i64).sum();
        let night_max_sum: i64 = records.iter().map(|n| n.rules.night_max as i64).sum();
        if night_min_sum > night_demand {
            return Err(CompileError::InfeasibleBounds(format!(
                "sum of night minimums ({}) exceeds total night demand ({})",
                night_min_sum, night_demand
            )));
        }
        if night_max_sum < night_demand {
            return Err(CompileError::InfeasibleBounds(format!(
                "sum of night maximums ({}) cannot cover total night demand ({})",
                night_max_sum, night_demand
            )));
        }

        Ok(ProblemInstance::from_parts(
            year,
            month,
            dates,
            records,
            demand,
            self.config.clone(),
        ))
    }

    fn expand_month(year: i32, month: u32) -> Result<Vec<NaiveDate>, CompileError> {
        let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or(CompileError::BadDateRange {
            year,
            month,
            reason: "not a valid calendar month".to_string(),
        })?;
        let next_month = if month == 12 {
            NaiveDate::from_ymd_opt(year + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(year, month + 1, 1)
        }
        .ok_or(CompileError::BadDateRange {
            year,
            month,
            reason: "month has no successor".to_string(),
        })?;

        let mut dates = Vec::new();
        let mut date = first;
        while date < next_month {
            dates.push(date);
            date = date.succ_opt().ok_or(CompileError::BadDateRange {
                year,
                month,
                reason: "date overflow".to_string(),
            })?;
        }
        Ok(dates)
    }

    fn resolve_nurse(
        &self,
        input: &NurseInput,
        dates: &[NaiveDate],
    ) -> Result<NurseRecord, CompileError> {
        let defaults = &self.config.default_rules;
        let days = dates.len() as u32;
        let in_month = |date: &NaiveDate| *date >= dates[0] && date <= dates.last().expect("month");

        let night_min = input.night_min.unwrap_or(defaults.night_min);
        let night_max = input.night_max.unwrap_or(defaults.night_max).min(days);
        if night_min > night_max {
            return Err(CompileError::InfeasibleBounds(format!(
                "nurse {}: night_min {} exceeds night_max {}",
                input.id, night_min, night_max
            )));
        }
        let weekly_work_max = input.weekly_work_max.unwrap_or(defaults.weekly_work_max);
        if !(1..=7).contains(&weekly_work_max) {
            return Err(CompileError::InfeasibleBounds(format!(
                "nurse {}: weekly_work_max must be between 1 and 7, got {}",
                input.id, weekly_work_max
            )));
        }

        let mut forbidden = BTreeSet::new();
        for entry in &input.forbidden_shifts {
            if !in_month(&entry.date) {
                return Err(CompileError::BadDateRange {
                    year: dates[0].year(),
                    month: dates[0].month(),
                    reason: format!(
                        "forbidden shift for nurse {} on {} is outside the month",
                        input.id, entry.date
                    ),
                });
            }
            forbidden.insert((entry.date, entry.shift));
        }

        let mut fixed = BTreeMap::new();
        for entry in &input.fixed_shifts {
            if !in_month(&entry.date) {
                return Err(CompileError::BadDateRange {
                    year: dates[0].year(),
                    month: dates[0].month(),
                    reason: format!(
                        "fixed shift for nurse {} on {} is outside the month",
                        input.id, entry.date
                    ),
                });
            }
            if let Some(existing) = fixed.insert(entry.date, entry.shift) {
                if existing != entry.shift {
                    return Err(CompileError::ConflictingFixed {
                        nurse_id: input.id.clone(),
                        date: entry.date,
                        reason: format!("both {} and {} are pinned", existing, entry.shift),
                    });
                }
            }
            if forbidden.contains(&(entry.date, entry.shift)) {
                return Err(CompileError::ConflictingFixed {
                    nurse_id: input.id.clone(),
                    date: entry.date,
                    reason: format!("{} is both pinned and excluded", entry.shift),
                });
            }
        }

        // Requested off days outside the month carry no meaning; drop them.
        let requested_off = input
            .requested_off
            .iter()
            .copied()
            .filter(in_month)
            .collect();

        Ok(NurseRecord {
            id: input.id.clone(),
            name: input.name.clone(),
            team: input.team,
            leader_ok: input.leader_ok,
            rules: NurseRules {
                night_min,
                night_max,
                weekly_work_max,
                weekend_holiday_max: input
                    .weekend_holiday_max
                    .unwrap_or(defaults.weekend_holiday_max),
                requested_off,
                forbidden,
                fixed,
            },
        })
    }

    fn resolve_demand(
        &self,
        year: i32,
        month: u32,
        dates: &[NaiveDate],
        overrides: &[DemandOverride],
    ) -> Result<Vec<DayDemand>, CompileError> {
        let mut by_date: BTreeMap<NaiveDate, &DemandOverride> = BTreeMap::new();
        for entry in overrides {
            if entry.date < dates[0] || entry.date > *dates.last().expect("month") {
                return Err(CompileError::BadDateRange {
                    year,
                    month,
                    reason: format!("demand override on {} is outside the month", entry.date),
                });
            }
            by_date.insert(entry.date, entry);
        }

        dates
            .iter()
            .map(|&date| {
                let weekday = date.weekday().num_days_from_monday() as u8;
                let is_weekend =
                    matches!(date.weekday(), Weekday::Sat | Weekday::Sun);
                let is_holiday = self.holidays.is_holiday(date);
                let defaults = if is_weekend || is_holiday {
                    self.config.default_demand.weekend
                } else {
                    self.config.default_demand.weekday
                };
                let entry = by_date.get(&date);
                let demand = DayDemand {
                    date,
                    day_min: entry
                        .and_then(|o| o.day_min)
                        .unwrap_or(defaults.day_min),
                    day_max: entry
                        .and_then(|o| o.day_max)
                        .unwrap_or(defaults.day_max),
                    late: entry.and_then(|o| o.late).unwrap_or(defaults.late),
                    night: entry.and_then(|o| o.night).unwrap_or(defaults.night),
                    weekday,
                    is_weekend,
                    is_holiday,
                };
                if demand.day_min > demand.day_max {
                    return Err(CompileError::InfeasibleBounds(format!(
                        "day duty bounds on {} are inverted: {} > {}",
                        date, demand.day_min, demand.day_max
                    )));
                }
                Ok(demand)
            })
            .collect()
    }
}
