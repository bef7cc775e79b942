use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};

use crate::config::OptimizerConfig;

use super::{DayDemand, NurseRecord};

/// Fully normalized roster problem for one month. Immutable after
/// compilation; every solve call reads from it and owns nothing else.
#[derive(Debug, Clone)]
pub struct ProblemInstance {
    pub year: i32,
    pub month: u32,
    pub dates: Vec<NaiveDate>,
    pub nurses: Vec<NurseRecord>,
    pub demand: Vec<DayDemand>,
    pub config: OptimizerConfig,
    week_buckets: Vec<Vec<usize>>,
    weekend_days: Vec<usize>,
    nurse_index: HashMap<String, usize>,
}

impl ProblemInstance {
    /// Assembles an instance and precomputes the derived lookups. The
    /// compiler is responsible for having validated the parts.
    pub(crate) fn from_parts(
        year: i32,
        month: u32,
        dates: Vec<NaiveDate>,
        nurses: Vec<NurseRecord>,
        demand: Vec<DayDemand>,
        config: OptimizerConfig,
    ) -> Self {
        // ISO week buckets (Monday start), clipped at month boundaries.
        let mut week_buckets: Vec<Vec<usize>> = Vec::new();
        let mut current_key = None;
        for (offset, date) in dates.iter().enumerate() {
            let iso = date.iso_week();
            let key = (iso.year(), iso.week());
            if current_key != Some(key) {
                current_key = Some(key);
                week_buckets.push(Vec::new());
            }
            week_buckets
                .last_mut()
                .expect("bucket pushed above")
                .push(offset);
        }

        let weekend_days = demand
            .iter()
            .enumerate()
            .filter(|(_, d)| d.is_weekend_or_holiday())
            .map(|(offset, _)| offset)
            .collect();

        let nurse_index = nurses
            .iter()
            .enumerate()
            .map(|(position, nurse)| (nurse.id.clone(), position))
            .collect();

        Self {
            year,
            month,
            dates,
            nurses,
            demand,
            config,
            week_buckets,
            weekend_days,
            nurse_index,
        }
    }

    pub fn nurse_count(&self) -> usize {
        self.nurses.len()
    }

    pub fn day_count(&self) -> usize {
        self.dates.len()
    }

    pub fn nurse_position(&self, id: &str) -> Option<usize> {
        self.nurse_index.get(id).copied()
    }

    pub fn day_offset(&self, date: NaiveDate) -> Option<usize> {
        let first = *self.dates.first()?;
        let offset = date.signed_duration_since(first).num_days();
        if offset >= 0 && (offset as usize) < self.dates.len() {
            Some(offset as usize)
        } else {
            None
        }
    }

    /// Day offsets grouped per ISO week, clipped to the month.
    pub fn week_buckets(&self) -> &[Vec<usize>] {
        &self.week_buckets
    }

    /// Day offsets that count against the weekend/holiday cap.
    pub fn weekend_days(&self) -> &[usize] {
        &self.weekend_days
    }

    /// Minimum pairwise cell distance between emitted plans.
    pub fn cell_distance(&self) -> usize {
        self.config.cell_distance(self.nurse_count(), self.day_count())
    }
}
