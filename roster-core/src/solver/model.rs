//! Translates a problem instance into `selen` constraint models.
//!
//! The solver consumes one model per round, so the builder re-creates the
//! model on demand and re-posts whatever cuts the enumeration loop has
//! accumulated. Everything is expressed as sums of non-negative integer
//! variables against constant bounds; a subtracted variable enters through
//! its complement.

use selen::prelude::*;
use shared::{Shift, Team};

use crate::domain::entities::{Assignment, ProblemInstance};

use super::engine::PreparedModel;

/// Position of one (nurse, day, shift) variable in the flat cell table.
fn cell_slot(days: usize, nurse: usize, day: usize, shift: Shift) -> usize {
    (nurse * days + day) * Shift::ALL.len() + shift.index()
}

fn cell(cells: &[VarId], days: usize, nurse: usize, day: usize, shift: Shift) -> VarId {
    cells[cell_slot(days, nurse, day, shift)]
}

/// A variable equal to `bound - of`, for the subtracted side of a sum.
fn complement_of(model: &mut Model, of: VarId, bound: i32) -> VarId {
    let complement = model.int(0, bound);
    let paired = model.sum(&[of, complement]);
    model.c(paired).eq(int(bound));
    complement
}

/// Posts a constraint no model can satisfy.
fn impossible(model: &mut Model) {
    let zero = model.int(0, 0);
    model.c(zero).ge(int(1));
}

/// Repeats a variable `weight` times in an objective term list.
fn weigh(terms: &mut Vec<VarId>, var: VarId, weight: i64) {
    for _ in 0..weight.max(0) {
        terms.push(var);
    }
}

fn ceil_div(a: i64, b: i64) -> i64 {
    (a + b - 1) / b
}

/// Builds constraint models for an instance, either strict or with
/// penalized slack on the staffing bounds for infeasibility diagnosis.
pub struct ModelBuilder<'a> {
    instance: &'a ProblemInstance,
    relax_coverage: bool,
    distance_cuts: Vec<Assignment>,
    objective_band: Option<i64>,
}

impl<'a> ModelBuilder<'a> {
    pub fn new(instance: &'a ProblemInstance) -> Self {
        Self {
            instance,
            relax_coverage: false,
            distance_cuts: Vec::new(),
            objective_band: None,
        }
    }

    pub fn relaxed(instance: &'a ProblemInstance) -> Self {
        Self {
            relax_coverage: true,
            ..Self::new(instance)
        }
    }

    /// Every later model must differ from `previous` on enough cells.
    pub fn add_distance_cut(&mut self, previous: Assignment) {
        self.distance_cuts.push(previous);
    }

    /// Caps the objective of every later model so alternative plans stay
    /// near the best known value.
    pub fn set_objective_band(&mut self, cap: i64) {
        self.objective_band = Some(cap);
    }

    /// Objective in caller units.
    pub fn score(&self, objective: i64) -> f64 {
        objective as f64
    }

    /// Reads the assignment grid out of the solved cell values.
    pub fn extract(&self, values: &[i64]) -> Assignment {
        let nurses = self.instance.nurse_count();
        let days = self.instance.day_count();
        let mut assignment = Assignment::new_off(nurses, days);
        for nurse in 0..nurses {
            for day in 0..days {
                for shift in Shift::ALL {
                    if values[cell_slot(days, nurse, day, shift)] == 1 {
                        assignment.set(nurse, day, shift);
                        break;
                    }
                }
            }
        }
        assignment
    }

    /// Builds one fresh model; `round_cap` is the enumeration loop's
    /// tightening bound on the objective.
    pub fn prepare(&self, round_cap: Option<i64>) -> PreparedModel {
        let instance = self.instance;
        let nurses = instance.nurse_count();
        let days = instance.day_count();
        let weights = &instance.config.weights;
        let mut m = Model::default();

        // One binary per (nurse, day, shift); excluded and pinned cells
        // get their domain collapsed up front.
        let mut cells: Vec<VarId> = Vec::with_capacity(nurses * days * Shift::ALL.len());
        for nurse in &instance.nurses {
            for &date in &instance.dates {
                let pinned = nurse.rules.fixed.get(&date).copied();
                for shift in Shift::ALL {
                    let banned = nurse.rules.forbidden.contains(&(date, shift))
                        || pinned.is_some_and(|pin| pin != shift);
                    cells.push(if banned {
                        m.int(0, 0)
                    } else if pinned == Some(shift) {
                        m.int(1, 1)
                    } else {
                        m.int(0, 1)
                    });
                }
            }
        }
        let var = |nurse: usize, day: usize, shift: Shift| cell(&cells, days, nurse, day, shift);

        // Exactly one shift per nurse per day.
        for nurse in 0..nurses {
            for day in 0..days {
                let row: Vec<VarId> = Shift::ALL
                    .iter()
                    .map(|&shift| var(nurse, day, shift))
                    .collect();
                let total = m.sum(&row);
                m.c(total).eq(int(1));
            }
        }

        let mut slack_terms: Vec<VarId> = Vec::new();

        // Per-day staffing bounds.
        for (day, demand) in instance.demand.iter().enumerate() {
            for (shift, lo, hi) in [
                (Shift::Day, demand.day_min as i32, demand.day_max as i32),
                (Shift::Late, demand.late as i32, demand.late as i32),
                (Shift::Night, demand.night as i32, demand.night as i32),
            ] {
                let mut terms: Vec<VarId> =
                    (0..nurses).map(|nurse| var(nurse, day, shift)).collect();
                let mut offset = 0;
                if self.relax_coverage {
                    let shortfall = m.int(0, lo);
                    let overrun = m.int(0, nurses as i32);
                    slack_terms.push(shortfall);
                    slack_terms.push(overrun);
                    terms.push(shortfall);
                    terms.push(complement_of(&mut m, overrun, nurses as i32));
                    offset = nurses as i32;
                }
                let total = m.sum(&terms);
                m.c(total).ge(int(lo + offset));
                m.c(total).le(int(hi + offset));
            }
        }

        // A night blocks day and late duty on the following date, and no
        // three nights in a row.
        for nurse in 0..nurses {
            for day in 0..days.saturating_sub(1) {
                for blocked in [Shift::Day, Shift::Late] {
                    let pair = m.sum(&[var(nurse, day, Shift::Night), var(nurse, day + 1, blocked)]);
                    m.c(pair).le(int(1));
                }
            }
            for day in 0..days.saturating_sub(2) {
                let trio: Vec<VarId> = (0..3)
                    .map(|offset| var(nurse, day + offset, Shift::Night))
                    .collect();
                let total = m.sum(&trio);
                m.c(total).le(int(2));
            }
        }

        // Per-nurse monthly limits.
        for (position, nurse) in instance.nurses.iter().enumerate() {
            let mut night_terms: Vec<VarId> = (0..days)
                .map(|day| var(position, day, Shift::Night))
                .collect();
            let mut offset = 0;
            if self.relax_coverage {
                let shortfall = m.int(0, nurse.rules.night_min as i32);
                let overrun = m.int(0, days as i32);
                slack_terms.push(shortfall);
                slack_terms.push(overrun);
                night_terms.push(shortfall);
                night_terms.push(complement_of(&mut m, overrun, days as i32));
                offset = days as i32;
            }
            let nights = m.sum(&night_terms);
            m.c(nights).ge(int(nurse.rules.night_min as i32 + offset));
            m.c(nights).le(int(nurse.rules.night_max as i32 + offset));

            // Weekly cap, written over off days: enough rest per ISO week.
            for bucket in instance.week_buckets() {
                let required_off = bucket.len() as i32 - nurse.rules.weekly_work_max as i32;
                if required_off <= 0 {
                    continue;
                }
                let mut terms: Vec<VarId> = bucket
                    .iter()
                    .map(|&day| var(position, day, Shift::Off))
                    .collect();
                if self.relax_coverage {
                    let shortfall = m.int(0, required_off);
                    slack_terms.push(shortfall);
                    terms.push(shortfall);
                }
                let rest = m.sum(&terms);
                m.c(rest).ge(int(required_off));
            }

            // Weekend and holiday cap.
            let weekend_days = instance.weekend_days();
            if !weekend_days.is_empty() {
                let mut terms: Vec<VarId> = weekend_days
                    .iter()
                    .flat_map(|&day| {
                        Shift::WORKING
                            .iter()
                            .map(move |&shift| var(position, day, shift))
                    })
                    .collect();
                let mut offset = 0;
                if self.relax_coverage {
                    let overrun = m.int(0, weekend_days.len() as i32);
                    slack_terms.push(overrun);
                    terms.push(complement_of(&mut m, overrun, weekend_days.len() as i32));
                    offset = weekend_days.len() as i32;
                }
                let worked = m.sum(&terms);
                m.c(worked)
                    .le(int(nurse.rules.weekend_holiday_max as i32 + offset));
            }

            // No six consecutive working days: an off day in every
            // six-day window.
            for start in 0..days.saturating_sub(5) {
                let window: Vec<VarId> = (start..start + 6)
                    .map(|day| var(position, day, Shift::Off))
                    .collect();
                let rest = m.sum(&window);
                m.c(rest).ge(int(1));
            }
        }

        // Night cover composition.
        for (day, demand) in instance.demand.iter().enumerate() {
            if demand.night == 0 {
                continue;
            }
            let night_of = |m: &mut Model, pick: &dyn Fn(usize) -> bool| {
                let members: Vec<VarId> = (0..nurses)
                    .filter(|&position| pick(position))
                    .map(|position| var(position, day, Shift::Night))
                    .collect();
                if members.is_empty() {
                    impossible(m);
                    None
                } else {
                    Some(m.sum(&members))
                }
            };
            if let Some(leaders) = night_of(&mut m, &|position| instance.nurses[position].leader_ok)
            {
                m.c(leaders).ge(int(1));
            }
            if demand.night >= 2 {
                for team in [Team::A, Team::B] {
                    if let Some(members) =
                        night_of(&mut m, &|position| instance.nurses[position].team == team)
                    {
                        m.c(members).ge(int(1));
                    }
                }
            }
            if demand.night >= 3 {
                let backup = night_of(&mut m, &|position| {
                    instance.nurses[position].team == Team::Emg
                        || instance.nurses[position].leader_ok
                });
                if let Some(backup) = backup {
                    m.c(backup).ge(int(1));
                }
            }
        }

        // Objective. The relaxed diagnosis minimizes total bound slippage
        // and nothing else; the strict model carries the soft preferences,
        // with weights realized as term multiplicities.
        let mut objective_terms: Vec<VarId> = Vec::new();
        if self.relax_coverage {
            objective_terms = slack_terms;
        } else {
            // Working a requested day off.
            for (position, nurse) in instance.nurses.iter().enumerate() {
                for &date in &nurse.rules.requested_off {
                    if let Some(day) = instance.day_offset(date) {
                        for shift in Shift::WORKING {
                            weigh(
                                &mut objective_terms,
                                var(position, day, shift),
                                weights.requested_off,
                            );
                        }
                    }
                }
            }

            // Late duty two days after a night leaves a single recovery
            // day; discouraged but allowed.
            for nurse in 0..nurses {
                for day in 0..days.saturating_sub(2) {
                    let flag = m.int(0, 1);
                    let spared = complement_of(&mut m, flag, 1);
                    let pattern = m.sum(&[
                        var(nurse, day, Shift::Night),
                        var(nurse, day + 2, Shift::Late),
                        spared,
                    ]);
                    m.c(pattern).le(int(2));
                    weigh(&mut objective_terms, flag, weights.pattern);
                }
            }

            // Night fairness: deviation outside the integer band around
            // the mean night load.
            let night_total: i64 = instance.demand.iter().map(|d| d.night as i64).sum();
            let night_floor = night_total.div_euclid(nurses as i64) as i32;
            let night_ceil = ceil_div(night_total, nurses as i64) as i32;
            for position in 0..nurses {
                let night_vars: Vec<VarId> = (0..days)
                    .map(|day| var(position, day, Shift::Night))
                    .collect();
                let count = m.sum(&night_vars);
                let deviation = m.int(0, days as i32);
                let floor_side = m.sum(&[count, deviation]);
                m.c(floor_side).ge(int(night_floor));
                let spared = complement_of(&mut m, deviation, days as i32);
                let ceil_side = m.sum(&[count, spared]);
                m.c(ceil_side).le(int(night_ceil + days as i32));
                weigh(&mut objective_terms, deviation, weights.night_fairness);
            }

            // Weekend fairness, against the band around the mean weekend
            // workload implied by the demand table.
            let weekend_days = instance.weekend_days();
            if !weekend_days.is_empty() {
                let doubled_total: i64 = weekend_days
                    .iter()
                    .map(|&day| {
                        let demand = &instance.demand[day];
                        2 * (demand.late as i64 + demand.night as i64)
                            + demand.day_min as i64
                            + demand.day_max as i64
                    })
                    .sum();
                let weekend_floor = doubled_total.div_euclid(2 * nurses as i64) as i32;
                let weekend_ceil = ceil_div(doubled_total, 2 * nurses as i64) as i32;
                let bound = weekend_days.len() as i32;
                for position in 0..nurses {
                    let work_vars: Vec<VarId> = weekend_days
                        .iter()
                        .flat_map(|&day| {
                            Shift::WORKING
                                .iter()
                                .map(move |&shift| var(position, day, shift))
                        })
                        .collect();
                    let worked = m.sum(&work_vars);
                    let deviation = m.int(0, bound);
                    let floor_side = m.sum(&[worked, deviation]);
                    m.c(floor_side).ge(int(weekend_floor));
                    let spared = complement_of(&mut m, deviation, bound);
                    let ceil_side = m.sum(&[worked, spared]);
                    m.c(ceil_side).le(int(weekend_ceil + bound));
                    weigh(&mut objective_terms, deviation, weights.weekend_fairness);
                }
            }
        }

        // Enumeration cuts: agreement with an earlier plan is capped.
        let min_distance = instance.cell_distance();
        for previous in &self.distance_cuts {
            let matching: Vec<VarId> = (0..nurses)
                .flat_map(|nurse| {
                    (0..days).map(move |day| var(nurse, day, previous.get(nurse, day)))
                })
                .collect();
            let agreement = m.sum(&matching);
            let matching_cap = (nurses * days).saturating_sub(min_distance);
            m.c(agreement).le(int(matching_cap as i32));
        }

        let objective = if objective_terms.is_empty() {
            m.int(0, 0)
        } else {
            m.sum(&objective_terms)
        };
        let cap = match (round_cap, self.objective_band) {
            (Some(round), Some(band)) => Some(round.min(band)),
            (round, band) => round.or(band),
        };
        if let Some(cap) = cap {
            m.c(objective).le(int(cap.max(-1) as i32));
        }

        PreparedModel {
            model: m,
            objective,
            outputs: cells,
        }
    }
}
