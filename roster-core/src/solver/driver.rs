//! Drives the solver loop: budgets, enumeration of alternative plans, and
//! the relaxed diagnosis solve.

use std::time::{Duration, Instant};

use shared::PlanStatus;

use crate::domain::entities::{Assignment, ProblemInstance};

use super::engine::{CancelToken, CpSolver, SolveParams, SolveStatus};
use super::model::ModelBuilder;

/// Result of one enumeration loop: ordered plans with their objective in
/// caller units.
#[derive(Debug)]
pub struct EnumerationOutcome {
    pub status: PlanStatus,
    pub plans: Vec<(Assignment, f64)>,
    pub warnings: Vec<String>,
}

pub struct SolverDriver<'a> {
    instance: &'a ProblemInstance,
}

impl<'a> SolverDriver<'a> {
    pub fn new(instance: &'a ProblemInstance) -> Self {
        Self { instance }
    }

    /// Solves for up to `alternatives` plans. After the first plan every
    /// later one must differ on enough cells and stay inside the
    /// objective band.
    pub fn enumerate(&self, alternatives: usize, cancel: &CancelToken) -> EnumerationOutcome {
        let config = &self.instance.config;
        let started = Instant::now();
        let total_budget = Duration::from_millis(config.total_budget_ms);
        let solve_cap = Duration::from_millis(config.solve_budget_ms);

        let mut builder = ModelBuilder::new(self.instance);
        let mut plans: Vec<(Assignment, f64)> = Vec::new();
        let mut warnings = Vec::new();
        let mut status = PlanStatus::Ok;

        for index in 1..=alternatives {
            let remaining = total_budget.saturating_sub(started.elapsed());
            if remaining.is_zero() {
                status = PlanStatus::TimeLimit;
                warnings.push(format!(
                    "time budget exhausted after {} plan(s)",
                    plans.len()
                ));
                break;
            }
            let slots = (alternatives - index + 1) as u32;
            let outcome = CpSolver::new(SolveParams {
                time_limit: (remaining / slots).min(solve_cap),
                improvement_rounds: config.improvement_rounds,
                cancel: cancel.clone(),
            })
            .minimize(|cap| builder.prepare(cap));

            tracing::info!(
                plan = index,
                status = ?outcome.status,
                rounds = outcome.stats.rounds,
                elapsed_ms = outcome.stats.elapsed.as_millis() as u64,
                "solve finished"
            );

            match outcome.status {
                SolveStatus::Optimal | SolveStatus::Feasible => {
                    let objective = outcome.objective.expect("incumbent carries an objective");
                    let values = outcome.values.expect("incumbent carries values");
                    let assignment = builder.extract(&values);
                    if index < alternatives {
                        if index == 1 {
                            let band = (objective as f64 * (1.0 + config.objective_band)).floor();
                            builder.set_objective_band(band as i64);
                        }
                        builder.add_distance_cut(assignment.clone());
                    }
                    plans.push((assignment, builder.score(objective)));

                    // A solve cut off mid-improvement leaves an unsettled
                    // base; return what was found instead of enumerating
                    // further from it.
                    if outcome.stats.timed_out || outcome.stats.cancelled {
                        status = if outcome.stats.cancelled {
                            PlanStatus::Cancelled
                        } else {
                            PlanStatus::TimeLimit
                        };
                        warnings.push(format!(
                            "plan {} search was cut short; objective not fully settled",
                            index
                        ));
                        break;
                    }
                }
                SolveStatus::Infeasible => {
                    if index == 1 {
                        status = PlanStatus::Infeasible;
                    }
                    // Later rounds: no sufficiently different plan is left.
                    break;
                }
                SolveStatus::Unknown => {
                    status = if outcome.stats.cancelled {
                        PlanStatus::Cancelled
                    } else {
                        PlanStatus::TimeLimit
                    };
                    warnings.push(if plans.is_empty() {
                        "no solution found within the time budget".to_string()
                    } else {
                        format!("time budget exhausted after {} plan(s)", plans.len())
                    });
                    break;
                }
            }
        }

        EnumerationOutcome {
            status,
            plans,
            warnings,
        }
    }

    /// Solves the slack-penalized model to show which staffing bounds an
    /// infeasible instance would have to break. Never surfaced as a plan.
    pub fn solve_relaxed(&self, cancel: &CancelToken) -> Option<(Assignment, f64)> {
        let config = &self.instance.config;
        let builder = ModelBuilder::relaxed(self.instance);
        let outcome = CpSolver::new(SolveParams {
            time_limit: Duration::from_millis(config.solve_budget_ms),
            improvement_rounds: config.improvement_rounds,
            cancel: cancel.clone(),
        })
        .minimize(|cap| builder.prepare(cap));

        tracing::info!(
            status = ?outcome.status,
            rounds = outcome.stats.rounds,
            elapsed_ms = outcome.stats.elapsed.as_millis() as u64,
            "relaxed diagnosis solve finished"
        );

        let values = outcome.values?;
        let objective = outcome.objective?;
        Some((builder.extract(&values), builder.score(objective)))
    }
}
