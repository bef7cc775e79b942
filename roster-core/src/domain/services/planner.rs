use shared::{CompileError, DomainError, DomainResult, PlanStatus};

use crate::domain::entities::{
    AnalysisReport, Assignment, AssignmentCell, ProblemInstance, Solution,
};
use crate::solver::{CancelToken, SolverDriver};

use super::{Analyzer, Recommender};

/// Result of one planning call.
#[derive(Debug)]
pub struct PlanOutcome {
    pub status: PlanStatus,
    pub solutions: Vec<Solution>,
    /// Populated on infeasible outcomes so the caller can see why.
    pub analysis: Option<AnalysisReport>,
    pub warnings: Vec<String>,
}

/// Orchestrates the three planning flows: fresh optimization,
/// re-optimization under pinned cells, and solver-free rechecking.
pub struct RosterPlanner;

impl RosterPlanner {
    /// Solves an instance for up to `alternatives` plans. When the
    /// instance proves infeasible the outcome carries the analysis of the
    /// closest feasible relaxation.
    pub fn optimize(
        instance: &ProblemInstance,
        alternatives: usize,
        cancel: &CancelToken,
    ) -> PlanOutcome {
        let mut outcome = Self::run(instance, alternatives, cancel);
        if outcome.status == PlanStatus::Infeasible {
            match SolverDriver::new(instance).solve_relaxed(cancel) {
                Some((relaxed, _)) => {
                    outcome.analysis = Some(Self::recheck(&relaxed, instance));
                    outcome.warnings.push(
                        "instance is infeasible; the analysis shows the closest feasible relaxation"
                            .to_string(),
                    );
                }
                None => {
                    outcome
                        .warnings
                        .push("instance is infeasible and no relaxation explains it".to_string());
                }
            }
        }
        outcome
    }

    /// Re-solves with the given cells pinned on top of the instance. On
    /// infeasibility the outcome carries the analysis of the assignment
    /// the user started from.
    pub fn reoptimize(
        base: &Assignment,
        pinned: &[AssignmentCell],
        instance: &ProblemInstance,
        alternatives: usize,
        cancel: &CancelToken,
    ) -> DomainResult<PlanOutcome> {
        let pinned_instance = Self::with_pins(instance, pinned)?;
        let mut outcome = Self::run(&pinned_instance, alternatives, cancel);
        if outcome.status == PlanStatus::Infeasible {
            outcome.analysis = Some(Self::recheck(base, &pinned_instance));
            outcome.warnings.push(
                "pinned cells make the roster infeasible; the analysis reflects the current grid"
                    .to_string(),
            );
        }
        Ok(outcome)
    }

    /// Re-examines an assignment without touching the solver.
    pub fn recheck(assignment: &Assignment, instance: &ProblemInstance) -> AnalysisReport {
        let mut report = Analyzer::analyze(assignment, instance);
        let recommendations = Recommender::recommend(&report, assignment, instance);
        report.recommendations = recommendations;
        report
    }

    fn run(instance: &ProblemInstance, alternatives: usize, cancel: &CancelToken) -> PlanOutcome {
        let outcome = SolverDriver::new(instance).enumerate(alternatives, cancel);
        tracing::info!(
            status = ?outcome.status,
            plans = outcome.plans.len(),
            "planning finished"
        );
        let solutions = outcome
            .plans
            .into_iter()
            .enumerate()
            .map(|(index, (assignment, objective))| Solution {
                plan_id: format!("plan-{}", index + 1),
                assignment,
                objective,
            })
            .collect();
        PlanOutcome {
            status: outcome.status,
            solutions,
            analysis: None,
            warnings: outcome.warnings,
        }
    }

    fn with_pins(
        instance: &ProblemInstance,
        pinned: &[AssignmentCell],
    ) -> DomainResult<ProblemInstance> {
        let mut updated = instance.clone();
        for cell in pinned {
            let position = updated.nurse_position(&cell.nurse_id).ok_or_else(|| {
                DomainError::Validation(format!("fixed: unknown nurse id {}", cell.nurse_id))
            })?;
            if updated.day_offset(cell.date).is_none() {
                return Err(DomainError::Validation(format!(
                    "fixed: date {} is outside {}-{:02}",
                    cell.date, updated.year, updated.month
                )));
            }
            let nurse = &mut updated.nurses[position];
            if nurse.rules.forbidden.contains(&(cell.date, cell.shift)) {
                return Err(CompileError::ConflictingFixed {
                    nurse_id: cell.nurse_id.clone(),
                    date: cell.date,
                    reason: format!("{} is both pinned and excluded", cell.shift),
                }
                .into());
            }
            if let Some(&existing) = nurse.rules.fixed.get(&cell.date) {
                if existing != cell.shift {
                    return Err(CompileError::ConflictingFixed {
                        nurse_id: cell.nurse_id.clone(),
                        date: cell.date,
                        reason: format!("both {} and {} are pinned", existing, cell.shift),
                    }
                    .into());
                }
            }
            nurse.rules.fixed.insert(cell.date, cell.shift);
        }
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OptimizerConfig;
    use crate::domain::fixtures;
    use shared::{Shift, Team};

    fn test_config() -> OptimizerConfig {
        OptimizerConfig {
            improvement_rounds: 8,
            ..OptimizerConfig::default()
        }
    }

    fn ward() -> Vec<crate::domain::entities::NurseRecord> {
        vec![
            fixtures::nurse("n1", Team::A, true),
            fixtures::nurse("n2", Team::A, true),
            fixtures::nurse("n3", Team::B, true),
            fixtures::nurse("n4", Team::B, true),
        ]
    }

    #[test]
    fn test_optimize_produces_clean_plans() {
        let instance = fixtures::instance_with_config(ward(), 3, (2, 3, 0, 1), test_config());
        let outcome = RosterPlanner::optimize(&instance, 1, &CancelToken::new());
        assert_eq!(outcome.status, PlanStatus::Ok);
        assert_eq!(outcome.solutions.len(), 1);
        assert_eq!(outcome.solutions[0].plan_id, "plan-1");

        let report = RosterPlanner::recheck(&outcome.solutions[0].assignment, &instance);
        assert!(report.ok);
        assert!(report.violations.is_empty());
    }

    #[test]
    fn test_reoptimize_honors_pins() {
        let instance = fixtures::instance_with_config(ward(), 3, (2, 3, 0, 1), test_config());
        let base = RosterPlanner::optimize(&instance, 1, &CancelToken::new())
            .solutions
            .remove(0)
            .assignment;

        let pin = AssignmentCell {
            nurse_id: "n2".to_string(),
            date: instance.dates[1],
            shift: Shift::Night,
        };
        let outcome =
            RosterPlanner::reoptimize(&base, &[pin], &instance, 1, &CancelToken::new()).unwrap();
        assert_eq!(outcome.status, PlanStatus::Ok);
        assert_eq!(outcome.solutions[0].assignment.get(1, 1), Shift::Night);
    }

    #[test]
    fn test_reoptimize_with_every_cell_pinned_returns_the_base() {
        let instance = fixtures::instance_with_config(ward(), 3, (2, 3, 0, 1), test_config());
        let base = RosterPlanner::optimize(&instance, 1, &CancelToken::new())
            .solutions
            .remove(0)
            .assignment;

        let pins = base.to_cells(&instance);
        let outcome =
            RosterPlanner::reoptimize(&base, &pins, &instance, 1, &CancelToken::new()).unwrap();
        assert_eq!(outcome.status, PlanStatus::Ok);
        assert_eq!(outcome.solutions[0].assignment, base);
    }

    #[test]
    fn test_pin_conflicting_with_exclusion_is_rejected() {
        let mut nurses = ward();
        let dates = fixtures::june_dates(3);
        nurses[0].rules.forbidden.insert((dates[0], Shift::Night));
        let instance = fixtures::instance_with_config(nurses, 3, (2, 3, 0, 1), test_config());
        let base = Assignment::new_off(4, 3);

        let pin = AssignmentCell {
            nurse_id: "n1".to_string(),
            date: dates[0],
            shift: Shift::Night,
        };
        let result = RosterPlanner::reoptimize(&base, &[pin], &instance, 1, &CancelToken::new());
        assert!(matches!(
            result,
            Err(DomainError::Compile(CompileError::ConflictingFixed { .. }))
        ));
    }

    #[test]
    fn test_infeasible_outcome_carries_relaxation_analysis() {
        // Weekly cap of one working day starves the demand.
        let mut nurses = ward();
        for nurse in &mut nurses {
            nurse.rules.weekly_work_max = 1;
        }
        let instance = fixtures::instance_with_config(nurses, 5, (2, 3, 0, 1), test_config());
        let outcome = RosterPlanner::optimize(&instance, 1, &CancelToken::new());

        assert_eq!(outcome.status, PlanStatus::Infeasible);
        assert!(outcome.solutions.is_empty());
        let analysis = outcome.analysis.expect("diagnosis expected");
        assert!(!analysis.ok);
        assert!(analysis
            .violations
            .iter()
            .any(|violation| violation.difference.unwrap_or(0) != 0));
    }
}
