use std::collections::HashSet;

use chrono::NaiveDate;
use shared::Shift;

use crate::domain::entities::{
    AnalysisReport, Assignment, CellRecommendation, ProblemInstance, Suggestion, Violation,
    ViolationCell, ViolationKind,
};

use super::Analyzer;

const MAX_SUGGESTIONS: usize = 5;

type ViolationKey = (NaiveDate, Option<Shift>, Option<String>, ViolationKind);

/// Proposes ranked single-cell repairs for demand-bound violations. Works
/// by simulation only: clone the grid, change one cell, re-analyze. Never
/// calls the solver and never proposes multi-cell edits.
pub struct Recommender;

impl Recommender {
    pub fn recommend(
        report: &AnalysisReport,
        assignment: &Assignment,
        instance: &ProblemInstance,
    ) -> Vec<CellRecommendation> {
        let base_keys = violation_keys(&report.violations);

        report
            .violation_cells
            .iter()
            .map(|cell| {
                let suggestions = match cell.kind {
                    ViolationKind::Shortage => {
                        Self::for_shortage(cell, report, assignment, instance, &base_keys)
                    }
                    ViolationKind::Excess => {
                        Self::for_excess(cell, report, assignment, instance, &base_keys)
                    }
                    _ => Vec::new(),
                };
                CellRecommendation {
                    date: cell.date,
                    shift: cell.shift,
                    kind: cell.kind,
                    suggestions,
                }
            })
            .collect()
    }

    fn for_shortage(
        cell: &ViolationCell,
        report: &AnalysisReport,
        assignment: &Assignment,
        instance: &ProblemInstance,
        base_keys: &HashSet<ViolationKey>,
    ) -> Vec<Suggestion> {
        let day = instance
            .day_offset(cell.date)
            .expect("violation cell lies within the instance");
        let mut ranked: Vec<(i64, u32, String, Suggestion)> = Vec::new();
        let mut locked: Vec<Suggestion> = Vec::new();

        for (position, nurse) in instance.nurses.iter().enumerate() {
            let current = assignment.get(position, day);
            if current == cell.shift {
                continue;
            }
            if nurse.rules.fixed.contains_key(&cell.date) {
                locked.push(Suggestion {
                    nurse_id: nurse.id.clone(),
                    current_shift: current,
                    suggested_shift: cell.shift,
                    reason: format!("Assignment for {} is locked on {}", nurse.id, cell.date),
                    locked: true,
                });
                continue;
            }

            let Some(soft_cost) =
                simulate_to(assignment, instance, position, day, cell.shift, cell, cell, base_keys)
            else {
                continue;
            };
            let shift_count = report.per_nurse[position].count(cell.shift);
            ranked.push((
                soft_cost,
                shift_count,
                nurse.id.clone(),
                Suggestion {
                    nurse_id: nurse.id.clone(),
                    current_shift: current,
                    suggested_shift: cell.shift,
                    reason: format!(
                        "Can move from {} to {} without breaking another rule ({} {} duties so far)",
                        current, cell.shift, shift_count, cell.shift
                    ),
                    locked: false,
                },
            ));
        }

        ranked.sort_by(|a, b| (a.0, a.1, &a.2).cmp(&(b.0, b.1, &b.2)));
        collect_suggestions(ranked, locked)
    }

    fn for_excess(
        cell: &ViolationCell,
        report: &AnalysisReport,
        assignment: &Assignment,
        instance: &ProblemInstance,
        base_keys: &HashSet<ViolationKey>,
    ) -> Vec<Suggestion> {
        let day = instance
            .day_offset(cell.date)
            .expect("violation cell lies within the instance");

        // Prefer filling a same-day shortage over plain rest.
        let mut targets: Vec<Shift> = report
            .violation_cells
            .iter()
            .filter(|other| {
                other.date == cell.date
                    && other.kind == ViolationKind::Shortage
                    && other.shift != cell.shift
            })
            .map(|other| other.shift)
            .collect();
        targets.push(Shift::Off);

        let mut ranked: Vec<(i64, i64, String, Suggestion)> = Vec::new();
        let mut locked: Vec<Suggestion> = Vec::new();

        for (position, nurse) in instance.nurses.iter().enumerate() {
            let current = assignment.get(position, day);
            if current != cell.shift {
                continue;
            }
            if nurse.rules.fixed.contains_key(&cell.date) {
                locked.push(Suggestion {
                    nurse_id: nurse.id.clone(),
                    current_shift: current,
                    suggested_shift: targets[0],
                    reason: format!("Assignment for {} is locked on {}", nurse.id, cell.date),
                    locked: true,
                });
                continue;
            }

            for &target in &targets {
                let target_cell = ViolationCell {
                    date: cell.date,
                    shift: target,
                    kind: ViolationKind::Shortage,
                };
                let Some(soft_cost) = simulate_to(
                    assignment, instance, position, day, target, cell, &target_cell, base_keys,
                ) else {
                    continue;
                };
                let shift_count = report.per_nurse[position].count(cell.shift);
                ranked.push((
                    soft_cost,
                    -(shift_count as i64),
                    nurse.id.clone(),
                    Suggestion {
                        nurse_id: nurse.id.clone(),
                        current_shift: current,
                        suggested_shift: target,
                        reason: format!(
                            "Can step back from {} to {} ({} {} duties so far)",
                            current, target, shift_count, cell.shift
                        ),
                        locked: false,
                    },
                ));
                break;
            }
        }

        ranked.sort_by(|a, b| (a.0, a.1, &a.2).cmp(&(b.0, b.1, &b.2)));
        collect_suggestions(ranked, locked)
    }
}

fn collect_suggestions<A, B>(
    ranked: Vec<(A, B, String, Suggestion)>,
    locked: Vec<Suggestion>,
) -> Vec<Suggestion> {
    let mut suggestions: Vec<Suggestion> = ranked
        .into_iter()
        .map(|(_, _, _, suggestion)| suggestion)
        .collect();
    suggestions.extend(locked);
    suggestions.truncate(MAX_SUGGESTIONS);
    suggestions
}

/// Applies one cell edit and re-analyzes. Returns the soft-preference
/// cost of the edited roster, or `None` when the edit introduces a fresh
/// hard violation beyond the two demand bounds being repaired. The base
/// soft counts are identical for every candidate, so the absolute count
/// ranks the same as the delta.
#[allow(clippy::too_many_arguments)]
fn simulate_to(
    assignment: &Assignment,
    instance: &ProblemInstance,
    position: usize,
    day: usize,
    target: Shift,
    source_cell: &ViolationCell,
    target_cell: &ViolationCell,
    base_keys: &HashSet<ViolationKey>,
) -> Option<i64> {
    let mut simulated = assignment.clone();
    simulated.set(position, day, target);
    let report = Analyzer::analyze(&simulated, instance);

    let fresh_hard = report
        .violations
        .iter()
        .filter(|violation| !base_keys.contains(&violation_key(violation)))
        .filter(|violation| !is_targeted_bound(violation, source_cell))
        .filter(|violation| !is_targeted_bound(violation, target_cell))
        .count();
    if fresh_hard > 0 {
        return None;
    }

    Some(report.warnings.len() as i64 + pattern_count(&simulated, instance) as i64)
}

fn is_targeted_bound(violation: &Violation, cell: &ViolationCell) -> bool {
    matches!(
        violation.kind,
        ViolationKind::Shortage | ViolationKind::Excess
    ) && violation.date == cell.date
        && violation.shift == Some(cell.shift)
}

fn violation_key(violation: &Violation) -> ViolationKey {
    (
        violation.date,
        violation.shift,
        violation.nurse_id.clone(),
        violation.kind,
    )
}

fn violation_keys(violations: &[Violation]) -> HashSet<ViolationKey> {
    violations.iter().map(violation_key).collect()
}

/// Soft scheduling preference: late duty two days after a night.
fn pattern_count(assignment: &Assignment, instance: &ProblemInstance) -> usize {
    let mut count = 0;
    for nurse in 0..instance.nurse_count() {
        for day in 0..instance.day_count().saturating_sub(2) {
            if assignment.get(nurse, day) == Shift::Night
                && assignment.get(nurse, day + 2) == Shift::Late
            {
                count += 1;
            }
        }
    }
    count
}
