use std::collections::HashSet;

use shared::Shift;

use crate::domain::entities::{
    AnalysisReport, Assignment, DaySummary, NurseSummary, ProblemInstance, ShiftCounts,
    ViolationCell, ViolationKind,
};
use crate::domain::rules::{standard_rules, RosterContext};

/// Re-examines a complete assignment against the rule set. Pure; never
/// touches the solver.
pub struct Analyzer;

impl Analyzer {
    pub fn analyze(assignment: &Assignment, instance: &ProblemInstance) -> AnalysisReport {
        let context = RosterContext {
            instance,
            assignment,
        };
        let mut violations = Vec::new();
        for rule in standard_rules() {
            rule.check(&context, &mut violations);
        }
        violations.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));

        let mut seen = HashSet::new();
        let violation_cells: Vec<ViolationCell> = violations
            .iter()
            .filter(|violation| {
                matches!(
                    violation.kind,
                    ViolationKind::Shortage | ViolationKind::Excess
                )
            })
            .map(|violation| ViolationCell {
                date: violation.date,
                shift: violation
                    .shift
                    .expect("demand-bound violations carry a shift"),
                kind: violation.kind,
            })
            .filter(|cell| seen.insert(*cell))
            .collect();

        let per_day = Self::per_day(assignment, instance);
        let per_nurse = Self::per_nurse(assignment, instance);
        let warnings = Self::warnings(assignment, instance);

        AnalysisReport {
            ok: violations.is_empty(),
            per_day,
            per_nurse,
            violations,
            violation_cells,
            recommendations: Vec::new(),
            warnings,
        }
    }

    fn per_day(assignment: &Assignment, instance: &ProblemInstance) -> Vec<DaySummary> {
        instance
            .demand
            .iter()
            .enumerate()
            .map(|(day, demand)| {
                let mut filled = ShiftCounts::default();
                for nurse in 0..instance.nurse_count() {
                    match assignment.get(nurse, day) {
                        Shift::Day => filled.day += 1,
                        Shift::Late => filled.late += 1,
                        Shift::Night => filled.night += 1,
                        Shift::Off => {}
                    }
                }
                DaySummary {
                    date: demand.date,
                    filled,
                    requirements: *demand,
                }
            })
            .collect()
    }

    fn per_nurse(assignment: &Assignment, instance: &ProblemInstance) -> Vec<NurseSummary> {
        instance
            .nurses
            .iter()
            .enumerate()
            .map(|(position, nurse)| {
                let mut summary = NurseSummary {
                    nurse_id: nurse.id.clone(),
                    day: 0,
                    late: 0,
                    night: 0,
                    off: 0,
                    weekend_work: 0,
                    total_work_days: 0,
                };
                for day in 0..instance.day_count() {
                    match assignment.get(position, day) {
                        Shift::Day => summary.day += 1,
                        Shift::Late => summary.late += 1,
                        Shift::Night => summary.night += 1,
                        Shift::Off => summary.off += 1,
                    }
                }
                summary.total_work_days = summary.day + summary.late + summary.night;
                summary.weekend_work = instance
                    .weekend_days()
                    .iter()
                    .filter(|&&day| assignment.get(position, day).is_working())
                    .count() as u32;
                summary
            })
            .collect()
    }

    fn warnings(assignment: &Assignment, instance: &ProblemInstance) -> Vec<String> {
        let mut warnings = Vec::new();
        for (position, nurse) in instance.nurses.iter().enumerate() {
            for &date in &nurse.rules.requested_off {
                let Some(day) = instance.day_offset(date) else {
                    continue;
                };
                let shift = assignment.get(position, day);
                if shift.is_working() {
                    warnings.push(format!(
                        "Nurse {} works {} on requested day off {}",
                        nurse.id, shift, date
                    ));
                }
            }
        }
        warnings
    }
}
