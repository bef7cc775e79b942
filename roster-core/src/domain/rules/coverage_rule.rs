use chrono::NaiveDate;
use shared::Shift;

use super::{RosterContext, Rule};
use crate::domain::entities::{Violation, ViolationKind};

/// Rule: every date must be staffed within its demand bounds, with exact
/// counts for late and night duty.
pub struct CoverageRule;

impl Rule for CoverageRule {
    fn check(&self, context: &RosterContext<'_>, violations: &mut Vec<Violation>) {
        for (day, demand) in context.instance.demand.iter().enumerate() {
            let mut day_count = 0u32;
            let mut late_count = 0u32;
            let mut night_count = 0u32;
            for nurse in 0..context.instance.nurse_count() {
                match context.assignment.get(nurse, day) {
                    Shift::Day => day_count += 1,
                    Shift::Late => late_count += 1,
                    Shift::Night => night_count += 1,
                    Shift::Off => {}
                }
            }
            check_bounds(
                demand.date,
                Shift::Day,
                day_count,
                demand.day_min,
                demand.day_max,
                violations,
            );
            check_bounds(
                demand.date,
                Shift::Late,
                late_count,
                demand.late,
                demand.late,
                violations,
            );
            check_bounds(
                demand.date,
                Shift::Night,
                night_count,
                demand.night,
                demand.night,
                violations,
            );
        }
    }
}

fn check_bounds(
    date: NaiveDate,
    shift: Shift,
    assigned: u32,
    min: u32,
    max: u32,
    violations: &mut Vec<Violation>,
) {
    if assigned < min {
        violations.push(Violation {
            date,
            shift: Some(shift),
            nurse_id: None,
            kind: ViolationKind::Shortage,
            message: format!(
                "{} duty understaffed on {}: assigned {}, required at least {}",
                shift, date, assigned, min
            ),
            difference: Some(assigned as i64 - min as i64),
        });
    } else if assigned > max {
        violations.push(Violation {
            date,
            shift: Some(shift),
            nurse_id: None,
            kind: ViolationKind::Excess,
            message: format!(
                "{} duty overstaffed on {}: assigned {}, allowed at most {}",
                shift, date, assigned, max
            ),
            difference: Some(assigned as i64 - max as i64),
        });
    }
}
