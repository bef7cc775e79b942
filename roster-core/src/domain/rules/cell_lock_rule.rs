use super::{RosterContext, Rule};
use crate::domain::entities::{Violation, ViolationKind};

/// Rule: excluded cells must stay unassigned and pinned cells must carry
/// exactly their pinned shift.
pub struct CellLockRule;

impl Rule for CellLockRule {
    fn check(&self, context: &RosterContext<'_>, violations: &mut Vec<Violation>) {
        let instance = context.instance;
        for (position, nurse) in instance.nurses.iter().enumerate() {
            for &(date, shift) in &nurse.rules.forbidden {
                let Some(day) = instance.day_offset(date) else {
                    continue;
                };
                if context.assignment.get(position, day) == shift {
                    violations.push(Violation {
                        date,
                        shift: Some(shift),
                        nurse_id: Some(nurse.id.clone()),
                        kind: ViolationKind::ForbiddenAssigned,
                        message: format!(
                            "Nurse {} is assigned {} on {} despite an exclusion",
                            nurse.id, shift, date
                        ),
                        difference: None,
                    });
                }
            }

            for (&date, &shift) in &nurse.rules.fixed {
                let Some(day) = instance.day_offset(date) else {
                    continue;
                };
                let assigned = context.assignment.get(position, day);
                if assigned != shift {
                    violations.push(Violation {
                        date,
                        shift: Some(shift),
                        nurse_id: Some(nurse.id.clone()),
                        kind: ViolationKind::FixedViolated,
                        message: format!(
                            "Nurse {} must have {} on {}, assigned {}",
                            nurse.id, shift, date, assigned
                        ),
                        difference: None,
                    });
                }
            }
        }
    }
}
