use shared::Shift;

use super::{RosterContext, Rule};
use crate::domain::entities::{Violation, ViolationKind};

/// Rule: a night duty blocks day and late duty on the following date, and
/// nobody works three nights in a row.
pub struct NightSequenceRule;

impl Rule for NightSequenceRule {
    fn check(&self, context: &RosterContext<'_>, violations: &mut Vec<Violation>) {
        let instance = context.instance;
        let days = instance.day_count();

        for (position, nurse) in instance.nurses.iter().enumerate() {
            for day in 0..days.saturating_sub(1) {
                if context.assignment.get(position, day) != Shift::Night {
                    continue;
                }
                let next = context.assignment.get(position, day + 1);
                if next == Shift::Day || next == Shift::Late {
                    violations.push(Violation {
                        date: instance.dates[day + 1],
                        shift: Some(next),
                        nurse_id: Some(nurse.id.clone()),
                        kind: ViolationKind::NightAfterNightDay,
                        message: format!(
                            "Nurse {} has {} duty on {} directly after a night duty",
                            nurse.id,
                            next,
                            instance.dates[day + 1]
                        ),
                        difference: None,
                    });
                }
            }

            for day in 0..days.saturating_sub(2) {
                let triple = (0..3)
                    .all(|offset| context.assignment.get(position, day + offset) == Shift::Night);
                if triple {
                    violations.push(Violation {
                        date: instance.dates[day + 2],
                        shift: Some(Shift::Night),
                        nurse_id: Some(nurse.id.clone()),
                        kind: ViolationKind::ConsecutiveNight,
                        message: format!(
                            "Nurse {} works a third consecutive night duty on {}",
                            nurse.id,
                            instance.dates[day + 2]
                        ),
                        difference: None,
                    });
                }
            }
        }
    }
}
