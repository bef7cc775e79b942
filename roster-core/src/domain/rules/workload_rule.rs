use shared::Shift;

use super::{RosterContext, Rule};
use crate::domain::entities::{Violation, ViolationKind};

/// Rule: per-nurse monthly limits. Night duties stay within the allowed
/// range, weekly and weekend/holiday work stay under their caps, and
/// nobody works six consecutive days.
pub struct WorkloadRule;

impl Rule for WorkloadRule {
    fn check(&self, context: &RosterContext<'_>, violations: &mut Vec<Violation>) {
        let instance = context.instance;
        for (position, nurse) in instance.nurses.iter().enumerate() {
            let worked: Vec<bool> = (0..instance.day_count())
                .map(|day| context.assignment.get(position, day).is_working())
                .collect();
            let night_days: Vec<usize> = (0..instance.day_count())
                .filter(|&day| context.assignment.get(position, day) == Shift::Night)
                .collect();

            let nights = night_days.len() as u32;
            if nights > nurse.rules.night_max {
                violations.push(Violation {
                    date: instance.dates[night_days[nurse.rules.night_max as usize]],
                    shift: Some(Shift::Night),
                    nurse_id: Some(nurse.id.clone()),
                    kind: ViolationKind::NightCapExceeded,
                    message: format!(
                        "Nurse {} has {} night duties, allowed at most {}",
                        nurse.id, nights, nurse.rules.night_max
                    ),
                    difference: Some(nights as i64 - nurse.rules.night_max as i64),
                });
            } else if nights < nurse.rules.night_min {
                violations.push(Violation {
                    date: *instance.dates.last().expect("instance has dates"),
                    shift: Some(Shift::Night),
                    nurse_id: Some(nurse.id.clone()),
                    kind: ViolationKind::NightCapExceeded,
                    message: format!(
                        "Nurse {} has only {} night duties, at least {} required",
                        nurse.id, nights, nurse.rules.night_min
                    ),
                    difference: Some(nights as i64 - nurse.rules.night_min as i64),
                });
            }

            for bucket in instance.week_buckets() {
                let worked_days: Vec<usize> = bucket
                    .iter()
                    .copied()
                    .filter(|&day| worked[day])
                    .collect();
                let cap = nurse.rules.weekly_work_max as usize;
                if worked_days.len() > cap {
                    violations.push(Violation {
                        date: instance.dates[worked_days[cap]],
                        shift: None,
                        nurse_id: Some(nurse.id.clone()),
                        kind: ViolationKind::WeeklyCapExceeded,
                        message: format!(
                            "Nurse {} works {} days in the week starting {}, allowed at most {}",
                            nurse.id,
                            worked_days.len(),
                            instance.dates[bucket[0]],
                            cap
                        ),
                        difference: Some(worked_days.len() as i64 - cap as i64),
                    });
                }
            }

            let weekend_worked: Vec<usize> = instance
                .weekend_days()
                .iter()
                .copied()
                .filter(|&day| worked[day])
                .collect();
            let weekend_cap = nurse.rules.weekend_holiday_max as usize;
            if weekend_worked.len() > weekend_cap {
                violations.push(Violation {
                    date: instance.dates[weekend_worked[weekend_cap]],
                    shift: None,
                    nurse_id: Some(nurse.id.clone()),
                    kind: ViolationKind::WeekendCapExceeded,
                    message: format!(
                        "Nurse {} works {} weekend or holiday days, allowed at most {}",
                        nurse.id,
                        weekend_worked.len(),
                        weekend_cap
                    ),
                    difference: Some(weekend_worked.len() as i64 - weekend_cap as i64),
                });
            }

            // Runs of six or more working days, one violation per run.
            let mut run = 0usize;
            for day in 0..instance.day_count() {
                if worked[day] {
                    run += 1;
                    if run == 6 {
                        violations.push(Violation {
                            date: instance.dates[day],
                            shift: None,
                            nurse_id: Some(nurse.id.clone()),
                            kind: ViolationKind::ConsecutiveWork,
                            message: format!(
                                "Nurse {} works a sixth consecutive day on {}",
                                nurse.id, instance.dates[day]
                            ),
                            difference: None,
                        });
                    }
                } else {
                    run = 0;
                }
            }
        }
    }
}
