use shared::{Shift, Team};

use super::{RosterContext, Rule};
use crate::domain::entities::{NurseRecord, Violation, ViolationKind};

/// Rule: night cover needs a shift leader, and heavier nights need a mix
/// of both ward teams plus emergency backup.
pub struct NightStaffingRule;

impl Rule for NightStaffingRule {
    fn check(&self, context: &RosterContext<'_>, violations: &mut Vec<Violation>) {
        let instance = context.instance;
        for (day, demand) in instance.demand.iter().enumerate() {
            let on_night: Vec<&NurseRecord> = instance
                .nurses
                .iter()
                .enumerate()
                .filter(|(position, _)| context.assignment.get(*position, day) == Shift::Night)
                .map(|(_, nurse)| nurse)
                .collect();

            // An empty night is a coverage shortage, not a staffing mix issue.
            if on_night.is_empty() {
                continue;
            }

            if !on_night.iter().any(|nurse| nurse.leader_ok) {
                violations.push(Violation {
                    date: demand.date,
                    shift: Some(Shift::Night),
                    nurse_id: None,
                    kind: ViolationKind::NightLeaderMissing,
                    message: format!("No shift leader on night duty on {}", demand.date),
                    difference: None,
                });
            }

            if demand.night >= 2 {
                for team in [Team::A, Team::B] {
                    if !on_night.iter().any(|nurse| nurse.team == team) {
                        violations.push(Violation {
                            date: demand.date,
                            shift: Some(Shift::Night),
                            nurse_id: None,
                            kind: ViolationKind::NightTeamMix,
                            message: format!(
                                "Night duty on {} has no team {} member",
                                demand.date, team
                            ),
                            difference: None,
                        });
                    }
                }
            }

            if demand.night >= 3
                && !on_night
                    .iter()
                    .any(|nurse| nurse.team == Team::Emg || nurse.leader_ok)
            {
                violations.push(Violation {
                    date: demand.date,
                    shift: Some(Shift::Night),
                    nurse_id: None,
                    kind: ViolationKind::NightTeamMix,
                    message: format!(
                        "Night duty on {} has no emergency team member or shift leader",
                        demand.date
                    ),
                    difference: None,
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::Assignment;
    use crate::domain::fixtures;

    #[test]
    fn test_missing_leader_flagged() {
        let nurses = vec![
            fixtures::nurse("n1", Team::A, false),
            fixtures::nurse("n2", Team::B, true),
        ];
        let instance = fixtures::instance(nurses, 1, (0, 1, 0, 1));
        let mut assignment = Assignment::new_off(2, 1);
        assignment.set(0, 0, Shift::Night);

        let mut violations = Vec::new();
        NightStaffingRule.check(
            &RosterContext {
                instance: &instance,
                assignment: &assignment,
            },
            &mut violations,
        );
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].kind, ViolationKind::NightLeaderMissing);
    }

    #[test]
    fn test_single_team_double_night_flagged() {
        let nurses = vec![
            fixtures::nurse("n1", Team::A, true),
            fixtures::nurse("n2", Team::A, false),
            fixtures::nurse("n3", Team::B, false),
        ];
        let instance = fixtures::instance(nurses, 1, (0, 1, 0, 2));
        let mut assignment = Assignment::new_off(3, 1);
        assignment.set(0, 0, Shift::Night);
        assignment.set(1, 0, Shift::Night);

        let mut violations = Vec::new();
        NightStaffingRule.check(
            &RosterContext {
                instance: &instance,
                assignment: &assignment,
            },
            &mut violations,
        );
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].kind, ViolationKind::NightTeamMix);
        assert!(violations[0].message.contains("team B"));
    }

    #[test]
    fn test_mixed_night_with_leader_is_clean() {
        let nurses = vec![
            fixtures::nurse("n1", Team::A, true),
            fixtures::nurse("n2", Team::B, false),
        ];
        let instance = fixtures::instance(nurses, 1, (0, 1, 0, 2));
        let mut assignment = Assignment::new_off(2, 1);
        assignment.set(0, 0, Shift::Night);
        assignment.set(1, 0, Shift::Night);

        let mut violations = Vec::new();
        NightStaffingRule.check(
            &RosterContext {
                instance: &instance,
                assignment: &assignment,
            },
            &mut violations,
        );
        assert!(violations.is_empty());
    }
}
