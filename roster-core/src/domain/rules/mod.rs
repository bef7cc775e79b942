pub mod cell_lock_rule;
pub mod coverage_rule;
pub mod night_sequence_rule;
pub mod night_staffing_rule;
pub mod workload_rule;

pub use cell_lock_rule::CellLockRule;
pub use coverage_rule::CoverageRule;
pub use night_sequence_rule::NightSequenceRule;
pub use night_staffing_rule::NightStaffingRule;
pub use workload_rule::WorkloadRule;

use crate::domain::entities::{Assignment, ProblemInstance, Violation};

/// Everything a rule needs to inspect one complete roster.
#[derive(Clone, Copy)]
pub struct RosterContext<'a> {
    pub instance: &'a ProblemInstance,
    pub assignment: &'a Assignment,
}

pub trait Rule: Send + Sync {
    /// Append every breach of this rule to `violations`.
    fn check(&self, context: &RosterContext<'_>, violations: &mut Vec<Violation>);
}

/// The complete rule set in taxonomy order.
pub fn standard_rules() -> Vec<Box<dyn Rule>> {
    vec![
        Box::new(CoverageRule),
        Box::new(NightStaffingRule),
        Box::new(NightSequenceRule),
        Box::new(WorkloadRule),
        Box::new(CellLockRule),
    ]
}
