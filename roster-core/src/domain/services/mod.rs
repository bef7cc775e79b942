pub mod analyzer;
pub mod compiler;
pub mod planner;
pub mod recommender;

pub use analyzer::Analyzer;
pub use compiler::{FixedHolidays, HolidayCalendar, NoHolidays, RuleCompiler};
pub use planner::{PlanOutcome, RosterPlanner};
pub use recommender::Recommender;
