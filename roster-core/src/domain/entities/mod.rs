pub mod analysis;
pub mod assignment;
pub mod demand;
pub mod nurse;
pub mod problem;
pub mod solution;

pub use analysis::{
    AnalysisReport, CellRecommendation, DaySummary, NurseSummary, ShiftCounts, Suggestion,
    Violation, ViolationCell, ViolationKind,
};
pub use assignment::{Assignment, AssignmentCell};
pub use demand::{DayDemand, DemandOverride};
pub use nurse::{NurseInput, NurseRecord, NurseRules, ShiftOnDate};
pub use problem::ProblemInstance;
pub use solution::Solution;
