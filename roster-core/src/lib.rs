//! Monthly nurse roster optimization core.
//!
//! The pipeline: raw input is compiled into a [`domain::entities::ProblemInstance`],
//! translated into a constraint model, solved for up to ten diverse plans,
//! and every returned plan is re-examined by the analyzer. User-edited
//! grids go through the same rule set via `recommend`, which also proposes
//! single-cell repairs.

pub mod config;
pub mod domain;
pub mod presentation;
pub mod service;
pub mod solver;

pub use config::OptimizerConfig;
pub use domain::entities::{Assignment, AssignmentCell, ProblemInstance, Solution};
pub use domain::services::{
    Analyzer, FixedHolidays, HolidayCalendar, NoHolidays, Recommender, RosterPlanner, RuleCompiler,
};
pub use service::RosterService;
pub use solver::CancelToken;
