pub mod driver;
pub mod engine;
pub mod model;

pub use driver::{EnumerationOutcome, SolverDriver};
pub use engine::{CancelToken, CpSolver, PreparedModel, SolveOutcome, SolveParams, SolveStatus};
pub use model::ModelBuilder;
