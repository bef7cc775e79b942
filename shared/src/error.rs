use chrono::NaiveDate;
use thiserror::Error;

/// Structured rejection produced while normalizing raw roster input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
    #[error("Duplicate nurse id: {0}")]
    DuplicateNurseId(String),

    #[error("Bad date range for {year}-{month:02}: {reason}")]
    BadDateRange {
        year: i32,
        month: u32,
        reason: String,
    },

    #[error("Infeasible bounds: {0}")]
    InfeasibleBounds(String),

    #[error("Conflicting fixed shift for nurse {nurse_id} on {date}: {reason}")]
    ConflictingFixed {
        nurse_id: String,
        date: NaiveDate,
        reason: String,
    },

    #[error("At least one nurse is required")]
    EmptyRoster,
}

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error(transparent)]
    Compile(#[from] CompileError),

    #[error("Solver failure: {0}")]
    SolverFailure(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type DomainResult<T> = Result<T, DomainError>;
