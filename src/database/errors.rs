use thiserror::Error;

use crate::problem::Problem;

/// Errors that can occur while loading or saving a solution table
#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Database I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Database format error: {0}")]
    Format(#[from] serde_json::Error),
    #[error("Problem {0} appears more than once")]
    DuplicateProblem(Problem),
}
