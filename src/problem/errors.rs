use thiserror::Error;

/// Reasons a number sequence cannot form a problem
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProblemError {
    #[error("Problem must have exactly 5 numbers, got {0}")]
    WrongLength(usize),
    #[error("Problem number {0} is outside 0..=13")]
    OutOfRange(u64),
}

/// Errors raised while generating the next problem
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerateError {
    #[error("ProblemGenerateError:FailedToParse[{0}]")]
    FailedToParse(String),
    #[error("ProblemGenerateError:NoSolution[{0}]")]
    NoSolution(String),
    #[error("ProblemGenerateError:UnmatchedProbLength[{0}]")]
    UnmatchedProbLength(usize),
    #[error("ProblemGenerateError:MethodNotFound[{0}]")]
    MethodNotFound(String),
}

impl GenerateError {
    pub fn code(&self) -> u8 {
        match self {
            GenerateError::FailedToParse(_) => 0x01,
            GenerateError::NoSolution(_) => 0x02,
            GenerateError::UnmatchedProbLength(_) => 0x03,
            GenerateError::MethodNotFound(_) => 0x04,
        }
    }
}
