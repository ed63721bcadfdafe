use std::fmt;

use num_rational::BigRational;
use thiserror::Error;

use crate::expression::FormatError;
use crate::problem::GenerateError;

/// The two states a session can be in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Idle,
    Playing,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Status::Idle => write!(f, "Idle"),
            Status::Playing => write!(f, "Playing"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StatusError {
    #[error("StatusError:RequireCertainStatus[{0}]")]
    RequireCertainStatus(Status),
    #[error("StatusError:NoPendingProblem[-]")]
    NoPendingProblem,
}

/// A well-formed expression that the game still refuses
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnswerError {
    #[error("AnswerError:WrongAnswer[{0}]")]
    WrongAnswer(BigRational),
    #[error("AnswerError:RepeatedAnswer[{0}]")]
    RepeatedAnswer(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error(transparent)]
    Status(#[from] StatusError),
    #[error(transparent)]
    Generate(#[from] GenerateError),
    #[error(transparent)]
    Format(#[from] FormatError),
    #[error(transparent)]
    Answer(#[from] AnswerError),
}

impl GameError {
    /// Numeric code: the high nibble is the kind, the low nibble the variant
    pub fn code(&self) -> u8 {
        match self {
            GameError::Status(_) => 0x00,
            GameError::Generate(e) => e.code(),
            GameError::Format(e) => e.code(),
            GameError::Answer(AnswerError::WrongAnswer(_)) => 0x20,
            GameError::Answer(AnswerError::RepeatedAnswer(_)) => 0x21,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            GameError::Status(_) => "StatusError",
            GameError::Generate(_) => "ProblemGenerateError",
            GameError::Format(_) => "FormatError",
            GameError::Answer(_) => "AnswerError",
        }
    }
}
