//! Fortytwo - validation engine for the 42-points arithmetic puzzle
//!
//! Five numbers in `0..=13` are drawn and the player combines all of them,
//! each exactly once, with `+ - * /` and parentheses to reach 42. This crate
//! parses and checks candidate expressions exactly, detects answers that only
//! differ by reordering sums and products, and runs the play/idle session that
//! records accepted answers and solve times.

pub mod database;
pub mod expression;
pub mod game;
pub mod problem;

// Re-export the main public API
pub use database::{DatabaseBuilder, DatabaseError, SolutionTable};
pub use expression::{Canonical, Expression, FormatError};
pub use game::{AnswerError, DEFAULT_PLAYER, Game, GameError, Status, StatusError};
pub use problem::{GenerateError, GenerateMethod, GenerateOptions, Problem};

/// The value every answer must reach
pub const TARGET: u64 = 42;

/// Check a single answer against a problem, outside of any session
///
/// This is a convenience function running the same pipeline as
/// [`Game::solve`] except for the duplicate check, which needs a session history.
///
/// # Errors
///
/// Returns the first `FormatError` or `AnswerError` the answer triggers.
///
/// # Examples
///
/// ```
/// use fortytwo::{Problem, check_answer};
///
/// let problem = Problem::new(&[3, 4, 6, 7, 12]).expect("valid problem");
/// assert!(check_answer("6×7+(12−3×4)", &problem).is_ok());
/// assert!(check_answer("6*7", &problem).is_err());
/// ```
pub fn check_answer(text: &str, problem: &Problem) -> Result<Expression, GameError> {
    game::validate_submission(text, problem).map(|submission| submission.expression)
}
