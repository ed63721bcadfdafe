//! Problems and the strategies that generate them

mod errors;
mod generator;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use errors::{GenerateError, ProblemError};
pub use generator::{GenerateMethod, GenerateOptions, ProblemGenerator};

pub const PROBLEM_SIZE: usize = 5;
pub const MAX_NUMBER: u64 = 13;

/// Formats numbers as a tuple, e.g. `(1, 1, 6, 7, 12)`
pub fn format_numbers(numbers: &[u64]) -> String {
    let parts: Vec<String> = numbers.iter().map(u64::to_string).collect();
    format!("({})", parts.join(", "))
}

/// Five numbers in `0..=13`, always sorted ascending
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "Vec<u64>", into = "Vec<u64>")]
pub struct Problem([u64; PROBLEM_SIZE]);

impl Problem {
    /// # Errors
    ///
    /// Returns an error if `numbers` does not hold exactly five values or any
    /// value lies outside `0..=13`.
    pub fn new(numbers: &[u64]) -> Result<Self, ProblemError> {
        let mut sorted: [u64; PROBLEM_SIZE] = numbers
            .try_into()
            .map_err(|_| ProblemError::WrongLength(numbers.len()))?;
        if let Some(&n) = sorted.iter().find(|&&n| n > MAX_NUMBER) {
            return Err(ProblemError::OutOfRange(n));
        }
        sorted.sort_unstable();
        Ok(Self(sorted))
    }

    pub fn numbers(&self) -> &[u64] {
        &self.0
    }

    /// Every distinct problem, in ascending order
    pub fn all() -> Vec<Problem> {
        let mut problems = Vec::new();
        let mut stack: Vec<Vec<u64>> = vec![Vec::new()];

        while let Some(prefix) = stack.pop() {
            if prefix.len() == PROBLEM_SIZE {
                let mut numbers = [0; PROBLEM_SIZE];
                numbers.copy_from_slice(&prefix);
                problems.push(Problem(numbers));
                continue;
            }
            let low = prefix.last().copied().unwrap_or(0);
            for n in (low..=MAX_NUMBER).rev() {
                let mut next = prefix.clone();
                next.push(n);
                stack.push(next);
            }
        }

        problems
    }
}

impl TryFrom<Vec<u64>> for Problem {
    type Error = ProblemError;

    fn try_from(numbers: Vec<u64>) -> Result<Self, Self::Error> {
        Problem::new(&numbers)
    }
}

impl From<Problem> for Vec<u64> {
    fn from(problem: Problem) -> Self {
        problem.0.to_vec()
    }
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", format_numbers(&self.0))
    }
}
