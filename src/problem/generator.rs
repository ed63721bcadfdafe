use log::{debug, info, warn};
use rand::Rng;
use rand::distr::Distribution;
use rand::distr::weighted::WeightedIndex;
use serde::Deserialize;

use crate::database::SolutionTable;
use crate::problem::errors::{GenerateError, ProblemError};
use crate::problem::{MAX_NUMBER, PROBLEM_SIZE, Problem, format_numbers};

/// Loosely typed options, keyed the way the method names expect them
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct GenerateOptions {
    pub minimum: Option<u64>,
    pub maximum: Option<u64>,
    pub minimum_solutions: Option<u64>,
    pub maximum_solutions: Option<u64>,
    pub problem: Option<Vec<u64>>,
    pub prob: Option<Vec<f64>>,
}

/// A generation strategy together with its configuration
#[derive(Debug, Clone, PartialEq)]
pub enum GenerateMethod {
    /// Five uniform draws from `minimum..=maximum`; may be unsolvable
    Random { minimum: u64, maximum: u64 },
    /// Uniform over table entries whose solution count lies in the range
    Database {
        minimum_solutions: u64,
        maximum_solutions: u64,
    },
    /// An explicit, solvable problem
    Custom(Vec<u64>),
    /// One relative weight per table entry, in table order
    Probability(Vec<f64>),
}

fn missing(option: &str) -> GenerateError {
    GenerateError::FailedToParse(format!("missing option `{option}`"))
}

impl GenerateMethod {
    /// Selects a strategy by name, reading only the options it needs
    ///
    /// # Errors
    ///
    /// Returns `MethodNotFound` for an unknown name and `FailedToParse` when a
    /// required option is absent.
    pub fn from_name(name: &str, options: &GenerateOptions) -> Result<Self, GenerateError> {
        match name {
            "random" => Ok(GenerateMethod::Random {
                minimum: options.minimum.unwrap_or(0),
                maximum: options.maximum.unwrap_or(MAX_NUMBER),
            }),
            "database" => Ok(GenerateMethod::Database {
                minimum_solutions: options.minimum_solutions.unwrap_or(1),
                maximum_solutions: options.maximum_solutions.unwrap_or(u64::MAX),
            }),
            "custom" => options
                .problem
                .clone()
                .map(GenerateMethod::Custom)
                .ok_or_else(|| missing("problem")),
            "probability" => options
                .prob
                .clone()
                .map(GenerateMethod::Probability)
                .ok_or_else(|| missing("prob")),
            other => {
                warn!("Unknown generation method: {}", other);
                Err(GenerateError::MethodNotFound(other.to_string()))
            }
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            GenerateMethod::Random { .. } => "random",
            GenerateMethod::Database { .. } => "database",
            GenerateMethod::Custom(_) => "custom",
            GenerateMethod::Probability(_) => "probability",
        }
    }
}

/// Draws problems, consulting the solution table where a strategy needs it
pub struct ProblemGenerator<'a> {
    table: &'a SolutionTable,
}

impl<'a> ProblemGenerator<'a> {
    pub fn new(table: &'a SolutionTable) -> Self {
        Self { table }
    }

    /// # Errors
    ///
    /// Returns a `GenerateError` describing why `method` cannot produce a problem.
    pub fn generate<R: Rng + ?Sized>(
        &self,
        method: &GenerateMethod,
        rng: &mut R,
    ) -> Result<Problem, GenerateError> {
        debug!("Generating problem with method '{}'", method.name());

        let problem = match method {
            GenerateMethod::Random { minimum, maximum } => {
                Self::generate_random(*minimum, *maximum, rng)
            }
            GenerateMethod::Database {
                minimum_solutions,
                maximum_solutions,
            } => self.generate_from_database(*minimum_solutions, *maximum_solutions, rng),
            GenerateMethod::Custom(numbers) => self.generate_custom(numbers),
            GenerateMethod::Probability(weights) => self.generate_weighted(weights, rng),
        }?;

        info!("Generated problem {} ({})", problem, method.name());
        Ok(problem)
    }

    fn generate_random<R: Rng + ?Sized>(
        minimum: u64,
        maximum: u64,
        rng: &mut R,
    ) -> Result<Problem, GenerateError> {
        if minimum > maximum || maximum > MAX_NUMBER {
            return Err(GenerateError::FailedToParse(format!(
                "random range {minimum}..={maximum} is not within 0..={MAX_NUMBER}"
            )));
        }

        let numbers: Vec<u64> = (0..PROBLEM_SIZE)
            .map(|_| rng.random_range(minimum..=maximum))
            .collect();
        Problem::new(&numbers).map_err(|e| GenerateError::FailedToParse(e.to_string()))
    }

    fn generate_from_database<R: Rng + ?Sized>(
        &self,
        minimum_solutions: u64,
        maximum_solutions: u64,
        rng: &mut R,
    ) -> Result<Problem, GenerateError> {
        if minimum_solutions > maximum_solutions {
            return Err(GenerateError::FailedToParse(format!(
                "solution range {minimum_solutions}..={maximum_solutions} is empty"
            )));
        }

        let candidates: Vec<Problem> = self
            .table
            .iter()
            .filter(|(_, count)| (minimum_solutions..=maximum_solutions).contains(count))
            .map(|(problem, _)| *problem)
            .collect();
        debug!(
            "{} problems have {}..={} solutions",
            candidates.len(),
            minimum_solutions,
            maximum_solutions
        );

        if candidates.is_empty() {
            return Err(GenerateError::NoSolution(format!(
                "{minimum_solutions}..={maximum_solutions}"
            )));
        }
        let index = rng.random_range(0..candidates.len());
        candidates
            .get(index)
            .copied()
            .ok_or_else(|| GenerateError::NoSolution(format!("index {index}")))
    }

    fn generate_custom(&self, numbers: &[u64]) -> Result<Problem, GenerateError> {
        let problem = match Problem::new(numbers) {
            Ok(problem) => problem,
            Err(ProblemError::WrongLength(length)) => {
                return Err(GenerateError::UnmatchedProbLength(length));
            }
            Err(ProblemError::OutOfRange(_)) => {
                let mut sorted = numbers.to_vec();
                sorted.sort_unstable();
                return Err(GenerateError::NoSolution(format_numbers(&sorted)));
            }
        };

        match self.table.count(&problem) {
            Some(count) if count > 0 => Ok(problem),
            _ => {
                warn!("Custom problem {} has no solution", problem);
                Err(GenerateError::NoSolution(problem.to_string()))
            }
        }
    }

    fn generate_weighted<R: Rng + ?Sized>(
        &self,
        weights: &[f64],
        rng: &mut R,
    ) -> Result<Problem, GenerateError> {
        if weights.len() != self.table.len() {
            return Err(GenerateError::UnmatchedProbLength(weights.len()));
        }
        if let Some(bad) = weights.iter().find(|w| !w.is_finite() || **w < 0.0) {
            return Err(GenerateError::FailedToParse(format!("invalid weight {bad}")));
        }

        let distribution =
            WeightedIndex::new(weights).map_err(|e| GenerateError::FailedToParse(e.to_string()))?;
        let index = distribution.sample(rng);
        self.table
            .iter()
            .nth(index)
            .map(|(problem, _)| *problem)
            .ok_or_else(|| GenerateError::NoSolution(format!("index {index}")))
    }
}
