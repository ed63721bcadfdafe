//! The session state machine: generate a problem, start, solve, stop

mod clock;
mod errors;
mod session;

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use log::info;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::database::SolutionTable;
use crate::problem::{GenerateMethod, GenerateOptions, Problem, ProblemGenerator};

pub use clock::{Clock, ManualClock, SystemClock};
pub use errors::{AnswerError, GameError, Status, StatusError};
pub use session::{AcceptedSolution, Submission, validate_submission};

use session::Round;

/// Player id recorded when the caller does not name one
pub const DEFAULT_PLAYER: i64 = -1;

enum Session {
    Idle { pending: Option<Problem> },
    Playing(Round),
}

/// One game session over a shared solution table
///
/// Not internally synchronized: an embedding that hosts several sessions
/// gives each its own `Game`.
pub struct Game<R: Rng = StdRng, C: Clock = SystemClock> {
    table: Arc<SolutionTable>,
    rng: R,
    clock: C,
    session: Session,
}

impl Game {
    pub fn new(table: Arc<SolutionTable>) -> Self {
        Self::with_parts(table, StdRng::from_os_rng(), SystemClock)
    }
}

impl<R: Rng, C: Clock> Game<R, C> {
    pub fn with_parts(table: Arc<SolutionTable>, rng: R, clock: C) -> Self {
        Self {
            table,
            rng,
            clock,
            session: Session::Idle { pending: None },
        }
    }

    pub fn status(&self) -> Status {
        match self.session {
            Session::Idle { .. } => Status::Idle,
            Session::Playing(_) => Status::Playing,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.status() == Status::Playing
    }

    fn round(&self) -> Result<&Round, StatusError> {
        match &self.session {
            Session::Playing(round) => Ok(round),
            Session::Idle { .. } => Err(StatusError::RequireCertainStatus(Status::Playing)),
        }
    }

    fn round_mut(&mut self) -> Result<&mut Round, StatusError> {
        match &mut self.session {
            Session::Playing(round) => Ok(round),
            Session::Idle { .. } => Err(StatusError::RequireCertainStatus(Status::Playing)),
        }
    }

    /// Generates the problem for the next `start`
    ///
    /// # Errors
    ///
    /// Fails while playing, or with a `GenerateError` from the strategy.
    pub fn generate(&mut self, method: &GenerateMethod) -> Result<Problem, GameError> {
        let Session::Idle { pending } = &mut self.session else {
            return Err(StatusError::RequireCertainStatus(Status::Idle).into());
        };
        let problem = ProblemGenerator::new(&self.table).generate(method, &mut self.rng)?;
        *pending = Some(problem);
        Ok(problem)
    }

    /// Generates the next problem with a strategy selected by name
    ///
    /// # Errors
    ///
    /// Fails while playing, for an unknown method, or with a `GenerateError`.
    pub fn generate_problem(
        &mut self,
        method: &str,
        options: &GenerateOptions,
    ) -> Result<Problem, GameError> {
        if self.is_playing() {
            return Err(StatusError::RequireCertainStatus(Status::Idle).into());
        }
        let method = GenerateMethod::from_name(method, options)?;
        self.generate(&method)
    }

    /// # Errors
    ///
    /// Fails if already playing or no problem has been generated.
    pub fn start(&mut self) -> Result<(), GameError> {
        let problem = match &self.session {
            Session::Playing(_) => {
                return Err(StatusError::RequireCertainStatus(Status::Idle).into());
            }
            Session::Idle { pending: None } => return Err(StatusError::NoPendingProblem.into()),
            Session::Idle {
                pending: Some(problem),
            } => *problem,
        };

        info!("Starting game on {}", problem);
        self.session = Session::Playing(Round::new(problem, self.clock.now()));
        Ok(())
    }

    /// Ends the round and returns how long it lasted
    ///
    /// # Errors
    ///
    /// Fails if not playing.
    pub fn stop(&mut self) -> Result<Duration, GameError> {
        let elapsed = self.elapsed_time()?;
        if let Session::Playing(round) = &self.session {
            info!(
                "Stopping game on {} after {:?} with {} solutions",
                round.problem,
                elapsed,
                round.solutions.len()
            );
        }
        self.session = Session::Idle { pending: None };
        Ok(elapsed)
    }

    /// Submits an answer; on success returns the time since the previous accepted one
    ///
    /// A rejected submission leaves the session untouched.
    ///
    /// # Errors
    ///
    /// Fails if not playing, or with the first `FormatError` / `AnswerError`
    /// raised by the validation pipeline.
    pub fn solve(&mut self, text: &str, player_id: i64) -> Result<Duration, GameError> {
        let submission = self.round()?.check(text)?;
        let now = self.clock.now();
        let round = self.round_mut()?;
        Ok(round.commit(submission, player_id, now))
    }

    pub fn current_problem(&self) -> Result<Problem, StatusError> {
        Ok(self.round()?.problem)
    }

    pub fn current_solutions(&self) -> Result<Vec<&str>, StatusError> {
        Ok(self
            .round()?
            .solutions
            .iter()
            .map(|s| s.text.as_str())
            .collect())
    }

    pub fn accepted_solutions(&self) -> Result<&[AcceptedSolution], StatusError> {
        Ok(&self.round()?.solutions)
    }

    pub fn current_solution_number(&self) -> Result<usize, StatusError> {
        Ok(self.round()?.solutions.len())
    }

    /// Solution count recorded in the table, zero for problems it lacks
    pub fn total_solution_number(&self) -> Result<u64, StatusError> {
        let problem = self.round()?.problem;
        Ok(self.table.count(&problem).unwrap_or(0))
    }

    pub fn player_statistics(&self) -> Result<&BTreeMap<i64, Vec<Duration>>, StatusError> {
        Ok(&self.round()?.statistics)
    }

    pub fn elapsed_time(&self) -> Result<Duration, StatusError> {
        let round = self.round()?;
        Ok(round.elapsed(self.clock.now()))
    }
}

#[cfg(test)]
mod tests;
