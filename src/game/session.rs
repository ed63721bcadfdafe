use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use log::{debug, info};

use crate::TARGET;
use crate::expression::{
    Canonical, Expression, FormatError, check_length, normalize, parse, rational_from,
};
use crate::game::errors::{AnswerError, GameError};
use crate::problem::{Problem, format_numbers};

/// A submission that passed every check except the duplicate test
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub text: String,
    pub expression: Expression,
    pub canonical: Canonical,
}

/// Runs the stateless part of the pipeline against `problem`
///
/// Normalizes, checks length, parses, evaluates to exactly 42 and matches
/// the literals against the problem numbers, stopping at the first failure.
///
/// # Errors
///
/// Returns the `FormatError` or `AnswerError` of the first failing stage.
pub fn validate_submission(text: &str, problem: &Problem) -> Result<Submission, GameError> {
    let normalized = normalize(text);
    check_length(&normalized)?;
    let expression = parse(&normalized)?;

    let value = expression.evaluate()?;
    if value != rational_from(TARGET) {
        debug!("'{}' evaluates to {}", normalized, value);
        return Err(AnswerError::WrongAnswer(value).into());
    }

    let mut numbers = expression.extract();
    numbers.sort_unstable();
    if numbers != problem.numbers() {
        debug!("'{}' uses {:?}, expected {}", normalized, numbers, problem);
        return Err(FormatError::UnmatchedNumber(format_numbers(&numbers)).into());
    }

    let canonical = expression.canonical();
    Ok(Submission {
        text: normalized,
        expression,
        canonical,
    })
}

/// An accepted answer, never modified once recorded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcceptedSolution {
    pub text: String,
    pub expression: Expression,
    pub canonical: Canonical,
    pub player_id: i64,
    pub interval: Duration,
}

/// Everything a session owns while playing
#[derive(Debug, Clone)]
pub(crate) struct Round {
    pub(crate) problem: Problem,
    pub(crate) solutions: Vec<AcceptedSolution>,
    pub(crate) started: Instant,
    pub(crate) last: Duration,
    pub(crate) statistics: BTreeMap<i64, Vec<Duration>>,
}

impl Round {
    pub(crate) fn new(problem: Problem, started: Instant) -> Self {
        Self {
            problem,
            solutions: Vec::new(),
            started,
            last: Duration::ZERO,
            statistics: BTreeMap::new(),
        }
    }

    pub(crate) fn elapsed(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.started)
    }

    /// Full validation including the duplicate check; never mutates
    pub(crate) fn check(&self, text: &str) -> Result<Submission, GameError> {
        let submission = validate_submission(text, &self.problem)?;
        if let Some(existing) = self
            .solutions
            .iter()
            .find(|s| s.text == submission.text || s.canonical == submission.canonical)
        {
            debug!(
                "'{}' repeats '{}' as {}",
                submission.text, existing.text, existing.canonical
            );
            return Err(AnswerError::RepeatedAnswer(existing.text.clone()).into());
        }
        Ok(submission)
    }

    pub(crate) fn commit(
        &mut self,
        submission: Submission,
        player_id: i64,
        now: Instant,
    ) -> Duration {
        let elapsed = self.elapsed(now);
        let interval = elapsed.saturating_sub(self.last);
        self.last = elapsed;
        self.statistics.entry(player_id).or_default().push(interval);

        info!(
            "Player {} solved {} with '{}' after {:?}",
            player_id, self.problem, submission.text, interval
        );
        self.solutions.push(AcceptedSolution {
            text: submission.text,
            expression: submission.expression,
            canonical: submission.canonical,
            player_id,
            interval,
        });
        interval
    }
}
