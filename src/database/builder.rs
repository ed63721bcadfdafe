use std::collections::{HashMap, HashSet};

use log::{debug, info};
use num_rational::BigRational;
use rayon::prelude::*;

use crate::TARGET;
use crate::database::errors::DatabaseError;
use crate::database::table::SolutionTable;
use crate::expression::{Canonical, Operator, apply_operator, rational_from};
use crate::problem::Problem;

/// Canonical forms reachable from one subset of the numbers, with their values
type FormCache = HashMap<Canonical, BigRational>;

/// Computes solution counts by enumerating every canonical expression
pub struct DatabaseBuilder {
    target: u64,
}

impl DatabaseBuilder {
    pub fn new() -> Self {
        Self { target: TARGET }
    }

    pub fn with_target(target: u64) -> Self {
        Self { target }
    }

    /// Canonical forms using every number exactly once that evaluate to the target
    pub fn solutions(&self, numbers: &[u64]) -> Vec<Canonical> {
        let n = numbers.len();
        if n == 0 {
            return Vec::new();
        }

        let full = (1usize << n) - 1;
        let target = rational_from(self.target);
        let mut forms: Vec<FormCache> = vec![FormCache::new(); full + 1];

        for (i, &number) in numbers.iter().enumerate() {
            if let Some(cache) = forms.get_mut(1 << i) {
                cache.insert(Canonical::Literal(number), rational_from(number));
            }
        }

        if n == 1 {
            return forms
                .get(full)
                .into_iter()
                .flatten()
                .filter(|(_, value)| **value == target)
                .map(|(form, _)| form.clone())
                .collect();
        }

        // Proper subsets only; the full set is reduced to the target directly.
        for mask in 1..full {
            if mask.count_ones() < 2 {
                continue;
            }
            let mut cache = FormCache::new();
            Self::combine_splits(&forms, mask, |form, value| {
                cache.insert(form, value);
            });
            if let Some(slot) = forms.get_mut(mask) {
                *slot = cache;
            }
        }

        let mut found = HashSet::new();
        Self::combine_splits(&forms, full, |form, value| {
            if value == target {
                found.insert(form);
            }
        });

        let mut solutions: Vec<Canonical> = found.into_iter().collect();
        solutions.sort();
        debug!(
            "Found {} solutions for {:?} = {}",
            solutions.len(),
            numbers,
            self.target
        );
        solutions
    }

    pub fn count_solutions(&self, numbers: &[u64]) -> u64 {
        self.solutions(numbers).len() as u64
    }

    /// Joins every ordered split of `mask` into two non-empty halves
    fn combine_splits<F>(forms: &[FormCache], mask: usize, mut emit: F)
    where
        F: FnMut(Canonical, BigRational),
    {
        let mut left_mask = (mask - 1) & mask;
        while left_mask > 0 {
            let right_mask = mask ^ left_mask;
            if let (Some(lefts), Some(rights)) = (forms.get(left_mask), forms.get(right_mask)) {
                for (left, left_value) in lefts {
                    for (right, right_value) in rights {
                        for op in Operator::ALL {
                            // The mirrored split yields the same commutative forms
                            if op.is_commutative() && left_mask > right_mask {
                                continue;
                            }
                            if let Ok(value) = apply_operator(op, left_value, right_value) {
                                emit(Canonical::combine(op, left.clone(), right.clone()), value);
                            }
                        }
                    }
                }
            }
            left_mask = (left_mask - 1) & mask;
        }
    }

    /// Counts every problem in parallel, keeping those with at least one solution
    ///
    /// # Errors
    ///
    /// Only fails if the enumeration yields a duplicate problem, which
    /// `Problem::all` rules out.
    pub fn build(&self) -> Result<SolutionTable, DatabaseError> {
        let problems = Problem::all();
        info!(
            "Counting solutions equal to {} for {} problems",
            self.target,
            problems.len()
        );

        let entries: Vec<(Problem, u64)> = problems
            .into_par_iter()
            .map(|problem| (problem, self.count_solutions(problem.numbers())))
            .filter(|(_, count)| *count > 0)
            .collect();

        info!("{} problems have at least one solution", entries.len());
        SolutionTable::from_entries(entries)
    }
}

impl Default for DatabaseBuilder {
    fn default() -> Self {
        Self::new()
    }
}
