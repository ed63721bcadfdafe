use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::database::errors::DatabaseError;
use crate::problem::Problem;

#[derive(Debug, Serialize, Deserialize)]
struct TableRow {
    problem: Problem,
    solutions: u64,
}

/// Immutable mapping from a problem to its number of distinct solutions
///
/// Entries iterate in ascending problem order; the `probability` strategy
/// indexes weights by that order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SolutionTable {
    entries: BTreeMap<Problem, u64>,
}

impl SolutionTable {
    /// # Errors
    ///
    /// Returns `DuplicateProblem` if a problem is listed twice.
    pub fn from_entries<I>(entries: I) -> Result<Self, DatabaseError>
    where
        I: IntoIterator<Item = (Problem, u64)>,
    {
        let mut map = BTreeMap::new();
        for (problem, solutions) in entries {
            if map.insert(problem, solutions).is_some() {
                return Err(DatabaseError::DuplicateProblem(problem));
            }
        }
        Ok(Self { entries: map })
    }

    pub fn count(&self, problem: &Problem) -> Option<u64> {
        self.entries.get(problem).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Problem, u64)> + '_ {
        self.entries.iter().map(|(problem, count)| (problem, *count))
    }

    /// # Errors
    ///
    /// Returns an error if the JSON is malformed, holds an invalid problem, or
    /// repeats a problem.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, DatabaseError> {
        let rows: Vec<TableRow> = serde_json::from_reader(reader)?;
        debug!("Read {} table rows", rows.len());
        Self::from_entries(rows.into_iter().map(|row| (row.problem, row.solutions)))
    }

    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn to_writer<W: Write>(&self, writer: W) -> Result<(), DatabaseError> {
        let rows: Vec<TableRow> = self
            .iter()
            .map(|(problem, solutions)| TableRow {
                problem: *problem,
                solutions,
            })
            .collect();
        serde_json::to_writer_pretty(writer, &rows)?;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or parsed.
    pub fn load(path: &Path) -> Result<Self, DatabaseError> {
        let table = Self::from_reader(BufReader::new(File::open(path)?))?;
        info!("Loaded {} problems from {}", table.len(), path.display());
        Ok(table)
    }

    /// # Errors
    ///
    /// Returns an error if the file cannot be created or written.
    pub fn save(&self, path: &Path) -> Result<(), DatabaseError> {
        let mut writer = BufWriter::new(File::create(path)?);
        self.to_writer(&mut writer)?;
        writer.flush()?;
        info!("Saved {} problems to {}", self.len(), path.display());
        Ok(())
    }
}
