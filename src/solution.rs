//! Scanner for the solver's plain text solution report.
//!
//! Only two kinds of lines matter: the `Status:` line and rows of the column table that report
//! an `occ[<index>]` variable. A row looks like
//!
//! ```text
//!      1 occ[0]       *              1             0             1
//! ```
//!
//! where the marker column is optional. Names too long for the name column are followed by a
//! line break, in which case the numeric fields are on the next line.

use crate::cust_error::ProcessingError;
use fxhash::FxHashSet;
use std::collections::BTreeSet;
use tracing::debug;

/// Solution status as printed by the solver.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum SolverStatus {
    Optimal,
    NonOptimal,
    Empty,
    Undefined,
    Unknown,
}

impl SolverStatus {

    fn parse(text: &str) -> Self {
        match text.trim() {
            "INTEGER OPTIMAL" | "OPTIMAL" => Self::Optimal,
            "INTEGER NON-OPTIMAL" | "FEASIBLE" => Self::NonOptimal,
            "INTEGER EMPTY" | "EMPTY" | "INFEASIBLE (FINAL)" => Self::Empty,
            "INTEGER UNDEFINED" | "UNDEFINED" => Self::Undefined,
            _ => Self::Unknown,
        }
    }
}

/// The elements selected by the solver.
#[derive(Debug, Clone, Eq, PartialEq, Default)]
pub struct Solution {
    selected: BTreeSet<usize>,
    status: Option<SolverStatus>,
}

impl Solution {

    /// Scans `report` for `occ` rows. Every reported index must be smaller than `bound`, the
    /// number of declared `occ` variables.
    pub fn parse(report: &str, bound: usize) -> Result<Self, ProcessingError> {
        let mut solution = Solution::default();
        // Index of an `occ` token that ended its line.
        let mut wrapped: Option<usize> = None;
        for line in report.lines() {
            let tokens: Vec<&str> = line.split_whitespace().collect();
            if let Some(index) = wrapped.take() {
                solution.record(index, &tokens)?;
                continue
            }
            if let Some(status) = line.trim_start().strip_prefix("Status:") {
                solution.status = Some(SolverStatus::parse(status));
                continue
            }
            let found = tokens.iter()
                .enumerate()
                .find_map(|(pos, token)| occ_index(token).map(|digits| (pos, digits)));
            if let Some((pos, digits)) = found {
                let index = digits.parse::<usize>().unwrap_or(usize::MAX);
                if index >= bound {
                    return Err(ProcessingError::IndexOutOfRange { index, bound })
                }
                if pos + 1 == tokens.len() {
                    wrapped = Some(index);
                } else {
                    solution.record(index, &tokens[pos + 1..])?;
                }
            }
        }
        debug!(selected = solution.len(), status = ?solution.status, "parsed report");
        Ok(solution)
    }

    /// Creates a solution from already known selected indices, without a status line.
    pub fn from_selected<I: IntoIterator<Item=usize>>(selected: I) -> Self {
        Solution {
            selected: selected.into_iter().collect(),
            status: None,
        }
    }

    /// Records the activity found in `fields`, the tokens following `occ[index]`.
    fn record(&mut self, index: usize, fields: &[&str]) -> Result<(), ProcessingError> {
        // Skip the marker column if present.
        let value = match fields {
            [first, ..] if first.parse::<f64>().is_ok() => first,
            [_, second, ..] => second,
            _ => return Ok(()),
        };
        match value.parse::<f64>() {
            Ok(activity) if (activity - 1.0).abs() < 1e-6 => {
                self.selected.insert(index);
                Ok(())
            },
            Ok(activity) if activity.abs() < 1e-6 => Ok(()),
            _ => Err(ProcessingError::BadActivity { index, value: value.to_string() }),
        }
    }

    /// Returns the selected indices in ascending order.
    pub fn selected(&self) -> impl Iterator<Item=usize> + '_ {
        self.selected.iter().copied()
    }

    /// Returns the selected indices as a set.
    pub fn to_set(&self) -> FxHashSet<usize> {
        self.selected().collect()
    }

    /// Returns the size of the transversal.
    pub fn len(&self) -> usize {
        self.selected.len()
    }

    /// Checks if nothing was selected.
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Returns the status line of the report, if there was one.
    pub fn status(&self) -> Option<SolverStatus> {
        self.status
    }

    /// Returns `false` if the report states that the optimum was not reached.
    pub fn is_optimal(&self) -> bool {
        matches!(self.status, None | Some(SolverStatus::Optimal))
    }
}

/// Returns the digits of an `occ[<digits>]` token.
fn occ_index(token: &str) -> Option<&str> {
    let digits = token.strip_prefix("occ[")?.strip_suffix(']')?;
    if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
        Some(digits)
    } else {
        None
    }
}
