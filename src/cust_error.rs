//! This module contains all custom errors used in this library.

use std::io;
use thiserror::Error;

/// Errors raised while reading an edge list.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Import: IoError: {0}")]
    IoError(#[from] io::Error),
    /// A non-comment line that does not consist of exactly two tokens.
    #[error("Import: syntax error on line {line}: {content:?}")]
    MalformedLine { line: usize, content: String },
}

/// Errors raised while driving the external solver.
#[derive(Debug, Error)]
pub enum SolverError {
    #[error("Solver: could not start `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("Solver: pipe error: {0}")]
    Io(#[from] io::Error),
    #[error("Solver: output reader thread panicked")]
    DrainPanicked,
}

#[derive(Debug, Error)]
pub enum ProcessingError {
    /// An `occ` row referenced an index outside of the declared variable range.
    #[error("Decode: occ[{index}] is out of range (expected < {bound})")]
    IndexOutOfRange { index: usize, bound: usize },
    #[error("Decode: occ[{index}] has non-binary activity {value:?}")]
    BadActivity { index: usize, value: String },
    #[error("InvalidSolution: {0}")]
    InvalidSolution(String),
}
