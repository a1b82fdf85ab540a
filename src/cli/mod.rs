//! CLI support for jpath
//!
//! Provides programmatic access to the `jpath` command so other tools can
//! run the same operations without spawning a process.

mod run;

pub use run::{Command, RunOptions, RunResult, execute};

use std::io;

use thiserror::Error;

/// Errors that can occur during CLI operations
#[derive(Debug, Error)]
pub enum CliError {
    /// Malformed path
    #[error("Parse error: {0}")]
    Parse(#[from] crate::ParseError),

    /// The document could not be changed
    #[error("Evaluation error: {0}")]
    Path(#[from] crate::PathError),

    /// Input or value is not valid JSON
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// No input provided
    #[error("No input provided. Use --input or pipe JSON to stdin.")]
    NoInput,
}
