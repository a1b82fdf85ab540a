//! Run a path expression against JSON input

use log::debug;

use super::CliError;
use crate::{
    convert::{from_json, to_json},
    parser::parse,
};

/// What to do with the matched locations
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// All matches as an array
    Get,
    /// The first match, or null
    First,
    /// Whether anything matches
    Has,
    /// Assign a JSON value and output the updated document
    Set { value: String },
    /// Delete matches and output the updated document
    Del,
    /// Only validate the path
    Check,
}

/// Options for a single run
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// The path expression
    pub path: String,
    pub command: Command,
    /// JSON input string
    pub input: Option<String>,
    /// Stop after the first change (set and del)
    pub one: bool,
}

/// Result of a run
#[derive(Debug, PartialEq)]
pub enum RunResult {
    /// The path parsed; carries its normalized form
    SyntaxValid(String),
    /// JSON output
    Output(serde_json::Value),
}

/// Execute a jpath command
pub fn execute(options: &RunOptions) -> Result<RunResult, CliError> {
    let expr = parse(&options.path)?;

    if options.command == Command::Check {
        return Ok(RunResult::SyntaxValid(expr.to_string()));
    }

    let json_str = options.input.as_ref().ok_or(CliError::NoInput)?;
    let json_value: serde_json::Value = serde_json::from_str(json_str)?;
    let mut data = from_json(json_value);
    debug!("running {:?} with '{expr}'", options.command);

    let output = match &options.command {
        Command::Get => serde_json::Value::Array(expr.get(&data).into_iter().map(to_json).collect()),
        Command::First => expr.first(&data).map_or(serde_json::Value::Null, to_json),
        Command::Has => serde_json::Value::Bool(expr.has(&data)),
        Command::Set { value } => {
            let value = from_json(serde_json::from_str(value)?);
            if options.one {
                expr.set_one(&mut data, value)?;
            } else {
                expr.set(&mut data, value)?;
            }
            to_json(&data)
        }
        Command::Del => {
            if options.one {
                expr.del_one(&mut data)?;
            } else {
                expr.del(&mut data)?;
            }
            to_json(&data)
        }
        Command::Check => return Ok(RunResult::SyntaxValid(expr.to_string())),
    };

    Ok(RunResult::Output(output))
}
