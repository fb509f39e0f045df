// This file is part of smash, a small job-control shell.
// Copyright (C) 2026 smash contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Command-line argument parser for the shell

use smash_env::history::DEFAULT_CAPACITY;
use thiserror::Error;

/// Prompt printed before reading each command line by default
pub const DEFAULT_PROMPT: &str = "smash> ";

/// Configuration of the shell session
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Run {
    /// Maximum number of records kept in the command history
    pub history_size: usize,
    /// Prompt printed before reading each command line, if any
    pub prompt: Option<String>,
}

impl Default for Run {
    fn default() -> Self {
        Run {
            history_size: DEFAULT_CAPACITY,
            prompt: Some(DEFAULT_PROMPT.to_owned()),
        }
    }
}

/// Result of command-line argument parsing
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Parse {
    /// Print a help message and exit.
    Help,
    /// Print version information and exit.
    Version,
    /// Run the shell.
    Run(Run),
}

/// Error in command-line argument parsing
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum Error {
    #[error("unknown option '{0}'")]
    UnknownOption(String),
    #[error("option '{0}' requires an argument")]
    MissingArgument(&'static str),
    #[error("invalid history size '{0}'")]
    InvalidHistorySize(String),
    #[error("unexpected operand '{0}'")]
    UnexpectedOperand(String),
}

/// Parses command-line arguments.
///
/// The first item is the name of the shell and is ignored. Options taking an
/// argument accept it either as the next item or after `=` in the same item.
/// `--help` and `--version` take effect as soon as they are seen, ignoring
/// the rest of the arguments.
pub fn parse<I, S>(args: I) -> Result<Parse, Error>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut args = args.into_iter().skip(1).map(Into::into);
    let mut run = Run::default();

    while let Some(arg) = args.next() {
        let (name, inline_value) = match arg.split_once('=') {
            Some((name, value)) if name.starts_with("--") => {
                (name.to_owned(), Some(value.to_owned()))
            }
            _ => (arg.clone(), None),
        };
        let mut value = |option: &'static str| {
            inline_value
                .clone()
                .or_else(|| args.next())
                .ok_or(Error::MissingArgument(option))
        };

        match name.as_str() {
            "--help" => return Ok(Parse::Help),
            "--version" => return Ok(Parse::Version),
            "--history-size" => {
                let size = value("--history-size")?;
                run.history_size = match size.parse::<usize>() {
                    Ok(size) if size > 0 => size,
                    _ => return Err(Error::InvalidHistorySize(size)),
                };
            }
            "--prompt" => run.prompt = Some(value("--prompt")?),
            "--no-prompt" => run.prompt = None,
            _ if name.starts_with('-') && name != "-" => return Err(Error::UnknownOption(arg)),
            _ => return Err(Error::UnexpectedOperand(arg)),
        }
    }

    Ok(Parse::Run(run))
}
