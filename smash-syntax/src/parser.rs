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

//! Command line parser
//!
//! The parser recognizes the following forms, in order of precedence:
//!
//! 1. `left | right` and `left |& right`: the line is split at the first `|`
//!    into a [pipeline](Invocation::Pipeline). With `|&`, the standard error
//!    of `left` goes to the pipe as well.
//! 2. `command > file`, `command >> file`, `command >& file`, and
//!    `command >>& file`: the line is split at the first `>` into a
//!    [redirection](Invocation::Redirect). Exactly one word must follow the
//!    operator.
//! 3. Otherwise, the first word selects a built-in by name, and any other
//!    word names an external utility.
//!
//! The operands of a pipeline are parsed recursively, so a redirection may
//! appear on either side of a pipe.

use crate::syntax::BuiltinCall;
use crate::syntax::BuiltinName;
use crate::syntax::External;
use crate::syntax::Invocation;
use std::fmt::Display;
use std::fmt::Formatter;
use thiserror::Error;

/// Operator that splits a command line
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Operator {
    /// `|`
    Pipe,
    /// `|&`
    PipeAll,
    /// `>`
    Truncate,
    /// `>>`
    Append,
    /// `>&`
    TruncateAll,
    /// `>>&`
    AppendAll,
}

impl Operator {
    /// Returns the redirection operator with the given properties.
    pub fn redirect(append: bool, merge_stderr: bool) -> Self {
        match (append, merge_stderr) {
            (false, false) => Operator::Truncate,
            (true, false) => Operator::Append,
            (false, true) => Operator::TruncateAll,
            (true, true) => Operator::AppendAll,
        }
    }

    /// Returns the operator as it appears in a command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Pipe => "|",
            Operator::PipeAll => "|&",
            Operator::Truncate => ">",
            Operator::Append => ">>",
            Operator::TruncateAll => ">&",
            Operator::AppendAll => ">>&",
        }
    }
}

impl Display for Operator {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error in a command line
#[derive(Clone, Copy, Debug, Eq, Error, Hash, PartialEq)]
pub enum Error {
    /// The line has no words other than the background marker.
    #[error("syntax error: missing command before '&'")]
    EmptyCommand,

    /// One side of a pipe is empty.
    #[error("syntax error: missing command around '{0}'")]
    EmptyPipelineSide(Operator),

    /// Nothing precedes a redirection operator.
    #[error("syntax error: missing command before '{0}'")]
    MissingCommand(Operator),

    /// No word follows a redirection operator.
    #[error("syntax error: missing file name after '{0}'")]
    MissingTarget(Operator),

    /// More than one word follows a redirection operator.
    #[error("syntax error: too many file names after '{0}'")]
    TooManyTargets(Operator),
}

/// Splits the text into whitespace-separated words.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split_whitespace().map(str::to_owned).collect()
}

/// Removes the background marker from the end of the command line.
///
/// Trailing whitespace and a final `&` are removed, together with the
/// whitespace preceding the `&`. The second value of the result tells
/// whether the `&` was present.
///
/// ```
/// # use smash_syntax::parser::strip_background;
/// assert_eq!(strip_background("sleep 10 &\n"), ("sleep 10", true));
/// assert_eq!(strip_background("sleep 10&"), ("sleep 10", true));
/// assert_eq!(strip_background("sleep 10\n"), ("sleep 10", false));
/// ```
pub fn strip_background(line: &str) -> (&str, bool) {
    let line = line.trim_end();
    match line.strip_suffix('&') {
        Some(rest) => (rest.trim_end(), true),
        None => (line, false),
    }
}

/// Parses a command line.
///
/// The line should not contain the background marker; see
/// [`strip_background`]. Whether to run the result in the background is up to
/// the caller.
pub fn parse(text: &str) -> Result<Invocation<BuiltinCall>, Error> {
    let text = text.trim();

    if let Some(index) = text.find('|') {
        let left = &text[..index];
        let rest = &text[index + 1..];
        let (right, operator, merge_stderr) = match rest.strip_prefix('&') {
            Some(right) => (right, Operator::PipeAll, true),
            None => (rest, Operator::Pipe, false),
        };
        if left.trim().is_empty() || right.trim().is_empty() {
            return Err(Error::EmptyPipelineSide(operator));
        }
        let left = Box::new(parse(left)?);
        let right = Box::new(parse(right)?);
        return Ok(Invocation::Pipeline {
            left,
            right,
            merge_stderr,
        });
    }

    if let Some(index) = text.find('>') {
        let command = text[..index].trim();
        let mut rest = &text[index + 1..];
        let append = match rest.strip_prefix('>') {
            Some(r) => {
                rest = r;
                true
            }
            None => false,
        };
        let merge_stderr = match rest.strip_prefix('&') {
            Some(r) => {
                rest = r;
                true
            }
            None => false,
        };
        let operator = Operator::redirect(append, merge_stderr);
        if command.is_empty() {
            return Err(Error::MissingCommand(operator));
        }
        let mut targets = tokenize(rest);
        let target = match targets.len() {
            0 => return Err(Error::MissingTarget(operator)),
            1 => targets.remove(0),
            _ => return Err(Error::TooManyTargets(operator)),
        };
        let inner = Box::new(parse(command)?);
        return Ok(Invocation::Redirect {
            inner,
            target,
            append,
            merge_stderr,
        });
    }

    let argv = tokenize(text);
    let Some(first) = argv.first() else {
        return Err(Error::EmptyCommand);
    };
    match first.parse::<BuiltinName>() {
        Ok(name) => {
            let args = argv[1..].to_vec();
            Ok(Invocation::Builtin(BuiltinCall { name, args }))
        }
        Err(_) => Ok(Invocation::External(External {
            text: text.to_owned(),
        })),
    }
}
