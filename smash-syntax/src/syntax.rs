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

//! Command line model
//!
//! An [`Invocation`] is generic over the representation of built-ins. The
//! parser produces `Invocation<BuiltinCall>`, where each built-in is still a
//! name and raw arguments. Before execution, the shell converts it with
//! [`Invocation::try_map_builtins`] into an invocation whose built-ins have
//! been checked and resolved.

use std::fmt::Display;
use std::fmt::Formatter;
use strum::{EnumIter, EnumString};

/// Name of a built-in utility
#[derive(Clone, Copy, Debug, EnumIter, EnumString, Eq, Hash, PartialEq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum BuiltinName {
    Jobs,
    Fg,
    Bg,
    Kill,
    Quit,
    Cd,
    Pwd,
    ShowPid,
    History,
}

/// Built-in invocation before resolution
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BuiltinCall {
    pub name: BuiltinName,
    /// Words following the built-in name
    pub args: Vec<String>,
}

impl Display for BuiltinCall {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        self.name.fmt(f)?;
        self.args.iter().try_for_each(|arg| write!(f, " {arg}"))
    }
}

/// External utility invocation
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct External {
    /// Command text passed to the command interpreter
    pub text: String,
}

/// Command line to be executed
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Invocation<B> {
    /// Built-in utility
    Builtin(B),
    /// External utility
    External(External),
    /// Two commands connected by a pipe
    Pipeline {
        left: Box<Invocation<B>>,
        right: Box<Invocation<B>>,
        /// Whether the standard error of `left` goes to the pipe as well
        merge_stderr: bool,
    },
    /// Command with its standard output redirected to a file
    Redirect {
        inner: Box<Invocation<B>>,
        target: String,
        /// Whether the file is appended to rather than truncated
        append: bool,
        /// Whether the standard error goes to the file as well
        merge_stderr: bool,
    },
}

impl<B> Invocation<B> {
    /// Converts every built-in in this invocation.
    ///
    /// The function `f` is applied to the built-ins from left to right. The
    /// conversion stops at the first error.
    pub fn try_map_builtins<C, E, F>(self, f: &mut F) -> Result<Invocation<C>, E>
    where
        F: FnMut(B) -> Result<C, E>,
    {
        Ok(match self {
            Invocation::Builtin(builtin) => Invocation::Builtin(f(builtin)?),
            Invocation::External(external) => Invocation::External(external),
            Invocation::Pipeline {
                left,
                right,
                merge_stderr,
            } => Invocation::Pipeline {
                left: Box::new((*left).try_map_builtins(f)?),
                right: Box::new((*right).try_map_builtins(f)?),
                merge_stderr,
            },
            Invocation::Redirect {
                inner,
                target,
                append,
                merge_stderr,
            } => Invocation::Redirect {
                inner: Box::new((*inner).try_map_builtins(f)?),
                target,
                append,
                merge_stderr,
            },
        })
    }
}

impl<B: Display> Display for Invocation<B> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Invocation::Builtin(builtin) => builtin.fmt(f),
            Invocation::External(external) => f.write_str(&external.text),
            Invocation::Pipeline {
                left,
                right,
                merge_stderr,
            } => {
                let operator = if *merge_stderr { "|&" } else { "|" };
                write!(f, "{left} {operator} {right}")
            }
            Invocation::Redirect {
                inner,
                target,
                append,
                merge_stderr,
            } => {
                let operator = match (append, merge_stderr) {
                    (false, false) => ">",
                    (true, false) => ">>",
                    (false, true) => ">&",
                    (true, true) => ">>&",
                };
                write!(f, "{inner} {operator} {target}")
            }
        }
    }
}
