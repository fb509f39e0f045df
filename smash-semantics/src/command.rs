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

//! Command execution

use crate::external;
use crate::pipeline;
use crate::redir;
use smash_builtin::Builtin;
use smash_env::Env;
use smash_env::semantics::ExitStatus;
use smash_env::semantics::Result;
use smash_syntax::syntax::Invocation;
use std::ops::ControlFlow::{Break, Continue};

/// Command that can be executed in the foreground.
pub trait Command {
    /// Executes this command.
    ///
    /// Implementations of this method is expected to update `env.exit_status`
    /// reflecting the result of the command execution.
    fn execute(&self, env: &mut Env) -> Result;
}

/// Executes the invocation.
///
/// Errors in system calls are reported to the standard error and the
/// invocation fails with a non-zero exit status; they never stop the shell.
/// The result is a `Break` only when a `quit` built-in was executed.
impl Command for Invocation<Builtin> {
    fn execute(&self, env: &mut Env) -> Result {
        match self {
            Invocation::Builtin(builtin) => smash_builtin::execute(env, builtin),
            Invocation::External(external) => external::execute(env, external),
            Invocation::Pipeline {
                left,
                right,
                merge_stderr,
            } => pipeline::execute(env, left, right, *merge_stderr),
            Invocation::Redirect {
                inner,
                target,
                append,
                merge_stderr,
            } => redir::execute(env, inner, target, *append, *merge_stderr),
        }
    }
}

/// Returns the exit status a subshell should exit with after running a
/// command.
pub(crate) fn subshell_exit_status(env: &Env, result: Result) -> ExitStatus {
    match result {
        Continue(()) => env.exit_status,
        Break(divert) => divert.exit_status().unwrap_or(env.exit_status),
    }
}
