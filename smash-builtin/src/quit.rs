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

//! Quit built-in
//!
//! The quit built-in exits the shell. With the `kill` operand, every job is
//! killed first; each killed job is printed as `<pid>: <command>`. Jobs are
//! left running otherwise. Other operands are ignored.

use smash_env::Env;
use smash_env::semantics::Divert;
use smash_env::semantics::ExitStatus;
use smash_env::semantics::Result;
use std::ops::ControlFlow::Break;

/// Quit built-in with its operand checked
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Command {
    /// Whether the jobs are killed before exiting
    pub kill: bool,
}

pub fn resolve(args: &[String]) -> Command {
    let kill = args.first().is_some_and(|arg| arg == "kill");
    Command { kill }
}

/// Executes the quit built-in.
///
/// The result is always a `Break` requesting the shell to exit successfully.
pub fn execute(env: &mut Env, command: &Command) -> Result {
    if command.kill {
        env.kill_all_jobs();
    }
    Break(Divert::Exit(Some(ExitStatus::SUCCESS)))
}
