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

//! Read-eval loop

use crate::dispatch::dispatch;
use smash_env::Env;
use smash_env::input::FdReader;
use smash_env::semantics::ExitStatus;
use smash_env::signal::resolve_caught_signals;
use std::ops::ControlFlow::{Break, Continue};

/// Reads and executes command lines until the end of input.
///
/// Before reading each line, signals caught since the last command are
/// resolved and the `prompt`, if any, is printed to the standard output.
///
/// The loop ends when the input ends or a `quit` built-in is executed. The
/// result is the exit status the shell should exit with: the one requested
/// by `quit`, or else that of the last command. An error reading the input
/// is printed and ends the loop as well.
pub fn read_eval_loop(env: &mut Env, input: &FdReader, prompt: Option<&str>) -> ExitStatus {
    loop {
        resolve_caught_signals(env);
        if let Some(prompt) = prompt {
            env.print(prompt);
        }

        let line = match input.read_line(env) {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(error) => {
                env.print_error(&error);
                break;
            }
        };

        match dispatch(env, &line) {
            Continue(()) => (),
            Break(divert) => {
                tracing::debug!(?divert, "leaving the read-eval loop");
                return divert.exit_status().unwrap_or(env.exit_status);
            }
        }
    }
    env.exit_status
}
