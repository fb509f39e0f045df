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

//! Pipeline execution
//!
//! A pipeline connects the standard output of its left side to the standard
//! input of its right side. The right side runs in a child process, in a new
//! process group if started from the main shell. The left side runs in the
//! shell itself with its output redirected to the pipe, so built-ins on the
//! left side report the shell's own state.
//!
//! After the left side finishes and the shell's standard streams are
//! restored, the shell waits for the right side as the foreground process.

use crate::command::Command;
use crate::command::subshell_exit_status;
use crate::job::start_in_new_group;
use crate::redir::RedirGuard;
use smash_builtin::Builtin;
use smash_env::Env;
use smash_env::foreground::Foreground;
use smash_env::foreground::wait_for_foreground;
use smash_env::io::Fd;
use smash_env::semantics::ExitStatus;
use smash_env::semantics::Result;
use smash_env::system::SystemError;
use smash_syntax::syntax::Invocation;
use std::ops::ControlFlow::Continue;

/// Executes the pipeline.
///
/// The exit status of the pipeline is that of the right side. If the pipe
/// or the child process cannot be created, the error is printed and neither
/// side is executed.
pub fn execute(
    env: &mut Env,
    left: &Invocation<Builtin>,
    right: &Invocation<Builtin>,
    merge_stderr: bool,
) -> Result {
    let (reader, writer) = match env.system.pipe() {
        Ok(fds) => fds,
        Err(errno) => return fail(env, SystemError::new("pipe", errno)),
    };

    let right_side = right.clone();
    let child = start_in_new_group(env, move |env| {
        if let Err(error) = connect_stdin(env, reader, writer) {
            env.print_error(&error);
            return ExitStatus::FAILURE;
        }
        let result = right_side.execute(env);
        subshell_exit_status(env, result)
    });
    if let Err(errno) = env.system.close(reader) {
        tracing::debug!(fd = %reader, %errno, "cannot close the pipe reader");
    }
    let child = match child {
        Ok(child) => child,
        Err(error) => {
            let _ = env.system.close(writer);
            return fail(env, error);
        }
    };

    let result = {
        let mut env = RedirGuard::new(env);
        let redirected = env.redirect_output(writer, merge_stderr);
        // The right side sees the end of input when the left side finishes.
        let _ = env.system.close(writer);
        match redirected {
            Ok(()) => left.execute(&mut env),
            Err(error) => {
                env.undo_redirs();
                env.print_error(&error);
                Continue(())
            }
        }
    };

    let now = env.system.now();
    let name = format!("{left} {} {right}", if merge_stderr { "|&" } else { "|" });
    env.foreground.install(Foreground::new(child, name, now));
    env.exit_status = match wait_for_foreground(env, child) {
        Ok(exit_status) => exit_status,
        Err(error) => {
            env.print_error(&error);
            ExitStatus::FAILURE
        }
    };
    result
}

/// Makes the standard input of the right side refer to the pipe reader and
/// closes the original pipe file descriptors.
fn connect_stdin(env: &mut Env, reader: Fd, writer: Fd) -> std::result::Result<(), SystemError> {
    env.system
        .dup2(reader, Fd::STDIN)
        .map_err(|errno| SystemError::new("dup2", errno))?;
    for fd in [reader, writer] {
        env.system
            .close(fd)
            .map_err(|errno| SystemError::new("close", errno))?;
    }
    Ok(())
}

fn fail(env: &mut Env, error: SystemError) -> Result {
    env.print_error(&error);
    env.exit_status = ExitStatus::FAILURE;
    Continue(())
}
