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

//! External utility execution
//!
//! An external utility runs as `/bin/bash -c <command text>` in a child
//! process. In the foreground, the shell installs the child in the
//! foreground slot and waits until it exits or stops.

use crate::job::start_in_new_group;
use smash_env::Env;
use smash_env::foreground::Foreground;
use smash_env::foreground::wait_for_foreground;
use smash_env::job::Pid;
use smash_env::semantics::ExitStatus;
use smash_env::semantics::Result;
use smash_env::system::Errno;
use smash_env::system::SystemError;
use smash_syntax::syntax::External;
use std::ffi::CStr;
use std::ffi::CString;
use std::ops::ControlFlow::Continue;

/// Path to the command interpreter that runs external utilities
pub const INTERPRETER: &CStr = c"/bin/bash";

/// Executes the external utility in the foreground.
pub fn execute(env: &mut Env, external: &External) -> Result {
    env.exit_status = match run(env, &external.text) {
        Ok(exit_status) => exit_status,
        Err(error) => {
            env.print_error(&error);
            ExitStatus::FAILURE
        }
    };
    Continue(())
}

fn run(env: &mut Env, text: &str) -> std::result::Result<ExitStatus, SystemError> {
    let pid = start(env, text)?;
    let now = env.system.now();
    env.foreground.install(Foreground::new(pid, text, now));
    wait_for_foreground(env, pid)
}

/// Starts a child process that executes the command text.
///
/// The function returns the process ID of the child without waiting for it.
/// The child is in a new process group unless the current process is a
/// subshell.
pub fn start(env: &mut Env, text: &str) -> std::result::Result<Pid, SystemError> {
    let command = text.to_owned();
    let pid = start_in_new_group(env, move |env| exec(env, &command))?;
    tracing::info!(%pid, command = text, "started external utility");
    Ok(pid)
}

/// Replaces the current process with the command interpreter.
///
/// This function returns only if the interpreter cannot be executed, in which
/// case the error is printed and the result is the exit status the process
/// should exit with.
pub fn exec(env: &mut Env, text: &str) -> ExitStatus {
    let errno = match CString::new(text) {
        Ok(command) => {
            let args = [INTERPRETER.to_owned(), c"-c".to_owned(), command];
            match env.system.execv(INTERPRETER, &args) {
                Ok(never) => match never {},
                Err(errno) => errno,
            }
        }
        Err(_) => Errno::EINVAL,
    };
    env.print_error(&SystemError::new("execv", errno));
    ExitStatus::NOT_FOUND
}
