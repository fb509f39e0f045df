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

//! Signal bridge
//!
//! The shell catches `SIGINT` and `SIGTSTP` so that the user can interrupt or
//! suspend the foreground process from the terminal. Catching is two-staged:
//! the signal-catching function of the system only records the signal
//! number, and the functions in this module later act on the recorded
//! signals in the main flow of the shell, where the job list and the
//! foreground slot can be safely modified.
//!
//! [`resolve_caught_signals`] is called whenever a blocking system call is
//! interrupted and between commands.

use crate::Env;
use crate::system::Signal;
use crate::system::SystemError;

/// How a signal is handled
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum SignalHandling {
    /// The system's default action is taken.
    #[default]
    Default,
    /// The signal is ignored.
    Ignore,
    /// The signal is caught and recorded for [`resolve_caught_signals`].
    Catch,
}

/// Signals the shell catches
pub const HANDLED_SIGNALS: [Signal; 2] = [Signal::SIGINT, Signal::SIGTSTP];

/// Signals the shell ignores
///
/// Built-ins writing to a pipe whose reader has exited get `EPIPE` instead
/// of killing the shell.
pub const IGNORED_SIGNALS: [Signal; 1] = [Signal::SIGPIPE];

/// Starts catching the interrupt and stop signals.
///
/// The signals in [`IGNORED_SIGNALS`] are ignored as well.
pub fn install_handlers(env: &mut Env) -> Result<(), SystemError> {
    let handlings = HANDLED_SIGNALS
        .into_iter()
        .map(|signal| (signal, SignalHandling::Catch))
        .chain(IGNORED_SIGNALS.map(|signal| (signal, SignalHandling::Ignore)));
    for (signal, handling) in handlings {
        env.system
            .sigaction(signal, handling)
            .map_err(|errno| SystemError::new("sigaction", errno))?;
    }
    Ok(())
}

/// Restores the default handling of the signals the shell catches or
/// ignores.
///
/// This is done in child processes, which should be interrupted and stopped
/// by the signals sent to them.
pub fn restore_default_handlers(env: &mut Env) {
    for signal in HANDLED_SIGNALS.into_iter().chain(IGNORED_SIGNALS) {
        if let Err(errno) = env.system.sigaction(signal, SignalHandling::Default) {
            tracing::warn!(%signal, %errno, "cannot restore the default signal handling");
        }
    }
}

/// Acts on the signals caught since the last call.
pub fn resolve_caught_signals(env: &mut Env) {
    for signal in env.system.caught_signals() {
        tracing::debug!(%signal, "resolving caught signal");
        match signal {
            Signal::SIGINT => interrupt(env),
            Signal::SIGTSTP => suspend(env),
            _ => tracing::debug!(%signal, "ignoring unexpected signal"),
        }
    }
}

/// Kills the foreground process.
///
/// The process receives `SIGKILL`. Any job with the process ID is removed and
/// the foreground slot is cleared. Nothing is killed if the slot is empty.
pub fn interrupt(env: &mut Env) {
    env.print("smash: got ctrl-C\n");
    let Some(pid) = env.foreground.pid() else {
        return;
    };
    match env.system.kill(pid, Some(Signal::SIGKILL)) {
        Ok(()) => {
            env.print(&format!("smash: process {pid} was killed\n"));
            env.jobs.remove_by_pid(pid);
            env.foreground.take();
        }
        Err(errno) => env.print_error(&SystemError::new("kill", errno)),
    }
}

/// Stops the foreground process and turns it into a stopped job.
///
/// The process receives `SIGSTOP`. The new job keeps the command and the
/// start time of the foreground process. Nothing is stopped if the slot is
/// empty.
pub fn suspend(env: &mut Env) {
    env.print("smash: got ctrl-Z\n");
    let Some(pid) = env.foreground.pid() else {
        return;
    };
    match env.system.kill(pid, Some(Signal::SIGSTOP)) {
        Ok(()) => {
            if let Some(foreground) = env.foreground.take() {
                let now = env.system.now();
                env.jobs.add(foreground.into_stopped_job(now));
            }
            env.print(&format!("smash: process {pid} was stopped\n"));
        }
        Err(errno) => env.print_error(&SystemError::new("kill", errno)),
    }
}
