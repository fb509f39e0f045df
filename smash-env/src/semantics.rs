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

//! Types for command execution results

use crate::system::Signal;
use std::ops::ControlFlow;

/// Number that summarizes the result of command execution
///
/// An exit status is an integer returned from a process when it exits. The
/// shell also assigns an exit status to every command it executes, including
/// built-ins.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct ExitStatus(pub i32);

impl ExitStatus {
    /// Exit status of 0: success
    pub const SUCCESS: ExitStatus = ExitStatus(0);

    /// Exit status of 1: failure
    pub const FAILURE: ExitStatus = ExitStatus(1);

    /// Exit status of 2: error severer than failure
    pub const ERROR: ExitStatus = ExitStatus(2);

    /// Exit status of 127: command not executable
    pub const NOT_FOUND: ExitStatus = ExitStatus(127);

    /// Returns true if and only if `self` is zero.
    pub const fn is_successful(&self) -> bool {
        self.0 == 0
    }
}

impl std::fmt::Display for ExitStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl From<i32> for ExitStatus {
    fn from(value: i32) -> ExitStatus {
        ExitStatus(value)
    }
}

impl From<ExitStatus> for i32 {
    fn from(exit_status: ExitStatus) -> i32 {
        exit_status.0
    }
}

/// Converts a signal to the corresponding exit status.
///
/// The exit status of a command killed by a signal is the signal number
/// plus 128.
impl From<Signal> for ExitStatus {
    fn from(signal: Signal) -> ExitStatus {
        ExitStatus(signal as i32 + 0x80)
    }
}

/// Result of interrupted command execution
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Divert {
    /// Exit the shell.
    ///
    /// The associated exit status, if any, overrides the current exit status
    /// of the environment.
    Exit(Option<ExitStatus>),
}

impl Divert {
    /// Returns the exit status associated with the `Divert`, if any.
    pub fn exit_status(&self) -> Option<ExitStatus> {
        match self {
            Divert::Exit(exit_status) => *exit_status,
        }
    }
}

/// Result of command execution
///
/// If the command was interrupted in the middle of execution, the result
/// value will be a `Break` having a [`Divert`] value which specifies what to
/// execute next.
pub type Result<T = ()> = ControlFlow<Divert, T>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_status_from_signal() {
        assert_eq!(ExitStatus::from(Signal::SIGKILL), ExitStatus(137));
        assert_eq!(ExitStatus::from(Signal::SIGINT), ExitStatus(130));
    }
}
