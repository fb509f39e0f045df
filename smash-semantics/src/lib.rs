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

//! Process launcher and command dispatcher of smash
//!
//! This crate executes command lines. [`dispatch`] takes a line read from the
//! user, parses it with [`smash_syntax`], resolves the built-ins with
//! [`smash_builtin`], and runs the result either in the foreground through
//! the [`Command`] trait or in the background as a new [job](start_job).
//!
//! External utilities are run by the command interpreter `/bin/bash` in a
//! child process. Every job started by the main shell process gets its own
//! process group so that signals sent to the job do not reach the shell.
//!
//! [`read_eval_loop`] repeatedly reads and dispatches lines until the input
//! ends or the `quit` built-in is executed.

pub mod command;
pub mod dispatch;
pub mod external;
pub mod job;
pub mod pipeline;
pub mod redir;
pub mod runner;

pub use self::command::Command;
pub use self::dispatch::dispatch;
pub use self::job::start_job;
pub use self::runner::read_eval_loop;

use smash_env::system::SystemError;
use thiserror::Error;

/// Error that aborts a command line
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum Error {
    #[error(transparent)]
    Syntax(#[from] smash_syntax::parser::Error),
    #[error(transparent)]
    Builtin(#[from] smash_builtin::Error),
    #[error(transparent)]
    System(#[from] SystemError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use smash_env::system::Errno;

    #[test]
    fn error_messages() {
        let error = Error::from(smash_syntax::parser::Error::EmptyCommand);
        assert_eq!(error.to_string(), "syntax error: missing command before '&'");
        let error = Error::from(smash_builtin::Error::Fg(smash_builtin::fg::Error::EmptyJobList));
        assert_eq!(error.to_string(), "fg: jobs list is empty");
        let error = Error::from(SystemError::new("fork", Errno::EAGAIN));
        assert_eq!(
            error.to_string(),
            format!("fork failed: {}", Errno::EAGAIN.desc())
        );
    }
}
