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

//! Shell startup

use self::args::Run;
use smash_env::Env;
use smash_env::history::History;
use smash_env::signal::install_handlers;

pub mod args;

/// Usage message printed for `--help`
pub const HELP: &str = "\
Usage: smash [OPTION]...
Run a small job-control shell reading commands from the standard input.

Options:
  --history-size <N>  keep at most N commands in the history (default 50)
  --prompt <TEXT>     print TEXT before reading each command (default 'smash> ')
  --no-prompt         do not print a prompt
  --help              print this help and exit
  --version           print version information and exit

Set SMASH_LOG (e.g. SMASH_LOG=debug) to print diagnostic logs to the
standard error.
";

/// Prepares the environment for the read-eval loop.
///
/// The shell starts catching the interrupt and stop signals. Failure to do so
/// is reported but does not prevent the shell from running.
pub fn configure_environment(env: &mut Env, run: &Run) {
    env.history = History::with_capacity(run.history_size);
    if let Err(error) = install_handlers(env) {
        env.print_error(&error);
    }
    tracing::debug!(?run, "shell configured");
}
