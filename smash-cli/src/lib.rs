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

//! This is an internal library crate for the smash shell. It is not intended
//! to be used as a library by other crates.
//!
//! The entry point for the shell is the [`main`] function, which is to be used
//! as the `main` function in the binary crate. The function sets up logging
//! and the shell environment and runs the read-eval loop.

pub mod startup;

use self::startup::args::Parse;
use smash_env::Env;
use smash_env::RealSystem;
use smash_env::input::FdReader;
use smash_env::io::Fd;
use smash_env::semantics::ExitStatus;
use smash_semantics::read_eval_loop;
use tracing_subscriber::EnvFilter;

/// Environment variable that selects the diagnostic log level
pub const LOG_ENV: &str = "SMASH_LOG";

/// Installs the diagnostic log subscriber.
///
/// Logs go to the standard error, filtered by the [`LOG_ENV`] variable.
/// Only warnings and errors are logged by default.
fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Runs the shell with the command-line arguments in the environment.
///
/// Returns the exit status the process should exit with.
pub fn run<I, S>(env: &mut Env, args: I) -> ExitStatus
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let run = match self::startup::args::parse(args) {
        Ok(Parse::Help) => {
            env.print(self::startup::HELP);
            return ExitStatus::SUCCESS;
        }
        Ok(Parse::Version) => {
            let version = env!("CARGO_PKG_VERSION");
            env.print(&format!("smash {version}\n"));
            return ExitStatus::SUCCESS;
        }
        Ok(Parse::Run(run)) => run,
        Err(e) => {
            let message = format!("smash: {e}\n");
            let _ = env.system.write_all(Fd::STDERR, message.as_bytes());
            return ExitStatus::ERROR;
        }
    };

    self::startup::configure_environment(env, &run);
    let input = FdReader::new(Fd::STDIN);
    read_eval_loop(env, &input, run.prompt.as_deref())
}

pub fn main() -> ! {
    init_logging();

    // SAFETY: This is the only instance of RealSystem we create in the whole
    // process.
    let system = unsafe { RealSystem::new() };
    let mut env = Env::with_system(Box::new(system));

    let exit_status = run(&mut env, std::env::args());
    std::process::exit(exit_status.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use smash_env_test_helper::{assert_stderr, assert_stdout, set_stdin, virtual_env};

    #[test]
    fn version() {
        let (mut env, system) = virtual_env();
        assert_eq!(run(&mut env, ["smash", "--version"]), ExitStatus::SUCCESS);
        assert_stdout(&system.state, |stdout| {
            assert_eq!(stdout, format!("smash {}\n", env!("CARGO_PKG_VERSION")))
        });
    }

    #[test]
    fn help() {
        let (mut env, system) = virtual_env();
        assert_eq!(run(&mut env, ["smash", "--help"]), ExitStatus::SUCCESS);
        assert_stdout(&system.state, |stdout| assert!(stdout.starts_with("Usage: smash")));
    }

    #[test]
    fn argument_error() {
        let (mut env, system) = virtual_env();
        assert_eq!(run(&mut env, ["smash", "--bogus"]), ExitStatus::ERROR);
        assert_stderr(&system.state, |stderr| {
            assert_eq!(stderr, "smash: unknown option '--bogus'\n")
        });
    }

    #[test]
    fn session_with_history_limit() {
        let (mut env, system) = virtual_env();
        set_stdin(&system.state, "pwd\nshowpid\nhistory\n");

        let exit_status = run(&mut env, ["smash", "--no-prompt", "--history-size", "2"]);

        assert_eq!(exit_status, ExitStatus::SUCCESS);
        assert_stdout(&system.state, |stdout| {
            assert_eq!(stdout, "/\nsmash pid is 2\n    2 showpid\n    3 history\n")
        });
    }
}
