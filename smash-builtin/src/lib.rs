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

//! This crate implements the built-in utilities of smash.
//!
//! A built-in is executed in two phases. [`resolve`] checks the arguments of
//! a [`BuiltinCall`] and, for the built-ins that refer to jobs, looks the jobs
//! up in the job list, yielding a [`Builtin`]. Errors found in this phase
//! abort the whole command line before anything runs. [`execute`] then
//! performs the resolved built-in.
//!
//! Each built-in is implemented in its own module:
//!
//! - [`jobs`] lists the jobs.
//! - [`fg`] moves a job to the foreground.
//! - [`bg`] resumes a stopped job in the background.
//! - [`kill`] sends a signal to a job.
//! - [`quit`] exits the shell.
//! - [`cd`] changes the working directory.
//! - [`pwd`] prints the working directory.
//! - [`showpid`] prints the process ID of the shell.
//! - [`history`] prints the command history.

pub mod bg;
pub mod cd;
mod common;
pub mod fg;
pub mod history;
pub mod jobs;
pub mod kill;
pub mod pwd;
pub mod quit;
pub mod showpid;

use smash_env::Env;
use smash_env::semantics::ExitStatus;
use smash_syntax::syntax::BuiltinCall;
use smash_syntax::syntax::BuiltinName;
use std::fmt::Display;
use std::fmt::Formatter;
use std::ops::ControlFlow::Continue;
use thiserror::Error;

/// Built-in utility ready to be executed
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Builtin {
    Jobs,
    Fg(fg::Command),
    Bg(bg::Command),
    Kill(kill::Command),
    Quit(quit::Command),
    Cd(cd::Command),
    Pwd,
    ShowPid,
    History,
}

impl Builtin {
    /// Returns the name of the built-in.
    pub fn name(&self) -> BuiltinName {
        match self {
            Builtin::Jobs => BuiltinName::Jobs,
            Builtin::Fg(_) => BuiltinName::Fg,
            Builtin::Bg(_) => BuiltinName::Bg,
            Builtin::Kill(_) => BuiltinName::Kill,
            Builtin::Quit(_) => BuiltinName::Quit,
            Builtin::Cd(_) => BuiltinName::Cd,
            Builtin::Pwd => BuiltinName::Pwd,
            Builtin::ShowPid => BuiltinName::ShowPid,
            Builtin::History => BuiltinName::History,
        }
    }
}

impl Display for Builtin {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Builtin::Fg(command) => write!(f, "fg {}", command.job.id),
            Builtin::Bg(command) => write!(f, "bg {}", command.job.id),
            Builtin::Kill(command) => {
                write!(f, "kill -{} {}", command.signal as i32, command.id)
            }
            Builtin::Quit(quit::Command { kill: true }) => f.write_str("quit kill"),
            Builtin::Cd(command) => write!(f, "cd {}", command.operand),
            other => other.name().fmt(f),
        }
    }
}

/// Error in resolving a built-in
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum Error {
    #[error("fg: {0}")]
    Fg(#[from] fg::Error),
    #[error("bg: {0}")]
    Bg(#[from] bg::Error),
    #[error("kill: {0}")]
    Kill(#[from] kill::Error),
    #[error("cd: {0}")]
    Cd(#[from] cd::Error),
}

/// Checks the arguments of the built-in and looks up the jobs it refers to.
///
/// Finished jobs are reaped before looking up jobs, so that a built-in never
/// refers to a job that has already finished.
pub fn resolve(env: &mut Env, call: BuiltinCall) -> Result<Builtin, Error> {
    let args = &call.args;
    Ok(match call.name {
        BuiltinName::Jobs => {
            env.reap_finished_jobs();
            Builtin::Jobs
        }
        BuiltinName::Fg => {
            env.reap_finished_jobs();
            Builtin::Fg(fg::resolve(env, args)?)
        }
        BuiltinName::Bg => {
            env.reap_finished_jobs();
            Builtin::Bg(bg::resolve(env, args)?)
        }
        BuiltinName::Kill => {
            env.reap_finished_jobs();
            Builtin::Kill(kill::resolve(env, args)?)
        }
        BuiltinName::Quit => {
            env.reap_finished_jobs();
            Builtin::Quit(quit::resolve(args))
        }
        BuiltinName::Cd => Builtin::Cd(cd::resolve(env, args)?),
        BuiltinName::Pwd => Builtin::Pwd,
        BuiltinName::ShowPid => Builtin::ShowPid,
        BuiltinName::History => Builtin::History,
    })
}

/// Executes the resolved built-in.
///
/// The exit status of the built-in is stored in `env.exit_status`. The
/// result is a `Break` if the built-in exits the shell.
pub fn execute(env: &mut Env, builtin: &Builtin) -> smash_env::semantics::Result {
    tracing::debug!(%builtin, "executing built-in");
    let exit_status = match builtin {
        Builtin::Jobs => jobs::execute(env),
        Builtin::Fg(command) => fg::execute(env, command),
        Builtin::Bg(command) => bg::execute(env, command),
        Builtin::Kill(command) => kill::execute(env, command),
        Builtin::Quit(command) => return quit::execute(env, command),
        Builtin::Cd(command) => cd::execute(env, command),
        Builtin::Pwd => pwd::execute(env),
        Builtin::ShowPid => showpid::execute(env),
        Builtin::History => history::execute(env),
    };
    env.exit_status = exit_status;
    Continue(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use smash_env::job::Job;
    use smash_env::system::System;
    use smash_env_test_helper::{spawn_child, virtual_env};

    fn call(name: BuiltinName, args: &[&str]) -> BuiltinCall {
        let args = args.iter().map(|arg| arg.to_string()).collect();
        BuiltinCall { name, args }
    }

    #[test]
    fn resolve_reports_creation_errors() {
        let (mut env, _system) = virtual_env();
        let error = resolve(&mut env, call(BuiltinName::Fg, &[])).unwrap_err();
        assert_eq!(error.to_string(), "fg: jobs list is empty");
    }

    #[test]
    fn resolve_reaps_finished_jobs_before_lookup() {
        let (mut env, system) = virtual_env();
        let pid = spawn_child(&system);
        let now = env.system.now();
        env.jobs.add(Job::new(pid, "true &", now));
        system
            .state
            .borrow_mut()
            .processes
            .get_mut(&pid)
            .unwrap()
            .set_state(smash_env::job::ProcessState::exited(0));

        let error = resolve(&mut env, call(BuiltinName::Fg, &["1"])).unwrap_err();
        assert_eq!(error.to_string(), "fg: job-id 1 does not exist");
    }

    #[test]
    fn display_resolved_builtins() {
        let (mut env, system) = virtual_env();
        let pid = spawn_child(&system);
        let now = env.system.now();
        env.jobs.add(Job::new(pid, "sleep 9 &", now));

        let fg = resolve(&mut env, call(BuiltinName::Fg, &[])).unwrap();
        assert_eq!(fg.to_string(), "fg 1");
        let kill = resolve(&mut env, call(BuiltinName::Kill, &["-15", "1"])).unwrap();
        assert_eq!(kill.to_string(), "kill -15 1");
        let quit = resolve(&mut env, call(BuiltinName::Quit, &["kill"])).unwrap();
        assert_eq!(quit.to_string(), "quit kill");
        let pwd = resolve(&mut env, call(BuiltinName::ShowPid, &[])).unwrap();
        assert_eq!(pwd.to_string(), "showpid");
    }

    #[test]
    fn execute_stores_exit_status() {
        let (mut env, _system) = virtual_env();
        env.exit_status = ExitStatus(42);
        let result = execute(&mut env, &Builtin::ShowPid);
        assert_eq!(result, Continue(()));
        assert_eq!(env.exit_status, ExitStatus::SUCCESS);
    }
}
