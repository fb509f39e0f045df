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

//! Command line dispatching

use crate::Error;
use crate::command::Command;
use crate::job::start_job;
use smash_builtin::Builtin;
use smash_env::Env;
use smash_env::semantics::ExitStatus;
use smash_env::semantics::Result;
use smash_env::signal::resolve_caught_signals;
use smash_syntax::parser::parse;
use smash_syntax::parser::strip_background;
use smash_syntax::syntax::Invocation;
use std::ops::ControlFlow::Continue;

/// Parses the command text and resolves the built-ins in it.
///
/// The built-ins that refer to jobs look up the jobs at this point, so a
/// reference to a missing job fails the whole command line before anything
/// is executed.
pub fn resolve(env: &mut Env, text: &str) -> std::result::Result<Invocation<Builtin>, Error> {
    let invocation = parse(text)?;
    let invocation = invocation.try_map_builtins(&mut |call| smash_builtin::resolve(env, call))?;
    Ok(invocation)
}

/// Executes a command line submitted by the user.
///
/// A line ending with `&` is started as a background job named after the
/// whole line; any other line is executed in the foreground. The line is
/// recorded in the history unless it cannot be parsed or resolved, in which
/// case the error is printed and nothing is executed. Blank lines are
/// ignored.
///
/// Finished jobs are reaped before and after the execution, and signals
/// caught during the execution are resolved before returning.
pub fn dispatch(env: &mut Env, line: &str) -> Result {
    let line = line.trim();
    if line.is_empty() {
        return Continue(());
    }

    let (text, background) = strip_background(line);
    let invocation = match resolve(env, text) {
        Ok(invocation) => invocation,
        Err(error) => {
            env.print_error(&error);
            env.exit_status = ExitStatus::ERROR;
            return Continue(());
        }
    };

    env.history.record(line);
    env.reap_finished_jobs();

    let result = if background {
        env.exit_status = match start_job(env, &invocation, line) {
            Ok(_) => ExitStatus::SUCCESS,
            Err(error) => {
                env.print_error(&error);
                ExitStatus::FAILURE
            }
        };
        Continue(())
    } else {
        invocation.execute(env)
    };

    resolve_caught_signals(env);
    env.reap_finished_jobs();
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use smash_env::job::JobState;
    use smash_env::job::ProcessState;
    use smash_env::semantics::Divert;
    use smash_env::system::Signal;
    use smash_env_test_helper::{assert_stderr, assert_stdout, spawn_child, virtual_env};
    use std::ops::ControlFlow::Break;

    #[test]
    fn blank_line_does_nothing() {
        let (mut env, _system) = virtual_env();
        assert_eq!(dispatch(&mut env, "  \t\n"), Continue(()));
        assert!(env.history.is_empty());
    }

    #[test]
    fn syntax_error_is_reported_and_not_recorded() {
        let (mut env, system) = virtual_env();
        assert_eq!(dispatch(&mut env, "| cat"), Continue(()));
        assert_eq!(env.exit_status, ExitStatus::ERROR);
        assert!(env.history.is_empty());
        assert_stderr(&system.state, |stderr| {
            assert_eq!(stderr, "smash error: syntax error: missing command around '|'\n")
        });
    }

    #[test]
    fn resolution_error_is_reported() {
        let (mut env, system) = virtual_env();
        dispatch(&mut env, "fg");
        assert_stderr(&system.state, |stderr| {
            assert_eq!(stderr, "smash error: fg: jobs list is empty\n")
        });
        assert!(env.history.is_empty());
    }

    #[test]
    fn missing_job_in_pipeline_aborts_whole_line() {
        let (mut env, system) = virtual_env();
        dispatch(&mut env, "showpid | kill -9 4");
        assert_stdout(&system.state, |stdout| assert_eq!(stdout, ""));
        assert_stderr(&system.state, |stderr| {
            assert_eq!(stderr, "smash error: kill: job-id 4 does not exist\n")
        });
        assert_eq!(system.state.borrow().processes.len(), 1);
    }

    #[test]
    fn background_line_becomes_job() {
        let (mut env, system) = virtual_env();

        assert_eq!(dispatch(&mut env, "sleep 100&"), Continue(()));

        assert_eq!(env.exit_status, ExitStatus::SUCCESS);
        let job = env.jobs.last().unwrap();
        assert_eq!(job.name, "sleep 100&");
        assert_eq!(job.state, JobState::Running);
        let record = env.history.last_recorded().unwrap();
        assert_eq!(record.text, "sleep 100&");
        assert!(env.foreground.is_empty());

        dispatch(&mut env, "jobs");
        assert_stdout(&system.state, |stdout| {
            assert_eq!(stdout.lines().count(), 1);
            assert!(stdout.starts_with("[1] sleep 100& : "), "{stdout}");
            assert!(!stdout.contains("(stopped)"), "{stdout}");
        });
    }

    #[test]
    fn background_builtin_runs_in_child() {
        let (mut env, system) = virtual_env();
        dispatch(&mut env, "showpid &");
        assert_eq!(env.jobs.len(), 1);
        // The child process is virtual and does not print anything.
        assert_stdout(&system.state, |stdout| assert_eq!(stdout, ""));
    }

    #[test]
    fn finished_jobs_are_reaped_after_dispatch() {
        let (mut env, system) = virtual_env();
        let now = env.system.now();
        let pid = spawn_child(&system);
        env.jobs.add(smash_env::job::Job::new(pid, "true &", now));
        system
            .state
            .borrow_mut()
            .processes
            .get_mut(&pid)
            .unwrap()
            .set_state(ProcessState::exited(0));

        dispatch(&mut env, "pwd");

        assert!(env.jobs.is_empty());
    }

    #[test]
    fn kill_removes_job_and_signals() {
        let (mut env, system) = virtual_env();
        dispatch(&mut env, "sleep 100 &");
        let pid = env.jobs.last().unwrap().pid;

        dispatch(&mut env, "kill -9 1");

        assert!(env.jobs.is_empty());
        assert_eq!(
            system.state.borrow().sent_signals,
            [(pid, Signal::SIGKILL)]
        );
        assert_stdout(&system.state, |stdout| {
            assert_eq!(stdout, format!("signal number 9 was sent to pid {pid}\n"))
        });
        // The killed process has been collected as well.
        assert!(!system.state.borrow().processes.contains_key(&pid));
    }

    #[test]
    fn stop_then_bg_keeps_pid_and_id() {
        let (mut env, system) = virtual_env();
        system.state.borrow_mut().new_child_state = Some(ProcessState::Stopped(Signal::SIGTSTP));
        dispatch(&mut env, "vi notes");
        let stopped = env.jobs.last().unwrap().clone();
        assert_eq!(stopped.state, JobState::Stopped);

        dispatch(&mut env, "bg");

        let job = env.jobs.get(stopped.id).unwrap();
        assert_eq!(job.pid, stopped.pid);
        assert_eq!(job.state, JobState::Running);
        assert_eq!(job.stopped_at, None);
    }

    #[test]
    fn bg_on_running_job_does_not_signal() {
        let (mut env, system) = virtual_env();
        dispatch(&mut env, "sleep 100 &");
        dispatch(&mut env, "bg 1");
        assert!(system.state.borrow().sent_signals.is_empty());
        assert_stderr(&system.state, |stderr| {
            assert_eq!(
                stderr,
                "smash error: bg: job-id 1 is already running in the background\n"
            )
        });
    }

    #[test]
    fn quit_kill_kills_every_job() {
        let (mut env, system) = virtual_env();
        dispatch(&mut env, "sleep 100 &");
        dispatch(&mut env, "sleep 200 &");
        let pids: Vec<_> = env.jobs.iter().map(|job| job.pid).collect();

        let result = dispatch(&mut env, "quit kill");

        assert_eq!(result, Break(Divert::Exit(Some(ExitStatus::SUCCESS))));
        let sent = system.state.borrow().sent_signals.clone();
        assert_eq!(
            sent,
            [(pids[0], Signal::SIGKILL), (pids[1], Signal::SIGKILL)]
        );
        assert_stdout(&system.state, |stdout| {
            assert_eq!(
                stdout,
                format!("{}: sleep 100 &\n{}: sleep 200 &\n", pids[0], pids[1])
            )
        });
    }

    #[test]
    fn interrupt_during_foreground_wait() {
        let (mut env, system) = virtual_env();
        smash_env::signal::install_handlers(&mut env).unwrap();
        system
            .current_process_mut()
            .raise_signal(Signal::SIGINT);

        dispatch(&mut env, "sleep 100");

        assert!(env.foreground.is_empty());
        assert!(env.jobs.is_empty());
        assert_eq!(env.exit_status, ExitStatus::from(Signal::SIGKILL));
        assert_stdout(&system.state, |stdout| {
            assert_eq!(stdout, "smash: got ctrl-C\nsmash: process 3 was killed\n")
        });
    }
}
