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

//! Fg built-in
//!
//! The fg built-in moves a job to the foreground. Without an operand, the job
//! with the largest job ID is selected. The built-in prints the job as
//! `<pid>: <command>`, sends `SIGCONT` to it, removes it from the job list,
//! and waits for it in the foreground until it exits or stops again.
//!
//! The exit status of the built-in is that of the job.

use crate::common::find_job;
use crate::common::parse_job_number;
use smash_env::Env;
use smash_env::foreground::Foreground;
use smash_env::foreground::wait_for_foreground;
use smash_env::job::Job;
use smash_env::job::fmt::Report;
use smash_env::semantics::ExitStatus;
use smash_env::system::Signal;
use smash_env::system::SystemError;
use thiserror::Error;

/// Fg built-in with the target job resolved
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Command {
    /// Job as it was when the built-in was resolved
    pub job: Job,
}

/// Error in resolving the fg built-in
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum Error {
    #[error("jobs list is empty")]
    EmptyJobList,
    #[error("job-id {0} does not exist")]
    NoSuchJob(usize),
    #[error("invalid arguments")]
    InvalidArguments,
}

/// Selects the job to move to the foreground.
pub fn resolve(env: &Env, args: &[String]) -> Result<Command, Error> {
    let job = match args {
        [] => env.jobs.last().ok_or(Error::EmptyJobList)?,
        [operand] => {
            let number = parse_job_number(operand).ok_or(Error::InvalidArguments)?;
            find_job(env, number).ok_or(Error::NoSuchJob(number))?
        }
        _ => return Err(Error::InvalidArguments),
    };
    let job = job.clone();
    Ok(Command { job })
}

/// Executes the fg built-in.
pub fn execute(env: &mut Env, command: &Command) -> ExitStatus {
    let job = &command.job;
    let now = env.system.now();
    env.print(&format!("{:#}\n", Report::new(job, now)));

    if let Err(errno) = env.system.kill(job.pid, Some(Signal::SIGCONT)) {
        env.print_error(&SystemError::new("kill", errno));
        return ExitStatus::FAILURE;
    }

    env.jobs.remove_by_pid(job.pid);
    let foreground = Foreground::new(job.pid, job.name.clone(), job.started);
    env.foreground.install(foreground);
    match wait_for_foreground(env, job.pid) {
        Ok(exit_status) => exit_status,
        Err(error) => {
            env.print_error(&error);
            ExitStatus::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use smash_env::job::JobState;
    use smash_env::job::ProcessState;
    use smash_env::signal::SignalHandling;
    use smash_env_test_helper::{assert_stdout, spawn_child, virtual_env};

    fn args(args: &[&str]) -> Vec<String> {
        args.iter().map(|arg| arg.to_string()).collect()
    }

    #[test]
    fn empty_job_list() {
        let (env, _system) = virtual_env();
        assert_eq!(resolve(&env, &[]), Err(Error::EmptyJobList));
        assert_eq!(Error::EmptyJobList.to_string(), "jobs list is empty");
    }

    #[test]
    fn last_job_is_selected_by_default() {
        let (mut env, system) = virtual_env();
        let now = env.system.now();
        env.jobs.add(Job::new(spawn_child(&system), "a &", now));
        env.jobs.add(Job::new(spawn_child(&system), "b &", now));
        let command = resolve(&env, &[]).unwrap();
        assert_eq!(command.job.name, "b &");
        assert_eq!(command.job.id.get(), 2);
    }

    #[test]
    fn missing_and_malformed_operands() {
        let (mut env, system) = virtual_env();
        let now = env.system.now();
        env.jobs.add(Job::new(spawn_child(&system), "a &", now));
        assert_eq!(resolve(&env, &args(&["7"])), Err(Error::NoSuchJob(7)));
        assert_eq!(resolve(&env, &args(&["0"])), Err(Error::NoSuchJob(0)));
        assert_eq!(resolve(&env, &args(&["x"])), Err(Error::InvalidArguments));
        assert_eq!(
            resolve(&env, &args(&["1", "2"])),
            Err(Error::InvalidArguments)
        );
        assert_eq!(Error::NoSuchJob(7).to_string(), "job-id 7 does not exist");
    }

    #[test]
    fn job_is_continued_and_waited_for() {
        let (mut env, system) = virtual_env();
        let pid = spawn_child(&system);
        let now = env.system.now();
        env.jobs.add(Job::new(pid, "make &", now));
        system
            .state
            .borrow_mut()
            .processes
            .get_mut(&pid)
            .unwrap()
            .set_state(ProcessState::exited(3));

        let command = resolve(&env, &args(&["1"])).unwrap();
        let exit_status = execute(&mut env, &command);

        assert_eq!(exit_status, ExitStatus(3));
        assert!(env.jobs.is_empty());
        assert!(env.foreground.is_empty());
        assert_stdout(&system.state, |stdout| {
            assert_eq!(stdout, format!("{pid}: make &\n"))
        });
        assert_eq!(
            system.state.borrow().sent_signals,
            [(pid, Signal::SIGCONT)]
        );
    }

    #[test]
    fn stopped_job_suspended_again_in_foreground() {
        let (mut env, system) = virtual_env();
        let pid = spawn_child(&system);
        let now = env.system.now();
        let mut job = Job::new(pid, "vi notes", now);
        job.stop(now);
        env.jobs.add(Job::new(spawn_child(&system), "sleep 100 &", now));
        env.jobs.add(job);
        system
            .state
            .borrow_mut()
            .processes
            .get_mut(&pid)
            .unwrap()
            .set_state(ProcessState::Stopped(Signal::SIGTSTP));
        // Pretend the user presses ctrl-Z while the job is in the foreground.
        env.system
            .sigaction(Signal::SIGTSTP, SignalHandling::Catch)
            .unwrap();
        let shell = system.process_id;
        env.system.kill(shell, Some(Signal::SIGTSTP)).unwrap();
        env.system.wait(pid, false).unwrap();

        let command = resolve(&env, &[]).unwrap();
        let exit_status = execute(&mut env, &command);

        assert_eq!(exit_status, ExitStatus::from(Signal::SIGSTOP));
        assert!(env.foreground.is_empty());
        let job = env.jobs.find_by_pid(pid).unwrap();
        assert_eq!(job.id.get(), 2);
        assert_eq!(job.state, JobState::Stopped);
        assert_matches!(
            system.state.borrow().processes[&pid].state(),
            ProcessState::Stopped(Signal::SIGSTOP)
        );
    }

    #[test]
    fn failure_to_continue_keeps_job() {
        let (mut env, _system) = virtual_env();
        let now = env.system.now();
        let ghost = smash_env::job::Pid::from_raw(77);
        env.jobs.add(Job::new(ghost, "ghost &", now));

        let command = resolve(&env, &[]).unwrap();
        assert_eq!(execute(&mut env, &command), ExitStatus::FAILURE);
        assert_eq!(env.jobs.len(), 1);
        assert!(env.foreground.is_empty());
    }
}
