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

//! Kill built-in
//!
//! The kill built-in sends a signal to a job. It takes exactly two operands:
//! the signal number preceded by a hyphen and the job ID, as in `kill -9 2`.
//! The built-in prints `signal number <signal> was sent to pid <pid>` before
//! sending the signal, and removes the job from the job list once the signal
//! has been sent.

use crate::common::find_job;
use crate::common::parse_job_number;
use smash_env::Env;
use smash_env::job::JobId;
use smash_env::job::Pid;
use smash_env::semantics::ExitStatus;
use smash_env::system::Signal;
use smash_env::system::SystemError;
use thiserror::Error;

/// Kill built-in with the target job resolved
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Command {
    pub signal: Signal,
    pub id: JobId,
    pub pid: Pid,
}

/// Error in resolving the kill built-in
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum Error {
    #[error("invalid arguments")]
    InvalidArguments,
    #[error("job-id {0} does not exist")]
    NoSuchJob(usize),
}

/// Parses a signal operand like `-9`.
fn parse_signal(operand: &str) -> Option<Signal> {
    let number = operand.strip_prefix('-')?;
    if number.is_empty() || !number.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Signal::try_from(number.parse::<i32>().ok()?).ok()
}

/// Checks the operands and selects the job to signal.
pub fn resolve(env: &Env, args: &[String]) -> Result<Command, Error> {
    let [signal, operand] = args else {
        return Err(Error::InvalidArguments);
    };
    let signal = parse_signal(signal).ok_or(Error::InvalidArguments)?;
    let number = parse_job_number(operand).ok_or(Error::InvalidArguments)?;
    let job = find_job(env, number).ok_or(Error::NoSuchJob(number))?;
    Ok(Command {
        signal,
        id: job.id,
        pid: job.pid,
    })
}

/// Executes the kill built-in.
pub fn execute(env: &mut Env, command: &Command) -> ExitStatus {
    let Command { signal, pid, .. } = *command;
    env.print(&format!(
        "signal number {} was sent to pid {pid}\n",
        signal as i32
    ));

    match env.system.kill(pid, Some(signal)) {
        Ok(()) => {
            env.jobs.remove_by_pid(pid);
            ExitStatus::SUCCESS
        }
        Err(errno) => {
            env.print_error(&SystemError::new("kill", errno));
            ExitStatus::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smash_env::job::Job;
    use smash_env::job::ProcessState;
    use smash_env_test_helper::{assert_stderr, assert_stdout, spawn_child, virtual_env};

    fn args(args: &[&str]) -> Vec<String> {
        args.iter().map(|arg| arg.to_string()).collect()
    }

    #[test]
    fn signal_operands() {
        assert_eq!(parse_signal("-9"), Some(Signal::SIGKILL));
        assert_eq!(parse_signal("-19"), Some(Signal::SIGSTOP));
        assert_eq!(parse_signal("9"), None);
        assert_eq!(parse_signal("-0"), None);
        assert_eq!(parse_signal("-KILL"), None);
        assert_eq!(parse_signal("-999"), None);
        assert_eq!(parse_signal("-"), None);
    }

    #[test]
    fn invalid_arguments() {
        let (mut env, system) = virtual_env();
        let now = env.system.now();
        env.jobs.add(Job::new(spawn_child(&system), "sleep 1 &", now));
        let cases: [&[&str]; 5] = [&["1"], &["9", "1"], &["-9", "x"], &["-9", "1", "2"], &[]];
        for operands in cases {
            assert_eq!(
                resolve(&env, &args(operands)),
                Err(Error::InvalidArguments),
                "{operands:?}"
            );
        }
    }

    #[test]
    fn missing_job() {
        let (env, _system) = virtual_env();
        assert_eq!(resolve(&env, &args(&["-9", "3"])), Err(Error::NoSuchJob(3)));
        assert_eq!(Error::NoSuchJob(3).to_string(), "job-id 3 does not exist");
    }

    #[test]
    fn signal_is_sent_and_job_removed() {
        let (mut env, system) = virtual_env();
        let pid = spawn_child(&system);
        let now = env.system.now();
        env.jobs.add(Job::new(pid, "sleep 100 &", now));

        let command = resolve(&env, &args(&["-9", "1"])).unwrap();
        assert_eq!(execute(&mut env, &command), ExitStatus::SUCCESS);

        assert!(env.jobs.is_empty());
        assert_stdout(&system.state, |stdout| {
            assert_eq!(stdout, format!("signal number 9 was sent to pid {pid}\n"))
        });
        assert_eq!(
            system.state.borrow().processes[&pid].state(),
            ProcessState::Signaled {
                signal: Signal::SIGKILL,
                core_dump: false
            }
        );
    }

    #[test]
    fn process_gone_before_signal() {
        let (mut env, system) = virtual_env();
        let ghost = Pid::from_raw(88);
        let now = env.system.now();
        env.jobs.add(Job::new(ghost, "ghost &", now));

        let command = resolve(&env, &args(&["-15", "1"])).unwrap();
        assert_eq!(execute(&mut env, &command), ExitStatus::FAILURE);
        assert_eq!(env.jobs.len(), 1);
        assert_stderr(&system.state, |stderr| {
            assert!(stderr.starts_with("smash error: kill failed: "), "{stderr}")
        });
    }
}
