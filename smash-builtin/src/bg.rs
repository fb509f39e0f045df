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

//! Bg built-in
//!
//! The bg built-in resumes a stopped job in the background. Without an
//! operand, the stopped job with the largest job ID is selected. A job that
//! is already running cannot be selected.
//!
//! The built-in prints the job as `<pid>: <command>`, sends `SIGCONT` to it,
//! and marks it as running. The job keeps its job ID.

use crate::common::find_job;
use crate::common::parse_job_number;
use smash_env::Env;
use smash_env::job::Job;
use smash_env::job::JobId;
use smash_env::job::JobState;
use smash_env::job::fmt::Report;
use smash_env::semantics::ExitStatus;
use smash_env::system::Signal;
use smash_env::system::SystemError;
use thiserror::Error;

/// Bg built-in with the target job resolved
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Command {
    /// Job as it was when the built-in was resolved
    pub job: Job,
}

/// Error in resolving the bg built-in
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum Error {
    #[error("there is no stopped jobs to resume")]
    NoStoppedJob,
    #[error("job-id {0} does not exist")]
    NoSuchJob(usize),
    #[error("job-id {0} is already running in the background")]
    AlreadyRunning(JobId),
    #[error("invalid arguments")]
    InvalidArguments,
}

/// Selects the job to resume.
pub fn resolve(env: &Env, args: &[String]) -> Result<Command, Error> {
    let job = match args {
        [] => env.jobs.last_stopped().ok_or(Error::NoStoppedJob)?,
        [operand] => {
            let number = parse_job_number(operand).ok_or(Error::InvalidArguments)?;
            let job = find_job(env, number).ok_or(Error::NoSuchJob(number))?;
            if job.state == JobState::Running {
                return Err(Error::AlreadyRunning(job.id));
            }
            job
        }
        _ => return Err(Error::InvalidArguments),
    };
    let job = job.clone();
    Ok(Command { job })
}

/// Executes the bg built-in.
pub fn execute(env: &mut Env, command: &Command) -> ExitStatus {
    let job = &command.job;
    let now = env.system.now();
    env.print(&format!("{:#}\n", Report::new(job, now)));

    if let Err(errno) = env.system.kill(job.pid, Some(Signal::SIGCONT)) {
        env.print_error(&SystemError::new("kill", errno));
        return ExitStatus::FAILURE;
    }

    match env.jobs.get_mut(job.id) {
        Some(current) if current.pid == job.pid => current.resume(),
        _ => tracing::debug!(pid = %job.pid, "resumed job is no longer in the job list"),
    }
    ExitStatus::SUCCESS
}
