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

//! Type definitions for job management.
//!
//! A [`Job`] is a process started by the shell that runs without occupying
//! the terminal: either launched in the background or stopped while it was in
//! the foreground. The shell keeps its jobs in a [`JobList`], which assigns
//! each job a [`JobId`].

use crate::semantics::ExitStatus;
use crate::system::Signal;
use std::collections::BTreeMap;
use std::collections::btree_map::IntoValues;
use std::time::Instant;

#[doc(no_inline)]
pub use nix::unistd::Pid;

pub mod fmt;
pub mod id;

pub use self::id::JobId;

/// Execution state of a process, as observed by waiting for it
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ProcessState {
    /// The process is running.
    Running,
    /// The process has been stopped by the signal.
    Stopped(Signal),
    /// The process has exited with the exit status.
    Exited(ExitStatus),
    /// The process has been terminated by the signal.
    Signaled { signal: Signal, core_dump: bool },
}

impl ProcessState {
    /// Creates a `ProcessState::Exited` with the exit status.
    pub fn exited<S: Into<ExitStatus>>(exit_status: S) -> Self {
        Self::Exited(exit_status.into())
    }

    /// Whether the process is not yet terminated
    pub fn is_alive(&self) -> bool {
        match self {
            ProcessState::Running | ProcessState::Stopped(_) => true,
            ProcessState::Exited(_) | ProcessState::Signaled { .. } => false,
        }
    }

    /// Whether the process is stopped
    pub fn is_stopped(&self) -> bool {
        matches!(self, ProcessState::Stopped(_))
    }

    /// Returns the exit status the shell assigns to a command that ended in
    /// this state.
    ///
    /// Returns `None` if the process is running.
    pub fn to_exit_status(&self) -> Option<ExitStatus> {
        match *self {
            ProcessState::Running => None,
            ProcessState::Exited(exit_status) => Some(exit_status),
            ProcessState::Stopped(signal) | ProcessState::Signaled { signal, .. } => {
                Some(ExitStatus::from(signal))
            }
        }
    }
}

/// State of a job as presented to the user
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum JobState {
    #[default]
    Running,
    Stopped,
}

/// Set of one or more processes executing a command
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Job {
    /// Job ID
    ///
    /// This value is assigned by [`JobList::add`]; the value passed in is
    /// ignored.
    pub id: JobId,

    /// Process ID of the process representing the job
    ///
    /// The process is also the leader of the process group of the job.
    pub pid: Pid,

    /// Command line the job was started with
    pub name: String,

    /// When the job was started
    pub started: Instant,

    /// When the job was stopped, if it is stopped
    pub stopped_at: Option<Instant>,

    /// Current state of the job
    pub state: JobState,
}

impl Job {
    /// Creates a new running job.
    pub fn new<N: Into<String>>(pid: Pid, name: N, started: Instant) -> Self {
        Job {
            id: JobId::FIRST,
            pid,
            name: name.into(),
            started,
            stopped_at: None,
            state: JobState::Running,
        }
    }

    /// Marks the job as stopped at the given time.
    ///
    /// If the job is already stopped, the original stop time is kept.
    pub fn stop(&mut self, now: Instant) {
        if self.state != JobState::Stopped {
            self.state = JobState::Stopped;
            self.stopped_at = Some(now);
        }
    }

    /// Marks the job as running.
    pub fn resume(&mut self) {
        self.state = JobState::Running;
        self.stopped_at = None;
    }

    /// Returns the number of whole seconds the job has been running.
    ///
    /// For a stopped job, the elapsed time is measured up to the moment it
    /// stopped.
    pub fn elapsed_secs(&self, now: Instant) -> u64 {
        let end = self.stopped_at.unwrap_or(now);
        end.saturating_duration_since(self.started).as_secs()
    }
}

/// Collection of jobs, ordered by job ID
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct JobList {
    jobs: BTreeMap<JobId, Job>,
}

impl JobList {
    /// Adds a job to this job list.
    ///
    /// The job is given a job ID one larger than the largest ID in the list,
    /// or 1 if the list is empty. Any existing job with the same process ID is
    /// removed first, so at most one job refers to a process.
    ///
    /// Returns the ID assigned to the job.
    pub fn add(&mut self, mut job: Job) -> JobId {
        self.remove_by_pid(job.pid);
        let id = self.jobs.keys().next_back().map_or(JobId::FIRST, JobId::next);
        job.id = id;
        self.jobs.insert(id, job);
        id
    }

    /// Removes the job with the ID.
    pub fn remove(&mut self, id: JobId) -> Option<Job> {
        self.jobs.remove(&id)
    }

    /// Removes the job with the process ID.
    pub fn remove_by_pid(&mut self, pid: Pid) -> Option<Job> {
        let id = self.find_by_pid(pid)?.id;
        self.jobs.remove(&id)
    }

    /// Returns the job with the ID.
    pub fn get(&self, id: JobId) -> Option<&Job> {
        self.jobs.get(&id)
    }

    /// Returns the job with the ID.
    pub fn get_mut(&mut self, id: JobId) -> Option<&mut Job> {
        self.jobs.get_mut(&id)
    }

    /// Returns the job with the process ID.
    pub fn find_by_pid(&self, pid: Pid) -> Option<&Job> {
        self.jobs.values().find(|job| job.pid == pid)
    }

    fn find_by_pid_mut(&mut self, pid: Pid) -> Option<&mut Job> {
        self.jobs.values_mut().find(|job| job.pid == pid)
    }

    /// Returns the job with the largest ID.
    pub fn last(&self) -> Option<&Job> {
        self.jobs.values().next_back()
    }

    /// Returns the stopped job with the largest ID.
    pub fn last_stopped(&self) -> Option<&Job> {
        self.jobs
            .values()
            .rev()
            .find(|job| job.state == JobState::Stopped)
    }

    /// Applies an observed process state to the job with the process ID.
    ///
    /// A terminated process's job is removed. A stopped process's job is
    /// marked stopped at `now`, and a running process's job is marked running.
    /// Nothing happens if no job has the process ID.
    pub fn update_state(&mut self, pid: Pid, state: ProcessState, now: Instant) {
        match state {
            ProcessState::Exited(_) | ProcessState::Signaled { .. } => {
                self.remove_by_pid(pid);
            }
            ProcessState::Stopped(_) => {
                if let Some(job) = self.find_by_pid_mut(pid) {
                    job.stop(now);
                }
            }
            ProcessState::Running => {
                if let Some(job) = self.find_by_pid_mut(pid) {
                    job.resume();
                }
            }
        }
    }

    /// Returns an iterator over the jobs in ascending order of job ID.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Job> + '_ {
        self.jobs.values()
    }

    /// Removes all jobs, returning them in ascending order of job ID.
    pub fn drain(&mut self) -> IntoValues<JobId, Job> {
        std::mem::take(&mut self.jobs).into_values()
    }

    /// Returns the number of jobs.
    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    /// Whether the list has no jobs
    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }
}
