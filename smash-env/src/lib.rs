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

//! This crate defines the execution context of smash.
//!
//! The context, [`Env`], owns every piece of state the job-control engine
//! shares between its components: the [job list](job::JobList), the
//! [foreground slot](foreground::ForegroundSlot), the [command
//! history](history::History), and the interface to the underlying operating
//! system, [`System`].
//!
//! [`RealSystem`] implements `System` by actually calling the operating
//! system. [`VirtualSystem`] simulates processes, file descriptors, and
//! signals in memory so that the rest of the shell can be tested without
//! forking.

pub mod foreground;
pub mod history;
pub mod input;
pub mod io;
pub mod job;
pub mod semantics;
pub mod signal;
pub mod system;

use self::foreground::ForegroundSlot;
use self::history::History;
use self::io::Fd;
use self::job::Job;
use self::job::JobList;
use self::job::Pid;
use self::job::ProcessState;
use self::job::fmt::Report;
use self::semantics::ExitStatus;
use self::system::ANY_CHILD;
use self::system::ChildProcessTask;
use self::system::Errno;
use self::system::Signal;
use self::system::SystemError;
use std::fmt::Display;
use std::path::PathBuf;

#[doc(no_inline)]
pub use self::system::System;
#[doc(no_inline)]
pub use self::system::real::RealSystem;
#[doc(no_inline)]
pub use self::system::r#virtual::VirtualSystem;

/// Whole execution context of the shell.
///
/// There is exactly one `Env` in a shell process. Components receive it by
/// mutable reference; nothing else in the process holds shell state except
/// the signal slots written by the signal-catching function of
/// [`RealSystem`].
#[derive(Debug)]
pub struct Env {
    /// Exit status of the last executed command.
    pub exit_status: ExitStatus,

    /// Background and stopped jobs.
    pub jobs: JobList,

    /// Process currently occupying the terminal.
    pub foreground: ForegroundSlot,

    /// Command lines submitted to the shell.
    pub history: History,

    /// Previous working directory, used by `cd -`.
    pub old_pwd: Option<PathBuf>,

    /// Whether this environment runs in a forked child of the main shell.
    ///
    /// A subshell does not catch the interrupt and stop signals and does not
    /// create new process groups for the processes it starts. The group of
    /// the subshell itself represents the whole job.
    pub is_subshell: bool,

    /// Interface to the system-managed parts of the environment.
    pub system: Box<dyn System>,
}

impl Env {
    /// Creates a new environment with the given system.
    pub fn with_system(system: Box<dyn System>) -> Env {
        Env {
            exit_status: ExitStatus::default(),
            jobs: JobList::default(),
            foreground: ForegroundSlot::default(),
            history: History::default(),
            old_pwd: None,
            is_subshell: false,
            system,
        }
    }

    /// Creates a new environment with a default-constructed [`VirtualSystem`].
    pub fn new_virtual() -> Env {
        Env::with_system(Box::new(VirtualSystem::new()))
    }

    /// Prints the text to the standard output.
    ///
    /// Errors writing to the standard output are ignored.
    pub fn print(&mut self, text: &str) {
        if let Err(errno) = self.system.write_all(Fd::STDOUT, text.as_bytes()) {
            tracing::debug!(%errno, "cannot write to the standard output");
        }
    }

    /// Prints an error message to the standard error.
    ///
    /// The message is prefixed with `smash error: ` and terminated with a
    /// newline. Errors writing to the standard error are ignored.
    pub fn print_error<M: Display + ?Sized>(&mut self, message: &M) {
        let message = format!("smash error: {message}\n");
        if let Err(errno) = self.system.write_all(Fd::STDERR, message.as_bytes()) {
            tracing::debug!(%errno, "cannot write to the standard error");
        }
    }

    /// Starts a subshell.
    ///
    /// This function creates a new child process in which the argument
    /// function is run. The function's return value becomes the exit status
    /// of the child process. In the parent, this function returns the child's
    /// process ID without waiting for the child.
    ///
    /// The child starts with [`enter_subshell`](Self::enter_subshell) applied
    /// to its copy of the environment.
    pub fn start_subshell<F>(&mut self, f: F) -> Result<Pid, SystemError>
    where
        F: FnOnce(&mut Env) -> ExitStatus + 'static,
    {
        let starter = self
            .system
            .new_child_process()
            .map_err(|errno| SystemError::new("fork", errno))?;
        let task: ChildProcessTask = Box::new(move |env| {
            env.enter_subshell();
            f(env)
        });
        Ok(starter(self, task))
    }

    /// Turns this environment into that of a subshell.
    ///
    /// The subshell keeps its copy of the job list so that built-ins like
    /// `jobs` report the parent's jobs, but the foreground slot is cleared.
    /// The interrupt and stop signals get their default dispositions back.
    pub fn enter_subshell(&mut self) {
        let was_subshell = self.is_subshell;
        self.is_subshell = true;
        self.foreground.take();
        if !was_subshell {
            signal::restore_default_handlers(self);
        }
    }

    /// Removes jobs whose processes have finished.
    ///
    /// This function performs a non-blocking wait for each job. Jobs whose
    /// process has exited or was killed are removed. Jobs whose process is no
    /// longer a child of the shell are removed as well. A newly observed stop
    /// marks the job as stopped; a newly observed continuation marks it as
    /// running.
    pub fn reap_finished_jobs(&mut self) {
        let pids: Vec<Pid> = self.jobs.iter().map(|job| job.pid).collect();
        let now = self.system.now();
        for pid in pids {
            match self.system.wait(pid, false) {
                Ok(None) => (),
                Ok(Some((_, state))) => {
                    if !state.is_alive() {
                        tracing::debug!(%pid, ?state, "reaped finished job");
                    }
                    self.jobs.update_state(pid, state, now);
                }
                Err(Errno::ECHILD) => {
                    tracing::debug!(%pid, "job is no longer a child process");
                    self.jobs.remove_by_pid(pid);
                }
                Err(errno) => {
                    tracing::warn!(%pid, %errno, "cannot check the job status");
                }
            }
        }

        // Collect children that no job refers to any longer.
        while let Ok(Some((pid, state))) = self.system.wait(ANY_CHILD, false) {
            tracing::debug!(%pid, ?state, "collected child outside the job scan");
            self.jobs.update_state(pid, state, now);
        }
    }

    /// Kills all jobs and clears the job list.
    ///
    /// Each job receives `SIGKILL` and is reported as `<pid>: <command>` on
    /// the standard output. A job that cannot be signaled is reported as a
    /// system error.
    pub fn kill_all_jobs(&mut self) {
        let jobs: Vec<Job> = self.jobs.drain().collect();
        let now = self.system.now();
        for job in jobs {
            tracing::info!(pid = %job.pid, name = %job.name, "killing job");
            match self.system.kill(job.pid, Some(Signal::SIGKILL)) {
                Ok(()) => {
                    let report = Report::new(&job, now);
                    self.print(&format!("{report:#}\n"));
                }
                Err(errno) => self.print_error(&SystemError::new("kill", errno)),
            }
        }
    }

    /// Records a state change of the foreground process.
    ///
    /// This is called with the result of waiting for the process in the
    /// foreground slot. If the process has stopped while it is still in the
    /// slot (that is, it was not suspended by the stop signal handled by the
    /// shell), the process becomes a stopped job. If the process has finished,
    /// the slot is cleared. A running state is ignored.
    pub fn apply_foreground_state(&mut self, pid: Pid, state: ProcessState) {
        match state {
            ProcessState::Running => (),
            ProcessState::Stopped(_) => {
                if self.foreground.pid() == Some(pid) {
                    if let Some(foreground) = self.foreground.take() {
                        let now = self.system.now();
                        let id = self.jobs.add(foreground.into_stopped_job(now));
                        tracing::debug!(%pid, %id, "foreground process stopped");
                    }
                }
            }
            ProcessState::Exited(_) | ProcessState::Signaled { .. } => {
                if self.foreground.pid() == Some(pid) {
                    self.foreground.take();
                }
                self.jobs.remove_by_pid(pid);
            }
        }
    }
}
