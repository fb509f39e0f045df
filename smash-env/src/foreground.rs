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

//! Foreground process tracking
//!
//! While a command runs in the foreground, the shell records the process in
//! the [`ForegroundSlot`] of the environment so that the
//! [signal bridge](crate::signal) knows which process to interrupt or
//! suspend. The slot is empty while the shell is reading a command.

use crate::Env;
use crate::job::Job;
use crate::job::Pid;
use crate::job::ProcessState;
use crate::semantics::ExitStatus;
use crate::signal::resolve_caught_signals;
use crate::system::Errno;
use crate::system::SystemError;
use std::time::Instant;

/// Process occupying the terminal
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Foreground {
    pub pid: Pid,
    /// Command line the process was started with
    pub name: String,
    pub started: Instant,
}

impl Foreground {
    pub fn new<N: Into<String>>(pid: Pid, name: N, started: Instant) -> Self {
        let name = name.into();
        Foreground { pid, name, started }
    }

    /// Converts this foreground process into a job stopped at `now`.
    pub fn into_stopped_job(self, now: Instant) -> Job {
        let mut job = Job::new(self.pid, self.name, self.started);
        job.stop(now);
        job
    }
}

/// Holder of at most one foreground process
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ForegroundSlot(Option<Foreground>);

impl ForegroundSlot {
    /// Records the process as the foreground process.
    ///
    /// Any previously recorded process is replaced.
    pub fn install(&mut self, foreground: Foreground) {
        tracing::trace!(pid = %foreground.pid, "foreground process installed");
        self.0 = Some(foreground);
    }

    /// Clears the slot, returning the process that was in it.
    pub fn take(&mut self) -> Option<Foreground> {
        self.0.take()
    }

    pub fn get(&self) -> Option<&Foreground> {
        self.0.as_ref()
    }

    pub fn pid(&self) -> Option<Pid> {
        self.0.as_ref().map(|foreground| foreground.pid)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_none()
    }
}

/// Waits for the foreground process to exit or stop.
///
/// The process should have been installed in the foreground slot. This
/// function blocks until the process exits, is killed, or stops. Signals
/// caught while waiting are resolved as they interrupt the wait, so the
/// interrupt and stop signals from the terminal take effect on the process
/// during the wait.
///
/// When the process stops while it is still in the slot, it becomes a stopped
/// job. When the wait completes, the slot is empty.
///
/// The result is the exit status of the process, or the signal number plus
/// 128 if the process was killed or stopped.
pub fn wait_for_foreground(env: &mut Env, pid: Pid) -> Result<ExitStatus, SystemError> {
    loop {
        match env.system.wait(pid, true) {
            Ok(None) | Ok(Some((_, ProcessState::Running))) => (),
            Ok(Some((pid, state))) => {
                env.apply_foreground_state(pid, state);
                tracing::debug!(%pid, ?state, "foreground process no longer running");
                return Ok(state.to_exit_status().unwrap_or_default());
            }
            Err(Errno::EINTR) => resolve_caught_signals(env),
            Err(errno) => {
                if env.foreground.pid() == Some(pid) {
                    env.foreground.take();
                }
                return Err(SystemError::new("waitpid", errno));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::VirtualSystem;
    use crate::job::JobState;
    use crate::signal::SignalHandling;
    use crate::system::Signal;
    use crate::system::System;
    use crate::system::r#virtual::Process;

    fn start(system: &VirtualSystem, env: &mut Env, name: &str) -> Pid {
        let pid = {
            let mut state = system.state.borrow_mut();
            let pid = state.allocate_pid();
            state
                .processes
                .insert(pid, Process::with_parent(system.process_id));
            pid
        };
        let now = env.system.now();
        env.foreground.install(Foreground::new(pid, name, now));
        pid
    }

    #[test]
    fn exited_process() {
        let system = VirtualSystem::new();
        let mut env = Env::with_system(Box::new(system.clone()));
        let pid = start(&system, &mut env, "false");
        system
            .state
            .borrow_mut()
            .processes
            .get_mut(&pid)
            .unwrap()
            .set_state(ProcessState::exited(1));

        let result = wait_for_foreground(&mut env, pid);
        assert_eq!(result, Ok(ExitStatus::FAILURE));
        assert!(env.foreground.is_empty());
        assert!(env.jobs.is_empty());
    }

    #[test]
    fn process_stopped_by_other_means_becomes_job() {
        let system = VirtualSystem::new();
        let mut env = Env::with_system(Box::new(system.clone()));
        let pid = start(&system, &mut env, "vi notes");
        system
            .state
            .borrow_mut()
            .processes
            .get_mut(&pid)
            .unwrap()
            .set_state(ProcessState::Stopped(Signal::SIGTTIN));

        let result = wait_for_foreground(&mut env, pid);
        assert_eq!(result, Ok(ExitStatus::from(Signal::SIGTTIN)));
        assert!(env.foreground.is_empty());
        let job = env.jobs.find_by_pid(pid).unwrap();
        assert_eq!(job.state, JobState::Stopped);
        assert_eq!(job.name, "vi notes");
    }

    #[test]
    fn interrupt_during_wait_kills_process() {
        let system = VirtualSystem::new();
        let mut env = Env::with_system(Box::new(system.clone()));
        let pid = start(&system, &mut env, "sleep 100");
        env.system
            .sigaction(Signal::SIGINT, SignalHandling::Catch)
            .unwrap();
        let shell = system.process_id;
        env.system.kill(shell, Some(Signal::SIGINT)).unwrap();

        let result = wait_for_foreground(&mut env, pid);
        assert_eq!(result, Ok(ExitStatus::from(Signal::SIGKILL)));
        assert!(env.foreground.is_empty());
        assert!(env.jobs.is_empty());
        assert!(!system.state.borrow().processes.contains_key(&pid));
    }

    #[test]
    fn suspend_during_wait_creates_single_job() {
        let system = VirtualSystem::new();
        let mut env = Env::with_system(Box::new(system.clone()));
        let pid = start(&system, &mut env, "sleep 100");
        env.system
            .sigaction(Signal::SIGTSTP, SignalHandling::Catch)
            .unwrap();
        let shell = system.process_id;
        env.system.kill(shell, Some(Signal::SIGTSTP)).unwrap();

        let result = wait_for_foreground(&mut env, pid);
        assert_eq!(result, Ok(ExitStatus::from(Signal::SIGSTOP)));
        assert!(env.foreground.is_empty());
        assert_eq!(env.jobs.len(), 1);
        assert_eq!(env.jobs.find_by_pid(pid).unwrap().state, JobState::Stopped);
    }

    #[test]
    fn wait_failure_clears_slot() {
        let mut env = Env::new_virtual();
        let pid = Pid::from_raw(50);
        let now = env.system.now();
        env.foreground.install(Foreground::new(pid, "ghost", now));

        let result = wait_for_foreground(&mut env, pid);
        assert_eq!(result, Err(SystemError::new("waitpid", Errno::ECHILD)));
        assert!(env.foreground.is_empty());
    }
}
