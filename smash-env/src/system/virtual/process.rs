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

//! Processes in the virtual system

use super::super::Signal;
use super::file_system::FdBody;
use crate::io::Fd;
use crate::job::Pid;
use crate::job::ProcessState;
use crate::signal::SignalHandling;
use std::collections::BTreeMap;

/// Process in the virtual system
#[derive(Clone, Debug)]
pub struct Process {
    ppid: Pid,
    pgid: Pid,
    state: ProcessState,
    state_has_changed: bool,
    fds: BTreeMap<Fd, FdBody>,
    signal_handlings: BTreeMap<Signal, SignalHandling>,
    /// Signals the process has caught and not yet examined
    pub caught_signals: Vec<Signal>,
}

impl Process {
    /// Creates a new running process in the given process group.
    pub fn with_parent_and_group(ppid: Pid, pgid: Pid) -> Process {
        Process {
            ppid,
            pgid,
            state: ProcessState::Running,
            state_has_changed: false,
            fds: BTreeMap::new(),
            signal_handlings: BTreeMap::new(),
            caught_signals: Vec::new(),
        }
    }

    /// Creates a new running process in the process group of the parent.
    ///
    /// The parent's process ID is used as the process group ID.
    pub fn with_parent(ppid: Pid) -> Process {
        Self::with_parent_and_group(ppid, ppid)
    }

    /// Returns the process ID of the parent process.
    pub fn ppid(&self) -> Pid {
        self.ppid
    }

    /// Returns the process group ID of this process.
    pub fn pgid(&self) -> Pid {
        self.pgid
    }

    pub(super) fn set_pgid(&mut self, pgid: Pid) {
        self.pgid = pgid;
    }

    /// Returns the current state of the process.
    pub fn state(&self) -> ProcessState {
        self.state
    }

    /// Changes the state of the process.
    ///
    /// A change is remembered until the parent observes it by waiting. Returns
    /// true if the state actually changed.
    pub fn set_state(&mut self, state: ProcessState) -> bool {
        let changed = self.state != state;
        if changed {
            self.state = state;
            self.state_has_changed = true;
        }
        changed
    }

    /// Returns the state if it has changed since the last call.
    pub fn take_state_change(&mut self) -> Option<ProcessState> {
        std::mem::take(&mut self.state_has_changed).then_some(self.state)
    }

    /// Returns the FD body for the FD.
    pub fn get_fd(&self, fd: Fd) -> Option<&FdBody> {
        self.fds.get(&fd)
    }

    /// Returns the FDs open in this process.
    pub fn fds(&self) -> &BTreeMap<Fd, FdBody> {
        &self.fds
    }

    /// Assigns the FD body to the FD, returning the previous body.
    pub fn set_fd(&mut self, fd: Fd, body: FdBody) -> Option<FdBody> {
        self.fds.insert(fd, body)
    }

    /// Assigns the FD body to the minimum unused FD not less than `min_fd`.
    pub fn open_fd_ge(&mut self, min_fd: Fd, body: FdBody) -> Fd {
        let mut fd = min_fd;
        while self.fds.contains_key(&fd) {
            fd = Fd(fd.0 + 1);
        }
        self.fds.insert(fd, body);
        fd
    }

    /// Removes the FD.
    pub fn close_fd(&mut self, fd: Fd) -> Option<FdBody> {
        self.fds.remove(&fd)
    }

    /// Returns how the signal is handled.
    pub fn signal_handling(&self, signal: Signal) -> SignalHandling {
        self.signal_handlings
            .get(&signal)
            .copied()
            .unwrap_or_default()
    }

    /// Sets how the signal is handled, returning the previous handling.
    pub fn set_signal_handling(
        &mut self,
        signal: Signal,
        handling: SignalHandling,
    ) -> SignalHandling {
        self.signal_handlings
            .insert(signal, handling)
            .unwrap_or_default()
    }

    /// Delivers the signal to the process.
    ///
    /// The effect of the signal depends on its current handling. A caught
    /// signal is appended to [`caught_signals`](Self::caught_signals). The
    /// default action stops, continues, or terminates the process. `SIGKILL`
    /// and `SIGSTOP` cannot be caught or ignored.
    pub fn raise_signal(&mut self, signal: Signal) {
        if !self.state.is_alive() {
            return;
        }

        let handling = match signal {
            Signal::SIGKILL | Signal::SIGSTOP => SignalHandling::Default,
            _ => self.signal_handling(signal),
        };
        if signal == Signal::SIGCONT && self.state.is_stopped() {
            self.set_state(ProcessState::Running);
        }
        match handling {
            SignalHandling::Ignore => (),
            SignalHandling::Catch => {
                if !self.caught_signals.contains(&signal) {
                    self.caught_signals.push(signal);
                }
            }
            SignalHandling::Default => match signal {
                Signal::SIGCONT | Signal::SIGCHLD | Signal::SIGURG | Signal::SIGWINCH => (),
                Signal::SIGSTOP | Signal::SIGTSTP | Signal::SIGTTIN | Signal::SIGTTOU => {
                    if self.state == ProcessState::Running {
                        self.set_state(ProcessState::Stopped(signal));
                    }
                }
                _ => {
                    let core_dump = false;
                    self.set_state(ProcessState::Signaled { signal, core_dump });
                }
            },
        }
    }
}
