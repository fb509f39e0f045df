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

//! Implementation of `System` that actually interacts with the system.

use super::ChildProcessStarter;
use super::Errno;
use super::OpenMode;
use super::Result;
use super::Signal;
use super::System;
use crate::io::Fd;
use crate::job::Pid;
use crate::job::ProcessState;
use crate::signal::SignalHandling;
use nix::sys::signal::SaFlags;
use nix::sys::signal::SigAction;
use nix::sys::signal::SigHandler;
use nix::sys::signal::SigSet;
use nix::sys::wait::WaitPidFlag;
use nix::sys::wait::WaitStatus;
use std::convert::Infallible;
use std::ffi::CStr;
use std::ffi::CString;
use std::ffi::c_int;
use std::ffi::c_uint;
use std::path::Path;
use std::path::PathBuf;
use std::sync::atomic::AtomicIsize;
use std::sync::atomic::Ordering;
use std::sync::atomic::compiler_fence;
use std::time::Instant;

/// Signals the shell catches, masked while the catching function runs
const CAUGHT_SIGNAL_MASK: [Signal; 2] = [Signal::SIGINT, Signal::SIGTSTP];

/// Permission bits of a file created by redirection
const CREATION_MODE: c_uint = 0o644;

static CAUGHT_SIGNALS: [AtomicIsize; 8] = {
    // In the array creation, the repeat operand must be const.
    #[allow(clippy::declare_interior_mutable_const)]
    const SIGNAL_SLOT: AtomicIsize = AtomicIsize::new(0);
    [SIGNAL_SLOT; 8]
};

/// Signal catching function.
///
/// The function records the signal number in the first free slot of
/// `CAUGHT_SIGNALS`. The shell examines the slots later, outside the signal
/// handler, in [`RealSystem::caught_signals`].
extern "C" fn catch_signal(signal: c_int) {
    // This function can only perform async-signal-safe operations.

    // If there is a slot having a value of the signal already, do nothing.
    // If there is no available slot, the signal will be lost!
    let signal = signal as isize;
    for slot in &CAUGHT_SIGNALS {
        match slot.compare_exchange(0, signal, Ordering::Relaxed, Ordering::Relaxed) {
            Ok(_) => break,
            Err(slot_value) if slot_value == signal => break,
            _ => continue,
        }
    }
}

fn retry_on_eintr<T, F: FnMut() -> Result<T>>(mut f: F) -> Result<T> {
    loop {
        match f() {
            Err(Errno::EINTR) => (),
            result => return result,
        }
    }
}

/// Implementation of `System` that actually interacts with the system.
///
/// `RealSystem` is an empty `struct` because the underlying operating system
/// manages the system's internal state.
#[derive(Debug)]
pub struct RealSystem(());

impl RealSystem {
    /// Returns an instance of `RealSystem`.
    ///
    /// # Safety
    ///
    /// This function is marked `unsafe` because improper use of `RealSystem`
    /// may lead to undefined behavior. You should never use `RealSystem` in a
    /// multi-threaded program, and it is your responsibility to make sure you
    /// are using only one instance of `RealSystem` in the process.
    pub unsafe fn new() -> Self {
        RealSystem(())
    }
}

impl System for RealSystem {
    fn getpid(&self) -> Pid {
        nix::unistd::getpid()
    }

    fn now(&self) -> Instant {
        Instant::now()
    }

    fn pipe(&mut self) -> Result<(Fd, Fd)> {
        let mut fds = [0 as c_int; 2];
        let result = unsafe { libc::pipe(fds.as_mut_ptr()) };
        Errno::result(result)?;
        Ok((Fd(fds[0]), Fd(fds[1])))
    }

    fn dup(&mut self, from: Fd, to_min: Fd, cloexec: bool) -> Result<Fd> {
        let command = if cloexec {
            libc::F_DUPFD_CLOEXEC
        } else {
            libc::F_DUPFD
        };
        let result = unsafe { libc::fcntl(from.0, command, to_min.0) };
        Errno::result(result).map(Fd)
    }

    fn dup2(&mut self, from: Fd, to: Fd) -> Result<Fd> {
        retry_on_eintr(|| Errno::result(unsafe { libc::dup2(from.0, to.0) }).map(Fd))
    }

    fn open(&mut self, path: &CStr, mode: OpenMode) -> Result<Fd> {
        let flags = libc::O_WRONLY
            | libc::O_CREAT
            | libc::O_CLOEXEC
            | match mode {
                OpenMode::Truncate => libc::O_TRUNC,
                OpenMode::Append => libc::O_APPEND,
            };
        retry_on_eintr(|| {
            let result = unsafe { libc::open(path.as_ptr(), flags, CREATION_MODE) };
            Errno::result(result).map(Fd)
        })
    }

    fn close(&mut self, fd: Fd) -> Result<()> {
        loop {
            let result = unsafe { libc::close(fd.0) };
            match Errno::result(result) {
                Ok(_) | Err(Errno::EBADF) => return Ok(()),
                Err(Errno::EINTR) => continue,
                Err(errno) => return Err(errno),
            }
        }
    }

    fn read(&mut self, fd: Fd, buffer: &mut [u8]) -> Result<usize> {
        let result = unsafe { libc::read(fd.0, buffer.as_mut_ptr().cast(), buffer.len()) };
        Errno::result(result).map(|count| count as usize)
    }

    fn write(&mut self, fd: Fd, buffer: &[u8]) -> Result<usize> {
        retry_on_eintr(|| {
            let result = unsafe { libc::write(fd.0, buffer.as_ptr().cast(), buffer.len()) };
            Errno::result(result).map(|count| count as usize)
        })
    }

    fn sigaction(&mut self, signal: Signal, handling: SignalHandling) -> Result<SignalHandling> {
        let handler = match handling {
            SignalHandling::Default => SigHandler::SigDfl,
            SignalHandling::Ignore => SigHandler::SigIgn,
            SignalHandling::Catch => SigHandler::Handler(catch_signal),
        };
        let mut mask = SigSet::empty();
        for signal in CAUGHT_SIGNAL_MASK {
            mask.add(signal);
        }
        // Without SA_RESTART, a caught signal interrupts a blocking wait.
        let new_action = SigAction::new(handler, SaFlags::empty(), mask);
        // SAFETY: The `catch_signal` function only accesses atomic variables.
        let old_action = unsafe { nix::sys::signal::sigaction(signal, &new_action) }?;
        let old_handling = match old_action.handler() {
            SigHandler::SigDfl => SignalHandling::Default,
            SigHandler::SigIgn => SignalHandling::Ignore,
            SigHandler::Handler(_) | SigHandler::SigAction(_) => SignalHandling::Catch,
        };
        Ok(old_handling)
    }

    fn caught_signals(&mut self) -> Vec<Signal> {
        let mut signals = Vec::new();
        for slot in &CAUGHT_SIGNALS {
            // Need a fence to ensure we examine the slots in order.
            compiler_fence(Ordering::Acquire);

            let signal = slot.swap(0, Ordering::Relaxed);
            if signal == 0 {
                // The `catch_signal` function always fills the first unused
                // slot, so there is no more slot filled with a signal.
                break;
            }

            match Signal::try_from(signal as c_int) {
                Ok(signal) => signals.push(signal),
                Err(_) => tracing::warn!(signal, "caught an unknown signal"),
            }
        }
        signals
    }

    fn kill(&mut self, target: Pid, signal: Option<Signal>) -> Result<()> {
        nix::sys::signal::kill(target, signal)
    }

    fn setpgid(&mut self, pid: Pid, pgid: Pid) -> Result<()> {
        nix::unistd::setpgid(pid, pgid)
    }

    /// Creates a new child process.
    ///
    /// This implementation calls the `fork` system call and returns both in
    /// the parent and child process. In the parent, the returned starter
    /// ignores its arguments and returns the child process ID. In the child,
    /// the starter runs the task and exits the process.
    fn new_child_process(&mut self) -> Result<ChildProcessStarter> {
        use nix::unistd::ForkResult::*;
        // SAFETY: The shell is single-threaded, as required by RealSystem::new.
        match unsafe { nix::unistd::fork()? } {
            Parent { child } => Ok(Box::new(move |_env, _task| child)),
            Child => Ok(Box::new(|env, task| {
                let exit_status = task(env);
                std::process::exit(exit_status.0)
            })),
        }
    }

    fn wait(&mut self, target: Pid, blocking: bool) -> Result<Option<(Pid, ProcessState)>> {
        let mut options = WaitPidFlag::WUNTRACED | WaitPidFlag::WCONTINUED;
        if !blocking {
            options |= WaitPidFlag::WNOHANG;
        }
        let state = match nix::sys::wait::waitpid(target, Some(options))? {
            WaitStatus::Exited(pid, exit_status) => (pid, ProcessState::exited(exit_status)),
            WaitStatus::Signaled(pid, signal, core_dump) => {
                (pid, ProcessState::Signaled { signal, core_dump })
            }
            WaitStatus::Stopped(pid, signal) => (pid, ProcessState::Stopped(signal)),
            WaitStatus::Continued(pid) => (pid, ProcessState::Running),
            _ => return Ok(None),
        };
        Ok(Some(state))
    }

    fn execv(&mut self, path: &CStr, args: &[CString]) -> Result<Infallible> {
        retry_on_eintr(|| nix::unistd::execv(path, args))
    }

    fn getcwd(&self) -> Result<PathBuf> {
        nix::unistd::getcwd()
    }

    fn chdir(&mut self, path: &Path) -> Result<()> {
        nix::unistd::chdir(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catch_signal_fills_slots_without_duplicates() {
        catch_signal(libc::SIGINT);
        catch_signal(libc::SIGTSTP);
        catch_signal(libc::SIGINT);

        let mut system = unsafe { RealSystem::new() };
        assert_eq!(system.caught_signals(), [Signal::SIGINT, Signal::SIGTSTP]);
        assert!(system.caught_signals().is_empty());
    }
}
