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

//! API declarations and implementations for system-managed parts of the
//! environment
//!
//! This module defines the [`System`] trait, which provides an interface to
//! interact with the underlying system. The shell calls the operating system
//! only through this trait. Two implementations are provided:
//!
//! - [`RealSystem`] forwards each call to the operating system.
//! - [`VirtualSystem`] simulates the system in memory for testing.

pub mod real;
pub mod r#virtual;

use crate::Env;
use crate::io::Fd;
use crate::job::Pid;
use crate::job::ProcessState;
use crate::semantics::ExitStatus;
use crate::signal::SignalHandling;
use std::convert::Infallible;
use std::ffi::CStr;
use std::ffi::CString;
use std::fmt::Debug;
use std::path::Path;
use std::path::PathBuf;
use std::time::Instant;
use thiserror::Error;

#[doc(no_inline)]
pub use nix::errno::Errno;
#[doc(no_inline)]
pub use nix::sys::signal::Signal;
#[cfg(doc)]
use self::r#virtual::VirtualSystem;
#[cfg(doc)]
use self::real::RealSystem;

/// Result type returned by [`System`] methods
pub type Result<T> = nix::Result<T>;

/// Process ID that makes [`System::wait`] wait for any child process
pub const ANY_CHILD: Pid = Pid::from_raw(-1);

/// How a file is opened for output redirection
///
/// The file is opened write-only and created with mode 0644 if it does not
/// exist.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum OpenMode {
    /// Truncate the file to zero length.
    Truncate,
    /// Append to the end of the file.
    Append,
}

/// Task executed in a child process
pub type ChildProcessTask = Box<dyn FnOnce(&mut Env) -> ExitStatus>;

/// Abstract function that starts a child process
///
/// [`System::new_child_process`] returns a child process starter. In the
/// parent process, the starter ignores the task and returns the process ID of
/// the child. In the child process, the starter runs the task and exits the
/// process with the task's exit status, never returning.
pub type ChildProcessStarter = Box<dyn FnOnce(&mut Env, ChildProcessTask) -> Pid>;

/// Failure of a system call
///
/// The error message is in the form of `<call> failed: <OS error text>`.
#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
#[error("{call} failed: {}", .errno.desc())]
pub struct SystemError {
    /// Name of the system call that failed
    pub call: &'static str,
    /// Error number returned by the system call
    pub errno: Errno,
}

impl SystemError {
    pub fn new(call: &'static str, errno: Errno) -> Self {
        SystemError { call, errno }
    }
}

/// API to the system-managed parts of the environment
///
/// The methods are thin wrappers of the underlying system calls. They return
/// the error number of a failed call without reporting it; the caller decides
/// how to handle the failure.
pub trait System: Debug {
    /// Returns the process ID of the current process.
    #[must_use]
    fn getpid(&self) -> Pid;

    /// Returns the current time.
    #[must_use]
    fn now(&self) -> Instant;

    /// Creates an unnamed pipe.
    ///
    /// This is a thin wrapper around the `pipe` system call. If successful,
    /// returns the reading and writing ends of the pipe, in this order.
    fn pipe(&mut self) -> Result<(Fd, Fd)>;

    /// Duplicates a file descriptor.
    ///
    /// This is a thin wrapper around the `fcntl` system call that opens a new
    /// FD that shares the open file description with `from`. The new FD will
    /// be the minimum unused FD not less than `to_min`. If `cloexec` is true,
    /// the new FD has the close-on-exec flag set.
    fn dup(&mut self, from: Fd, to_min: Fd, cloexec: bool) -> Result<Fd>;

    /// Duplicates a file descriptor.
    ///
    /// This is a thin wrapper around the `dup2` system call. If successful,
    /// returns `Ok(to)`.
    fn dup2(&mut self, from: Fd, to: Fd) -> Result<Fd>;

    /// Opens a file for output.
    ///
    /// The new FD has the close-on-exec flag set.
    fn open(&mut self, path: &CStr, mode: OpenMode) -> Result<Fd>;

    /// Closes a file descriptor.
    ///
    /// This function returns `Ok(())` if the FD is already closed.
    fn close(&mut self, fd: Fd) -> Result<()>;

    /// Reads from the file descriptor.
    ///
    /// This is a thin wrapper around the `read` system call. An interrupted
    /// read returns `Err(Errno::EINTR)` so that the caller can resolve the
    /// caught signals.
    fn read(&mut self, fd: Fd, buffer: &mut [u8]) -> Result<usize>;

    /// Writes to the file descriptor.
    ///
    /// This is a thin wrapper around the `write` system call. An interrupted
    /// write is retried.
    fn write(&mut self, fd: Fd, buffer: &[u8]) -> Result<usize>;

    /// Writes the whole buffer to the file descriptor.
    fn write_all(&mut self, fd: Fd, mut buffer: &[u8]) -> Result<()> {
        while !buffer.is_empty() {
            match self.write(fd, buffer)? {
                0 => return Err(Errno::EIO),
                count => buffer = &buffer[count..],
            }
        }
        Ok(())
    }

    /// Changes how the signal is handled.
    ///
    /// Returns the previous handling. A caught signal is recorded by the
    /// system and later returned from [`caught_signals`](Self::caught_signals).
    fn sigaction(&mut self, signal: Signal, handling: SignalHandling) -> Result<SignalHandling>;

    /// Returns signals this process has caught, if any.
    ///
    /// Each signal is returned only once. A signal caught more than once
    /// before this function is called is returned once.
    fn caught_signals(&mut self) -> Vec<Signal>;

    /// Sends a signal.
    ///
    /// This is a thin wrapper around the `kill` system call. If `signal` is
    /// `None`, permission to send a signal is checked, but no signal is sent.
    fn kill(&mut self, target: Pid, signal: Option<Signal>) -> Result<()>;

    /// Modifies the process group ID of a process.
    ///
    /// This is a thin wrapper around the `setpgid` system call.
    fn setpgid(&mut self, pid: Pid, pgid: Pid) -> Result<()>;

    /// Creates a new child process.
    ///
    /// This is a wrapper around the `fork` system call. See
    /// [`ChildProcessStarter`] for how to use the returned function.
    fn new_child_process(&mut self) -> Result<ChildProcessStarter>;

    /// Reports a state change of the child process.
    ///
    /// This is a wrapper around the `waitpid` system call with `WUNTRACED`
    /// and `WCONTINUED`. If `blocking` is false, `WNOHANG` is added and the
    /// function returns `Ok(None)` if the child has no state change to
    /// report. A blocking wait interrupted by a caught signal returns
    /// `Err(Errno::EINTR)`. A `target` of [`ANY_CHILD`] waits for any child.
    fn wait(&mut self, target: Pid, blocking: bool) -> Result<Option<(Pid, ProcessState)>>;

    /// Replaces the current process with an external utility.
    ///
    /// This is a thin wrapper around the `execv` system call. The function
    /// returns only on failure.
    fn execv(&mut self, path: &CStr, args: &[CString]) -> Result<Infallible>;

    /// Returns the current working directory path.
    fn getcwd(&self) -> Result<PathBuf>;

    /// Changes the working directory.
    fn chdir(&mut self, path: &Path) -> Result<()>;
}
