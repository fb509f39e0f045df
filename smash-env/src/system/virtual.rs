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

//! System simulated in Rust.
//!
//! [`VirtualSystem`] is a pure Rust implementation of [`System`] that
//! simulates the behavior of the underlying system without any interaction
//! with the actual system. `VirtualSystem` is used for testing the behavior of
//! the shell in unit tests.
//!
//! # File system
//!
//! Regular files and directories are supported. Paths are resolved against
//! the working directory and normalized lexically; there are no symbolic
//! links.
//!
//! # Processes
//!
//! A virtual system initially has one process, but can have more processes as
//! a result of simulating fork. A virtual child process does not run the task
//! it is given. Instead, its state is set to
//! [`SystemState::new_child_state`] so that tests can decide how the child
//! ends. Tests may also change the state of any process directly.
//!
//! # Signals
//!
//! Sending a signal to a process applies its effect immediately. Signals the
//! current process catches are recorded and returned from
//! [`System::caught_signals`].

mod file_system;
mod process;

pub use self::file_system::*;
pub use self::process::*;
use super::ANY_CHILD;
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
use std::cell::Ref;
use std::cell::RefCell;
use std::cell::RefMut;
use std::collections::BTreeMap;
use std::convert::Infallible;
use std::ffi::CStr;
use std::ffi::CString;
use std::path::Component;
use std::path::Path;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Instant;

/// Simulated system.
///
/// See the [module-level documentation](self) to grasp a basic understanding
/// of `VirtualSystem`.
///
/// A `VirtualSystem` instance has two members: `state` and `process_id`. The
/// former is a [`SystemState`] that effectively contains the state of the
/// system. The state is contained in `Rc` so that a test can keep a clone of
/// the system and examine the state after passing the system to an
/// [`Env`](crate::Env). The latter is a process ID that identifies a process
/// calling the [`System`] interface.
#[derive(Clone, Debug)]
pub struct VirtualSystem {
    /// State of the system.
    pub state: Rc<RefCell<SystemState>>,

    /// Process ID of the process that is interacting with the system.
    pub process_id: Pid,
}

impl VirtualSystem {
    /// Creates a virtual system with an almost empty state.
    ///
    /// The `process_id` of the returned `VirtualSystem` will be 2.
    /// (Process ID 1 has special meaning in some system calls, so we don't use
    /// it as a default value.)
    ///
    /// The file system will contain files named `/dev/stdin`, `/dev/stdout`,
    /// and `/dev/stderr` that are opened in the process with file descriptor
    /// 0, 1, and 2, respectively. The file system also contains the
    /// directories `/`, `/dev`, and `/tmp`. The working directory is `/`.
    pub fn new() -> VirtualSystem {
        let mut state = SystemState::default();
        let mut process = Process::with_parent_and_group(Pid::from_raw(1), Pid::from_raw(1));

        for directory in ["/", "/dev", "/tmp"] {
            let inode = Rc::new(RefCell::new(Inode::directory()));
            state.file_system.insert(directory.to_owned(), inode);
        }

        let mut set_std_fd = |path: &str, fd| {
            let file = Rc::new(RefCell::new(Inode::new([])));
            state.file_system.insert(path.to_owned(), Rc::clone(&file));
            let body = FdBody {
                open_file_description: Rc::new(RefCell::new(OpenFileDescription {
                    file,
                    offset: 0,
                    is_readable: true,
                    is_writable: true,
                    is_appending: true,
                })),
                cloexec: false,
            };
            process.set_fd(fd, body);
        };
        set_std_fd("/dev/stdin", Fd::STDIN);
        set_std_fd("/dev/stdout", Fd::STDOUT);
        set_std_fd("/dev/stderr", Fd::STDERR);

        let process_id = Pid::from_raw(2);
        state.processes.insert(process_id, process);

        let state = Rc::new(RefCell::new(state));
        VirtualSystem { state, process_id }
    }

    /// Finds the current process from the system state.
    ///
    /// # Panics
    ///
    /// This function will panic if it cannot find a process having
    /// `self.process_id`.
    pub fn current_process(&self) -> Ref<'_, Process> {
        Ref::map(self.state.borrow(), |state| {
            &state.processes[&self.process_id]
        })
    }

    /// Finds the current process from the system state.
    ///
    /// # Panics
    ///
    /// This function will panic if it cannot find a process having
    /// `self.process_id`.
    pub fn current_process_mut(&self) -> RefMut<'_, Process> {
        RefMut::map(self.state.borrow_mut(), |state| {
            state
                .processes
                .get_mut(&self.process_id)
                .expect("the current process should exist")
        })
    }

    /// Calls the given closure passing the open file description for the FD.
    ///
    /// Returns `Err(Errno::EBADF)` if the FD is not open.
    pub fn with_open_file_description_mut<F, R>(&self, fd: Fd, f: F) -> Result<R>
    where
        F: FnOnce(&mut OpenFileDescription) -> Result<R>,
    {
        let process = self.current_process();
        let body = process.get_fd(fd).ok_or(Errno::EBADF)?;
        let mut ofd = body.open_file_description.borrow_mut();
        f(&mut ofd)
    }

    /// Resolves the path against the working directory.
    fn resolve(&self, path: &Path) -> String {
        let state = self.state.borrow();
        normalize(&state.cwd.join(path))
    }
}

impl Default for VirtualSystem {
    fn default() -> Self {
        Self::new()
    }
}

/// Normalizes an absolute path lexically.
fn normalize(path: &Path) -> String {
    let mut normalized = PathBuf::from("/");
    for component in path.components() {
        match component {
            Component::RootDir | Component::CurDir | Component::Prefix(_) => (),
            Component::ParentDir => {
                normalized.pop();
            }
            Component::Normal(name) => normalized.push(name),
        }
    }
    normalized.to_string_lossy().into_owned()
}

fn parent_of(path: &str) -> String {
    Path::new(path)
        .parent()
        .map_or_else(|| "/".to_owned(), |parent| parent.to_string_lossy().into_owned())
}

impl System for VirtualSystem {
    fn getpid(&self) -> Pid {
        self.process_id
    }

    fn now(&self) -> Instant {
        self.state.borrow().now
    }

    fn pipe(&mut self) -> Result<(Fd, Fd)> {
        let file = Rc::new(RefCell::new(Inode::fifo()));
        let end = |is_readable, is_writable| FdBody {
            open_file_description: Rc::new(RefCell::new(OpenFileDescription {
                file: Rc::clone(&file),
                offset: 0,
                is_readable,
                is_writable,
                is_appending: false,
            })),
            cloexec: false,
        };
        let (reader, writer) = (end(true, false), end(false, true));
        let mut process = self.current_process_mut();
        let reader = process.open_fd_ge(Fd(0), reader);
        let writer = process.open_fd_ge(Fd(0), writer);
        Ok((reader, writer))
    }

    fn dup(&mut self, from: Fd, to_min: Fd, cloexec: bool) -> Result<Fd> {
        let mut process = self.current_process_mut();
        let mut body = process.get_fd(from).ok_or(Errno::EBADF)?.clone();
        body.cloexec = cloexec;
        Ok(process.open_fd_ge(to_min, body))
    }

    fn dup2(&mut self, from: Fd, to: Fd) -> Result<Fd> {
        let mut process = self.current_process_mut();
        let mut body = process.get_fd(from).ok_or(Errno::EBADF)?.clone();
        if from != to {
            body.cloexec = false;
            process.set_fd(to, body);
        }
        Ok(to)
    }

    fn open(&mut self, path: &CStr, mode: OpenMode) -> Result<Fd> {
        let path = path.to_str().map_err(|_| Errno::EILSEQ)?;
        let path = self.resolve(Path::new(path));
        let mut state = self.state.borrow_mut();

        let existing = state.file_system.get(&path).cloned();
        let file = match existing {
            Some(file) => {
                if file.borrow().kind == FileKind::Directory {
                    return Err(Errno::EISDIR);
                }
                if mode == OpenMode::Truncate {
                    file.borrow_mut().content.clear();
                }
                file
            }
            None => {
                let parent = parent_of(&path);
                match state.file_system.get(&parent) {
                    Some(dir) if dir.borrow().kind == FileKind::Directory => (),
                    Some(_) => return Err(Errno::ENOTDIR),
                    None => return Err(Errno::ENOENT),
                }
                let file = Rc::new(RefCell::new(Inode::new([])));
                state.file_system.insert(path, Rc::clone(&file));
                file
            }
        };

        let body = FdBody {
            open_file_description: Rc::new(RefCell::new(OpenFileDescription {
                file,
                offset: 0,
                is_readable: false,
                is_writable: true,
                is_appending: mode == OpenMode::Append,
            })),
            cloexec: true,
        };
        let process = state
            .processes
            .get_mut(&self.process_id)
            .ok_or(Errno::ESRCH)?;
        Ok(process.open_fd_ge(Fd(0), body))
    }

    fn close(&mut self, fd: Fd) -> Result<()> {
        self.current_process_mut().close_fd(fd);
        Ok(())
    }

    fn read(&mut self, fd: Fd, buffer: &mut [u8]) -> Result<usize> {
        self.with_open_file_description_mut(fd, |ofd| ofd.read(buffer))
    }

    fn write(&mut self, fd: Fd, buffer: &[u8]) -> Result<usize> {
        self.with_open_file_description_mut(fd, |ofd| ofd.write(buffer))
    }

    fn sigaction(&mut self, signal: Signal, handling: SignalHandling) -> Result<SignalHandling> {
        Ok(self
            .current_process_mut()
            .set_signal_handling(signal, handling))
    }

    fn caught_signals(&mut self) -> Vec<Signal> {
        std::mem::take(&mut self.current_process_mut().caught_signals)
    }

    fn kill(&mut self, target: Pid, signal: Option<Signal>) -> Result<()> {
        let mut state = self.state.borrow_mut();
        let process = state.processes.get_mut(&target).ok_or(Errno::ESRCH)?;
        if let Some(signal) = signal {
            process.raise_signal(signal);
            state.sent_signals.push((target, signal));
        }
        Ok(())
    }

    fn setpgid(&mut self, pid: Pid, pgid: Pid) -> Result<()> {
        let pid = if pid.as_raw() == 0 {
            self.process_id
        } else {
            pid
        };
        let pgid = if pgid.as_raw() == 0 { pid } else { pgid };
        let mut state = self.state.borrow_mut();
        let process = state.processes.get_mut(&pid).ok_or(Errno::ESRCH)?;
        process.set_pgid(pgid);
        Ok(())
    }

    /// Creates a new virtual child process.
    ///
    /// The child process is added to the system state, but the task passed to
    /// the returned starter is not run. If
    /// [`SystemState::new_child_state`] is set, the child immediately has
    /// that state as an unobserved change.
    fn new_child_process(&mut self) -> Result<ChildProcessStarter> {
        let mut state = self.state.borrow_mut();
        let pid = state.allocate_pid();
        let pgid = state
            .processes
            .get(&self.process_id)
            .map_or(self.process_id, Process::pgid);
        let mut child = Process::with_parent_and_group(self.process_id, pgid);
        if let Some(child_state) = state.new_child_state {
            child.set_state(child_state);
        }
        state.processes.insert(pid, child);
        Ok(Box::new(move |_env, _task| pid))
    }

    /// Reports a state change of the child process.
    ///
    /// A terminated child is removed from the system when its state is
    /// reported. If the child has no change to report, a non-blocking wait
    /// returns `Ok(None)`. A blocking wait returns `Err(Errno::EINTR)` if the
    /// current process has caught a signal, and `Err(Errno::EDEADLK)`
    /// otherwise, since nothing else could change the child while the caller
    /// is blocked.
    fn wait(&mut self, target: Pid, blocking: bool) -> Result<Option<(Pid, ProcessState)>> {
        let mut state = self.state.borrow_mut();
        let parent = self.process_id;
        let candidates: Vec<Pid> = if target == ANY_CHILD {
            state
                .processes
                .iter()
                .filter(|(_, process)| process.ppid() == parent)
                .map(|(&pid, _)| pid)
                .collect()
        } else {
            state
                .processes
                .get(&target)
                .filter(|process| process.ppid() == parent)
                .map(|_| target)
                .into_iter()
                .collect()
        };
        if candidates.is_empty() {
            return Err(Errno::ECHILD);
        }
        for pid in candidates {
            let Some(process) = state.processes.get_mut(&pid) else {
                continue;
            };
            if let Some(process_state) = process.take_state_change() {
                if !process_state.is_alive() {
                    state.processes.remove(&pid);
                }
                return Ok(Some((pid, process_state)));
            }
        }
        if !blocking {
            return Ok(None);
        }
        let caught = state
            .processes
            .get(&self.process_id)
            .is_some_and(|process| !process.caught_signals.is_empty());
        Err(if caught { Errno::EINTR } else { Errno::EDEADLK })
    }

    fn execv(&mut self, path: &CStr, args: &[CString]) -> Result<Infallible> {
        self.state
            .borrow_mut()
            .executed
            .push((path.to_owned(), args.to_vec()));
        Err(Errno::ENOSYS)
    }

    fn getcwd(&self) -> Result<PathBuf> {
        Ok(self.state.borrow().cwd.clone())
    }

    fn chdir(&mut self, path: &Path) -> Result<()> {
        let path = self.resolve(path);
        let mut state = self.state.borrow_mut();
        match state.file_system.get(&path) {
            Some(file) if file.borrow().kind == FileKind::Directory => (),
            Some(_) => return Err(Errno::ENOTDIR),
            None => return Err(Errno::ENOENT),
        }
        state.cwd = PathBuf::from(path);
        Ok(())
    }
}

/// State of the virtual system.
#[derive(Clone, Debug)]
pub struct SystemState {
    /// Current time
    pub now: Instant,

    /// Processes running in the system
    pub processes: BTreeMap<Pid, Process>,

    /// Collection of files existing in the virtual system
    pub file_system: FileSystem,

    /// Working directory
    pub cwd: PathBuf,

    /// State given to every new child process
    ///
    /// If `None`, new child processes are running.
    pub new_child_state: Option<ProcessState>,

    /// Signals sent by [`System::kill`], in order
    pub sent_signals: Vec<(Pid, Signal)>,

    /// Arguments of every [`System::execv`] call, in order
    pub executed: Vec<(CString, Vec<CString>)>,

    next_pid: i32,
}

impl Default for SystemState {
    fn default() -> Self {
        SystemState {
            now: Instant::now(),
            processes: BTreeMap::new(),
            file_system: FileSystem::new(),
            cwd: PathBuf::from("/"),
            new_child_state: None,
            sent_signals: Vec::new(),
            executed: Vec::new(),
            next_pid: 3,
        }
    }
}

impl SystemState {
    /// Returns a process ID not yet used in the system.
    pub fn allocate_pid(&mut self) -> Pid {
        while self.processes.contains_key(&Pid::from_raw(self.next_pid)) {
            self.next_pid += 1;
        }
        let pid = Pid::from_raw(self.next_pid);
        self.next_pid += 1;
        pid
    }

    /// Returns the file at the absolute normalized path.
    pub fn file(&self, path: &str) -> Option<Rc<RefCell<Inode>>> {
        self.file_system.get(path).cloned()
    }
}
