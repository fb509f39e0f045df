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

//! This crate contains utility functions for use in tests that interact with
//! the shell environment ([`smash_env::Env`]).

use assert_matches::assert_matches;
use smash_env::Env;
use smash_env::job::Pid;
use smash_env::system::r#virtual::{FileKind, Inode, Process, SystemState, VirtualSystem};
use std::cell::RefCell;
use std::rc::Rc;
use std::str::from_utf8;

/// Creates an environment with a new virtual system.
///
/// Returns the environment together with a clone of the virtual system,
/// through which the test can inspect and modify the system state.
pub fn virtual_env() -> (Env, VirtualSystem) {
    let system = VirtualSystem::new();
    let env = Env::with_system(Box::new(system.clone()));
    (env, system)
}

/// Adds a running child process of the current process to the virtual system.
pub fn spawn_child(system: &VirtualSystem) -> Pid {
    let mut state = system.state.borrow_mut();
    let pid = state.allocate_pid();
    state
        .processes
        .insert(pid, Process::with_parent(system.process_id));
    pid
}

/// Sets the content of /dev/stdin.
pub fn set_stdin<C: Into<Vec<u8>>>(state: &RefCell<SystemState>, content: C) {
    let stdin = stdio(state, "/dev/stdin");
    stdin.borrow_mut().content = content.into();
}

/// Creates an empty regular file or directory at the path.
pub fn create_file(state: &RefCell<SystemState>, path: &str, kind: FileKind) {
    let inode = Inode {
        kind,
        content: Vec::new(),
    };
    state
        .borrow_mut()
        .file_system
        .insert(path.to_owned(), Rc::new(RefCell::new(inode)));
}

fn stdio(state: &RefCell<SystemState>, path: &str) -> Rc<RefCell<Inode>> {
    let file = state.borrow().file(path);
    assert_matches!(file, Some(file) => file, "{path} does not exist")
}

fn assert_content<F, T>(state: &RefCell<SystemState>, path: &str, f: F) -> T
where
    F: FnOnce(&str) -> T,
{
    let file = stdio(state, path);
    let file = file.borrow();
    assert_eq!(file.kind, FileKind::Regular, "{path} is not a regular file");
    let content = from_utf8(&file.content).expect("file content should be valid UTF-8");
    f(content)
}

/// Helper function for asserting on the content of /dev/stdout
///
/// This function asserts on the content of /dev/stdout. The argument function
/// `f` is called with the content of /dev/stdout as a string slice.
///
/// This function panics if /dev/stdout does not exist, is not a regular file,
/// or does not contain a valid UTF-8 string.
///
/// # Example
///
/// ```
/// # use smash_env::io::Fd;
/// # use smash_env::system::System;
/// # use smash_env_test_helper::{assert_stdout, virtual_env};
/// let (mut env, system) = virtual_env();
/// env.system.write(Fd::STDOUT, b"Hello, world!\n").unwrap();
/// assert_stdout(&system.state, |stdout| assert_eq!(stdout, "Hello, world!\n"));
/// ```
pub fn assert_stdout<F, T>(state: &RefCell<SystemState>, f: F) -> T
where
    F: FnOnce(&str) -> T,
{
    assert_content(state, "/dev/stdout", f)
}

/// Helper function for asserting on the content of /dev/stderr
///
/// This function is similar to [`assert_stdout`], but asserts on the content
/// of /dev/stderr.
pub fn assert_stderr<F, T>(state: &RefCell<SystemState>, f: F) -> T
where
    F: FnOnce(&str) -> T,
{
    assert_content(state, "/dev/stderr", f)
}

/// Returns the content of a regular file as a string.
///
/// This function panics if the file does not exist or does not contain a
/// valid UTF-8 string.
pub fn file_content(state: &RefCell<SystemState>, path: &str) -> String {
    let file = stdio(state, path);
    let file = file.borrow();
    from_utf8(&file.content)
        .expect("file content should be valid UTF-8")
        .to_owned()
}
