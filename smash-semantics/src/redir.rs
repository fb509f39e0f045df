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

//! Redirection
//!
//! A redirection makes the standard output of a command, and optionally the
//! standard error, refer to a file. Before the file descriptors are replaced,
//! the original open file descriptions are saved to new file descriptors not
//! less than [`MIN_INTERNAL_FD`]. A [`RedirGuard`] remembers the saved file
//! descriptors and moves them back when it is dropped, so the shell's standard
//! streams are restored however the command finishes.
//!
//! The same mechanism connects the left side of a pipeline to the pipe.

use crate::command::Command;
use smash_builtin::Builtin;
use smash_env::Env;
use smash_env::io::Fd;
use smash_env::io::MIN_INTERNAL_FD;
use smash_env::semantics::ExitStatus;
use smash_env::semantics::Result;
use smash_env::system::Errno;
use smash_env::system::OpenMode;
use smash_env::system::SystemError;
use smash_syntax::syntax::Invocation;
use std::ffi::CString;
use std::ops::ControlFlow::Continue;
use std::ops::Deref;
use std::ops::DerefMut;

/// Record of a file descriptor replaced by a redirection
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct SavedFd {
    /// File descriptor that was replaced
    original: Fd,
    /// Temporary file descriptor that keeps the original open file
    /// description, if `original` was open
    save: Option<Fd>,
}

/// `Env` wrapper for performing redirections.
///
/// This is an RAII-style wrapper of [`Env`] in which redirections are
/// performed. The file descriptors replaced through the guard are restored
/// by [`undo_redirs`](Self::undo_redirs), which is called when the guard is
/// dropped.
///
/// The guard dereferences to the wrapped environment, so commands can be run
/// in it as usual.
#[derive(Debug)]
#[must_use = "the redirections are undone when the guard is dropped"]
pub struct RedirGuard<'e> {
    env: &'e mut Env,
    saved_fds: Vec<SavedFd>,
}

impl Deref for RedirGuard<'_> {
    type Target = Env;
    fn deref(&self) -> &Env {
        self.env
    }
}

impl DerefMut for RedirGuard<'_> {
    fn deref_mut(&mut self) -> &mut Env {
        self.env
    }
}

impl Drop for RedirGuard<'_> {
    fn drop(&mut self) {
        self.undo_redirs()
    }
}

impl<'e> RedirGuard<'e> {
    /// Creates a new `RedirGuard`.
    pub fn new(env: &'e mut Env) -> Self {
        let saved_fds = Vec::new();
        RedirGuard { env, saved_fds }
    }

    /// Makes `fd` refer to the open file description of `source`.
    ///
    /// The current open file description of `fd` is saved in the guard.
    /// `source` is left open.
    pub fn redirect(&mut self, fd: Fd, source: Fd) -> std::result::Result<(), SystemError> {
        let save = match self.env.system.dup(fd, MIN_INTERNAL_FD, true) {
            Ok(save) => Some(save),
            Err(Errno::EBADF) => None,
            Err(errno) => return Err(SystemError::new("dup", errno)),
        };
        if let Err(errno) = self.env.system.dup2(source, fd) {
            if let Some(save) = save {
                let _ = self.env.system.close(save);
            }
            return Err(SystemError::new("dup2", errno));
        }
        self.saved_fds.push(SavedFd { original: fd, save });
        Ok(())
    }

    /// Redirects the standard output, and the standard error if
    /// `merge_stderr` is true, to `source`.
    pub fn redirect_output(
        &mut self,
        source: Fd,
        merge_stderr: bool,
    ) -> std::result::Result<(), SystemError> {
        self.redirect(Fd::STDOUT, source)?;
        if merge_stderr {
            self.redirect(Fd::STDERR, source)?;
        }
        Ok(())
    }

    /// Restores the file descriptors saved in the guard.
    ///
    /// The file descriptors are restored in the reverse order of
    /// redirections. A file descriptor that was closed before the redirection
    /// is closed again.
    pub fn undo_redirs(&mut self) {
        for SavedFd { original, save } in self.saved_fds.drain(..).rev() {
            if let Some(save) = save {
                if let Err(errno) = self.env.system.dup2(save, original) {
                    tracing::warn!(fd = %original, %errno, "cannot restore file descriptor");
                }
                let _ = self.env.system.close(save);
            } else {
                let _ = self.env.system.close(original);
            }
        }
    }
}

/// Opens the target file of a redirection for writing.
///
/// The file is created if it does not exist, and truncated unless `append` is
/// true.
pub fn open_target(
    env: &mut Env,
    target: &str,
    append: bool,
) -> std::result::Result<Fd, SystemError> {
    let path = CString::new(target).map_err(|_| SystemError::new("open", Errno::EINVAL))?;
    let mode = if append {
        OpenMode::Append
    } else {
        OpenMode::Truncate
    };
    env.system
        .open(&path, mode)
        .map_err(|errno| SystemError::new("open", errno))
}

/// Executes the command with its output redirected to the target file.
///
/// If the file cannot be opened or the output cannot be redirected, the
/// error is printed and the command is not executed.
pub fn execute(
    env: &mut Env,
    inner: &Invocation<Builtin>,
    target: &str,
    append: bool,
    merge_stderr: bool,
) -> Result {
    let file = match open_target(env, target, append) {
        Ok(file) => file,
        Err(error) => {
            env.print_error(&error);
            env.exit_status = ExitStatus::FAILURE;
            return Continue(());
        }
    };

    let mut env = RedirGuard::new(env);
    let redirected = env.redirect_output(file, merge_stderr);
    let _ = env.system.close(file);
    if let Err(error) = redirected {
        env.undo_redirs();
        env.print_error(&error);
        env.exit_status = ExitStatus::FAILURE;
        return Continue(());
    }

    inner.execute(&mut env)
}

#[cfg(test)]
mod tests {
    use super::*;
    use smash_env_test_helper::{assert_stderr, assert_stdout, file_content, virtual_env};
    use smash_syntax::parser::parse;

    fn resolve(env: &mut Env, text: &str) -> Invocation<Builtin> {
        parse(text)
            .unwrap()
            .try_map_builtins(&mut |call| smash_builtin::resolve(env, call))
            .unwrap()
    }

    #[test]
    fn guard_restores_stdout() {
        let (mut env, system) = virtual_env();
        let file = open_target(&mut env, "/tmp/out.txt", false).unwrap();
        {
            let mut env = RedirGuard::new(&mut env);
            env.redirect_output(file, false).unwrap();
            env.print("to file\n");
        }
        env.print("to stdout\n");

        assert_eq!(file_content(&system.state, "/tmp/out.txt"), "to file\n");
        assert_stdout(&system.state, |stdout| assert_eq!(stdout, "to stdout\n"));
        let state = system.state.borrow();
        let process = &state.processes[&system.process_id];
        assert!(process.get_fd(MIN_INTERNAL_FD).is_none());
    }

    #[test]
    fn guard_redirects_stderr_too() {
        let (mut env, system) = virtual_env();
        let file = open_target(&mut env, "/tmp/all.txt", false).unwrap();
        {
            let mut env = RedirGuard::new(&mut env);
            env.redirect_output(file, true).unwrap();
            env.print("out\n");
            env.print_error("oops");
        }
        env.print_error("after");

        assert_eq!(
            file_content(&system.state, "/tmp/all.txt"),
            "out\nsmash error: oops\n"
        );
        assert_stderr(&system.state, |stderr| {
            assert_eq!(stderr, "smash error: after\n")
        });
    }

    #[test]
    fn builtin_output_to_file() {
        let (mut env, system) = virtual_env();
        let invocation = resolve(&mut env, "showpid > /tmp/out.txt");

        assert_eq!(invocation.execute(&mut env), Continue(()));

        assert_eq!(
            file_content(&system.state, "/tmp/out.txt"),
            "smash pid is 2\n"
        );
        assert_stdout(&system.state, |stdout| assert_eq!(stdout, ""));
        let state = system.state.borrow();
        assert_eq!(state.processes[&system.process_id].fds().len(), 3);
    }

    #[test]
    fn append_mode() {
        let (mut env, system) = virtual_env();
        let invocation = resolve(&mut env, "showpid >> /tmp/out.txt");
        invocation.execute(&mut env);
        invocation.execute(&mut env);
        assert_eq!(
            file_content(&system.state, "/tmp/out.txt"),
            "smash pid is 2\nsmash pid is 2\n"
        );
    }

    #[test]
    fn truncate_mode() {
        let (mut env, system) = virtual_env();
        let invocation = resolve(&mut env, "showpid > /tmp/out.txt");
        invocation.execute(&mut env);
        invocation.execute(&mut env);
        assert_eq!(
            file_content(&system.state, "/tmp/out.txt"),
            "smash pid is 2\n"
        );
    }

    #[test]
    fn unopenable_target() {
        let (mut env, system) = virtual_env();
        let invocation = resolve(&mut env, "showpid > /missing/out.txt");

        assert_eq!(invocation.execute(&mut env), Continue(()));

        assert_eq!(env.exit_status, ExitStatus::FAILURE);
        assert_stdout(&system.state, |stdout| assert_eq!(stdout, ""));
        assert_stderr(&system.state, |stderr| {
            assert_eq!(
                stderr,
                format!("smash error: open failed: {}\n", Errno::ENOENT.desc())
            )
        });
    }
}
