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

//! Background jobs

use crate::command::Command;
use crate::command::subshell_exit_status;
use crate::external;
use crate::redir;
use crate::redir::RedirGuard;
use smash_builtin::Builtin;
use smash_env::Env;
use smash_env::job::Job;
use smash_env::job::JobId;
use smash_env::job::Pid;
use smash_env::semantics::ExitStatus;
use smash_env::system::SystemError;
use smash_syntax::syntax::Invocation;

/// Starts a subshell in a new process group.
///
/// This function works like [`Env::start_subshell`], but the child process
/// is moved to a process group of its own if the current process is the main
/// shell. Both the parent and the child call `setpgid` so that the group
/// exists whichever runs first. Inside a subshell, the child stays in the
/// subshell's group.
pub fn start_in_new_group<F>(env: &mut Env, f: F) -> Result<Pid, SystemError>
where
    F: FnOnce(&mut Env) -> ExitStatus + 'static,
{
    let new_group = !env.is_subshell;
    let pid = env.start_subshell(move |env| {
        if new_group {
            let _ = env.system.setpgid(Pid::from_raw(0), Pid::from_raw(0));
        }
        f(env)
    })?;
    if new_group {
        if let Err(errno) = env.system.setpgid(pid, pid) {
            // The child may have already exec'ed or exited.
            tracing::debug!(%pid, %errno, "cannot set the process group of the child");
        }
    }
    Ok(pid)
}

/// Starts the invocation as a background job.
///
/// The invocation runs in a new child process that the shell does not wait
/// for. The child is added to the job list under `name`, which should be the
/// command line as the user submitted it. The result is the ID of the new
/// job.
///
/// An external utility is executed directly in the child. For a redirection,
/// the target file is opened in the shell so that an error in opening it is
/// reported before the job starts; the child inherits the file and applies
/// the redirection.
pub fn start_job(
    env: &mut Env,
    invocation: &Invocation<Builtin>,
    name: &str,
) -> Result<JobId, SystemError> {
    let pid = match invocation {
        Invocation::External(external) => external::start(env, &external.text)?,

        Invocation::Redirect {
            inner,
            target,
            append,
            merge_stderr,
        } => {
            let file = redir::open_target(env, target, *append)?;
            let inner: Invocation<Builtin> = (**inner).clone();
            let merge_stderr = *merge_stderr;
            let result = start_in_new_group(env, move |env| {
                let mut env = RedirGuard::new(env);
                let redirected = env.redirect_output(file, merge_stderr);
                let _ = env.system.close(file);
                if let Err(error) = redirected {
                    env.undo_redirs();
                    env.print_error(&error);
                    return ExitStatus::FAILURE;
                }
                let result = inner.execute(&mut env);
                subshell_exit_status(&env, result)
            });
            let _ = env.system.close(file);
            result?
        }

        other => {
            let invocation = other.clone();
            start_in_new_group(env, move |env| {
                let result = invocation.execute(env);
                subshell_exit_status(env, result)
            })?
        }
    };

    let now = env.system.now();
    let id = env.jobs.add(Job::new(pid, name, now));
    tracing::info!(%id, %pid, name, "started background job");
    Ok(id)
}
