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

//! Cd built-in
//!
//! The cd built-in changes the working directory to the directory given as
//! its only operand. The operand `-` names the previous working directory,
//! which is remembered each time the working directory is changed.

use smash_env::Env;
use smash_env::semantics::ExitStatus;
use smash_env::system::SystemError;
use std::path::PathBuf;
use thiserror::Error;

/// Cd built-in with the target directory resolved
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Command {
    /// Operand as given by the user
    pub operand: String,
    /// Directory to change to
    pub target: PathBuf,
}

/// Error in resolving the cd built-in
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum Error {
    #[error("too many arguments")]
    TooManyArguments,
    #[error("missing directory operand")]
    MissingOperand,
    #[error("OLDPWD not set")]
    OldPwdNotSet,
}

/// Determines the target directory.
pub fn resolve(env: &Env, args: &[String]) -> Result<Command, Error> {
    match args {
        [] => Err(Error::MissingOperand),
        [operand] if operand == "-" => {
            let target = env.old_pwd.clone().ok_or(Error::OldPwdNotSet)?;
            let operand = operand.clone();
            Ok(Command { operand, target })
        }
        [operand] => Ok(Command {
            operand: operand.clone(),
            target: PathBuf::from(operand),
        }),
        _ => Err(Error::TooManyArguments),
    }
}

/// Executes the cd built-in.
pub fn execute(env: &mut Env, command: &Command) -> ExitStatus {
    let current = match env.system.getcwd() {
        Ok(current) => Some(current),
        Err(errno) => {
            env.print_error(&SystemError::new("getcwd", errno));
            None
        }
    };

    match env.system.chdir(&command.target) {
        Ok(()) => {
            if current.is_some() {
                env.old_pwd = current;
            }
            ExitStatus::SUCCESS
        }
        Err(errno) => {
            env.print_error(&SystemError::new("chdir", errno));
            ExitStatus::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smash_env::system::r#virtual::FileKind;
    use smash_env_test_helper::{assert_stderr, create_file, virtual_env};

    fn args(args: &[&str]) -> Vec<String> {
        args.iter().map(|arg| arg.to_string()).collect()
    }

    #[test]
    fn operand_count() {
        let (env, _system) = virtual_env();
        assert_eq!(
            resolve(&env, &args(&["a", "b"])),
            Err(Error::TooManyArguments)
        );
        assert_eq!(resolve(&env, &[]), Err(Error::MissingOperand));
        assert_eq!(Error::TooManyArguments.to_string(), "too many arguments");
    }

    #[test]
    fn hyphen_without_previous_directory() {
        let (env, _system) = virtual_env();
        assert_eq!(resolve(&env, &args(&["-"])), Err(Error::OldPwdNotSet));
        assert_eq!(Error::OldPwdNotSet.to_string(), "OLDPWD not set");
    }

    #[test]
    fn change_and_change_back() {
        let (mut env, system) = virtual_env();
        let command = resolve(&env, &args(&["/tmp"])).unwrap();
        assert_eq!(execute(&mut env, &command), ExitStatus::SUCCESS);
        assert_eq!(system.state.borrow().cwd, PathBuf::from("/tmp"));
        assert_eq!(env.old_pwd, Some(PathBuf::from("/")));

        let command = resolve(&env, &args(&["-"])).unwrap();
        assert_eq!(command.target, PathBuf::from("/"));
        assert_eq!(execute(&mut env, &command), ExitStatus::SUCCESS);
        assert_eq!(system.state.borrow().cwd, PathBuf::from("/"));
        assert_eq!(env.old_pwd, Some(PathBuf::from("/tmp")));
    }

    #[test]
    fn relative_operand_to_created_directory() {
        let (mut env, system) = virtual_env();
        create_file(&system.state, "/tmp/work", FileKind::Directory);
        create_file(&system.state, "/tmp/notes.txt", FileKind::Regular);
        env.system.chdir(std::path::Path::new("/tmp")).unwrap();

        let command = resolve(&env, &args(&["work"])).unwrap();
        assert_eq!(execute(&mut env, &command), ExitStatus::SUCCESS);
        assert_eq!(system.state.borrow().cwd, PathBuf::from("/tmp/work"));
        assert_eq!(env.old_pwd, Some(PathBuf::from("/tmp")));

        let command = resolve(&env, &args(&["../notes.txt"])).unwrap();
        assert_eq!(execute(&mut env, &command), ExitStatus::FAILURE);
        assert_eq!(system.state.borrow().cwd, PathBuf::from("/tmp/work"));
    }

    #[test]
    fn failed_change_keeps_previous_directory() {
        let (mut env, system) = virtual_env();
        env.old_pwd = Some(PathBuf::from("/dev"));
        let command = resolve(&env, &args(&["/missing"])).unwrap();
        assert_eq!(execute(&mut env, &command), ExitStatus::FAILURE);
        assert_eq!(env.old_pwd, Some(PathBuf::from("/dev")));
        assert_stderr(&system.state, |stderr| {
            assert!(stderr.starts_with("smash error: chdir failed: "), "{stderr}")
        });
    }
}
