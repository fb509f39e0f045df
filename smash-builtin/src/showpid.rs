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

//! Showpid built-in
//!
//! The showpid built-in prints the process ID of the shell as
//! `smash pid is <pid>`.

use smash_env::Env;
use smash_env::semantics::ExitStatus;

pub fn execute(env: &mut Env) -> ExitStatus {
    let pid = env.system.getpid();
    env.print(&format!("smash pid is {pid}\n"));
    ExitStatus::SUCCESS
}

#[cfg(test)]
mod tests {
    use super::*;
    use smash_env_test_helper::{assert_stdout, virtual_env};

    #[test]
    fn prints_shell_pid() {
        let (mut env, system) = virtual_env();
        execute(&mut env);
        assert_stdout(&system.state, |stdout| {
            assert_eq!(stdout, "smash pid is 2\n")
        });
    }
}
