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

//! Pwd built-in
//!
//! The pwd built-in prints the working directory.

use smash_env::Env;
use smash_env::semantics::ExitStatus;
use smash_env::system::SystemError;

pub fn execute(env: &mut Env) -> ExitStatus {
    match env.system.getcwd() {
        Ok(path) => {
            env.print(&format!("{}\n", path.display()));
            ExitStatus::SUCCESS
        }
        Err(errno) => {
            env.print_error(&SystemError::new("getcwd", errno));
            ExitStatus::FAILURE
        }
    }
}
