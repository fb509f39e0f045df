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

//! History built-in
//!
//! The history built-in prints the command history from the oldest record,
//! each as the sequence number right-aligned in five columns followed by the
//! command line.

use smash_env::Env;
use smash_env::semantics::ExitStatus;

pub fn execute(env: &mut Env) -> ExitStatus {
    let output: String = env
        .history
        .iter()
        .map(|record| format!("{record}\n"))
        .collect();
    env.print(&output);
    ExitStatus::SUCCESS
}
