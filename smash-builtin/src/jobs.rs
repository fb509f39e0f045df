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

//! Jobs built-in
//!
//! The jobs built-in prints the jobs in ascending order of job ID, one per
//! line, in the format defined in [`smash_env::job::fmt`].

use smash_env::Env;
use smash_env::job::fmt::Report;
use smash_env::semantics::ExitStatus;

/// Executes the jobs built-in.
pub fn execute(env: &mut Env) -> ExitStatus {
    let now = env.system.now();
    let mut output = String::new();
    for job in env.jobs.iter() {
        output.push_str(&format!("{}\n", Report::new(job, now)));
    }
    env.print(&output);
    ExitStatus::SUCCESS
}
