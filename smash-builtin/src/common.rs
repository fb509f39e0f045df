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

//! Items shared among built-ins that refer to jobs

use smash_env::Env;
use smash_env::job::Job;
use smash_env::job::JobId;

/// Parses a job operand.
///
/// A job operand is a non-negative decimal integer. Returns `None` if the
/// operand is malformed. The result may not be a valid job ID; see
/// [`find_job`].
pub fn parse_job_number(operand: &str) -> Option<usize> {
    if operand.is_empty() || !operand.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    operand.parse().ok()
}

/// Finds the job having the number as its ID.
pub fn find_job(env: &Env, number: usize) -> Option<&Job> {
    JobId::new(number).and_then(|id| env.jobs.get(id))
}
