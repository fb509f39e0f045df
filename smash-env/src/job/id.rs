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

//! Job ID
//!
//! A job ID is a positive integer the shell assigns to a job when it is added
//! to the [job list](super::JobList). Built-ins such as `fg` and `kill` accept
//! a job ID as an operand in its decimal form.

use std::fmt::Display;
use std::fmt::Formatter;
use std::num::NonZeroUsize;
use std::str::FromStr;
use thiserror::Error;

/// Positive integer identifying a job
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct JobId(NonZeroUsize);

impl JobId {
    /// The job ID given to the first job
    pub const FIRST: JobId = JobId(NonZeroUsize::MIN);

    /// Creates a job ID from a number.
    ///
    /// Returns `None` if the number is zero.
    pub fn new(number: usize) -> Option<JobId> {
        NonZeroUsize::new(number).map(JobId)
    }

    /// Returns the number of the job ID.
    pub fn get(self) -> usize {
        self.0.get()
    }

    /// Returns the job ID following this one.
    pub fn next(&self) -> JobId {
        JobId(self.0.saturating_add(1))
    }
}

impl Display for JobId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Error that may occur in job ID parsing
#[derive(Clone, Copy, Debug, Eq, Error, Hash, PartialEq)]
#[error("a job ID must be a positive integer")]
pub struct ParseError;

/// Parses a job ID.
///
/// ```
/// # use smash_env::job::id::{JobId, ParseError};
/// assert_eq!("3".parse::<JobId>().map(JobId::get), Ok(3));
/// assert_eq!("0".parse::<JobId>(), Err(ParseError));
/// assert_eq!("-1".parse::<JobId>(), Err(ParseError));
/// assert_eq!("%1".parse::<JobId>(), Err(ParseError));
/// ```
impl FromStr for JobId {
    type Err = ParseError;
    fn from_str(s: &str) -> Result<JobId, ParseError> {
        if !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ParseError);
        }
        s.parse().map(JobId).map_err(|_| ParseError)
    }
}
