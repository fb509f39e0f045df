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

//! Job report formatting
//!
//! The `jobs` built-in prints each job in the following format:
//!
//! ```text
//! [2] sleep 100& : 24437 12 secs
//! [3] vi notes : 24440 3 secs (stopped)
//! ```
//!
//! The elapsed time of a stopped job is the time it ran before it stopped.
//!
//! The alternate mode flag (`#`) selects the short format used when a job is
//! moved to the foreground or the background or killed by `quit kill`:
//!
//! ```text
//! 24437: sleep 100&
//! ```
//!
//! ```
//! use smash_env::job::{Job, Pid};
//! use smash_env::job::fmt::Report;
//! use std::time::{Duration, Instant};
//! let started = Instant::now();
//! let job = Job::new(Pid::from_raw(123), "sleep 10", started);
//! let report = Report::new(&job, started + Duration::from_secs(4));
//! assert_eq!(format!("{report}"), "[1] sleep 10 : 123 4 secs");
//! assert_eq!(format!("{report:#}"), "123: sleep 10");
//! ```

use super::Job;
use super::JobState;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result;
use std::time::Instant;

/// Wrapper for implementing job status formatting
///
/// See the [module documentation](self) for details.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Report<'a> {
    /// Job to be reported
    pub job: &'a Job,
    /// Current time, from which the elapsed time is computed
    pub now: Instant,
}

impl<'a> Report<'a> {
    pub fn new(job: &'a Job, now: Instant) -> Self {
        Report { job, now }
    }
}

impl Display for Report<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let job = self.job;
        if f.alternate() {
            return write!(f, "{}: {}", job.pid, job.name);
        }

        let elapsed = job.elapsed_secs(self.now);
        write!(f, "[{}] {} : {} {} secs", job.id, job.name, job.pid, elapsed)?;
        if job.state == JobState::Stopped {
            f.write_str(" (stopped)")?;
        }
        Ok(())
    }
}
