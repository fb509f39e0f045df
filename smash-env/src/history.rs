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

//! Command history
//!
//! The history keeps the most recent command lines submitted to the shell,
//! up to a fixed capacity. Each record has a sequence number that increases
//! with every submission. Submitting the same command line as the most recent
//! record does not add a record but renews the sequence number of that
//! record.

use std::collections::VecDeque;

/// Default number of records kept in the history
pub const DEFAULT_CAPACITY: usize = 50;

/// Entry of the history
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Record {
    pub seq: u64,
    pub text: String,
}

impl std::fmt::Display for Record {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:>5} {}", self.seq, self.text)
    }
}

/// Capacity-bounded list of submitted command lines
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct History {
    records: VecDeque<Record>,
    capacity: usize,
    last_seq: u64,
}

impl Default for History {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

impl History {
    /// Creates an empty history holding at most `capacity` records.
    ///
    /// A capacity of zero is treated as one.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        History {
            records: VecDeque::with_capacity(capacity),
            capacity,
            last_seq: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Records a command line.
    ///
    /// The oldest record is evicted if the history is full.
    pub fn record(&mut self, text: &str) {
        self.last_seq += 1;
        if let Some(last) = self.records.back_mut() {
            if last.text == text {
                last.seq = self.last_seq;
                return;
            }
        }
        if self.records.len() == self.capacity {
            self.records.pop_front();
        }
        self.records.push_back(Record {
            seq: self.last_seq,
            text: text.to_owned(),
        });
    }

    /// Returns the most recent record.
    pub fn last_recorded(&self) -> Option<&Record> {
        self.records.back()
    }

    /// Returns an iterator over the records from the oldest.
    pub fn iter(&self) -> impl Iterator<Item = &Record> + '_ {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
