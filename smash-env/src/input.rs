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

//! Reading command lines

use crate::Env;
use crate::io::Fd;
use crate::signal::resolve_caught_signals;
use crate::system::Errno;
use crate::system::SystemError;
use std::slice::from_mut;

/// Line reader that reads from a file descriptor
///
/// The reader reads one byte at a time so that it never consumes input beyond
/// the current line, which remains available to the commands the shell runs.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[must_use = "FdReader does nothing unless read_line is called"]
pub struct FdReader {
    fd: Fd,
}

impl FdReader {
    /// Creates a new `FdReader` instance.
    pub fn new(fd: Fd) -> Self {
        FdReader { fd }
    }

    /// Reads a line.
    ///
    /// The returned line includes the trailing newline unless the input ended
    /// without one. Returns `Ok(None)` at the end of input.
    ///
    /// If the read is interrupted by a signal, the caught signals are resolved
    /// and the read is resumed.
    pub fn read_line(&self, env: &mut Env) -> Result<Option<String>, SystemError> {
        let mut bytes = Vec::new();
        loop {
            let mut byte = 0;
            match env.system.read(self.fd, from_mut(&mut byte)) {
                // End of input
                Ok(0) => break,

                Ok(_) => {
                    bytes.push(byte);
                    if byte == b'\n' {
                        break;
                    }
                }

                Err(Errno::EINTR) => resolve_caught_signals(env),

                Err(errno) => return Err(SystemError::new("read", errno)),
            }
        }

        if bytes.is_empty() {
            return Ok(None);
        }
        let line = String::from_utf8(bytes)
            .unwrap_or_else(|e| String::from_utf8_lossy(&e.into_bytes()).into());
        Ok(Some(line))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::VirtualSystem;
    use crate::system::System;

    fn env_with_stdin(content: &str) -> Env {
        let system = VirtualSystem::new();
        {
            let state = system.state.borrow();
            let stdin = &state.file_system["/dev/stdin"];
            stdin.borrow_mut().content = content.as_bytes().to_vec();
        }
        Env::with_system(Box::new(system))
    }

    #[test]
    fn empty_reader() {
        let mut env = env_with_stdin("");
        let reader = FdReader::new(Fd::STDIN);
        assert_eq!(reader.read_line(&mut env), Ok(None));
    }

    #[test]
    fn reader_with_many_lines() {
        let mut env = env_with_stdin("jobs\nfg 1\nquit");
        let reader = FdReader::new(Fd::STDIN);
        assert_eq!(reader.read_line(&mut env), Ok(Some("jobs\n".to_owned())));
        assert_eq!(reader.read_line(&mut env), Ok(Some("fg 1\n".to_owned())));
        assert_eq!(reader.read_line(&mut env), Ok(Some("quit".to_owned())));
        assert_eq!(reader.read_line(&mut env), Ok(None));
    }

    #[test]
    fn reader_error() {
        let mut env = Env::new_virtual();
        env.system.close(Fd::STDIN).unwrap();
        let reader = FdReader::new(Fd::STDIN);
        assert_eq!(
            reader.read_line(&mut env),
            Err(SystemError::new("read", Errno::EBADF))
        );
    }
}
