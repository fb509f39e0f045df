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

//! Files and open file descriptions in the virtual system

use super::super::Errno;
use super::super::Result;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Collection of files, keyed by absolute normalized path
pub type FileSystem = HashMap<String, Rc<RefCell<Inode>>>;

/// Type of a file
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum FileKind {
    /// Regular file
    Regular,
    /// Directory, whose contents are the files whose path it prefixes
    Directory,
    /// Unnamed pipe
    ///
    /// Reading a pipe consumes the content from its beginning.
    Fifo,
}

/// File in the virtual file system
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Inode {
    pub kind: FileKind,
    pub content: Vec<u8>,
}

impl Inode {
    /// Creates a regular file with the content.
    pub fn new<C: Into<Vec<u8>>>(content: C) -> Self {
        Inode {
            kind: FileKind::Regular,
            content: content.into(),
        }
    }

    /// Creates an empty directory.
    pub fn directory() -> Self {
        Inode {
            kind: FileKind::Directory,
            content: Vec::new(),
        }
    }

    /// Creates an empty pipe.
    pub fn fifo() -> Self {
        Inode {
            kind: FileKind::Fifo,
            content: Vec::new(),
        }
    }
}

/// State of a file opened for reading and/or writing
#[derive(Clone, Debug)]
pub struct OpenFileDescription {
    /// File
    pub file: Rc<RefCell<Inode>>,
    /// Position in the file from which the next read or write happens
    pub offset: usize,
    pub is_readable: bool,
    pub is_writable: bool,
    /// Whether every write goes to the end of the file
    pub is_appending: bool,
}

impl OpenFileDescription {
    /// Reads from the file into the buffer.
    pub fn read(&mut self, buffer: &mut [u8]) -> Result<usize> {
        if !self.is_readable {
            return Err(Errno::EBADF);
        }
        let mut file = self.file.borrow_mut();
        match file.kind {
            FileKind::Regular => {
                let available = file.content.get(self.offset..).unwrap_or_default();
                let count = available.len().min(buffer.len());
                buffer[..count].copy_from_slice(&available[..count]);
                self.offset += count;
                Ok(count)
            }
            FileKind::Fifo => {
                let count = file.content.len().min(buffer.len());
                buffer[..count].copy_from_slice(&file.content[..count]);
                file.content.drain(..count);
                Ok(count)
            }
            FileKind::Directory => Err(Errno::EISDIR),
        }
    }

    /// Writes the buffer into the file.
    pub fn write(&mut self, buffer: &[u8]) -> Result<usize> {
        if !self.is_writable {
            return Err(Errno::EBADF);
        }
        let mut file = self.file.borrow_mut();
        match file.kind {
            FileKind::Regular => {
                if self.is_appending {
                    self.offset = file.content.len();
                }
                let end = self.offset + buffer.len();
                if file.content.len() < end {
                    file.content.resize(end, 0);
                }
                file.content[self.offset..end].copy_from_slice(buffer);
                self.offset = end;
                Ok(buffer.len())
            }
            FileKind::Fifo => {
                file.content.extend_from_slice(buffer);
                Ok(buffer.len())
            }
            FileKind::Directory => Err(Errno::EISDIR),
        }
    }
}

/// State of a file descriptor
#[derive(Clone, Debug)]
pub struct FdBody {
    /// Underlying open file description, shared with duplicates of the FD
    pub open_file_description: Rc<RefCell<OpenFileDescription>>,
    /// Whether the FD is closed when the process executes a utility
    pub cloexec: bool,
}
