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

//! Command line syntax of smash.
//!
//! A command line is a sequence of whitespace-separated words. There is no
//! quoting or escaping. The [`parser`] turns a command line into an
//! [`Invocation`](syntax::Invocation), which tells the shell what to run:
//! a built-in, an external utility, a two-stage pipeline, or a command with
//! its output redirected to a file.
//!
//! ```
//! use smash_syntax::parser::parse;
//! use smash_syntax::syntax::{BuiltinName, Invocation};
//! let invocation = parse("jobs | grep sleep").unwrap();
//! let Invocation::Pipeline { left, .. } = invocation else { panic!() };
//! let Invocation::Builtin(call) = *left else { panic!() };
//! assert_eq!(call.name, BuiltinName::Jobs);
//! ```

pub mod parser;
pub mod syntax;
