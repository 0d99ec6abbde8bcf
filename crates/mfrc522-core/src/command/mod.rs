//! User commands
//!
//! The text protocol is a single line of colon-separated fields:
//!
//! ```text
//! mem_write:<len>:<data>
//! mem_read
//! gen_rand_id
//! version
//! debug:<on|off>
//! ```
//!
//! [`COMMAND_TABLE`] is the single source of truth for names and arity; the
//! [`parse`] turns a line into a [`Command`].

mod parser;
mod types;

pub use parser::parse;
pub use types::{lookup, Command, CommandData, CommandTableEntry, Operation, COMMAND_TABLE};

/// Field separator of the text protocol
pub const SEPARATOR: u8 = b':';
