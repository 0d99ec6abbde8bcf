//! Text command parser
//!
//! Works on raw bytes: the payload of `mem_write` is not required to be
//! UTF-8. The parser never touches the bus, so a rejected line has no side
//! effects.

use crate::error::ParseError;
use crate::{MAX_INPUT_LEN, MEM_SIZE};

use super::types::{lookup, Command};
use super::SEPARATOR;

/// Result type used by the parser
pub type ParseResult = core::result::Result<Command, ParseError>;

/// Strip one trailing `\n` or `\r\n`
fn strip_line_terminator(input: &[u8]) -> &[u8] {
    let input = input.strip_suffix(b"\n").unwrap_or(input);
    input.strip_suffix(b"\r").unwrap_or(input)
}

/// Split at the first separator
fn split_field(input: &[u8]) -> (&[u8], Option<&[u8]>) {
    match input.iter().position(|&b| b == SEPARATOR) {
        Some(idx) => (&input[..idx], Some(&input[idx + 1..])),
        None => (input, None),
    }
}

/// Parse a decimal length field: `0..=255`, then bounded by the memory width
fn parse_length(field: &[u8]) -> Result<usize, ParseError> {
    if field.is_empty() || !field.iter().all(u8::is_ascii_digit) {
        return Err(ParseError::InvalidLength);
    }

    // A byte-sized value never needs more than three significant digits
    let mut value: u16 = 0;
    for &digit in field {
        value = value * 10 + u16::from(digit - b'0');
        if value > u16::from(u8::MAX) {
            return Err(ParseError::InvalidLength);
        }
    }

    let len = value as usize;
    if len > MEM_SIZE {
        return Err(ParseError::InvalidLength);
    }
    Ok(len)
}

/// Parse one command line
///
/// ```text
/// <name>                     expected_arg_count == 0
/// <name>:<argument>          expected_arg_count == 1, argument taken verbatim
/// <name>:<len>:<payload>     expected_arg_count == 2, first <len> bytes kept
/// ```
pub fn parse(input: &[u8]) -> ParseResult {
    if input.len() > MAX_INPUT_LEN {
        return Err(ParseError::InputTooLong { len: input.len() });
    }

    let line = strip_line_terminator(input);
    if line.is_empty() {
        return Err(ParseError::EmptyInput);
    }

    let (name, rest) = split_field(line);
    let entry = lookup(name).ok_or(ParseError::UnknownCommand)?;
    let mismatch = ParseError::ArgumentCountMismatch {
        expected: entry.expected_arg_count,
    };

    match (entry.expected_arg_count, rest) {
        (0, None) => Ok(Command::simple(entry.operation)),
        (0, Some(_)) => Err(mismatch),
        (_, None) => Err(mismatch),
        (1, Some(arg)) => Command::new(entry.operation, arg).ok_or(ParseError::InvalidLength),
        (_, Some(args)) => {
            let (len_field, payload) = split_field(args);
            let payload = payload.ok_or(mismatch)?;
            let declared = parse_length(len_field)?;

            if payload.len() < declared {
                return Err(ParseError::TruncatedPayload {
                    declared,
                    found: payload.len(),
                });
            }

            // Cannot fail: declared <= MEM_SIZE
            Command::new(entry.operation, &payload[..declared]).ok_or(ParseError::InvalidLength)
        }
    }
}
