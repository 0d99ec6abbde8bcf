//! Error types for mfrc522-core
//!
//! This module provides a no_std compatible error type that can be used
//! throughout the crate.

use core::fmt;

/// `EINVAL`, reported by the write path for malformed input
pub const EINVAL: i32 = 22;

/// `EBADE`, reported by the write path when execution failed
pub const EBADE: i32 = 52;

/// Reasons a text command was rejected by the parser
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseError {
    /// Nothing but an optional line terminator was given
    EmptyInput,
    /// The input is longer than the protocol allows
    InputTooLong {
        /// Length of the rejected input
        len: usize,
    },
    /// The first token does not name a known command
    UnknownCommand,
    /// The command got a different number of fields than it expects
    ArgumentCountMismatch {
        /// Number of arguments the command expects
        expected: u8,
    },
    /// The length field is not a byte-sized decimal or exceeds the memory width
    InvalidLength,
    /// The payload is shorter than its declared length
    TruncatedPayload {
        /// Declared length
        declared: usize,
        /// Bytes actually present
        found: usize,
    },
}

/// Core error type - no_std compatible, Copy for efficiency
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    // Input errors
    /// The text command could not be parsed
    Parse(ParseError),

    // Execution errors
    /// SPI transfer failed
    TransportFailure,
    /// A command argument has an unsupported value
    InvalidArgument,
    /// The chip never returned to Idle within the poll budget
    ChipUnresponsive,
    /// Provided buffer is too small for the operation
    BufferTooSmall,
    /// CommandReg holds an opcode the datasheet reserves
    ReservedOpcode {
        /// Low nibble of CommandReg
        opcode: u8,
    },

    // Attach errors
    /// The VersionReg value does not belong to an MFRC522
    NotMfrc522 {
        /// Raw VersionReg value
        found: u8,
    },
}

impl Error {
    /// Whether this error was caused by the user's input rather than the chip
    pub const fn is_input_error(&self) -> bool {
        matches!(self, Self::Parse(_))
    }

    /// Negative errno reported to the host boundary for a failed write
    pub const fn status(&self) -> i32 {
        if self.is_input_error() {
            -EINVAL
        } else {
            -EBADE
        }
    }
}

impl From<ParseError> for Error {
    fn from(e: ParseError) -> Self {
        Self::Parse(e)
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyInput => write!(f, "empty command"),
            Self::InputTooLong { len } => write!(
                f,
                "input too long: {} bytes (maximum {})",
                len,
                crate::MAX_INPUT_LEN
            ),
            Self::UnknownCommand => write!(f, "unknown command"),
            Self::ArgumentCountMismatch { expected } => {
                write!(f, "invalid argument count: expected {}", expected)
            }
            Self::InvalidLength => write!(
                f,
                "invalid length: expected a decimal value up to {}",
                crate::MEM_SIZE
            ),
            Self::TruncatedPayload { declared, found } => write!(
                f,
                "truncated payload: declared {} bytes, got {}",
                declared, found
            ),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(e) => write!(f, "{}", e),
            Self::TransportFailure => write!(f, "SPI transfer failed"),
            Self::InvalidArgument => write!(f, "invalid argument"),
            Self::ChipUnresponsive => write!(f, "chip did not return to idle"),
            Self::BufferTooSmall => write!(f, "buffer too small"),
            Self::ReservedOpcode { opcode } => {
                write!(f, "CommandReg holds reserved opcode 0x{:X}", opcode)
            }
            Self::NotMfrc522 { found } => {
                write!(f, "not an MFRC522: VersionReg reads 0x{:02X}", found)
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ParseError {}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

/// Result type alias using the core Error type
pub type Result<T> = core::result::Result<T, Error>;
