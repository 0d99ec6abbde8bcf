//! Debug hex dump
//!
//! When debugging is on, memory traffic is logged as:
//!
//! ```text
//! WR
//! 61 62 63 00 00
//! 00 00
//! ```
//!
//! Each printed line holds at most five hex pairs and fits a 16-byte line
//! buffer.

use core::fmt::Write;

/// Hex pairs per printed line
pub const BYTES_PER_LINE: usize = 5;

/// Capacity of one rendered line
pub const LINE_CAPACITY: usize = 16;

/// One rendered dump line
pub type HexLine = heapless::String<LINE_CAPACITY>;

/// Direction of the dumped payload
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    /// Payload sent to the chip
    Write,
    /// Payload read from the chip
    Read,
}

impl Direction {
    /// Header line printed before the dump
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Write => "WR",
            Self::Read => "RD",
        }
    }
}

/// Iterator over the dump lines of a payload
pub struct HexDump<'a> {
    chunks: core::slice::Chunks<'a, u8>,
}

impl<'a> HexDump<'a> {
    /// Dump `bytes`
    pub fn new(bytes: &'a [u8]) -> Self {
        Self {
            chunks: bytes.chunks(BYTES_PER_LINE),
        }
    }
}

impl Iterator for HexDump<'_> {
    type Item = HexLine;

    fn next(&mut self) -> Option<HexLine> {
        let chunk = self.chunks.next()?;
        let mut line = HexLine::new();
        for (i, byte) in chunk.iter().enumerate() {
            if i > 0 {
                let _ = line.push(' ');
            }
            // Cannot fail: 5 pairs and 4 spaces fit in 16 bytes
            let _ = write!(line, "{:02x}", byte);
        }
        Some(line)
    }
}

/// Log `bytes` as a hex dump
pub fn dump(direction: Direction, bytes: &[u8]) {
    log::info!("{}", direction.tag());
    for line in HexDump::new(bytes) {
        log::info!("{}", line);
    }
}
