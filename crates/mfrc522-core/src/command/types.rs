//! Command types and the command table

use core::fmt;

use crate::MEM_SIZE;

/// Bounded command payload
pub type CommandData = heapless::Vec<u8, MEM_SIZE>;

/// High-level operation requested by the user
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Write up to 25 bytes into the chip's internal memory
    MemWrite,
    /// Read the chip's internal memory back
    MemRead,
    /// Query the chip revision
    GetVersion,
    /// Generate a 10-byte random ID
    GenRandom,
    /// Toggle the debug trace
    SetDebug,
}

impl Operation {
    /// Protocol name of the operation
    pub fn name(self) -> &'static str {
        COMMAND_TABLE
            .iter()
            .find(|entry| entry.operation == self)
            .map(|entry| entry.name)
            .unwrap_or("?")
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One row of the command table
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CommandTableEntry {
    /// Name typed by the user
    pub name: &'static str,
    /// Number of colon-separated fields following the name
    pub expected_arg_count: u8,
    /// Operation the name maps to
    pub operation: Operation,
}

/// Every command understood by the parser; names are unique
pub static COMMAND_TABLE: [CommandTableEntry; 5] = [
    CommandTableEntry {
        name: "mem_write",
        expected_arg_count: 2,
        operation: Operation::MemWrite,
    },
    CommandTableEntry {
        name: "mem_read",
        expected_arg_count: 0,
        operation: Operation::MemRead,
    },
    CommandTableEntry {
        name: "gen_rand_id",
        expected_arg_count: 0,
        operation: Operation::GenRandom,
    },
    CommandTableEntry {
        name: "version",
        expected_arg_count: 0,
        operation: Operation::GetVersion,
    },
    CommandTableEntry {
        name: "debug",
        expected_arg_count: 1,
        operation: Operation::SetDebug,
    },
];

/// Find a command by exact name
pub fn lookup(name: &[u8]) -> Option<&'static CommandTableEntry> {
    COMMAND_TABLE
        .iter()
        .find(|entry| entry.name.as_bytes() == name)
}

/// A parsed user command
///
/// Created once per input line and consumed by the dispatcher.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Command {
    operation: Operation,
    data: CommandData,
}

impl Command {
    /// Create a command carrying `data`
    ///
    /// Returns `None` if `data` is wider than the chip memory.
    pub fn new(operation: Operation, data: &[u8]) -> Option<Self> {
        let data = CommandData::from_slice(data).ok()?;
        Some(Self { operation, data })
    }

    /// Create a command without arguments
    pub const fn simple(operation: Operation) -> Self {
        Self {
            operation,
            data: CommandData::new(),
        }
    }

    /// Requested operation
    pub fn operation(&self) -> Operation {
        self.operation
    }

    /// Valid argument bytes
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Number of valid argument bytes
    pub fn data_len(&self) -> usize {
        self.data.len()
    }

    /// Argument zero-padded to the memory width
    pub fn padded(&self) -> [u8; MEM_SIZE] {
        let mut buf = [0u8; MEM_SIZE];
        buf[..self.data.len()].copy_from_slice(&self.data);
        buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_names_unique() {
        for (i, a) in COMMAND_TABLE.iter().enumerate() {
            for b in &COMMAND_TABLE[i + 1..] {
                assert_ne!(a.name, b.name);
                assert_ne!(a.operation, b.operation);
            }
        }
    }

    #[test]
    fn test_lookup_is_exact() {
        assert_eq!(lookup(b"version").unwrap().operation, Operation::GetVersion);
        assert!(lookup(b"Version").is_none());
        assert!(lookup(b"mem_rea").is_none());
        assert!(lookup(b"").is_none());
    }

    #[test]
    fn test_padding() {
        let cmd = Command::new(Operation::MemWrite, b"abc").unwrap();
        let padded = cmd.padded();
        assert_eq!(&padded[..3], b"abc");
        assert!(padded[3..].iter().all(|&b| b == 0));
        assert_eq!(cmd.data_len(), 3);
    }

    #[test]
    fn test_data_bounded() {
        assert!(Command::new(Operation::SetDebug, &[0u8; MEM_SIZE + 1]).is_none());
        assert!(Command::new(Operation::SetDebug, &[0u8; MEM_SIZE]).is_some());
    }
}
