//! MFRC522 register map (datasheet 9.2, table 20)

use bitflags::bitflags;

/// Registers used by the control core
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Register {
    /// CommandReg: starts and stops command execution (9.3.1.2)
    Command = 0x01,
    /// FIFODataReg: input and output of the 64-byte FIFO (9.3.1.10)
    FifoData = 0x09,
    /// FIFOLevelReg: number of bytes stored in the FIFO (9.3.1.11)
    FifoLevel = 0x0A,
    /// VersionReg: chip type and software version (9.3.4.8)
    Version = 0x37,
}

impl Register {
    /// 6-bit register address
    pub const fn addr(self) -> u8 {
        self as u8
    }

    /// Human-readable register name
    pub const fn name(self) -> &'static str {
        match self {
            Self::Command => "CommandReg",
            Self::FifoData => "FIFODataReg",
            Self::FifoLevel => "FIFOLevelReg",
            Self::Version => "VersionReg",
        }
    }
}

/// Bits of FIFOLevelReg holding the number of stored bytes
pub const FIFO_LEVEL_MASK: u8 = 0x7F;

bitflags! {
    /// FIFOLevelReg control bits
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct FifoLevelFlags: u8 {
        /// Immediately clears the FIFO buffer
        const FLUSH_BUFFER = 1 << 7;
    }
}

/// VersionReg value both known revisions are offset from
pub const VERSION_BASE: u8 = 0x90;

/// Chip revision as reported by VersionReg
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChipVersion {
    /// MFRC522 version 1.0 (0x91)
    V1,
    /// MFRC522 version 2.0 (0x92)
    V2,
    /// Anything else: the device on the bus is not an MFRC522
    Unknown(u8),
}

impl ChipVersion {
    /// Revision number, i.e. the register value minus [`VERSION_BASE`]
    pub const fn revision(&self) -> Option<u8> {
        match self {
            Self::V1 => Some(1),
            Self::V2 => Some(2),
            Self::Unknown(_) => None,
        }
    }

    /// Raw VersionReg value
    pub const fn raw(&self) -> u8 {
        match self {
            Self::V1 => VERSION_BASE + 1,
            Self::V2 => VERSION_BASE + 2,
            Self::Unknown(raw) => *raw,
        }
    }

    /// Whether the value identifies an MFRC522
    pub const fn is_mfrc522(&self) -> bool {
        !matches!(self, Self::Unknown(_))
    }
}

impl From<u8> for ChipVersion {
    fn from(raw: u8) -> Self {
        match raw {
            0x91 => Self::V1,
            0x92 => Self::V2,
            other => Self::Unknown(other),
        }
    }
}

impl core::fmt::Display for ChipVersion {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self.revision() {
            Some(rev) => write!(f, "{}", rev),
            None => write!(f, "{}", self.raw()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_decoding() {
        assert_eq!(ChipVersion::from(0x91), ChipVersion::V1);
        assert_eq!(ChipVersion::from(0x92).revision(), Some(2));
        assert_eq!(ChipVersion::from(0x12), ChipVersion::Unknown(0x12));
        assert!(!ChipVersion::from(0x00).is_mfrc522());
    }

    #[test]
    fn test_register_addresses_fit_address_byte() {
        for reg in [
            Register::Command,
            Register::FifoData,
            Register::FifoLevel,
            Register::Version,
        ] {
            assert!(reg.addr() <= crate::register::AddressByte::MAX_ADDR);
        }
    }
}
