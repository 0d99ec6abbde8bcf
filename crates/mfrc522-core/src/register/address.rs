//! SPI address byte (datasheet 8.1.2.3, table 8)
//!
//! ```text
//!   7     6  5  4  3  2  1     0
//! +----+-------------------+-----+
//! | RW |   register addr   |  0  |
//! +----+-------------------+-----+
//! ```

use super::Register;

/// Direction of a register transfer
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AccessMode {
    /// Write to the register
    Write,
    /// Read from the register
    Read,
}

impl AccessMode {
    /// Value of the mode bit
    pub const fn bit(self) -> u8 {
        match self {
            Self::Write => 0,
            Self::Read => 1,
        }
    }
}

/// Address byte prefixing every register transfer
///
/// Built fresh for each transfer and never stored.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AddressByte {
    addr: u8,
    mode: AccessMode,
}

impl AddressByte {
    /// Highest address representable in the 6-bit field
    pub const MAX_ADDR: u8 = 0x3F;

    const ADDR_SHIFT: u8 = 1;
    const MODE_SHIFT: u8 = 7;

    /// Build an address byte for `reg`
    pub const fn new(reg: Register, mode: AccessMode) -> Self {
        Self {
            addr: reg.addr(),
            mode,
        }
    }

    /// Build an address byte from a raw address, `None` if it needs more than 6 bits
    pub const fn from_raw(addr: u8, mode: AccessMode) -> Option<Self> {
        if addr > Self::MAX_ADDR {
            return None;
        }
        Some(Self { addr, mode })
    }

    /// Register address
    pub const fn addr(&self) -> u8 {
        self.addr
    }

    /// Transfer direction
    pub const fn mode(&self) -> AccessMode {
        self.mode
    }

    /// Encode to the wire format; bit 0 is always clear
    pub const fn to_byte(self) -> u8 {
        (self.mode.bit() << Self::MODE_SHIFT) | ((self.addr & Self::MAX_ADDR) << Self::ADDR_SHIFT)
    }

    /// Decode a wire byte, `None` if the reserved low bit is set
    pub const fn from_byte(byte: u8) -> Option<Self> {
        if byte & 1 != 0 {
            return None;
        }
        let mode = if byte >> Self::MODE_SHIFT == 1 {
            AccessMode::Read
        } else {
            AccessMode::Write
        };
        Some(Self {
            addr: (byte >> Self::ADDR_SHIFT) & Self::MAX_ADDR,
            mode,
        })
    }
}

impl From<AddressByte> for u8 {
    fn from(byte: AddressByte) -> u8 {
        byte.to_byte()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_version_byte() {
        let byte = AddressByte::new(Register::Version, AccessMode::Read);
        assert_eq!(byte.to_byte(), 0xEE);
    }

    #[test]
    fn test_write_fifo_data_byte() {
        let byte = AddressByte::new(Register::FifoData, AccessMode::Write);
        assert_eq!(byte.to_byte(), 0x12);
    }

    #[test]
    fn test_low_bit_always_clear() {
        for addr in 0..=AddressByte::MAX_ADDR {
            for mode in [AccessMode::Read, AccessMode::Write] {
                let byte = AddressByte::from_raw(addr, mode).unwrap().to_byte();
                assert_eq!(byte & 1, 0);
                assert_eq!(AddressByte::from_byte(byte), AddressByte::from_raw(addr, mode));
            }
        }
    }

    #[test]
    fn test_address_out_of_range() {
        assert!(AddressByte::from_raw(0x40, AccessMode::Read).is_none());
        assert!(AddressByte::from_byte(0x01).is_none());
    }
}
