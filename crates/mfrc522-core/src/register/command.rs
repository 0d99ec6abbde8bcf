//! CommandReg layout (datasheet 9.3.1.2) and command set (10.3)
//!
//! ```text
//!   7   6     5        4         3  2  1  0
//! +-------+--------+-----------+------------+
//! |   0   | RcvOff | PowerDown |  Command   |
//! +-------+--------+-----------+------------+
//! ```

use bitflags::bitflags;

/// MFRC522 command opcodes (datasheet 10.3, table 149)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ChipCommand {
    /// No action, cancels current command execution
    Idle = 0b0000,
    /// Stores 25 bytes into the internal buffer, or reads them back
    Mem = 0b0001,
    /// Generates a 10-byte random ID number
    GenerateRandomId = 0b0010,
    /// Activates the CRC coprocessor or performs a self test
    CalcCrc = 0b0011,
    /// Transmits data from the FIFO buffer
    Transmit = 0b0100,
    /// Modifies CommandReg bits without affecting the running command
    NoCmdChange = 0b0111,
    /// Activates the receiver circuits
    Receive = 0b1000,
    /// Transmits data from the FIFO and activates the receiver afterwards
    Transceive = 0b1100,
    /// Performs the MIFARE standard authentication as a reader
    MfAuthent = 0b1110,
    /// Resets the MFRC522
    SoftReset = 0b1111,
}

impl ChipCommand {
    /// Bits of CommandReg holding the opcode
    pub const MASK: u8 = 0x0F;

    /// 4-bit opcode
    pub const fn opcode(self) -> u8 {
        self as u8
    }

    /// Decode a 4-bit opcode; the upper nibble is ignored
    ///
    /// Returns `None` for the reserved values.
    pub const fn from_opcode(raw: u8) -> Option<Self> {
        match raw & Self::MASK {
            0b0000 => Some(Self::Idle),
            0b0001 => Some(Self::Mem),
            0b0010 => Some(Self::GenerateRandomId),
            0b0011 => Some(Self::CalcCrc),
            0b0100 => Some(Self::Transmit),
            0b0111 => Some(Self::NoCmdChange),
            0b1000 => Some(Self::Receive),
            0b1100 => Some(Self::Transceive),
            0b1110 => Some(Self::MfAuthent),
            0b1111 => Some(Self::SoftReset),
            _ => None,
        }
    }
}

bitflags! {
    /// CommandReg control bits
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct CommandFlags: u8 {
        /// Analog part of the receiver is switched off
        const RCV_OFF    = 1 << 5;
        /// Soft power-down mode entered
        const POWER_DOWN = 1 << 4;
    }
}

/// Value written to CommandReg to start a command
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CommandByte {
    /// Receiver / power flags
    pub flags: CommandFlags,
    /// Opcode
    pub command: ChipCommand,
}

impl CommandByte {
    /// Build a command byte
    pub const fn new(rcv_off: bool, power_down: bool, command: ChipCommand) -> Self {
        let mut bits = 0;
        if rcv_off {
            bits |= CommandFlags::RCV_OFF.bits();
        }
        if power_down {
            bits |= CommandFlags::POWER_DOWN.bits();
        }
        Self {
            flags: CommandFlags::from_bits_truncate(bits),
            command,
        }
    }

    /// Receiver on, power-down off: the mode every core operation uses
    pub const fn active(command: ChipCommand) -> Self {
        Self::new(false, false, command)
    }

    /// Encode to the register value
    pub const fn to_byte(self) -> u8 {
        self.flags.bits() | self.command.opcode()
    }

    /// Decode a register value, `None` if the opcode is reserved
    pub const fn from_byte(byte: u8) -> Option<Self> {
        match ChipCommand::from_opcode(byte) {
            Some(command) => Some(Self {
                flags: CommandFlags::from_bits_truncate(byte),
                command,
            }),
            None => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pack_flags() {
        assert_eq!(CommandByte::new(true, false, ChipCommand::Idle).to_byte(), 0x20);
        assert_eq!(CommandByte::new(false, true, ChipCommand::Idle).to_byte(), 0x10);
        assert_eq!(CommandByte::active(ChipCommand::Mem).to_byte(), 0x01);
        assert_eq!(
            CommandByte::new(true, true, ChipCommand::SoftReset).to_byte(),
            0x3F
        );
    }

    #[test]
    fn test_decode_ignores_upper_bits() {
        let byte = CommandByte::from_byte(0xA2).unwrap();
        assert_eq!(byte.command, ChipCommand::GenerateRandomId);
        assert!(byte.flags.contains(CommandFlags::RCV_OFF));
        assert!(!byte.flags.contains(CommandFlags::POWER_DOWN));
    }

    #[test]
    fn test_reserved_opcodes() {
        for raw in [0b0101, 0b0110, 0b1001, 0b1010, 0b1011, 0b1101] {
            assert_eq!(ChipCommand::from_opcode(raw), None);
        }
    }
}
