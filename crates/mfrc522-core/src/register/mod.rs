//! Register-level types
//!
//! This module provides the SPI address byte, the register map and the
//! layout of the Command register.

mod address;
mod command;
mod map;

pub use address::{AccessMode, AddressByte};
pub use command::{ChipCommand, CommandByte, CommandFlags};
pub use map::{ChipVersion, FifoLevelFlags, Register, FIFO_LEVEL_MASK, VERSION_BASE};
