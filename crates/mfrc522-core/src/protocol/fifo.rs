//! FIFO buffer manager (datasheet 8.3)
//!
//! The chip stages memory and random-ID data in a 64-byte FIFO reached
//! through FIFODataReg, with the fill level in FIFOLevelReg.

use crate::error::Result;
use crate::register::{FifoLevelFlags, Register, FIFO_LEVEL_MASK};
use crate::transport::SpiTransport;
use crate::FIFO_SIZE;

use super::{read_register, read_register_n, write_register};

/// Buffer sized to the hardware FIFO capacity
pub type FifoBuffer = heapless::Vec<u8, FIFO_SIZE>;

/// Mask a raw FIFOLevelReg value down to the byte count
///
/// Masking is idempotent: `mask_level(mask_level(x)) == mask_level(x)`.
pub const fn mask_level(raw: u8) -> u8 {
    raw & FIFO_LEVEL_MASK
}

/// Clear the FIFO
pub fn flush<T: SpiTransport + ?Sized>(spi: &mut T) -> Result<()> {
    write_register(spi, Register::FifoLevel, FifoLevelFlags::FLUSH_BUFFER.bits())
}

/// Number of bytes currently stored in the FIFO (0..=127)
pub fn level<T: SpiTransport + ?Sized>(spi: &mut T) -> Result<u8> {
    let level = mask_level(read_register(spi, Register::FifoLevel)?);
    log::debug!("FIFO level: {}", level);
    Ok(level)
}

/// Drain the FIFO into `buf`
///
/// Reads as many bytes as FIFOLevelReg reports. `buf` is cleared first and
/// holds exactly the bytes read on success. A level above the hardware
/// capacity can only come from a misbehaving bus; it is clamped to
/// [`FIFO_SIZE`].
pub fn read<T: SpiTransport + ?Sized>(spi: &mut T, buf: &mut FifoBuffer) -> Result<usize> {
    let mut count = level(spi)? as usize;
    if count > FIFO_SIZE {
        log::warn!(
            "FIFO level {} exceeds capacity, reading {} bytes",
            count,
            FIFO_SIZE
        );
        count = FIFO_SIZE;
    }

    buf.clear();
    // Cannot fail: count <= capacity
    let _ = buf.resize_default(count);
    read_register_n(spi, Register::FifoData, buf)?;

    Ok(count)
}

/// Push `data` into the FIFO, one register write per byte
///
/// Stops at the first failed transfer. The FIFO then holds a prefix of
/// `data` and must be considered indeterminate.
pub fn write<T: SpiTransport + ?Sized>(spi: &mut T, data: &[u8]) -> Result<()> {
    for (i, &byte) in data.iter().enumerate() {
        if let Err(e) = write_register(spi, Register::FifoData, byte) {
            log::error!("FIFO write failed after {} of {} bytes", i, data.len());
            return Err(e);
        }
    }
    Ok(())
}
