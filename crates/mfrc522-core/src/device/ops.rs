//! High-level operations
//!
//! Each operation is a fixed sequence of FIFO and command primitives. They
//! all run with the receiver on and power-down off.

use core::fmt::Write;

use crate::error::{Error, Result};
use crate::protocol::{self, fifo, FifoBuffer, PollConfig};
use crate::register::{ChipCommand, ChipVersion, Register};
use crate::transport::SpiTransport;
use crate::{MEM_SIZE, RANDOM_ID_SIZE};

use super::state::{DeviceState, Statistics};

/// A generated random ID
pub type RandomId = [u8; RANDOM_ID_SIZE];

/// Hex rendering of a [`RandomId`]
pub type RandomIdHex = heapless::String<{ RANDOM_ID_SIZE * 2 }>;

fn issue<T: SpiTransport + ?Sized>(spi: &mut T, cmd: ChipCommand, poll: &PollConfig) -> Result<()> {
    protocol::issue_command(spi, false, false, cmd, poll)
}

/// Read VersionReg
pub fn get_version<T: SpiTransport + ?Sized>(spi: &mut T) -> Result<ChipVersion> {
    let raw = protocol::read_register(spi, Register::Version)?;
    Ok(ChipVersion::from(raw))
}

/// Read the 25-byte internal memory back through the FIFO
///
/// Returns the number of bytes drained from the FIFO, which is added to
/// `stats.bytes_read`.
pub fn mem_read<T: SpiTransport + ?Sized>(
    spi: &mut T,
    stats: &mut Statistics,
    poll: &PollConfig,
    buf: &mut FifoBuffer,
) -> Result<usize> {
    fifo::flush(spi)?;
    issue(spi, ChipCommand::Mem, poll)?;

    let count = fifo::read(spi, buf).map_err(|e| {
        log::error!("reading the internal memory failed: {}", e);
        e
    })?;

    log::info!("read {} bytes from memory", count);
    stats.bytes_read += count as u64;
    Ok(count)
}

/// Store `data` in the internal memory, zero-padded to 25 bytes
///
/// The first failed FIFO write aborts the whole operation: the Mem command
/// is not issued and `stats.bytes_written` is left untouched.
pub fn mem_write<T: SpiTransport + ?Sized>(
    spi: &mut T,
    stats: &mut Statistics,
    poll: &PollConfig,
    data: &[u8],
) -> Result<()> {
    if data.len() > MEM_SIZE {
        return Err(Error::BufferTooSmall);
    }

    fifo::write(spi, data)?;
    for _ in data.len()..MEM_SIZE {
        fifo::write(spi, &[0])?;
    }

    issue(spi, ChipCommand::Mem, poll)?;

    log::info!("wrote {} bytes to memory", data.len());
    stats.bytes_written += MEM_SIZE as u64;
    Ok(())
}

/// Have the chip generate a 10-byte random ID
///
/// Clears the internal memory, runs GenerateRandomID and reads the memory
/// back. Any failing step fails the operation.
pub fn generate_random_id<T: SpiTransport + ?Sized>(
    spi: &mut T,
    stats: &mut Statistics,
    poll: &PollConfig,
) -> Result<RandomId> {
    mem_write(spi, stats, poll, &[0u8; MEM_SIZE])?;
    issue(spi, ChipCommand::GenerateRandomId, poll)?;

    let mut buf = FifoBuffer::new();
    let count = mem_read(spi, stats, poll, &mut buf)?;
    if count < RANDOM_ID_SIZE {
        log::warn!(
            "memory returned {} bytes, expected at least {}",
            count,
            RANDOM_ID_SIZE
        );
    }

    let mut id = [0u8; RANDOM_ID_SIZE];
    let len = count.min(RANDOM_ID_SIZE);
    id[..len].copy_from_slice(&buf[..len]);

    log::info!("generated random ID: {}", format_random_id(&id));
    Ok(id)
}

/// Render a random ID as 20 uppercase hex digits
pub fn format_random_id(id: &RandomId) -> RandomIdHex {
    let mut out = RandomIdHex::new();
    for byte in id {
        // Cannot fail: capacity is exactly two digits per byte
        let _ = write!(out, "{:02X}", byte);
    }
    out
}

/// Switch the debug trace on or off
///
/// Only the exact arguments `on` and `off` are accepted.
pub fn set_debug(state: &mut DeviceState, arg: &[u8]) -> Result<()> {
    state.debug_on = match arg {
        b"on" => true,
        b"off" => false,
        _ => return Err(Error::InvalidArgument),
    };
    log::info!("debug {}", if state.debug_on { "on" } else { "off" });
    Ok(())
}
