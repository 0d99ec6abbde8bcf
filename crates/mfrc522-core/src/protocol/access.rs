//! Register access over SPI (datasheet 8.1.2)
//!
//! Every transfer starts with an [`AddressByte`]. Reads send the address
//! byte and clock in one byte; writes send the address byte immediately
//! followed by the value.

use crate::error::Result;
use crate::register::{AccessMode, AddressByte, Register};
use crate::transport::SpiTransport;

/// Read a single register
pub fn read_register<T: SpiTransport + ?Sized>(spi: &mut T, reg: Register) -> Result<u8> {
    let addr = AddressByte::new(reg, AccessMode::Read).to_byte();
    let mut value = [0u8; 1];
    spi.transfer(&[addr], &mut value)?;
    log::trace!("read {} -> 0x{:02X}", reg.name(), value[0]);
    Ok(value[0])
}

/// Read `buf.len()` bytes from the same register
///
/// The address byte is re-sent for every byte: the chip only auto-increments
/// for some registers and this driver never relies on it. A failure on any
/// byte fails the whole read.
pub fn read_register_n<T: SpiTransport + ?Sized>(
    spi: &mut T,
    reg: Register,
    buf: &mut [u8],
) -> Result<()> {
    let addr = [AddressByte::new(reg, AccessMode::Read).to_byte()];
    for byte in buf.iter_mut() {
        let mut value = [0u8; 1];
        spi.transfer(&addr, &mut value)?;
        *byte = value[0];
    }
    log::trace!("read {} bytes from {}", buf.len(), reg.name());
    Ok(())
}

/// Write a single register
pub fn write_register<T: SpiTransport + ?Sized>(
    spi: &mut T,
    reg: Register,
    value: u8,
) -> Result<()> {
    let frame = [AddressByte::new(reg, AccessMode::Write).to_byte(), value];
    log::trace!("write {} <- 0x{:02X}", reg.name(), value);
    spi.transfer(&frame, &mut [])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::test_support::MockTransport;

    #[test]
    fn test_read_register_frames_address_byte() {
        let mut spi = MockTransport::new();
        spi.set_register(Register::Version, 0x92);

        assert_eq!(read_register(&mut spi, Register::Version).unwrap(), 0x92);
        assert_eq!(spi.frames()[0].as_slice(), &[0xEE]);
    }

    #[test]
    fn test_read_register_n_resends_address() {
        let mut spi = MockTransport::new();
        spi.script_reads(Register::FifoData, &[1, 2, 3]);

        let mut buf = [0u8; 3];
        read_register_n(&mut spi, Register::FifoData, &mut buf).unwrap();

        assert_eq!(buf, [1, 2, 3]);
        assert_eq!(spi.transfer_count(), 3);
        assert!(spi.frames().iter().all(|f| f.as_slice() == [0x92]));
    }

    #[test]
    fn test_read_register_n_fails_whole_read() {
        let mut spi = MockTransport::new();
        spi.fail_at(2);

        let mut buf = [0u8; 4];
        assert_eq!(
            read_register_n(&mut spi, Register::FifoData, &mut buf),
            Err(Error::TransportFailure)
        );
    }

    #[test]
    fn test_write_register_sends_two_bytes() {
        let mut spi = MockTransport::new();
        write_register(&mut spi, Register::FifoLevel, 0x80).unwrap();

        assert_eq!(spi.frames()[0].as_slice(), &[0x14, 0x80]);
    }
}
