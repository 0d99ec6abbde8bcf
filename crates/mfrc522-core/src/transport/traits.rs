//! Transport trait definitions
//!
//! The core never clocks bytes itself. It hands a write buffer and a read
//! buffer to a [`SpiTransport`] and expects both phases to run with chip
//! select held for the whole exchange.

use crate::error::Result;

/// SPI transport used to reach the MFRC522
///
/// ## Example
///
/// ```ignore
/// impl SpiTransport for MyBus {
///     fn transfer(&mut self, write: &[u8], read: &mut [u8]) -> Result<()> {
///         self.cs_low();
///         self.send(write).map_err(|_| Error::TransportFailure)?;
///         self.receive(read).map_err(|_| Error::TransportFailure)?;
///         self.cs_high();
///         Ok(())
///     }
///
///     fn delay_us(&mut self, us: u32) {
///         self.timer.delay_us(us)
///     }
/// }
/// ```
pub trait SpiTransport {
    /// Write `write`, then clock in `read.len()` bytes
    ///
    /// A write-only exchange passes an empty `read` buffer. Any failure must
    /// be reported as [`crate::Error::TransportFailure`].
    fn transfer(&mut self, write: &[u8], read: &mut [u8]) -> Result<()>;

    /// Maximum SPI clock the transport runs at, in Hz
    fn speed_hz(&self) -> u32 {
        crate::MAX_SPI_CLOCK_HZ
    }

    /// Delay for the specified number of microseconds
    fn delay_us(&mut self, us: u32);
}

impl<T: SpiTransport + ?Sized> SpiTransport for &mut T {
    fn transfer(&mut self, write: &[u8], read: &mut [u8]) -> Result<()> {
        (**self).transfer(write, read)
    }

    fn speed_hz(&self) -> u32 {
        (**self).speed_hz()
    }

    fn delay_us(&mut self, us: u32) {
        (**self).delay_us(us)
    }
}

// Blanket impl for boxed transports to allow trait objects
#[cfg(feature = "alloc")]
impl SpiTransport for alloc::boxed::Box<dyn SpiTransport + Send> {
    fn transfer(&mut self, write: &[u8], read: &mut [u8]) -> Result<()> {
        (**self).transfer(write, read)
    }

    fn speed_hz(&self) -> u32 {
        (**self).speed_hz()
    }

    fn delay_us(&mut self, us: u32) {
        (**self).delay_us(us)
    }
}

/// Information about a transport
#[derive(Debug, Clone)]
pub struct TransportInfo {
    /// Name of the transport
    pub name: &'static str,
    /// Alternative names/aliases
    pub aliases: &'static [&'static str],
    /// Description, including accepted options
    pub description: &'static str,
    /// Whether this transport requires elevated privileges
    pub requires_root: bool,
}
