//! mfrc522-linux-spi - Linux spidev transport
//!
//! This crate lets the MFRC522 control core talk to a reader wired to an
//! SPI controller exposed as `/dev/spidevX.Y`.
//!
//! # Example
//!
//! ```no_run
//! use mfrc522_core::device::{Driver, DriverConfig};
//! use mfrc522_linux_spi::{LinuxSpi, LinuxSpiConfig};
//!
//! let config = LinuxSpiConfig::new("/dev/spidev0.0").with_speed(500_000);
//! let spi = LinuxSpi::open(&config)?;
//!
//! let mut driver = Driver::attach(spi, DriverConfig::default())?;
//! driver.write(b"version")?;
//! let mut answer = [0u8; 25];
//! let len = driver.read(&mut answer);
//! println!("revision {}", String::from_utf8_lossy(&answer[..len]));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Usage with the mfrc522 CLI
//!
//! ```bash
//! # Detect the chip
//! mfrc522 probe -p linux_spi:dev=/dev/spidev0.0
//!
//! # Run commands at 500 kHz
//! mfrc522 exec -p linux_spi:dev=/dev/spidev0.0,spispeed=500 version gen_rand_id
//! ```
//!
//! The MFRC522 accepts at most 10 Mbit/s on SPI, but the clock is capped at
//! 1 MHz here; faster `spispeed` values are clamped with a warning.
//!
//! # System Requirements
//!
//! - Linux kernel with spidev support enabled (`CONFIG_SPI_SPIDEV`)
//! - Read/write access to `/dev/spidevX.Y` device

pub mod device;
pub mod error;

pub use device::{mode, parse_options, LinuxSpi, LinuxSpiConfig};
pub use error::{LinuxSpiError, Result};
