//! mfrc522-core - Control core for the MFRC522 contactless reader
//!
//! This crate turns a small colon-delimited text protocol into MFRC522
//! register traffic. It is designed to be `no_std` compatible so the same
//! engine can sit behind a kernel-style character device, a CLI or a
//! microcontroller firmware.
//!
//! # Layers
//!
//! - [`transport`] - the SPI exchange the core consumes
//! - [`register`] - address byte, register map and command register layout
//! - [`protocol`] - register access, command state machine and FIFO manager
//! - [`command`] - command table and text parser
//! - [`device`] - device state, high-level operations, dispatcher and the
//!   write/read driver boundary
//!
//! # Features
//!
//! - `std` - Enable standard library support (includes `alloc`)
//! - `alloc` - Enable boxed transports
//!
//! # Example
//!
//! ```ignore
//! use mfrc522_core::device::{Driver, DriverConfig};
//!
//! fn version<T: mfrc522_core::transport::SpiTransport>(spi: T) {
//!     let mut driver = Driver::attach(spi, DriverConfig::default()).unwrap();
//!     driver.write(b"version").unwrap();
//!
//!     let mut answer = [0u8; 25];
//!     let len = driver.read(&mut answer);
//!     println!("revision {}", core::str::from_utf8(&answer[..len]).unwrap());
//! }
//! ```

#![no_std]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

#[cfg(feature = "alloc")]
extern crate alloc;

#[cfg(any(feature = "std", test))]
extern crate std;

pub mod command;
pub mod device;
pub mod error;
pub mod protocol;
pub mod register;
pub mod transport;

#[cfg(test)]
mod test_support;

pub use error::{Error, ParseError, Result};

/// Width of the chip's internal memory in bytes (datasheet 10.3.1.2)
pub const MEM_SIZE: usize = 25;

/// Capacity of the chip's FIFO buffer in bytes (datasheet 8.3)
pub const FIFO_SIZE: usize = 64;

/// Number of meaningful bytes produced by GenerateRandomID
pub const RANDOM_ID_SIZE: usize = 10;

/// Maximum length of a single text command
pub const MAX_INPUT_LEN: usize = 255;

/// Maximum SPI clock supported by the chip in Hz
pub const MAX_SPI_CLOCK_HZ: u32 = 1_000_000;
