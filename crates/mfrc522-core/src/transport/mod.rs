//! Transport traits and abstractions
//!
//! This module defines the SPI exchange every transport must implement
//! for the core to talk to the chip.

mod traits;

pub use traits::*;
