//! Error types for the spidev transport

use mfrc522_core::Error as CoreError;
use thiserror::Error;

/// Linux SPI specific errors
#[derive(Debug, Error)]
pub enum LinuxSpiError {
    /// No `dev=` option was given
    #[error("No device specified. Use dev=/dev/spidevX.Y")]
    NoDevice,

    /// Opening the character device failed
    #[error("Failed to open {path}: {source}")]
    OpenFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// A spidev setting ioctl was rejected
    #[error("Failed to set {setting} to {value}: {source}")]
    ConfigureFailed {
        setting: &'static str,
        value: u32,
        #[source]
        source: std::io::Error,
    },

    /// The SPI_IOC_MESSAGE ioctl failed
    #[error("SPI transfer of {len} bytes failed: {source}")]
    TransferFailed {
        len: usize,
        #[source]
        source: std::io::Error,
    },

    /// An empty write phase was requested
    #[error("SPI transfer without an address byte")]
    EmptyFrame,

    /// A transport option could not be parsed
    #[error("Invalid {key} value: {value}")]
    InvalidOption { key: &'static str, value: String },
}

impl From<LinuxSpiError> for CoreError {
    fn from(e: LinuxSpiError) -> Self {
        log::error!("linux_spi: {}", e);
        CoreError::TransportFailure
    }
}

/// Result type for Linux SPI operations
pub type Result<T> = std::result::Result<T, LinuxSpiError>;
