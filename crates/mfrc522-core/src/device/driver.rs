//! Driver boundary
//!
//! A [`Driver`] owns one transport and one [`DeviceState`]. The host hands
//! it raw command lines through [`Driver::write`] and collects the answer
//! through [`Driver::read`]. Both take `&mut self`, so a driver is never
//! shared between concurrent callers without an outer lock.

use crate::command;
use crate::error::{Error, Result};
use crate::protocol::PollConfig;
use crate::register::ChipVersion;
use crate::transport::SpiTransport;
use crate::MAX_SPI_CLOCK_HZ;

use super::dispatch::Dispatcher;
use super::state::DeviceState;

/// Driver tunables
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DriverConfig {
    /// Command completion polling
    pub poll: PollConfig,
}

/// One attached MFRC522
pub struct Driver<T: SpiTransport> {
    spi: T,
    state: DeviceState,
    config: DriverConfig,
    dispatcher: Dispatcher,
    version: Option<ChipVersion>,
}

impl<T: SpiTransport> Driver<T> {
    /// Wrap `spi` without talking to the chip
    pub fn new(spi: T, config: DriverConfig) -> Self {
        Self {
            spi,
            state: DeviceState::new(),
            config,
            dispatcher: Dispatcher::new(),
            version: None,
        }
    }

    /// Wrap `spi` after checking that an MFRC522 answers on it
    pub fn attach(spi: T, config: DriverConfig) -> Result<Self> {
        let mut driver = Self::new(spi, config);

        let speed = driver.spi.speed_hz();
        if speed > MAX_SPI_CLOCK_HZ {
            log::warn!(
                "SPI clock {} Hz exceeds the {} Hz the chip is driven at",
                speed,
                MAX_SPI_CLOCK_HZ
            );
        }

        let version = crate::device::ops::get_version(&mut driver.spi)?;
        if !version.is_mfrc522() {
            log::error!("VersionReg reads 0x{:02x}, not an MFRC522", version.raw());
            return Err(Error::NotMfrc522 {
                found: version.raw(),
            });
        }

        log::info!("MFRC522 revision {} attached", version);
        driver.version = Some(version);
        Ok(driver)
    }

    /// Replace the dispatcher
    pub fn with_dispatcher(mut self, dispatcher: Dispatcher) -> Self {
        self.dispatcher = dispatcher;
        self
    }

    /// Parse and run one command line
    ///
    /// On success the answer is stored for the next [`Driver::read`] and the
    /// number of consumed input bytes is returned. Parse errors happen
    /// before any bus traffic.
    pub fn write(&mut self, input: &[u8]) -> Result<usize> {
        let cmd = command::parse(input).map_err(|e| {
            log::warn!("rejected command: {}", e);
            e
        })?;
        log::debug!("{} ({} data bytes)", cmd.operation(), cmd.data_len());

        let answer = self
            .dispatcher
            .execute(&mut self.state, &mut self.spi, &cmd, &self.config.poll)
            .map_err(|e| {
                log::error!("{} failed: {}", cmd.operation(), e);
                e
            })?;

        self.state.answer.store(&answer);
        Ok(input.len())
    }

    /// Copy the pending answer into `buf`
    ///
    /// Returns 0 when no answer is pending. The answer is consumed either way.
    pub fn read(&mut self, buf: &mut [u8]) -> usize {
        self.state.answer.take(buf)
    }

    /// Device state
    pub fn state(&self) -> &DeviceState {
        &self.state
    }

    /// Chip version found at attach time
    pub fn version(&self) -> Option<ChipVersion> {
        self.version
    }

    /// Active configuration
    pub fn config(&self) -> &DriverConfig {
        &self.config
    }

    /// Underlying transport
    pub fn transport(&self) -> &T {
        &self.spi
    }

    /// Underlying transport, mutably
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.spi
    }

    /// Release the transport
    pub fn into_transport(self) -> T {
        self.spi
    }
}
