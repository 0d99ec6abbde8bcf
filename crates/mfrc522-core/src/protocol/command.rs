//! Command/status state machine (datasheet 10.2)
//!
//! A command is started by writing CommandReg. The chip clears the opcode
//! back to Idle once it is done; there is no interrupt in this driver, so
//! completion is detected by polling CommandReg.
//!
//! ```text
//!            issue_command
//!   Idle ---------------------> Busy(cmd)
//!    ^                            |  reads back != Idle
//!    |      reads back Idle       |<-----------+
//!    +----------------------------+            |
//!                                 +------------+
//!                                 |
//!                                 | read fails / poll budget spent
//!                                 v
//!                               Error
//! ```

use crate::error::{Error, Result};
use crate::register::{ChipCommand, CommandByte, Register};
use crate::transport::SpiTransport;

use super::{read_register, write_register};

/// Observed state of the command engine
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CommandState {
    /// No command is running
    Idle,
    /// The chip is executing a command
    Busy(ChipCommand),
    /// The last command could not be observed to complete
    Error(Error),
}

/// Bounds of the completion poll
///
/// The chip has no completion interrupt wired up, so completion is polled.
/// The number of polls is `timeout_us / poll_delay_us`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PollConfig {
    /// Delay between two CommandReg reads, in microseconds
    pub poll_delay_us: u32,
    /// Total time to wait before giving up, in microseconds
    pub timeout_us: u32,
}

impl PollConfig {
    /// Create a new poll configuration
    pub const fn new(poll_delay_us: u32, timeout_us: u32) -> Self {
        Self {
            poll_delay_us,
            timeout_us,
        }
    }

    /// Number of CommandReg reads allowed, never less than one
    pub const fn max_polls(&self) -> u32 {
        let polls = if self.poll_delay_us > 0 {
            self.timeout_us / self.poll_delay_us
        } else {
            // Fall back to polling once per microsecond
            self.timeout_us
        };
        if polls == 0 {
            1
        } else {
            polls
        }
    }
}

impl Default for PollConfig {
    /// Mem and GenerateRandomID complete in well under a millisecond; poll
    /// every 10us for up to 50ms
    fn default() -> Self {
        Self::new(10, 50_000)
    }
}

/// Read the opcode currently held in CommandReg
///
/// Reserved opcodes are reported as [`Error::ReservedOpcode`].
pub fn read_current_command<T: SpiTransport + ?Sized>(spi: &mut T) -> Result<ChipCommand> {
    let raw = read_register(spi, Register::Command)?;
    ChipCommand::from_opcode(raw).ok_or_else(|| {
        let opcode = raw & ChipCommand::MASK;
        log::warn!("CommandReg holds reserved opcode 0x{:X}", opcode);
        Error::ReservedOpcode { opcode }
    })
}

/// Observe the command engine without starting anything
pub fn command_state<T: SpiTransport + ?Sized>(spi: &mut T) -> CommandState {
    match read_current_command(spi) {
        Ok(ChipCommand::Idle) => CommandState::Idle,
        Ok(cmd) => CommandState::Busy(cmd),
        Err(e) => CommandState::Error(e),
    }
}

/// Poll CommandReg until the chip reports Idle
pub fn wait_idle<T: SpiTransport + ?Sized>(spi: &mut T, poll: &PollConfig) -> Result<()> {
    for _ in 0..poll.max_polls() {
        let raw = read_register(spi, Register::Command)?;
        if raw & ChipCommand::MASK == ChipCommand::Idle.opcode() {
            return Ok(());
        }
        if poll.poll_delay_us > 0 {
            spi.delay_us(poll.poll_delay_us);
        }
    }

    log::error!("chip did not return to idle within {}us", poll.timeout_us);
    Err(Error::ChipUnresponsive)
}

/// Start `cmd` and wait for the chip to finish it
///
/// Packs `rcv_off` (bit 5), `power_down` (bit 4) and the opcode into one
/// CommandReg write, then polls until the chip is Idle again.
pub fn issue_command<T: SpiTransport + ?Sized>(
    spi: &mut T,
    rcv_off: bool,
    power_down: bool,
    cmd: ChipCommand,
    poll: &PollConfig,
) -> Result<()> {
    let byte = CommandByte::new(rcv_off, power_down, cmd);
    log::debug!("issuing {:?} (CommandReg <- 0x{:02X})", cmd, byte.to_byte());
    write_register(spi, Register::Command, byte.to_byte())?;
    wait_idle(spi, poll)
}
