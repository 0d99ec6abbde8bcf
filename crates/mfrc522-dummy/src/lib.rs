//! mfrc522-dummy - In-memory MFRC522 emulator for testing
//!
//! This crate provides a transport that answers like an MFRC522 sitting on
//! the other end of the bus. It emulates the register file, the 64-byte
//! FIFO, the 25-byte internal memory and the two commands the control core
//! drives (Mem and GenerateRandomID), so the whole write/read path can be
//! exercised without hardware.
//!
//! Faults can be injected through [`DummyConfig`]: a transfer budget after
//! which every exchange fails, a number of polls a command stays busy, or a
//! chip that never returns to Idle.

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "alloc")]
extern crate alloc;

#[cfg(feature = "alloc")]
use alloc::collections::VecDeque;

use mfrc522_core::error::{Error, Result};
use mfrc522_core::register::{
    AccessMode, AddressByte, ChipCommand, CommandFlags, FifoLevelFlags, Register,
};
use mfrc522_core::transport::SpiTransport;
use mfrc522_core::{FIFO_SIZE, MEM_SIZE, RANDOM_ID_SIZE};

/// Seed used when none (or zero) is configured
const DEFAULT_SEED: u64 = 0x2545_F491_4F6C_DD1D;

/// Configuration for the emulated chip
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DummyConfig {
    /// Value of VersionReg
    pub version: u8,
    /// Number of CommandReg reads a command stays busy before going Idle
    pub busy_polls: u32,
    /// Fail every transfer from this (0-based) transfer index on
    pub fail_after: Option<usize>,
    /// Never return to Idle once a command was started
    pub stuck: bool,
    /// Seed of the random ID generator
    pub seed: u64,
}

impl Default for DummyConfig {
    fn default() -> Self {
        Self {
            version: 0x92, // MFRC522 v2.0
            busy_polls: 0,
            fail_after: None,
            stuck: false,
            seed: DEFAULT_SEED,
        }
    }
}

/// Emulated MFRC522
#[cfg(feature = "alloc")]
pub struct DummyMfrc522 {
    config: DummyConfig,
    regs: [u8; 64],
    fifo: VecDeque<u8>,
    memory: [u8; MEM_SIZE],
    running: Option<ChipCommand>,
    busy_left: u32,
    rng: u64,
    transfers: usize,
}

#[cfg(feature = "alloc")]
impl DummyMfrc522 {
    /// Create a new emulated chip with the given configuration
    pub fn new(config: DummyConfig) -> Self {
        let rng = if config.seed == 0 {
            DEFAULT_SEED
        } else {
            config.seed
        };
        Self {
            config,
            regs: [0; 64],
            fifo: VecDeque::with_capacity(FIFO_SIZE),
            memory: [0; MEM_SIZE],
            running: None,
            busy_left: 0,
            rng,
            transfers: 0,
        }
    }

    /// Create an MFRC522 v2.0 that completes every command at once
    pub fn new_default() -> Self {
        Self::new(DummyConfig::default())
    }

    /// Create a chip whose internal memory is pre-filled
    pub fn with_memory(config: DummyConfig, initial: &[u8]) -> Self {
        let mut chip = Self::new(config);
        let len = core::cmp::min(initial.len(), MEM_SIZE);
        chip.memory[..len].copy_from_slice(&initial[..len]);
        chip
    }

    /// Content of the internal memory
    pub fn memory(&self) -> &[u8; MEM_SIZE] {
        &self.memory
    }

    /// Bytes currently in the FIFO
    pub fn fifo_len(&self) -> usize {
        self.fifo.len()
    }

    /// Number of transfers attempted so far, failed ones included
    pub fn transfer_count(&self) -> usize {
        self.transfers
    }

    /// Get the configuration
    pub fn config(&self) -> &DummyConfig {
        &self.config
    }

    fn next_random(&mut self) -> u8 {
        // xorshift64
        let mut x = self.rng;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.rng = x;
        (x >> 32) as u8
    }

    fn read_register(&mut self, addr: u8) -> u8 {
        match addr {
            a if a == Register::FifoData.addr() => self.fifo.pop_front().unwrap_or(0),
            a if a == Register::FifoLevel.addr() => self.fifo.len() as u8,
            a if a == Register::Version.addr() => self.config.version,
            a if a == Register::Command.addr() => self.read_command(),
            a => self.regs[a as usize],
        }
    }

    fn read_command(&mut self) -> u8 {
        let flags = self.regs[Register::Command.addr() as usize];
        let Some(cmd) = self.running else {
            return flags;
        };

        if self.config.stuck {
            return flags | cmd.opcode();
        }
        if self.busy_left > 0 {
            self.busy_left -= 1;
            return flags | cmd.opcode();
        }

        self.running = None;
        flags
    }

    fn write_register(&mut self, addr: u8, value: u8) {
        match addr {
            a if a == Register::FifoData.addr() => {
                if self.fifo.len() < FIFO_SIZE {
                    self.fifo.push_back(value);
                } else {
                    log::warn!("dummy: FIFO overflow, dropping 0x{:02x}", value);
                }
            }
            a if a == Register::FifoLevel.addr() => {
                if FifoLevelFlags::from_bits_truncate(value).contains(FifoLevelFlags::FLUSH_BUFFER)
                {
                    self.fifo.clear();
                }
            }
            a if a == Register::Version.addr() => {
                log::debug!("dummy: ignoring write to read-only VersionReg");
            }
            a if a == Register::Command.addr() => self.start_command(value),
            a => self.regs[a as usize] = value,
        }
    }

    fn start_command(&mut self, value: u8) {
        let flags = CommandFlags::from_bits_truncate(value);
        self.regs[Register::Command.addr() as usize] = flags.bits();

        let Some(cmd) = ChipCommand::from_opcode(value) else {
            log::warn!("dummy: reserved command opcode 0x{:x}", value & ChipCommand::MASK);
            return;
        };

        match cmd {
            ChipCommand::Mem => self.run_mem(),
            ChipCommand::GenerateRandomId => {
                for i in 0..RANDOM_ID_SIZE {
                    self.memory[i] = self.next_random();
                }
            }
            ChipCommand::SoftReset => {
                self.regs = [0; 64];
                self.fifo.clear();
            }
            ChipCommand::NoCmdChange => return,
            _ => {}
        }

        if cmd == ChipCommand::Idle {
            self.running = None;
        } else {
            self.running = Some(cmd);
            self.busy_left = self.config.busy_polls;
        }
    }

    /// Mem moves 25 bytes FIFO -> memory, or memory -> FIFO when the FIFO is empty
    fn run_mem(&mut self) {
        if self.fifo.is_empty() {
            self.fifo.extend(self.memory.iter().copied());
        } else if self.fifo.len() >= MEM_SIZE {
            for slot in self.memory.iter_mut() {
                *slot = self.fifo.pop_front().unwrap_or(0);
            }
        } else {
            log::warn!(
                "dummy: Mem with {} bytes in FIFO, need {}",
                self.fifo.len(),
                MEM_SIZE
            );
        }
    }
}

#[cfg(feature = "alloc")]
impl SpiTransport for DummyMfrc522 {
    fn transfer(&mut self, write: &[u8], read: &mut [u8]) -> Result<()> {
        let index = self.transfers;
        self.transfers += 1;
        if self.config.fail_after.is_some_and(|n| index >= n) {
            log::debug!("dummy: injected failure on transfer {}", index);
            return Err(Error::TransportFailure);
        }

        let Some((&header, data)) = write.split_first() else {
            return Err(Error::TransportFailure);
        };
        let header = AddressByte::from_byte(header).ok_or(Error::TransportFailure)?;

        match header.mode() {
            AccessMode::Read => {
                for byte in read.iter_mut() {
                    *byte = self.read_register(header.addr());
                }
            }
            AccessMode::Write => {
                for &value in data {
                    self.write_register(header.addr(), value);
                }
            }
        }
        Ok(())
    }

    fn delay_us(&mut self, _us: u32) {
        // No delay needed for in-memory operations
    }
}

#[cfg(feature = "std")]
fn parse_u64(value: &str) -> Option<u64> {
    match value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16).ok(),
        None => value.parse().ok(),
    }
}

#[cfg(feature = "std")]
fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Parse transport options from a list of key-value pairs
///
/// Accepted keys: `version`, `busy`, `fail_after`, `stuck`, `seed`. Numbers
/// may be decimal or `0x`-prefixed hex.
#[cfg(feature = "std")]
pub fn parse_options(options: &[(&str, &str)]) -> std::result::Result<DummyConfig, String> {
    let mut config = DummyConfig::default();

    for (key, value) in options {
        match *key {
            "version" => {
                config.version = parse_u64(value)
                    .and_then(|v| u8::try_from(v).ok())
                    .ok_or_else(|| format!("Invalid version value: {}", value))?;
            }
            "busy" => {
                config.busy_polls = parse_u64(value)
                    .and_then(|v| u32::try_from(v).ok())
                    .ok_or_else(|| format!("Invalid busy value: {}", value))?;
            }
            "fail_after" => {
                config.fail_after = Some(
                    parse_u64(value)
                        .and_then(|v| usize::try_from(v).ok())
                        .ok_or_else(|| format!("Invalid fail_after value: {}", value))?,
                );
            }
            "stuck" => {
                config.stuck =
                    parse_bool(value).ok_or_else(|| format!("Invalid stuck value: {}", value))?;
            }
            "seed" => {
                config.seed =
                    parse_u64(value).ok_or_else(|| format!("Invalid seed value: {}", value))?;
            }
            _ => {
                log::warn!("dummy: Unknown option: {}={}", key, value);
            }
        }
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mfrc522_core::device::{Driver, DriverConfig};
    use mfrc522_core::protocol::{self, fifo, PollConfig};
    use mfrc522_core::register::ChipVersion;
    use mfrc522_core::ParseError;

    fn answer<T: SpiTransport>(driver: &mut Driver<T>) -> Vec<u8> {
        let mut buf = [0u8; MEM_SIZE];
        let len = driver.read(&mut buf);
        buf[..len].to_vec()
    }

    fn attach(config: DummyConfig) -> Driver<DummyMfrc522> {
        Driver::attach(DummyMfrc522::new(config), DriverConfig::default()).unwrap()
    }

    #[test]
    fn test_version_query() {
        let mut driver = attach(DummyConfig {
            version: 0x91,
            ..Default::default()
        });
        assert_eq!(driver.version(), Some(ChipVersion::V1));

        assert_eq!(driver.write(b"version"), Ok(7));
        assert_eq!(answer(&mut driver), b"1");
    }

    #[test]
    fn test_attach_rejects_foreign_chip() {
        let chip = DummyMfrc522::new(DummyConfig {
            version: 0x12,
            ..Default::default()
        });
        assert!(matches!(
            Driver::attach(chip, DriverConfig::default()),
            Err(Error::NotMfrc522 { found: 0x12 })
        ));
    }

    #[test]
    fn test_mem_write_then_read() {
        let mut driver = attach(DummyConfig::default());

        driver.write(b"mem_write:3:abc").unwrap();
        assert!(answer(&mut driver).is_empty());
        assert_eq!(driver.state().stats().bytes_written, MEM_SIZE as u64);
        assert_eq!(&driver.transport().memory()[..3], b"abc");

        driver.write(b"mem_read").unwrap();
        let mut expected = [0u8; MEM_SIZE];
        expected[..3].copy_from_slice(b"abc");
        assert_eq!(answer(&mut driver), expected);
        assert_eq!(driver.state().stats().bytes_read, MEM_SIZE as u64);
        assert_eq!(driver.transport().fifo_len(), 0);
    }

    #[test]
    fn test_payload_may_contain_separator() {
        let mut driver = attach(DummyConfig::default());
        driver.write(b"mem_write:5:a:b:c\n").unwrap();
        assert_eq!(&driver.transport().memory()[..5], b"a:b:c");
    }

    #[test]
    fn test_transport_failure_mid_write() {
        let mut chip = DummyMfrc522::with_memory(DummyConfig::default(), b"keep");
        // Attach reads VersionReg once, then five FIFO bytes go through
        chip.config.fail_after = Some(6);
        let mut driver = Driver::attach(chip, DriverConfig::default()).unwrap();

        let err = driver.write(b"mem_write:3:abc").unwrap_err();
        assert_eq!(err, Error::TransportFailure);
        assert_eq!(err.status(), -mfrc522_core::error::EBADE);
        assert_eq!(driver.state().stats().bytes_written, 0);
        assert_eq!(&driver.transport().memory()[..4], b"keep");
        assert_eq!(driver.transport().fifo_len(), 5);
        assert!(answer(&mut driver).is_empty());
    }

    #[test]
    fn test_oversized_length_never_touches_bus() {
        let mut driver = attach(DummyConfig::default());
        let before = driver.transport().transfer_count();

        let err = driver.write(b"mem_write:26:abc").unwrap_err();
        assert_eq!(err, Error::Parse(ParseError::InvalidLength));
        assert_eq!(err.status(), -mfrc522_core::error::EINVAL);
        assert_eq!(driver.transport().transfer_count(), before);
    }

    #[test]
    fn test_debug_toggle() {
        let mut driver = attach(DummyConfig::default());

        driver.write(b"debug:on").unwrap();
        assert!(driver.state().debug_on());
        driver.write(b"mem_write:2:hi").unwrap();
        driver.write(b"mem_read").unwrap();
        assert_eq!(&answer(&mut driver)[..2], b"hi");

        assert_eq!(driver.write(b"debug:loud"), Err(Error::InvalidArgument));
        assert!(driver.state().debug_on());
        driver.write(b"debug:off").unwrap();
        assert!(!driver.state().debug_on());
    }

    #[test]
    fn test_random_id() {
        let mut driver = attach(DummyConfig {
            seed: 42,
            ..Default::default()
        });

        driver.write(b"gen_rand_id").unwrap();
        let id = answer(&mut driver);
        assert_eq!(id.len(), RANDOM_ID_SIZE * 2);
        assert!(id
            .iter()
            .all(|c| c.is_ascii_digit() || (b'A'..=b'F').contains(c)));
        assert!(driver.transport().memory()[RANDOM_ID_SIZE..]
            .iter()
            .all(|&b| b == 0));

        // Same seed, same ID
        let mut again = attach(DummyConfig {
            seed: 42,
            ..Default::default()
        });
        again.write(b"gen_rand_id").unwrap();
        assert_eq!(answer(&mut again), id);
    }

    fn assert_random_id_fails(config: DummyConfig) -> Error {
        let mut driver = attach(config);

        let err = driver.write(b"gen_rand_id").unwrap_err();
        assert_eq!(err.status(), -mfrc522_core::error::EBADE);
        assert!(!driver.state().answer().is_full());
        assert!(answer(&mut driver).is_empty());
        err
    }

    // Transfer 0 is the VersionReg read done by attach. gen_rand_id then
    // uses 1..=25 for the zero fill, 26..=27 for Mem, 28..=29 for
    // GenerateRandomID, 30..=32 for flush and Mem, 33 for the FIFO level
    // and 34.. for the read-back.
    #[test]
    fn test_random_id_fails_during_zero_fill() {
        let err = assert_random_id_fails(DummyConfig {
            fail_after: Some(10),
            ..Default::default()
        });
        assert_eq!(err, Error::TransportFailure);
    }

    #[test]
    fn test_random_id_fails_on_generate_command() {
        let err = assert_random_id_fails(DummyConfig {
            fail_after: Some(28),
            ..Default::default()
        });
        assert_eq!(err, Error::TransportFailure);
    }

    #[test]
    fn test_random_id_fails_during_read_back() {
        for fail_after in [33, 40] {
            let err = assert_random_id_fails(DummyConfig {
                fail_after: Some(fail_after),
                ..Default::default()
            });
            assert_eq!(err, Error::TransportFailure);
        }
    }

    #[test]
    fn test_random_id_on_stuck_chip() {
        let err = assert_random_id_fails(DummyConfig {
            stuck: true,
            ..Default::default()
        });
        assert_eq!(err, Error::ChipUnresponsive);
    }

    #[test]
    fn test_busy_chip_completes() {
        let mut chip = DummyMfrc522::new(DummyConfig {
            busy_polls: 3,
            ..Default::default()
        });
        protocol::issue_command(
            &mut chip,
            false,
            false,
            ChipCommand::Mem,
            &PollConfig::default(),
        )
        .unwrap();
        // One write, three busy reads, one idle read
        assert_eq!(chip.transfer_count(), 5);
        assert_eq!(fifo::level(&mut chip), Ok(MEM_SIZE as u8));
    }

    #[test]
    fn test_stuck_chip_times_out() {
        let chip = DummyMfrc522::new(DummyConfig {
            stuck: true,
            ..Default::default()
        });
        let config = DriverConfig {
            poll: PollConfig::new(10, 100),
        };
        let mut driver = Driver::attach(chip, config).unwrap();

        let err = driver.write(b"mem_read").unwrap_err();
        assert_eq!(err, Error::ChipUnresponsive);
        assert_eq!(err.status(), -mfrc522_core::error::EBADE);
    }

    #[test]
    fn test_soft_reset_keeps_memory() {
        let mut chip = DummyMfrc522::with_memory(DummyConfig::default(), b"xyz");
        protocol::write_register(&mut chip, Register::FifoData, 0xAA).unwrap();
        protocol::issue_command(
            &mut chip,
            false,
            false,
            ChipCommand::SoftReset,
            &PollConfig::default(),
        )
        .unwrap();
        assert_eq!(chip.fifo_len(), 0);
        assert_eq!(&chip.memory()[..3], b"xyz");
    }

    #[test]
    fn test_fifo_overflow_drops_bytes() {
        let mut chip = DummyMfrc522::new_default();
        fifo::write(&mut chip, &[0x55; FIFO_SIZE + 4]).unwrap();
        assert_eq!(chip.fifo_len(), FIFO_SIZE);
    }

    #[test]
    fn test_parse_options() {
        let config = parse_options(&[
            ("version", "0x91"),
            ("busy", "4"),
            ("fail_after", "10"),
            ("stuck", "yes"),
            ("seed", "7"),
        ])
        .unwrap();
        assert_eq!(
            config,
            DummyConfig {
                version: 0x91,
                busy_polls: 4,
                fail_after: Some(10),
                stuck: true,
                seed: 7,
            }
        );

        assert!(parse_options(&[("version", "0x191")]).is_err());
        assert!(parse_options(&[("stuck", "maybe")]).is_err());
        assert_eq!(parse_options(&[("colour", "red")]), Ok(DummyConfig::default()));
    }
}
