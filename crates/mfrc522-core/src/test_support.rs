//! Scripted transport for unit tests

use std::collections::VecDeque;
use std::vec::Vec;

use crate::error::{Error, Result};
use crate::register::{AccessMode, AddressByte, ChipCommand, Register};
use crate::transport::SpiTransport;

/// Register file with scripted reads and a transfer log
///
/// Register writes land in the register file, except FIFODataReg writes
/// which are recorded separately and FIFOLevelReg writes which are dropped.
/// Writing CommandReg completes the command at once unless
/// [`MockTransport::stick_command`] was called.
pub struct MockTransport {
    regs: [u8; 64],
    scripted: [VecDeque<u8>; 64],
    frames: Vec<Vec<u8>>,
    fifo_writes: Vec<u8>,
    fail_at: Option<usize>,
    transfers: usize,
    stuck: Option<ChipCommand>,
    delayed_us: u64,
}

impl MockTransport {
    pub fn new() -> Self {
        Self {
            regs: [0; 64],
            scripted: core::array::from_fn(|_| VecDeque::new()),
            frames: Vec::new(),
            fifo_writes: Vec::new(),
            fail_at: None,
            transfers: 0,
            stuck: None,
            delayed_us: 0,
        }
    }

    pub fn set_register(&mut self, reg: Register, value: u8) {
        self.regs[reg.addr() as usize] = value;
    }

    /// Queue values returned by the next reads of `reg`, before the register file
    pub fn script_reads(&mut self, reg: Register, values: &[u8]) {
        self.scripted[reg.addr() as usize].extend(values.iter().copied());
    }

    /// Fail transfer number `index` (0-based) and every transfer after it
    pub fn fail_at(&mut self, index: usize) {
        self.fail_at = Some(index);
    }

    /// Keep CommandReg reading back `cmd` forever
    pub fn stick_command(&mut self, cmd: ChipCommand) {
        self.stuck = Some(cmd);
    }

    pub fn frames(&self) -> &[Vec<u8>] {
        &self.frames
    }

    pub fn fifo_writes(&self) -> &[u8] {
        &self.fifo_writes
    }

    pub fn transfer_count(&self) -> usize {
        self.transfers
    }

    pub fn delayed_us(&self) -> u64 {
        self.delayed_us
    }
}

impl SpiTransport for MockTransport {
    fn transfer(&mut self, write: &[u8], read: &mut [u8]) -> Result<()> {
        let index = self.transfers;
        self.transfers += 1;
        if self.fail_at.is_some_and(|n| index >= n) {
            return Err(Error::TransportFailure);
        }
        self.frames.push(write.to_vec());

        let header = AddressByte::from_byte(write[0]).ok_or(Error::TransportFailure)?;
        let addr = header.addr() as usize;

        match header.mode() {
            AccessMode::Read => {
                for byte in read.iter_mut() {
                    *byte = match self.scripted[addr].pop_front() {
                        Some(value) => value,
                        None if addr == Register::Command.addr() as usize => match self.stuck {
                            Some(cmd) => cmd.opcode(),
                            None => self.regs[addr],
                        },
                        None => self.regs[addr],
                    };
                }
            }
            AccessMode::Write => {
                let value = write[1];
                if addr == Register::FifoData.addr() as usize {
                    self.fifo_writes.push(value);
                } else if addr == Register::FifoLevel.addr() as usize {
                    // Only the flush bit is writable; the level stays scripted
                } else if addr == Register::Command.addr() as usize {
                    self.regs[addr] = value & !ChipCommand::MASK;
                } else {
                    self.regs[addr] = value;
                }
            }
        }
        Ok(())
    }

    fn delay_us(&mut self, us: u32) {
        self.delayed_us += us as u64;
    }
}
