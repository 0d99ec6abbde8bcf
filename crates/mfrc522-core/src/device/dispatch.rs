//! Command dispatcher
//!
//! Routes a parsed [`Command`] to the handler registered for its
//! [`Operation`]. The handler table mirrors
//! [`COMMAND_TABLE`](crate::command::COMMAND_TABLE); an operation without a
//! handler answers [`UNIMPLEMENTED_ANSWER`] instead of failing.

use crate::command::{Command, Operation};
use crate::error::Result;
use crate::protocol::{FifoBuffer, PollConfig};
use crate::transport::SpiTransport;

use super::ops;
use super::state::{Answer, DeviceState};
use super::trace::{self, Direction};

/// Answer given for an operation nobody handles
pub const UNIMPLEMENTED_ANSWER: &[u8] = b"Command unimplemented";

/// Signature shared by all operation handlers
pub type Handler =
    fn(&mut DeviceState, &mut dyn SpiTransport, &Command, &PollConfig) -> Result<Answer>;

/// Binds an operation to its handler
#[derive(Clone, Copy)]
pub struct HandlerEntry {
    /// Operation served
    pub operation: Operation,
    /// Handler invoked for it
    pub handler: Handler,
}

fn answer_from(bytes: &[u8]) -> Answer {
    let mut answer = Answer::new();
    let len = bytes.len().min(answer.capacity());
    // Cannot fail: len <= capacity
    let _ = answer.extend_from_slice(&bytes[..len]);
    answer
}

fn handle_get_version(
    _state: &mut DeviceState,
    spi: &mut dyn SpiTransport,
    _cmd: &Command,
    _poll: &PollConfig,
) -> Result<Answer> {
    let version = ops::get_version(spi)?;
    log::info!("chip version: {}", version);

    let mut text = heapless::String::<4>::new();
    // Cannot fail: a u8 has at most three digits
    let _ = core::fmt::write(&mut text, format_args!("{}", version));
    Ok(answer_from(text.as_bytes()))
}

fn handle_mem_read(
    state: &mut DeviceState,
    spi: &mut dyn SpiTransport,
    _cmd: &Command,
    poll: &PollConfig,
) -> Result<Answer> {
    let mut buf = FifoBuffer::new();
    let count = ops::mem_read(spi, &mut state.stats, poll, &mut buf)?;
    Ok(answer_from(&buf[..count]))
}

fn handle_mem_write(
    state: &mut DeviceState,
    spi: &mut dyn SpiTransport,
    cmd: &Command,
    poll: &PollConfig,
) -> Result<Answer> {
    ops::mem_write(spi, &mut state.stats, poll, cmd.data())?;
    Ok(Answer::new())
}

fn handle_gen_random(
    state: &mut DeviceState,
    spi: &mut dyn SpiTransport,
    _cmd: &Command,
    poll: &PollConfig,
) -> Result<Answer> {
    let id = ops::generate_random_id(spi, &mut state.stats, poll)?;
    Ok(answer_from(ops::format_random_id(&id).as_bytes()))
}

fn handle_set_debug(
    state: &mut DeviceState,
    _spi: &mut dyn SpiTransport,
    cmd: &Command,
    _poll: &PollConfig,
) -> Result<Answer> {
    ops::set_debug(state, cmd.data())?;
    Ok(Answer::new())
}

/// Handlers for every operation of the command table
pub static HANDLERS: [HandlerEntry; 5] = [
    HandlerEntry {
        operation: Operation::MemWrite,
        handler: handle_mem_write,
    },
    HandlerEntry {
        operation: Operation::MemRead,
        handler: handle_mem_read,
    },
    HandlerEntry {
        operation: Operation::GenRandom,
        handler: handle_gen_random,
    },
    HandlerEntry {
        operation: Operation::GetVersion,
        handler: handle_get_version,
    },
    HandlerEntry {
        operation: Operation::SetDebug,
        handler: handle_set_debug,
    },
];

/// Routes commands to their handlers
#[derive(Clone, Copy)]
pub struct Dispatcher {
    handlers: &'static [HandlerEntry],
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Dispatcher {
    /// Dispatcher serving every operation
    pub const fn new() -> Self {
        Self {
            handlers: &HANDLERS,
        }
    }

    /// Dispatcher serving only the given handlers
    pub const fn with_handlers(handlers: &'static [HandlerEntry]) -> Self {
        Self { handlers }
    }

    fn handler(&self, operation: Operation) -> Option<Handler> {
        self.handlers
            .iter()
            .find(|entry| entry.operation == operation)
            .map(|entry| entry.handler)
    }

    /// Run `cmd` and return its answer
    ///
    /// When debugging is on, the payload of memory writes and the answer of
    /// memory reads are dumped after a successful run.
    pub fn execute(
        &self,
        state: &mut DeviceState,
        spi: &mut dyn SpiTransport,
        cmd: &Command,
        poll: &PollConfig,
    ) -> Result<Answer> {
        let Some(handler) = self.handler(cmd.operation()) else {
            log::warn!("no handler for {}", cmd.operation());
            return Ok(answer_from(UNIMPLEMENTED_ANSWER));
        };

        let answer = handler(state, spi, cmd, poll)?;

        if state.debug_on {
            if let Some((direction, payload)) = trace_payload(cmd, &answer) {
                trace::dump(direction, payload);
            }
        }

        Ok(answer)
    }
}

/// Payload dumped for `cmd` when debugging is on
///
/// Memory writes dump what was sent, memory reads what was answered. Other
/// operations dump nothing.
pub fn trace_payload<'a>(cmd: &'a Command, answer: &'a [u8]) -> Option<(Direction, &'a [u8])> {
    match cmd.operation() {
        Operation::MemWrite => Some((Direction::Write, cmd.data())),
        Operation::MemRead => Some((Direction::Read, answer)),
        _ => None,
    }
}

/// Run `cmd` with the default dispatcher
pub fn execute(
    state: &mut DeviceState,
    spi: &mut dyn SpiTransport,
    cmd: &Command,
    poll: &PollConfig,
) -> Result<Answer> {
    Dispatcher::new().execute(state, spi, cmd, poll)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::parse;
    use crate::error::Error;
    use crate::register::Register;
    use crate::test_support::MockTransport;

    fn run(state: &mut DeviceState, spi: &mut MockTransport, line: &[u8]) -> Result<Answer> {
        let cmd = parse(line)?;
        execute(state, spi, &cmd, &PollConfig::default())
    }

    #[test]
    fn test_version_answer() {
        let mut state = DeviceState::new();
        let mut spi = MockTransport::new();
        spi.set_register(Register::Version, 0x91);

        let answer = run(&mut state, &mut spi, b"version").unwrap();
        assert_eq!(answer.as_slice(), b"1");
    }

    #[test]
    fn test_unknown_chip_answers_raw_value() {
        let mut state = DeviceState::new();
        let mut spi = MockTransport::new();
        spi.set_register(Register::Version, 0x12);

        let answer = run(&mut state, &mut spi, b"version").unwrap();
        assert_eq!(answer.as_slice(), b"18");
    }

    #[test]
    fn test_debug_round_trip() {
        let mut state = DeviceState::new();
        let mut spi = MockTransport::new();

        run(&mut state, &mut spi, b"debug:on").unwrap();
        assert!(state.debug_on());
        run(&mut state, &mut spi, b"debug:off").unwrap();
        assert!(!state.debug_on());

        assert_eq!(
            run(&mut state, &mut spi, b"debug:maybe"),
            Err(Error::InvalidArgument)
        );
        assert!(!state.debug_on());
        assert_eq!(spi.transfer_count(), 0);
    }

    #[test]
    fn test_mem_write_updates_stats() {
        let mut state = DeviceState::new();
        let mut spi = MockTransport::new();

        let answer = run(&mut state, &mut spi, b"mem_write:3:abc").unwrap();
        assert!(answer.is_empty());
        assert_eq!(state.stats().bytes_written, 25);
        assert_eq!(&spi.fifo_writes()[..3], b"abc");
    }

    #[test]
    fn test_oversized_write_never_reaches_transport() {
        let mut state = DeviceState::new();
        let mut spi = MockTransport::new();

        assert_eq!(
            run(&mut state, &mut spi, b"mem_write:26:abc"),
            Err(Error::Parse(crate::ParseError::InvalidLength))
        );
        assert_eq!(spi.transfer_count(), 0);
    }

    #[test]
    fn test_mem_read_with_debug_on() {
        let mut state = DeviceState::new();
        let mut spi = MockTransport::new();
        spi.set_register(Register::FifoLevel, 2);
        spi.script_reads(Register::FifoData, &[0xDE, 0xAD]);

        run(&mut state, &mut spi, b"debug:on").unwrap();
        let answer = run(&mut state, &mut spi, b"mem_read").unwrap();
        assert_eq!(answer.as_slice(), &[0xDE, 0xAD]);
        assert_eq!(state.stats().bytes_read, 2);
    }

    #[test]
    fn test_trace_payload_selection() {
        let answer = [0xDE, 0xAD];

        let write = parse(b"mem_write:3:abc").unwrap();
        assert_eq!(
            trace_payload(&write, &answer),
            Some((Direction::Write, &b"abc"[..]))
        );

        let read = parse(b"mem_read").unwrap();
        assert_eq!(
            trace_payload(&read, &answer),
            Some((Direction::Read, &answer[..]))
        );

        for line in [&b"version"[..], b"gen_rand_id", b"debug:on"] {
            let cmd = parse(line).unwrap();
            assert_eq!(trace_payload(&cmd, &answer), None);
        }
    }

    #[test]
    fn test_missing_handler_degrades_gracefully() {
        static ONLY_VERSION: [HandlerEntry; 1] = [HandlerEntry {
            operation: Operation::GetVersion,
            handler: handle_get_version,
        }];

        let mut state = DeviceState::new();
        let mut spi = MockTransport::new();
        let dispatcher = Dispatcher::with_handlers(&ONLY_VERSION);

        let cmd = parse(b"mem_read").unwrap();
        let answer = dispatcher
            .execute(&mut state, &mut spi, &cmd, &PollConfig::default())
            .unwrap();
        assert_eq!(answer.as_slice(), UNIMPLEMENTED_ANSWER);
        assert_eq!(spi.transfer_count(), 0);
    }

    #[test]
    fn test_every_operation_has_a_handler() {
        let dispatcher = Dispatcher::new();
        for entry in &crate::command::COMMAND_TABLE {
            assert!(dispatcher.handler(entry.operation).is_some());
        }
    }
}
