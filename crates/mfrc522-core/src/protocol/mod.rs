//! Protocol implementations
//!
//! This module contains the register-level building blocks every high-level
//! operation is made of: register access, the command state machine and the
//! FIFO manager.

mod access;
pub mod command;
pub mod fifo;

pub use access::*;
pub use command::{issue_command, read_current_command, CommandState, PollConfig};
pub use fifo::FifoBuffer;
