//! Device layer
//!
//! This module owns everything above the register protocol:
//!
//! - [`state`] - debug flag, answer buffer and statistics
//! - [`ops`] - high-level operations built from FIFO and command primitives
//! - [`dispatch`] - routes a parsed [`Command`](crate::command::Command)
//!   to its operation
//! - [`trace`] - hex dump printed when debugging is on
//! - [`driver`] - the write/read boundary seen by the host

pub mod dispatch;
pub mod driver;
pub mod ops;
pub mod state;
pub mod trace;

pub use dispatch::{execute, trace_payload, Dispatcher, Handler, HandlerEntry, UNIMPLEMENTED_ANSWER};
pub use driver::{Driver, DriverConfig};
pub use state::{Answer, AnswerBuffer, DeviceState, Statistics};
