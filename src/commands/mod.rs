//! CLI command implementations
//!
//! Every command drives a [`Driver`](mfrc522_core::device::Driver) through
//! its write/read boundary, exactly as a character device would.

mod exec;
mod list;
mod probe;
mod shell;

pub use exec::run_exec;
pub use list::list_transports;
pub use probe::run_probe;
pub use shell::run_shell;

/// Render an answer for the terminal
///
/// Printable ASCII is shown as text, anything else as hex pairs.
pub fn format_answer(answer: &[u8]) -> String {
    if answer.iter().all(|b| b.is_ascii_graphic() || *b == b' ') {
        String::from_utf8_lossy(answer).into_owned()
    } else {
        answer
            .iter()
            .map(|b| format!("{:02x}", b))
            .collect::<Vec<_>>()
            .join(" ")
    }
}
