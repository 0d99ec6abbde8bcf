//! Per-device state
//!
//! One [`DeviceState`] exists per attached chip. It is only mutated by the
//! dispatcher and the high-level operations, and read back by the host
//! through the driver's read path.

use crate::MEM_SIZE;

/// Rendered answer, capped at the chip memory width
pub type Answer = heapless::Vec<u8, MEM_SIZE>;

/// Usage counters accumulated over the lifetime of the device
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Statistics {
    /// Bytes drained from the FIFO by memory reads
    pub bytes_read: u64,
    /// Memory slots written; every successful write counts the full width
    pub bytes_written: u64,
}

/// Most recent answer and whether it is still waiting to be read
#[derive(Debug, Clone, Default)]
pub struct AnswerBuffer {
    data: Answer,
    full: bool,
}

impl AnswerBuffer {
    /// Create an empty buffer
    pub const fn new() -> Self {
        Self {
            data: Answer::new(),
            full: false,
        }
    }

    /// Replace the content with `answer` and mark the buffer full
    pub fn store(&mut self, answer: &[u8]) {
        let len = answer.len().min(MEM_SIZE);
        if len < answer.len() {
            log::warn!(
                "answer truncated from {} to {} bytes",
                answer.len(),
                MEM_SIZE
            );
        }
        self.data.clear();
        // Cannot fail: len <= capacity
        let _ = self.data.extend_from_slice(&answer[..len]);
        self.full = true;
    }

    /// Copy the pending answer into `buf` and clear the full flag
    ///
    /// Returns the number of bytes copied, 0 if nothing is pending.
    pub fn take(&mut self, buf: &mut [u8]) -> usize {
        if !self.full {
            return 0;
        }
        let len = self.data.len().min(buf.len());
        buf[..len].copy_from_slice(&self.data[..len]);
        self.full = false;
        len
    }

    /// Whether an answer is waiting to be read
    pub fn is_full(&self) -> bool {
        self.full
    }

    /// Content of the last answer, read or not
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }
}

/// Debug flag, answer buffer and statistics of one device
#[derive(Debug, Clone, Default)]
pub struct DeviceState {
    pub(crate) debug_on: bool,
    pub(crate) answer: AnswerBuffer,
    pub(crate) stats: Statistics,
}

impl DeviceState {
    /// Create the state of a freshly attached device
    pub const fn new() -> Self {
        Self {
            debug_on: false,
            answer: AnswerBuffer::new(),
            stats: Statistics {
                bytes_read: 0,
                bytes_written: 0,
            },
        }
    }

    /// Whether the debug trace is enabled
    pub fn debug_on(&self) -> bool {
        self.debug_on
    }

    /// Answer buffer
    pub fn answer(&self) -> &AnswerBuffer {
        &self.answer
    }

    /// Accumulated statistics
    pub fn stats(&self) -> &Statistics {
        &self.stats
    }
}
