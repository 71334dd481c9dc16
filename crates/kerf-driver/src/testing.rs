//! Scripted in-memory link for transmitter and driver tests.

use crate::serial::FlowControlledLink;
use kerf_core::Result;
use std::collections::VecDeque;

/// Fake link that records writes and plays back scripted CTS responses.
pub(crate) struct FakeLink {
    /// Each `write_chunk` call, in order.
    pub written: Vec<Vec<u8>>,
    /// Scripted CTS responses, consumed front to back; when exhausted,
    /// `default_cts` is returned.
    pub cts_script: VecDeque<bool>,
    pub default_cts: bool,
    /// Number of times CTS was sampled.
    pub cts_polls: usize,
    /// Pending unsolicited inbound bytes.
    pub inbound: VecDeque<u8>,
    /// Bytes taken through the drain.
    pub drained: Vec<u8>,
    pub closed: bool,
}

impl FakeLink {
    /// A link whose CTS is always asserted
    pub fn ready() -> Self {
        Self {
            written: Vec::new(),
            cts_script: VecDeque::new(),
            default_cts: true,
            cts_polls: 0,
            inbound: VecDeque::new(),
            drained: Vec::new(),
            closed: false,
        }
    }

    /// A link whose CTS never asserts
    pub fn never_ready() -> Self {
        Self {
            default_cts: false,
            ..Self::ready()
        }
    }

    /// Everything written so far, flattened
    pub fn bytes(&self) -> Vec<u8> {
        self.written.concat()
    }
}

impl FlowControlledLink for FakeLink {
    fn write_chunk(&mut self, data: &[u8]) -> Result<()> {
        self.written.push(data.to_vec());
        Ok(())
    }

    fn clear_to_send(&mut self) -> Result<bool> {
        self.cts_polls += 1;
        Ok(self.cts_script.pop_front().unwrap_or(self.default_cts))
    }

    fn drain_inbound_byte(&mut self) -> Result<Option<u8>> {
        let byte = self.inbound.pop_front();
        if let Some(b) = byte {
            self.drained.push(b);
        }
        Ok(byte)
    }

    fn close(&mut self) -> Result<()> {
        self.closed = true;
        Ok(())
    }
}
