//! Flow-controlled stream transmission
//!
//! Streams an encoded byte buffer to the device in bounded chunks. Before
//! every chunk the transmitter waits for the hardware clear-to-send signal
//! under a wall-clock deadline; a device that never signals readiness fails
//! the whole job. After each chunk at most one unsolicited inbound byte is
//! drained so the inbound buffer cannot overflow on a half-duplex-like
//! link. Cancellation is honored at chunk boundaries.

use crate::serial::FlowControlledLink;
use kerf_core::{ConnectionError, Error, Result};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Configuration for flow-controlled transmission
#[derive(Debug, Clone)]
pub struct TransmitConfig {
    /// Bytes written per chunk.
    pub chunk_bytes: usize,
    /// How long to wait for clear-to-send before failing the job.
    pub cts_timeout: Duration,
    /// Sleep between clear-to-send samples.
    pub cts_poll_interval: Duration,
}

impl Default for TransmitConfig {
    fn default() -> Self {
        Self {
            // half of the device's 8-byte UART buffer per write
            chunk_bytes: 4,
            cts_timeout: Duration::from_secs(5),
            cts_poll_interval: Duration::from_millis(1),
        }
    }
}

/// Cooperative cancellation flag checked at each chunk boundary.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// Create a token in the not-cancelled state
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation; takes effect at the next chunk boundary
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Whether cancellation has been requested
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Streams encoded byte buffers over a flow-controlled link.
pub struct Transmitter<'a, L: FlowControlledLink> {
    link: &'a mut L,
    config: &'a TransmitConfig,
    cancel: CancelToken,
}

impl<'a, L: FlowControlledLink> Transmitter<'a, L> {
    /// Create a transmitter borrowing the link for the job's duration
    pub fn new(link: &'a mut L, config: &'a TransmitConfig, cancel: CancelToken) -> Self {
        Self {
            link,
            config,
            cancel,
        }
    }

    /// Send one encoded stream to completion.
    ///
    /// Every byte is delivered: the last chunk is `len % chunk_bytes` long
    /// when the stream is not a chunk multiple.
    pub fn send_stream(&mut self, stream: &[u8]) -> Result<()> {
        let mut offset = 0;
        while offset < stream.len() {
            if self.cancel.is_cancelled() {
                tracing::warn!(offset, total = stream.len(), "transmission cancelled");
                return Err(Error::Cancelled);
            }
            self.wait_clear_to_send()?;

            let stride = self.config.chunk_bytes.min(stream.len() - offset);
            self.link.write_chunk(&stream[offset..offset + stride])?;
            offset += stride;

            // keep the inbound buffer from overflowing; content is not
            // interpreted here
            self.link.drain_inbound_byte()?;
        }
        tracing::debug!(bytes = stream.len(), "stream sent");
        Ok(())
    }

    /// Wait for the hardware ready signal under the configured deadline
    fn wait_clear_to_send(&mut self) -> Result<()> {
        let deadline = Instant::now() + self.config.cts_timeout;
        loop {
            if self.link.clear_to_send()? {
                return Ok(());
            }
            if Instant::now() >= deadline {
                return Err(ConnectionError::FlowControlTimeout {
                    timeout_ms: self.config.cts_timeout.as_millis() as u64,
                }
                .into());
            }
            std::thread::sleep(self.config.cts_poll_interval);
        }
    }
}
