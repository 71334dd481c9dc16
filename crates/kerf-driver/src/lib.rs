//! # Kerf Driver
//!
//! Delivers encoded job streams to a GRBL-family controller over a
//! half-duplex serial link with hardware flow control:
//! - [`serial`]: port enumeration and the flow-controlled link interface
//! - [`transmitter`]: chunked, CTS-gated stream delivery
//! - [`driver`]: job orchestration (preamble, parts, postamble, progress)

pub mod driver;
pub mod serial;
pub mod transmitter;

#[cfg(test)]
pub(crate) mod testing;

pub use driver::GrblDriver;
pub use serial::{list_ports, FlowControlledLink, LinkParams, SerialLink, SerialPortInfo};
pub use transmitter::{CancelToken, TransmitConfig, Transmitter};
