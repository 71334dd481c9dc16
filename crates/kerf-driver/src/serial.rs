//! Serial port communication
//!
//! Provides port enumeration and the low-level flow-controlled link the
//! transmitter writes to. The device side is half-duplex-like: it gates
//! transmission through the hardware clear-to-send signal and may emit
//! unsolicited bytes at any time, which the link exposes through an
//! explicit one-byte drain.

use kerf_core::{ConnectionError, Error, Result};
use std::io::Read;
use std::time::Duration;

/// Information about an available serial port
#[derive(Debug, Clone)]
pub struct SerialPortInfo {
    /// Port name (e.g., "/dev/ttyUSB0", "COM3")
    pub port_name: String,

    /// Port description (e.g., "USB Serial Port")
    pub description: String,

    /// Manufacturer name if available
    pub manufacturer: Option<String>,
}

/// List serial ports that look like laser controllers
///
/// Filters enumeration results to the patterns USB-connected controllers
/// show up under:
/// - Windows: COM* (e.g., COM1, COM3)
/// - Linux: /dev/ttyUSB*, /dev/ttyACM*
/// - macOS: /dev/cu.usbserial-*, /dev/cu.usbmodem*
pub fn list_ports() -> Result<Vec<SerialPortInfo>> {
    let ports = serialport::available_ports().map_err(|e| {
        tracing::error!("Failed to enumerate serial ports: {}", e);
        ConnectionError::SerialError {
            reason: format!("Failed to enumerate ports: {}", e),
        }
    })?;

    Ok(ports
        .iter()
        .filter(|port| is_candidate_port(&port.port_name))
        .map(|port| {
            let manufacturer = match &port.port_type {
                serialport::SerialPortType::UsbPort(usb) => usb.manufacturer.clone(),
                _ => None,
            };
            SerialPortInfo {
                port_name: port.port_name.clone(),
                description: port_description(port),
                manufacturer,
            }
        })
        .collect())
}

/// Check if a port name matches controller patterns
fn is_candidate_port(port_name: &str) -> bool {
    if port_name.starts_with("COM") && port_name[3..].chars().all(|c| c.is_ascii_digit()) {
        return true;
    }
    if port_name.starts_with("/dev/ttyUSB") || port_name.starts_with("/dev/ttyACM") {
        return true;
    }
    if port_name.starts_with("/dev/cu.usbserial-") || port_name.starts_with("/dev/cu.usbmodem") {
        return true;
    }
    false
}

/// Get a user-friendly description for a port
fn port_description(port: &serialport::SerialPortInfo) -> String {
    match &port.port_type {
        serialport::SerialPortType::UsbPort(usb) => {
            format!(
                "USB {} {}",
                usb.manufacturer.as_deref().unwrap_or("Device"),
                usb.product.as_deref().unwrap_or("Serial Port")
            )
        }
        serialport::SerialPortType::BluetoothPort => "Bluetooth Serial".to_string(),
        serialport::SerialPortType::PciPort => "PCI Serial".to_string(),
        _ => "Serial Port".to_string(),
    }
}

/// Parameters for opening the link.
///
/// Framing is fixed at 8 data bits, 1 stop bit, no parity, hardware flow
/// control in both directions; only the port and baud rate vary.
#[derive(Debug, Clone)]
pub struct LinkParams {
    /// Port name to open.
    pub port: String,
    /// Baud rate.
    pub baud_rate: u32,
}

/// Low-level interface the transmitter writes through.
///
/// The inbound drain is deliberately its own method so a future
/// implementation can parse device error frames without touching the
/// transmission loop.
pub trait FlowControlledLink {
    /// Write one chunk, blocking until accepted by the OS buffer
    fn write_chunk(&mut self, data: &[u8]) -> Result<()>;

    /// Sample the hardware clear-to-send signal
    fn clear_to_send(&mut self) -> Result<bool>;

    /// Take at most one unsolicited inbound byte, without blocking
    fn drain_inbound_byte(&mut self) -> Result<Option<u8>>;

    /// Release the link; safe to call once on every exit path
    fn close(&mut self) -> Result<()>;
}

/// Real serial link using the serialport crate
pub struct SerialLink {
    port: Box<dyn serialport::SerialPort>,
    name: String,
}

impl SerialLink {
    /// Open the configured port with the fixed 8/1/none framing and
    /// hardware flow control.
    ///
    /// Fails with [`ConnectionError::PortNotFound`] when the port is not
    /// present on the system, and [`ConnectionError::FailedToOpen`] when it
    /// exists but cannot be opened.
    pub fn open(params: &LinkParams) -> Result<Self> {
        let known = serialport::available_ports().map_err(|e| ConnectionError::SerialError {
            reason: format!("Failed to enumerate ports: {}", e),
        })?;
        if !known.iter().any(|p| p.port_name == params.port) {
            return Err(ConnectionError::PortNotFound {
                port: params.port.clone(),
            }
            .into());
        }

        let port = serialport::new(&params.port, params.baud_rate)
            .timeout(Duration::from_millis(10)) // short timeout for non-blocking reads
            .data_bits(serialport::DataBits::Eight)
            .stop_bits(serialport::StopBits::One)
            .parity(serialport::Parity::None)
            .flow_control(serialport::FlowControl::Hardware)
            .open()
            .map_err(|e| {
                tracing::warn!("Failed to open serial port {}: {}", params.port, e);
                ConnectionError::FailedToOpen {
                    port: params.port.clone(),
                    reason: e.to_string(),
                }
            })?;

        tracing::info!(port = %params.port, baud = params.baud_rate, "serial link opened");
        Ok(Self {
            port,
            name: params.port.clone(),
        })
    }
}

impl FlowControlledLink for SerialLink {
    fn write_chunk(&mut self, data: &[u8]) -> Result<()> {
        self.port.write_all(data).map_err(Error::Io)
    }

    fn clear_to_send(&mut self) -> Result<bool> {
        self.port
            .read_clear_to_send()
            .map_err(|e| {
                ConnectionError::SerialError {
                    reason: format!("CTS read failed: {}", e),
                }
                .into()
            })
    }

    fn drain_inbound_byte(&mut self) -> Result<Option<u8>> {
        let available = self
            .port
            .bytes_to_read()
            .map_err(|e| ConnectionError::SerialError {
                reason: format!("Inbound poll failed: {}", e),
            })?;
        if available == 0 {
            return Ok(None);
        }
        let mut byte = [0u8; 1];
        match self.port.read(&mut byte) {
            Ok(1) => Ok(Some(byte[0])),
            Ok(_) => Ok(None),
            Err(e) if e.kind() == std::io::ErrorKind::TimedOut => Ok(None),
            Err(e) => Err(Error::Io(e)),
        }
    }

    fn close(&mut self) -> Result<()> {
        // flush what the OS buffered; the handle itself is released on drop
        self.port.flush().map_err(Error::Io)?;
        tracing::info!(port = %self.name, "serial link closed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn candidate_port_patterns() {
        assert!(is_candidate_port("COM3"));
        assert!(is_candidate_port("COM12"));
        assert!(is_candidate_port("/dev/ttyUSB0"));
        assert!(is_candidate_port("/dev/ttyACM1"));
        assert!(is_candidate_port("/dev/cu.usbmodem14101"));
        assert!(is_candidate_port("/dev/cu.usbserial-A1B2"));

        assert!(!is_candidate_port("COMX"));
        assert!(!is_candidate_port("/dev/ttyS0"));
        assert!(!is_candidate_port("/dev/cu.Bluetooth-Incoming-Port"));
    }
}
