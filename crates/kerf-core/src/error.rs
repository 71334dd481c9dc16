//! Error handling for Kerf
//!
//! Provides error types for the two layers of the driver:
//! - Connection errors (serial port discovery, open, flow control)
//! - Job errors (pre-flight validation)
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Connection error type
///
/// Represents errors related to the serial link to the laser controller.
#[derive(Error, Debug, Clone)]
pub enum ConnectionError {
    /// The configured port does not exist on this system
    #[error("Port not found: {port}")]
    PortNotFound {
        /// The name of the port that was not found.
        port: String,
    },

    /// The port exists but could not be opened
    #[error("Failed to open port {port}: {reason}")]
    FailedToOpen {
        /// The name of the port that failed to open.
        port: String,
        /// The reason the port failed to open.
        reason: String,
    },

    /// The device never asserted clear-to-send while bytes remained
    #[error("Flow control timeout: CTS not asserted within {timeout_ms}ms")]
    FlowControlTimeout {
        /// The CTS wait deadline in milliseconds.
        timeout_ms: u64,
    },

    /// Serial port operation failed
    #[error("Serial port error: {reason}")]
    SerialError {
        /// The reason for the serial port error.
        reason: String,
    },
}

/// Job validation error type
///
/// Raised by pre-flight checks before any bytes are sent to the device.
#[derive(Error, Debug, Clone)]
pub enum JobError {
    /// The job contains no parts
    #[error("Job contains no parts")]
    EmptyJob,

    /// A part does not fit on the configured bed
    #[error("Part {part_index} exceeds bed bounds: {reason}")]
    OutOfBounds {
        /// Index of the offending part within the job.
        part_index: usize,
        /// Which bound is violated and by how much.
        reason: String,
    },
}

/// Main error type for Kerf
///
/// A unified error type used in public APIs across the workspace.
#[derive(Error, Debug)]
pub enum Error {
    /// Connection error
    #[error(transparent)]
    Connection(#[from] ConnectionError),

    /// Job validation error
    #[error(transparent)]
    Job(#[from] JobError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The job was cancelled at a chunk boundary
    #[error("Job cancelled")]
    Cancelled,
}

impl Error {
    /// Create a configuration error from a string message
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }

    /// Check if this is a flow control timeout
    pub fn is_flow_control_timeout(&self) -> bool {
        matches!(
            self,
            Error::Connection(ConnectionError::FlowControlTimeout { .. })
        )
    }

    /// Check if this is a connection error
    pub fn is_connection_error(&self) -> bool {
        matches!(self, Error::Connection(_))
    }

    /// Check if this is a job validation error
    pub fn is_job_error(&self) -> bool {
        matches!(self, Error::Job(_))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flow_control_timeout_is_recognized() {
        let err: Error = ConnectionError::FlowControlTimeout { timeout_ms: 5000 }.into();
        assert!(err.is_flow_control_timeout());
        assert!(err.is_connection_error());
        assert!(!err.is_job_error());
    }

    #[test]
    fn error_messages_name_the_port() {
        let err: Error = ConnectionError::PortNotFound {
            port: "ttyACM0".to_string(),
        }
        .into();
        assert_eq!(err.to_string(), "Port not found: ttyACM0");
    }
}
