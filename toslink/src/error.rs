//! Error types for toslink.

use std::io;
use thiserror::Error;

/// Result type for toslink operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for toslink operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Device enumeration failed.
    #[error("Error listing devices: {0}")]
    Enumeration(String),

    /// Device could not be opened.
    #[error("Error opening device: {0}")]
    Open(String),

    /// I/O error (transport read/write, covers timeout and disconnect).
    #[error("Error: {0}")]
    Io(#[from] io::Error),

    /// Native serial transport error.
    #[cfg(feature = "native")]
    #[error("Error: {0}")]
    Serial(#[from] serialport::Error),

    /// Response length did not match what the opcode defines.
    #[error("Unexpected {what} response length: expected {expected} bytes, got {actual}")]
    Protocol {
        /// Which response was malformed.
        what: &'static str,
        /// Expected byte count.
        expected: usize,
        /// Received byte count.
        actual: usize,
    },

    /// Malformed operator input. The message is the complete diagnostic.
    #[error("{0}")]
    Syntax(String),

    /// Output file for `save` could not be written.
    #[error("Unable to open file - {0}")]
    File(io::Error),
}

impl Error {
    /// A timeout reported as an I/O error, matching the transport contract.
    pub(crate) fn timeout(what: &str) -> Self {
        Self::Io(io::Error::new(io::ErrorKind::TimedOut, what.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_syntax_error_displays_message_verbatim() {
        let err = Error::Syntax("Syntax error - expected address".to_string());
        assert_eq!(err.to_string(), "Syntax error - expected address");
    }

    #[test]
    fn test_protocol_error_names_lengths() {
        let err = Error::Protocol {
            what: "status",
            expected: 8,
            actual: 5,
        };
        let msg = err.to_string();
        assert!(msg.contains("status"));
        assert!(msg.contains('8'));
        assert!(msg.contains('5'));
    }

    #[test]
    fn test_file_error_matches_console_wording() {
        let err = Error::File(io::Error::new(io::ErrorKind::PermissionDenied, "denied"));
        assert!(err.to_string().starts_with("Unable to open file - "));
    }
}
