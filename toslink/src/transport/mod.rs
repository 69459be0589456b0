//! Transport abstraction for the USB bridge carrying the capture device.
//!
//! The capture board sits behind a USB-to-parallel bridge that the host sees
//! as a byte-stream endpoint. This module specifies that vendor boundary as
//! a pair of traits so the protocol and console layers stay I/O-agnostic:
//!
//! ```text
//! +------------------+
//! |  Console layer   |  (parse, dispatch, render)
//! +--------+---------+
//!          |
//!          v
//! +--------+---------+
//! |  Session / bulk  |  (command framing, chunked reads)
//! +--------+---------+
//!          |
//!          v
//! +--------+---------+
//! | Transport trait  |
//! +--------+---------+
//!          |
//!          v
//! +--------+---------+
//! | NativeTransport  |  (`serialport` crate)
//! +------------------+
//! ```
//!
//! Tests substitute a scripted mock for the bottom layer; nothing above it
//! touches hardware.

#[cfg(feature = "native")]
pub mod native;

use std::time::Duration;

use crate::error::Result;

/// Default read/write timeout applied when a device is opened.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(1000);

/// Descriptor for one enumerated transport endpoint.
///
/// Produced by [`TransportEnumerator::enumerate`]; only used while the
/// operator selects a device.
#[derive(Debug, Clone)]
pub struct DeviceInfo {
    /// Position in the enumeration order.
    pub index: usize,
    /// Display name (USB product string where available).
    pub name: String,
    /// Serial identifier.
    pub serial: String,
    /// Location code.
    pub location: u32,
    /// OS endpoint path used to open the device (e.g. "/dev/ttyUSB0").
    pub path: String,
}

impl DeviceInfo {
    /// Check whether an operator-supplied selector names this device.
    ///
    /// Matches the display name or the serial identifier, exactly.
    pub fn matches(&self, selector: &str) -> bool {
        self.name == selector || self.serial == selector
    }
}

/// Buffer selection mask for [`Transport::purge`].
///
/// An empty mask is representable and purges nothing; the console layer
/// relies on that for its unrecognized-sub-argument behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PurgeMask {
    /// Clear the receive buffer.
    pub rx: bool,
    /// Clear the transmit buffer.
    pub tx: bool,
}

impl PurgeMask {
    /// Purge nothing.
    pub const NONE: Self = Self { rx: false, tx: false };
    /// Purge the receive buffer only.
    pub const RX: Self = Self { rx: true, tx: false };
    /// Purge the transmit buffer only.
    pub const TX: Self = Self { rx: false, tx: true };
    /// Purge both buffers.
    pub const ALL: Self = Self { rx: true, tx: true };

    /// True when the mask selects no buffer at all.
    pub fn is_empty(self) -> bool {
        !self.rx && !self.tx
    }
}

/// Byte-stream connection to one opened device.
///
/// Every call blocks, bounded by the timeouts configured at open time. A
/// timeout or disconnect surfaces as an error; callers decide whether that
/// is fatal.
pub trait Transport {
    /// Write bytes, returning how many were accepted.
    fn write(&mut self, data: &[u8]) -> Result<usize>;

    /// Read up to `buf.len()` bytes, returning how many arrived.
    fn read(&mut self, buf: &mut [u8]) -> Result<usize>;

    /// Configure the blocking read and write timeouts.
    fn set_timeouts(&mut self, read: Duration, write: Duration) -> Result<()>;

    /// Discard buffered data on the selected side(s).
    fn purge(&mut self, mask: PurgeMask) -> Result<()>;

    /// Close the connection and release resources.
    ///
    /// After calling this method, the transport cannot be used for further
    /// I/O.
    fn close(&mut self) -> Result<()>;

    /// Endpoint name, for diagnostics.
    fn name(&self) -> &str;
}

/// Trait for listing attached transport endpoints.
///
/// This is separated from `Transport` because it's a static operation that
/// doesn't require an open connection.
pub trait TransportEnumerator {
    /// List all attached endpoints.
    fn enumerate() -> Result<Vec<DeviceInfo>>;
}

// Re-export the native implementation when built for hardware.
#[cfg(feature = "native")]
pub use native::{NativeEnumerator, NativeTransport};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_purge_mask_constants() {
        assert!(PurgeMask::NONE.is_empty());
        assert!(!PurgeMask::RX.is_empty());
        assert!(!PurgeMask::TX.is_empty());
        assert!(PurgeMask::ALL.rx);
        assert!(PurgeMask::ALL.tx);
        assert_eq!(PurgeMask::default(), PurgeMask::NONE);
    }

    #[test]
    fn test_device_info_matches_name_or_serial() {
        let dev = DeviceInfo {
            index: 0,
            name: "TOSLINK Receiver".to_string(),
            serial: "TL0042".to_string(),
            location: 0x0403_6014,
            path: "/dev/ttyUSB0".to_string(),
        };
        assert!(dev.matches("TOSLINK Receiver"));
        assert!(dev.matches("TL0042"));
        assert!(!dev.matches("/dev/ttyUSB0"));
        assert!(!dev.matches("toslink receiver"));
    }
}
