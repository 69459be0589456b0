//! # toslink
//!
//! Library for driving a TOSLINK optical-audio capture board attached
//! behind a USB bridge.
//!
//! The device speaks a small binary protocol of 4-byte big-endian words:
//! an opcode word followed by operation-specific arguments, answered by a
//! fixed- or caller-sized response. This crate provides:
//!
//! - The wire codec ([`protocol`])
//! - Chunked bulk reads for large transfers ([`bulk`])
//! - A per-device session over a generic transport ([`session`])
//! - The operator console: parsing, dispatch, and rendering ([`console`])
//! - The transport boundary and its native backend ([`transport`])
//!
//! ## Example
//!
//! ```rust,no_run
//! use toslink::{NativeEnumerator, NativeTransport, Session, TransportEnumerator};
//! use toslink::transport::DEFAULT_TIMEOUT;
//!
//! fn main() -> toslink::Result<()> {
//!     let devices = NativeEnumerator::enumerate()?;
//!     let device = &devices[0];
//!
//!     let transport = NativeTransport::open(device, DEFAULT_TIMEOUT)?;
//!     let mut session = Session::new(transport);
//!
//!     let status = session.status()?;
//!     println!("{} frames left", status.frames_left);
//!
//!     session.close()
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod bulk;
pub mod console;
pub mod error;
pub mod protocol;
pub mod session;
pub mod transport;

#[cfg(test)]
pub(crate) mod testutil;

// Re-exports for convenience
// Native-specific re-exports
#[cfg(feature = "native")]
pub use transport::{NativeEnumerator, NativeTransport};
pub use {
    console::ConsoleCommand,
    error::{Error, Result},
    protocol::{Command, DeviceStatus},
    session::Session,
    transport::{DeviceInfo, PurgeMask, Transport, TransportEnumerator},
};
