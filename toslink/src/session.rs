//! Device session: the open transport plus the reusable transfer buffer.

use {
    crate::{
        bulk,
        error::{Error, Result},
        protocol::{
            CHANNEL_STATUS_LEN, Command, DeviceStatus, MAX_TRANSFER, STATUS_LEN, WORD_SIZE,
        },
        transport::{PurgeMask, Transport},
    },
    log::{debug, trace},
};

/// One open connection to a capture device.
///
/// Generic over the transport type `T`, which must implement the
/// [`Transport`] trait. The session owns the single accumulation buffer all
/// bulk transfers land in; execution is strictly sequential, so one buffer
/// serves every command.
pub struct Session<T: Transport> {
    transport: T,
    scratch: Box<[u8]>,
}

impl<T: Transport> Session<T> {
    /// Create a session over an opened transport.
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            scratch: vec![0; MAX_TRANSFER].into_boxed_slice(),
        }
    }

    /// Get a reference to the underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Consume the session and return the underlying transport.
    pub fn into_transport(self) -> T {
        self.transport
    }

    /// Encode and write one command, requiring the full write to complete.
    fn send(&mut self, cmd: Command) -> Result<()> {
        let data = cmd.encode();
        trace!("sending opcode {}, {} bytes", cmd.opcode(), data.len());

        let written = self.transport.write(&data)?;
        if written != data.len() {
            return Err(Error::timeout("short command write"));
        }
        Ok(())
    }

    /// Read `count` words of device memory starting at `addr`.
    ///
    /// `count * 4` must be nonzero and at most [`MAX_TRANSFER`]; the console
    /// layer normalizes operator input before calling. The returned slice
    /// borrows the session's accumulation buffer and is valid until the next
    /// command.
    pub fn read_memory(&mut self, addr: u32, count: u32) -> Result<&[u8]> {
        let len = u64::from(count) * WORD_SIZE as u64;
        if len == 0 || len > MAX_TRANSFER as u64 {
            return Err(Error::Syntax(format!("transfer size {len} out of range")));
        }
        #[allow(clippy::cast_possible_truncation)] // bounded by MAX_TRANSFER above
        let len = len as usize;

        self.send(Command::ReadMemory { addr, count })?;
        bulk::read_exact(&mut self.transport, &mut self.scratch[..len])?;
        debug!("read {len} bytes from {addr:#010x}");
        Ok(&self.scratch[..len])
    }

    /// Start capturing `count` frames. Fire-and-forget, no response.
    pub fn capture(&mut self, count: u32) -> Result<()> {
        self.send(Command::Capture { count })
    }

    /// Query the synchronization/progress state.
    pub fn status(&mut self) -> Result<DeviceStatus> {
        self.send(Command::Status)?;

        let mut buf = [0u8; STATUS_LEN];
        let received = self.transport.read(&mut buf)?;
        if received != STATUS_LEN {
            return Err(Error::Protocol {
                what: "status",
                expected: STATUS_LEN,
                actual: received,
            });
        }
        DeviceStatus::decode(&buf)
    }

    /// Fetch the raw channel status bytes. Opaque, no endian conversion.
    pub fn channel_status(&mut self) -> Result<[u8; CHANNEL_STATUS_LEN]> {
        self.send(Command::ChannelStatus)?;

        let mut buf = [0u8; CHANNEL_STATUS_LEN];
        let received = self.transport.read(&mut buf)?;
        if received != CHANNEL_STATUS_LEN {
            return Err(Error::Protocol {
                what: "channel status",
                expected: CHANNEL_STATUS_LEN,
                actual: received,
            });
        }
        Ok(buf)
    }

    /// Discard buffered transport data. Device-level, bypasses the protocol.
    pub fn purge(&mut self, mask: PurgeMask) -> Result<()> {
        self.transport.purge(mask)
    }

    /// Close the underlying transport.
    pub fn close(&mut self) -> Result<()> {
        self.transport.close()
    }
}
