//! Capture-board command protocol.
//!
//! Commands are sequences of 4-byte big-endian words: the opcode word first,
//! then the operation-specific argument words. There is no framing, length
//! prefix, or checksum; message boundaries are implicit in the fixed
//! per-opcode layouts.
//!
//! ```text
//! +-----------+-----------+-----------+
//! |  opcode   |   arg 0   |   arg 1   |   (each 4 bytes, big-endian)
//! +-----------+-----------+-----------+
//! ```
//!
//! | Opcode | Name           | Arguments      | Response               |
//! |--------|----------------|----------------|------------------------|
//! | 1      | Read Memory    | address, count | `count * 4` raw bytes  |
//! | 3      | Capture        | count          | none                   |
//! | 4      | Status         | none           | 2 words                |
//! | 5      | Channel Status | none           | 24 raw bytes, opaque   |
//!
//! Status and channel-status responses have fixed lengths; a received length
//! that differs is a protocol error. Bulk read payloads and the channel
//! status bytes are raw sample/register data and get no endian conversion.

use {
    crate::error::{Error, Result},
    byteorder::{BigEndian, ByteOrder, WriteBytesExt},
};

/// Bytes per protocol word.
pub const WORD_SIZE: usize = 4;

/// Capacity of the accumulation buffer, and the largest transfer (in bytes)
/// a single read or save command may request.
pub const MAX_TRANSFER: usize = 65536;

/// Per-call ceiling (in bytes) for a single transport read during a bulk
/// transfer.
pub const READ_CHUNK: usize = 32768;

/// Word count substituted when a `read` command's count is absent, zero, or
/// out of range.
pub const DEFAULT_READ_WORDS: u32 = 64;

/// Byte length of a status response (two words).
pub const STATUS_LEN: usize = 2 * WORD_SIZE;

/// Byte length of a channel status response.
pub const CHANNEL_STATUS_LEN: usize = 24;

/// One device command, opcode plus argument words.
///
/// Constructed per operator request, encoded, and discarded once written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Opcode 1: read `count` words of memory starting at `addr`.
    ReadMemory {
        /// Word address to read from.
        addr: u32,
        /// Number of words to transfer.
        count: u32,
    },
    /// Opcode 3: start capturing `count` frames. Fire-and-forget.
    Capture {
        /// Number of frames to capture.
        count: u32,
    },
    /// Opcode 4: query synchronization/progress state.
    Status,
    /// Opcode 5: fetch the raw channel status bytes.
    ChannelStatus,
}

impl Command {
    /// The opcode word for this command.
    pub fn opcode(self) -> u32 {
        match self {
            Self::ReadMemory { .. } => 1,
            Self::Capture { .. } => 3,
            Self::Status => 4,
            Self::ChannelStatus => 5,
        }
    }

    /// Encode the command as consecutive big-endian words.
    #[allow(clippy::unwrap_used)] // Writing to Vec<u8> cannot fail
    pub fn encode(self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(3 * WORD_SIZE);
        buf.write_u32::<BigEndian>(self.opcode()).unwrap();
        match self {
            Self::ReadMemory { addr, count } => {
                buf.write_u32::<BigEndian>(addr).unwrap();
                buf.write_u32::<BigEndian>(count).unwrap();
            },
            Self::Capture { count } => {
                buf.write_u32::<BigEndian>(count).unwrap();
            },
            Self::Status | Self::ChannelStatus => {},
        }
        buf
    }

    /// Fixed response length in bytes, if this opcode has one.
    ///
    /// `ReadMemory` responses are caller-sized (`count * 4`) and `Capture`
    /// has no response, so both report `None` here.
    pub fn fixed_response_len(self) -> Option<usize> {
        match self {
            Self::Status => Some(STATUS_LEN),
            Self::ChannelStatus => Some(CHANNEL_STATUS_LEN),
            Self::ReadMemory { .. } | Self::Capture { .. } => None,
        }
    }
}

/// Decoded status response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceStatus {
    /// Receiver is locked onto the optical input (word 0, bit 0).
    pub synchronized: bool,
    /// The requested capture has completed (word 0, bit 1).
    pub done: bool,
    /// Frames remaining in the current capture (word 1).
    pub frames_left: u32,
}

impl DeviceStatus {
    /// Decode a status response.
    ///
    /// The response must be exactly [`STATUS_LEN`] bytes.
    pub fn decode(data: &[u8]) -> Result<Self> {
        if data.len() != STATUS_LEN {
            return Err(Error::Protocol {
                what: "status",
                expected: STATUS_LEN,
                actual: data.len(),
            });
        }

        let flags = BigEndian::read_u32(&data[..WORD_SIZE]);
        let frames_left = BigEndian::read_u32(&data[WORD_SIZE..]);

        Ok(Self {
            synchronized: flags & 1 != 0,
            done: flags & 2 != 0,
            frames_left,
        })
    }
}
