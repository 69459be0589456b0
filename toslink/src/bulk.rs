//! Chunked bulk reads.
//!
//! USB bulk transfers routinely return fewer bytes per call than requested,
//! so a large response is accumulated across repeated transport reads. Each
//! call requests at most [`READ_CHUNK`] bytes and the destination offset
//! advances by whatever actually arrived. Any transport error aborts the
//! whole transfer; the caller discards the partially filled buffer.

use {
    crate::{
        error::{Error, Result},
        protocol::READ_CHUNK,
        transport::Transport,
    },
    log::trace,
};

/// Fill `buf` completely from repeated transport reads.
///
/// Returns only once every byte of `buf` has been received. A transport
/// error, or a successful read delivering zero bytes (the vendor driver's
/// way of reporting a timeout), fails the transfer as a whole.
pub fn read_exact<T: Transport>(transport: &mut T, buf: &mut [u8]) -> Result<()> {
    let total = buf.len();
    let mut filled = 0;

    while filled < total {
        let chunk = (total - filled).min(READ_CHUNK);
        let received = transport.read(&mut buf[filled..filled + chunk])?;
        if received == 0 {
            return Err(Error::timeout("device sent no data"));
        }
        filled += received;
        trace!("bulk read {filled}/{total} bytes");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::MockTransport;

    #[test]
    fn test_single_chunk() {
        let mut transport = MockTransport::new();
        transport.queue_data(vec![0xAB; 16]);

        let mut buf = [0u8; 16];
        read_exact(&mut transport, &mut buf).unwrap();
        assert_eq!(buf, [0xAB; 16]);
        assert_eq!(transport.read_requests, vec![16]);
    }

    #[test]
    fn test_accumulates_short_reads() {
        let mut transport = MockTransport::new();
        transport.queue_data(vec![1; 4]);
        transport.queue_data(vec![2; 6]);

        let mut buf = [0u8; 10];
        read_exact(&mut transport, &mut buf).unwrap();
        assert_eq!(&buf[..4], &[1; 4]);
        assert_eq!(&buf[4..], &[2; 6]);
        // Second request only asks for what is still missing.
        assert_eq!(transport.read_requests, vec![10, 6]);
    }

    #[test]
    fn test_respects_chunk_ceiling() {
        let mut transport = MockTransport::new();
        transport.queue_data(vec![0; READ_CHUNK]);
        transport.queue_data(vec![0; READ_CHUNK]);

        let mut buf = vec![0u8; 2 * READ_CHUNK];
        read_exact(&mut transport, &mut buf).unwrap();
        assert_eq!(transport.read_requests, vec![READ_CHUNK, READ_CHUNK]);
    }

    #[test]
    fn test_error_mid_transfer_aborts() {
        let mut transport = MockTransport::new();
        transport.queue_data(vec![7; 4]);
        transport.queue_error();

        let mut buf = [0u8; 12];
        assert!(read_exact(&mut transport, &mut buf).is_err());
    }

    #[test]
    fn test_zero_byte_read_is_timeout() {
        let mut transport = MockTransport::new();
        transport.queue_data(Vec::new());

        let mut buf = [0u8; 8];
        let err = read_exact(&mut transport, &mut buf).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_empty_request_reads_nothing() {
        let mut transport = MockTransport::new();
        let mut buf = [0u8; 0];
        read_exact(&mut transport, &mut buf).unwrap();
        assert!(transport.read_requests.is_empty());
    }
}
