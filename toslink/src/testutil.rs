//! Scripted transport for hardware-free tests.

use {
    crate::{
        error::{Error, Result},
        transport::{PurgeMask, Transport},
    },
    std::{collections::VecDeque, time::Duration},
};

/// One scripted outcome for a `read` call.
pub(crate) enum ReadStep {
    /// Deliver up to these bytes; a surplus is carried into the next call.
    Data(Vec<u8>),
    /// Fail with a timeout.
    Fail,
}

/// In-memory transport that records writes and replays scripted reads.
pub(crate) struct MockTransport {
    /// Everything written, concatenated.
    pub written: Vec<u8>,
    /// Purge masks received, in order.
    pub purges: Vec<PurgeMask>,
    /// The `buf.len()` of each read call, in order.
    pub read_requests: Vec<usize>,
    /// Whether `close` was called.
    pub closed: bool,
    reads: VecDeque<ReadStep>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self {
            written: Vec::new(),
            purges: Vec::new(),
            read_requests: Vec::new(),
            closed: false,
            reads: VecDeque::new(),
        }
    }

    /// Script a successful read delivering `data`.
    pub fn queue_data(&mut self, data: impl Into<Vec<u8>>) {
        self.reads.push_back(ReadStep::Data(data.into()));
    }

    /// Script a failing read.
    pub fn queue_error(&mut self) {
        self.reads.push_back(ReadStep::Fail);
    }
}

impl Transport for MockTransport {
    fn write(&mut self, data: &[u8]) -> Result<usize> {
        self.written.extend_from_slice(data);
        Ok(data.len())
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        self.read_requests.push(buf.len());
        match self.reads.pop_front() {
            Some(ReadStep::Data(mut data)) => {
                let n = data.len().min(buf.len());
                buf[..n].copy_from_slice(&data[..n]);
                if data.len() > n {
                    data.drain(..n);
                    self.reads.push_front(ReadStep::Data(data));
                }
                Ok(n)
            },
            Some(ReadStep::Fail) => Err(Error::timeout("scripted failure")),
            None => Err(Error::timeout("no scripted data")),
        }
    }

    fn set_timeouts(&mut self, _read: Duration, _write: Duration) -> Result<()> {
        Ok(())
    }

    fn purge(&mut self, mask: PurgeMask) -> Result<()> {
        self.purges.push(mask);
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        self.closed = true;
        Ok(())
    }

    fn name(&self) -> &str {
        "mock"
    }
}
