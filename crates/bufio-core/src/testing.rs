//! Scriptable in-memory descriptor.
//!
//! Backs the engine's tests and benches with a descriptor whose behavior
//! can be bent at the edges: capped fill sizes, forced short writes, a
//! one-shot zero-byte fill, a close that fails. Counters record how many
//! raw operations the stream layer actually issued.

use crate::error::{Error, Result};
use crate::raw::{RawIo, Whence};

/// In-memory descriptor over a growable byte vector.
#[derive(Debug, Default)]
pub struct MemoryIo {
    data: Vec<u8>,
    cursor: usize,
    closed: bool,
    read_limit: Option<usize>,
    write_limit: Option<usize>,
    zero_fill_once: bool,
    failing_close: bool,
    reads: usize,
    writes: usize,
    seeks: usize,
}

impl MemoryIo {
    /// Descriptor positioned at the start of `data`.
    #[must_use]
    pub fn new(data: &[u8]) -> Self {
        Self {
            data: data.to_vec(),
            ..Self::default()
        }
    }

    /// Cap every raw read at `n` bytes, forcing small fill windows.
    #[must_use]
    pub fn with_read_limit(mut self, n: usize) -> Self {
        self.read_limit = Some(n);
        self
    }

    /// Cap every raw write at `n` bytes, forcing short writes.
    #[must_use]
    pub fn with_write_limit(mut self, n: usize) -> Self {
        self.write_limit = Some(n);
        self
    }

    /// Make the next raw read produce zero bytes without failing.
    #[must_use]
    pub fn with_zero_fill_once(mut self) -> Self {
        self.zero_fill_once = true;
        self
    }

    /// Make `raw_close` fail (the resource still counts as released).
    #[must_use]
    pub fn with_failing_close(mut self) -> Self {
        self.failing_close = true;
        self
    }

    /// Current raw cursor position.
    #[must_use]
    pub fn cursor(&self) -> u64 {
        self.cursor as u64
    }

    /// Full backing contents, regardless of cursor.
    #[must_use]
    pub fn contents(&self) -> &[u8] {
        &self.data
    }

    /// Raw reads issued so far.
    #[must_use]
    pub fn reads(&self) -> usize {
        self.reads
    }

    /// Raw writes issued so far.
    #[must_use]
    pub fn writes(&self) -> usize {
        self.writes
    }

    /// Raw seeks issued so far.
    #[must_use]
    pub fn seeks(&self) -> usize {
        self.seeks
    }

    fn check_descriptor(&self) -> Result<()> {
        if self.closed {
            return Err(Error::Io(std::io::Error::other("descriptor released")));
        }
        Ok(())
    }
}

impl RawIo for MemoryIo {
    fn raw_read(&mut self, max: usize) -> Result<Vec<u8>> {
        self.check_descriptor()?;
        self.reads += 1;
        if self.zero_fill_once {
            self.zero_fill_once = false;
            return Ok(Vec::new());
        }
        if self.cursor >= self.data.len() {
            return Err(Error::EndOfStream);
        }
        let available = self.data.len() - self.cursor;
        let take = max.min(self.read_limit.unwrap_or(usize::MAX)).min(available);
        let chunk = self.data[self.cursor..self.cursor + take].to_vec();
        self.cursor += take;
        Ok(chunk)
    }

    fn raw_write(&mut self, data: &[u8]) -> Result<usize> {
        self.check_descriptor()?;
        self.writes += 1;
        let take = data.len().min(self.write_limit.unwrap_or(usize::MAX));
        let end = self.cursor + take;
        if end > self.data.len() {
            self.data.resize(end, 0);
        }
        self.data[self.cursor..end].copy_from_slice(&data[..take]);
        self.cursor = end;
        Ok(take)
    }

    fn raw_seek(&mut self, offset: i64, whence: Whence) -> Result<u64> {
        self.check_descriptor()?;
        self.seeks += 1;
        let base = match whence {
            Whence::Start => 0i64,
            Whence::Current => self.cursor as i64,
            Whence::End => self.data.len() as i64,
        };
        let target = base + offset;
        if target < 0 {
            return Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "seek before start",
            )));
        }
        self.cursor = target as usize;
        Ok(target as u64)
    }

    fn raw_close(&mut self) -> Result<()> {
        if self.closed {
            return Err(Error::Io(std::io::Error::other("double close")));
        }
        self.closed = true;
        if self.failing_close {
            return Err(Error::Io(std::io::Error::other("close failed")));
        }
        Ok(())
    }
}
