//! Read-ahead buffer.
//!
//! One bounded buffer per stream, holding bytes already fetched from the
//! descriptor but not yet consumed by the caller. The representation is
//! an explicit cursor pair into a reusable backing array so the
//! fill/consume/pushback cycle stays allocation-light.
//!
//! Invariant: `pos <= filled <= data.len()`. The live window is
//! `data[pos..filled]`.

/// Bytes fetched per raw read when the buffer runs empty.
pub const BUF_SIZE: usize = 4096;

/// Single read-ahead cache for one stream.
#[derive(Debug)]
pub struct ReadBuffer {
    data: Vec<u8>,
    /// Start of the unconsumed window.
    pos: usize,
    /// End of the unconsumed window.
    filled: usize,
}

impl Default for ReadBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl ReadBuffer {
    /// Empty buffer with the standard backing capacity.
    #[must_use]
    pub fn new() -> Self {
        Self {
            data: vec![0u8; BUF_SIZE],
            pos: 0,
            filled: 0,
        }
    }

    /// Number of unconsumed bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.filled - self.pos
    }

    /// True when no unconsumed bytes remain.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pos == self.filled
    }

    /// The unconsumed window.
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.data[self.pos..self.filled]
    }

    /// Replace the (empty) buffer contents with a freshly fetched chunk.
    ///
    /// The backing array grows only if the chunk exceeds it, which a
    /// conforming raw layer never produces.
    pub fn refill(&mut self, chunk: &[u8]) {
        debug_assert!(self.is_empty(), "refill over unconsumed bytes");
        if chunk.len() > self.data.len() {
            self.data.resize(chunk.len(), 0);
        }
        self.data[..chunk.len()].copy_from_slice(chunk);
        self.pos = 0;
        self.filled = chunk.len();
    }

    /// Remove the first `n` bytes of the window, appending them to `out`.
    ///
    /// Requires `n <= len()`.
    pub fn consume_into(&mut self, n: usize, out: &mut Vec<u8>) {
        assert!(n <= self.len(), "consume past end of buffer");
        out.extend_from_slice(&self.data[self.pos..self.pos + n]);
        self.pos += n;
        if self.pos == self.filled {
            // Window drained: rewind cursors so the next refill reuses
            // the front of the backing array.
            self.pos = 0;
            self.filled = 0;
        }
    }

    /// Remove and return the first byte of the window.
    ///
    /// Requires a non-empty buffer.
    pub fn consume_byte(&mut self) -> u8 {
        assert!(!self.is_empty(), "consume from empty buffer");
        let b = self.data[self.pos];
        self.pos += 1;
        if self.pos == self.filled {
            self.pos = 0;
            self.filled = 0;
        }
        b
    }

    /// Push bytes back in front of the window.
    ///
    /// Pure buffer mutation; no raw I/O happens here. Subsequent reads
    /// observe `bytes` before anything already buffered. When the front
    /// gap is too small the window shifts right, growing the backing
    /// array if needed.
    pub fn prepend(&mut self, bytes: &[u8]) {
        if bytes.is_empty() {
            return;
        }
        if bytes.len() <= self.pos {
            let start = self.pos - bytes.len();
            self.data[start..self.pos].copy_from_slice(bytes);
            self.pos = start;
            return;
        }

        let existing = self.len();
        let total = bytes.len() + existing;
        if total > self.data.len() {
            self.data.resize(total, 0);
        }
        self.data.copy_within(self.pos..self.filled, bytes.len());
        self.data[..bytes.len()].copy_from_slice(bytes);
        self.pos = 0;
        self.filled = total;
    }

    /// Discard all unconsumed bytes.
    pub fn clear(&mut self) {
        self.pos = 0;
        self.filled = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled_with(bytes: &[u8]) -> ReadBuffer {
        let mut buf = ReadBuffer::new();
        buf.refill(bytes);
        buf
    }

    #[test]
    fn refill_then_consume() {
        let mut buf = filled_with(b"hello world");
        let mut out = Vec::new();
        buf.consume_into(5, &mut out);
        assert_eq!(out, b"hello");
        assert_eq!(buf.bytes(), b" world");
        buf.consume_into(6, &mut out);
        assert_eq!(out, b"hello world");
        assert!(buf.is_empty());
    }

    #[test]
    fn drained_buffer_rewinds_cursors() {
        let mut buf = filled_with(b"ab");
        let mut out = Vec::new();
        buf.consume_into(2, &mut out);
        // After a full drain the next refill starts at the front again.
        buf.refill(b"cd");
        assert_eq!(buf.bytes(), b"cd");
    }

    #[test]
    fn consume_byte_steps_through() {
        let mut buf = filled_with(b"xy");
        assert_eq!(buf.consume_byte(), b'x');
        assert_eq!(buf.consume_byte(), b'y');
        assert!(buf.is_empty());
    }

    #[test]
    #[should_panic(expected = "consume past end")]
    fn consume_past_end_panics() {
        let mut buf = filled_with(b"ab");
        let mut out = Vec::new();
        buf.consume_into(3, &mut out);
    }

    #[test]
    fn prepend_into_front_gap() {
        let mut buf = filled_with(b"hello");
        let mut out = Vec::new();
        buf.consume_into(1, &mut out); // open a one-byte gap
        buf.prepend(b"h");
        assert_eq!(buf.bytes(), b"hello");
    }

    #[test]
    fn prepend_shifts_when_gap_too_small() {
        let mut buf = filled_with(b"world");
        buf.prepend(b"hello ");
        assert_eq!(buf.bytes(), b"hello world");
    }

    #[test]
    fn prepend_grows_past_backing_capacity() {
        let mut buf = filled_with(&[b'a'; BUF_SIZE]);
        let pushed = vec![b'b'; 100];
        buf.prepend(&pushed);
        assert_eq!(buf.len(), BUF_SIZE + 100);
        assert_eq!(&buf.bytes()[..100], &pushed[..]);
        assert_eq!(buf.bytes()[100], b'a');
    }

    #[test]
    fn prepend_empty_is_noop() {
        let mut buf = filled_with(b"abc");
        buf.prepend(b"");
        assert_eq!(buf.bytes(), b"abc");
    }

    #[test]
    fn clear_discards_window() {
        let mut buf = filled_with(b"abc");
        buf.clear();
        assert!(buf.is_empty());
        assert_eq!(buf.len(), 0);
    }
}
