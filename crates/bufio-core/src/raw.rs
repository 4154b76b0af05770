//! Raw descriptor contract.
//!
//! The stream engine never touches a platform resource directly; it goes
//! through this trait. Implementations are expected to be unbuffered:
//! every call maps to one operation on the underlying resource.

use crate::error::Result;

/// Origin for a raw seek.
///
/// Values mirror the conventional `whence` encoding (start = 0,
/// current = 1, end = 2).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Whence {
    /// Absolute offset from the beginning of the resource.
    Start,
    /// Offset relative to the current cursor.
    Current,
    /// Offset relative to the end of the resource.
    End,
}

impl Whence {
    /// The conventional integer encoding of this origin.
    #[must_use]
    pub const fn as_raw(self) -> i32 {
        match self {
            Whence::Start => 0,
            Whence::Current => 1,
            Whence::End => 2,
        }
    }
}

/// Unbuffered descriptor operations.
///
/// Contract:
/// - `raw_read` returns between 1 and `max` bytes, or fails with
///   [`Error::EndOfStream`](crate::Error::EndOfStream) once the resource
///   is exhausted. Reporting exhaustion as an error is deliberate; the
///   buffering layer converts it where a sentinel is wanted.
/// - `raw_write` reports the count actually written, which may be short.
///   No retry is performed at any layer.
/// - `raw_seek` returns the resulting absolute position.
/// - `raw_close` releases the resource. Idempotence is not guaranteed by
///   the primitive; the stream layer guards against double close.
pub trait RawIo {
    /// Read up to `max` bytes at the current cursor.
    fn raw_read(&mut self, max: usize) -> Result<Vec<u8>>;

    /// Write `data` at the current cursor, returning the count written.
    fn raw_write(&mut self, data: &[u8]) -> Result<usize>;

    /// Reposition the cursor, returning the new absolute position.
    fn raw_seek(&mut self, offset: i64, whence: Whence) -> Result<u64>;

    /// Release the underlying resource.
    fn raw_close(&mut self) -> Result<()>;

    /// True when the descriptor refers to a terminal device.
    fn is_tty(&self) -> bool {
        false
    }
}
