//! Buffered stream engine.
//!
//! `Stream` owns one raw descriptor and one read-ahead buffer. Reads go
//! through the buffer; writes bypass it entirely, after realigning the
//! raw cursor so pending read-ahead is not skipped past. The governing
//! invariant: the raw cursor is ahead of the caller's logical position by
//! exactly the buffered byte count, so
//! `pos() == raw cursor - buffered bytes` at all times.
//!
//! Every operation that can observe end-of-stream exists in a failing and
//! a non-failing form (`read_line`/`gets`, `read_char`/`getc`,
//! `read_byte`/`getbyte`). The non-failing forms convert the raw layer's
//! end-of-stream error into a `None` sentinel locally; nothing else is
//! ever converted.

use crate::buffer::{BUF_SIZE, ReadBuffer};
use crate::error::{Error, Result};
use crate::mode::OpenMode;
use crate::raw::{RawIo, Whence};
use crate::scan::{ScanStep, Separator, scan_window};

/// Buffered stream over a raw descriptor.
#[derive(Debug)]
pub struct Stream<D: RawIo> {
    raw: D,
    buf: ReadBuffer,
    mode: OpenMode,
    closed: bool,
}

/// Convert a failing read result into its sentinel twin.
fn sentinel<T>(res: Result<T>) -> Result<Option<T>> {
    match res {
        Ok(v) => Ok(Some(v)),
        Err(Error::EndOfStream) => Ok(None),
        Err(e) => Err(e),
    }
}

impl<D: RawIo> Stream<D> {
    /// Wrap a freshly opened descriptor with an empty read-ahead buffer.
    pub fn new(raw: D, mode: OpenMode) -> Self {
        Self {
            raw,
            buf: ReadBuffer::new(),
            mode,
            closed: false,
        }
    }

    /// The open intent recorded at construction.
    #[must_use]
    pub fn mode(&self) -> OpenMode {
        self.mode
    }

    /// Shared access to the underlying descriptor.
    #[must_use]
    pub fn get_ref(&self) -> &D {
        &self.raw
    }

    /// True once `close` has run.
    #[must_use]
    pub fn closed(&self) -> bool {
        self.closed
    }

    /// True when the descriptor refers to a terminal device.
    #[must_use]
    pub fn is_tty(&self) -> bool {
        self.raw.is_tty()
    }

    /// Number of read-ahead bytes currently buffered.
    ///
    /// The raw cursor is ahead of [`pos`](Self::pos) by exactly this
    /// count.
    #[must_use]
    pub fn buffered(&self) -> usize {
        self.buf.len()
    }

    fn check_open(&self) -> Result<()> {
        if self.closed {
            return Err(Error::Closed);
        }
        Ok(())
    }

    /// Top up the read-ahead buffer.
    ///
    /// No raw read is issued while buffered bytes remain; read-ahead is
    /// opportunistic, not eager. Raw end-of-stream propagates so callers
    /// can distinguish "ended" from "had data".
    fn fill_buf(&mut self) -> Result<()> {
        if !self.buf.is_empty() {
            return Ok(());
        }
        let chunk = self.raw.raw_read(BUF_SIZE)?;
        log::trace!("fill: fetched {} bytes", chunk.len());
        self.buf.refill(&chunk);
        Ok(())
    }

    /// Like `fill_buf`, but reports whether any bytes are available,
    /// folding both end-of-stream and a zero-byte fill into `false`.
    fn fill_or_end(&mut self) -> Result<bool> {
        match self.fill_buf() {
            Ok(()) => Ok(!self.buf.is_empty()),
            Err(Error::EndOfStream) => Ok(false),
            Err(e) => Err(e),
        }
    }

    // -----------------------------------------------------------------------
    // Byte / character reads
    // -----------------------------------------------------------------------

    /// Read exactly one byte, failing with `EndOfStream` at the end.
    pub fn read_byte(&mut self) -> Result<u8> {
        self.check_open()?;
        if !self.fill_or_end()? {
            return Err(Error::EndOfStream);
        }
        Ok(self.buf.consume_byte())
    }

    /// Non-failing `read_byte`: `None` at the end of the stream.
    pub fn getbyte(&mut self) -> Result<Option<u8>> {
        sentinel(self.read_byte())
    }

    /// Read one character, failing with `EndOfStream` at the end.
    ///
    /// A character is a one-byte owned substring; interpretation of
    /// multi-byte sequences belongs to the caller.
    pub fn read_char(&mut self) -> Result<Vec<u8>> {
        Ok(vec![self.read_byte()?])
    }

    /// Non-failing `read_char`: `None` at the end of the stream.
    pub fn getc(&mut self) -> Result<Option<Vec<u8>>> {
        sentinel(self.read_char())
    }

    // -----------------------------------------------------------------------
    // Bulk reads
    // -----------------------------------------------------------------------

    /// Read `length` bytes, or everything that remains.
    ///
    /// - `None`: drain the descriptor to the end. Always produces a
    ///   result, possibly empty when already at the end.
    /// - `Some(0)`: empty result immediately, no raw I/O, no state
    ///   change.
    /// - `Some(n)`: accumulate up to `n` bytes by repeated fill+consume.
    ///   Reaching the end with nothing accumulated yields `Ok(None)`;
    ///   a short result is not an error.
    pub fn read(&mut self, length: Option<usize>) -> Result<Option<Vec<u8>>> {
        let mut out = Vec::new();
        Ok(self.read_into(length, &mut out)?.map(|_| out))
    }

    /// `read` into a caller-provided buffer.
    ///
    /// `out` is cleared in every case, including the sentinel one, and
    /// afterwards holds exactly the bytes read. Returns the byte count,
    /// or `None` for the bounded-read-at-end case.
    pub fn read_into(&mut self, length: Option<usize>, out: &mut Vec<u8>) -> Result<Option<usize>> {
        self.check_open()?;
        out.clear();
        if length == Some(0) {
            return Ok(Some(0));
        }

        let mut remaining = length;
        loop {
            if !self.fill_or_end()? {
                if out.is_empty() && length.is_some() {
                    return Ok(None);
                }
                break;
            }
            match remaining {
                Some(want) => {
                    let take = want.min(self.buf.len());
                    self.buf.consume_into(take, out);
                    if want == take {
                        break;
                    }
                    remaining = Some(want - take);
                }
                None => {
                    let n = self.buf.len();
                    self.buf.consume_into(n, out);
                }
            }
        }
        Ok(Some(out.len()))
    }

    // -----------------------------------------------------------------------
    // Line reads
    // -----------------------------------------------------------------------

    /// Non-failing line read with explicit separator and limit.
    ///
    /// Scans the buffered window for the separator, cutting at the limit
    /// whenever the window already holds that many bytes. Windows that
    /// contain neither are appended whole to the accumulator before the
    /// next fill, so separator matches never span fills. The terminator
    /// bytes stay in the returned line. `None` once the stream ends with
    /// nothing accumulated.
    pub fn gets_with(
        &mut self,
        sep: Separator<'_>,
        limit: Option<usize>,
    ) -> Result<Option<Vec<u8>>> {
        self.check_open()?;
        let Some(sep) = sep.resolve() else {
            // No separator at all: degrade to an unbounded drain, which
            // produces an empty line (not the sentinel) at the end.
            return self.read(None);
        };

        let mut line = Vec::new();
        loop {
            if !self.fill_or_end()? {
                if line.is_empty() {
                    return Ok(None);
                }
                break;
            }
            match scan_window(self.buf.bytes(), sep, limit) {
                ScanStep::Cut(n) => {
                    self.buf.consume_into(n, &mut line);
                    break;
                }
                ScanStep::TakeAll => {
                    let n = self.buf.len();
                    self.buf.consume_into(n, &mut line);
                }
            }
        }
        Ok(Some(line))
    }

    /// Non-failing line read with the default newline separator.
    pub fn gets(&mut self) -> Result<Option<Vec<u8>>> {
        self.gets_with(Separator::Default, None)
    }

    /// Non-failing line read bounded by `limit` bytes.
    pub fn gets_limit(&mut self, limit: usize) -> Result<Option<Vec<u8>>> {
        self.gets_with(Separator::Default, Some(limit))
    }

    /// Failing line read: `EndOfStream` once the stream ends with
    /// nothing accumulated.
    pub fn read_line_with(&mut self, sep: Separator<'_>, limit: Option<usize>) -> Result<Vec<u8>> {
        self.gets_with(sep, limit)?.ok_or(Error::EndOfStream)
    }

    /// Failing line read with the default newline separator.
    pub fn read_line(&mut self) -> Result<Vec<u8>> {
        self.read_line_with(Separator::Default, None)
    }

    /// Collect every remaining line.
    pub fn read_lines(&mut self) -> Result<Vec<Vec<u8>>> {
        let mut lines = Vec::new();
        while let Some(line) = self.gets()? {
            lines.push(line);
        }
        Ok(lines)
    }

    // -----------------------------------------------------------------------
    // Pushback
    // -----------------------------------------------------------------------

    /// Push text back in front of the buffer.
    ///
    /// Pure buffer mutation; subsequent reads observe these bytes before
    /// any newly fetched ones.
    pub fn ungetc(&mut self, text: &[u8]) {
        self.buf.prepend(text);
    }

    /// Push a single byte back in front of the buffer.
    pub fn ungetbyte(&mut self, byte: u8) {
        self.ungetc(&[byte]);
    }

    // -----------------------------------------------------------------------
    // Writes
    // -----------------------------------------------------------------------

    /// Write `data` through to the descriptor.
    ///
    /// Empty input returns 0 without touching the raw layer. When
    /// read-ahead is buffered, the raw cursor is first realigned to the
    /// logical position and the buffer discarded, so the write lands
    /// where the caller logically is; the discarded look-ahead is gone
    /// for good. Exactly one raw write is issued and its count returned
    /// as-is (short writes are the caller's problem).
    pub fn write(&mut self, data: &[u8]) -> Result<usize> {
        self.check_open()?;
        if data.is_empty() {
            return Ok(0);
        }
        if !self.buf.is_empty() {
            let logical = self.pos()?;
            log::trace!(
                "write: discarding {} read-ahead bytes, realigning to {}",
                self.buf.len(),
                logical
            );
            self.raw.raw_seek(logical as i64, Whence::Start)?;
            self.buf.clear();
        }
        self.raw.raw_write(data)
    }

    /// `write` returning the stream for chaining.
    pub fn append(&mut self, data: &[u8]) -> Result<&mut Self> {
        self.write(data)?;
        Ok(self)
    }

    /// Write each argument followed by a newline, unless it already ends
    /// with one. No arguments produce a single newline.
    pub fn puts(&mut self, args: &[&[u8]]) -> Result<()> {
        if args.is_empty() {
            self.write(b"\n")?;
            return Ok(());
        }
        for arg in args {
            self.write(arg)?;
            if arg.last() != Some(&b'\n') {
                self.write(b"\n")?;
            }
        }
        Ok(())
    }

    /// Write each argument with no decoration.
    pub fn print(&mut self, args: &[&[u8]]) -> Result<()> {
        for arg in args {
            self.write(arg)?;
        }
        Ok(())
    }

    /// Formatted write: `stream.printf(format_args!("{} bytes", n))`.
    pub fn printf(&mut self, args: std::fmt::Arguments<'_>) -> Result<()> {
        let rendered = std::fmt::format(args);
        self.write(rendered.as_bytes())?;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Position
    // -----------------------------------------------------------------------

    /// Reposition the descriptor and discard all read-ahead.
    ///
    /// The buffered bytes are only valid relative to the pre-seek
    /// cursor, so the clear is unconditional.
    pub fn seek(&mut self, offset: i64, whence: Whence) -> Result<()> {
        self.check_open()?;
        self.raw.raw_seek(offset, whence)?;
        self.buf.clear();
        Ok(())
    }

    /// The caller's logical position: raw cursor minus buffered bytes.
    pub fn pos(&mut self) -> Result<u64> {
        self.check_open()?;
        let cursor = self.raw.raw_seek(0, Whence::Current)?;
        Ok(cursor - self.buf.len() as u64)
    }

    /// Absolute-position form of `seek`.
    pub fn set_pos(&mut self, pos: u64) -> Result<()> {
        self.seek(pos as i64, Whence::Start)
    }

    /// Seek back to the beginning.
    pub fn rewind(&mut self) -> Result<()> {
        self.seek(0, Whence::Start)
    }

    // -----------------------------------------------------------------------
    // State queries and lifecycle
    // -----------------------------------------------------------------------

    /// Probe for end-of-stream without ever failing on it.
    ///
    /// Attempts one fill; end-of-stream during the probe becomes `true`,
    /// as does a fill that legitimately produced no bytes.
    pub fn eof(&mut self) -> Result<bool> {
        self.check_open()?;
        Ok(!self.fill_or_end()?)
    }

    /// Precondition check only: no bytes are ever held for writing, so
    /// there is nothing to flush.
    pub fn flush(&mut self) -> Result<()> {
        self.check_open()
    }

    /// Release the descriptor. Exactly one close succeeds; any later
    /// operation, including a second close, fails with `Closed`.
    pub fn close(&mut self) -> Result<()> {
        self.check_open()?;
        self.closed = true;
        self.buf.clear();
        log::trace!("close: releasing descriptor");
        self.raw.raw_close()
    }

    /// Run `f` against the stream, then close it on every exit path.
    ///
    /// A failure raised by the cleanup-time close itself is swallowed;
    /// it never masks the outcome of `f`. Already-closed streams are
    /// left alone.
    pub fn scoped<T, F>(mut self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Self) -> Result<T>,
    {
        let result = f(&mut self);
        if !self.closed {
            let _ = self.close();
        }
        result
    }
}

impl<D: RawIo> Drop for Stream<D> {
    fn drop(&mut self) {
        if !self.closed {
            self.closed = true;
            let _ = self.raw.raw_close();
        }
    }
}
