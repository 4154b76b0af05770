//! Iteration over lines, characters, and bytes.
//!
//! Each iterator drives the corresponding non-failing read until the
//! end-of-stream sentinel appears, then fuses. The sequences are lazy,
//! finite, and non-restartable; iterating again continues where the
//! previous pass stopped, so restarting requires an explicit `rewind`.

use crate::error::Result;
use crate::raw::RawIo;
use crate::scan::Separator;
use crate::stream::Stream;

/// Line iterator returned by [`Stream::lines`] and
/// [`Stream::lines_with`].
pub struct Lines<'s, D: RawIo> {
    stream: &'s mut Stream<D>,
    /// Separator resolved at construction; `None` means unbounded.
    sep: Option<Vec<u8>>,
    limit: Option<usize>,
    done: bool,
}

impl<D: RawIo> Iterator for Lines<'_, D> {
    type Item = Result<Vec<u8>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let sep = match &self.sep {
            Some(bytes) => Separator::Bytes(bytes),
            None => Separator::None,
        };
        match self.stream.gets_with(sep, self.limit) {
            Ok(Some(line)) => {
                // The unbounded form yields the whole remainder once;
                // after that only empty results follow.
                if self.sep.is_none() {
                    self.done = true;
                    if line.is_empty() {
                        return None;
                    }
                }
                Some(Ok(line))
            }
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

/// Character iterator returned by [`Stream::chars`].
pub struct Chars<'s, D: RawIo> {
    stream: &'s mut Stream<D>,
    done: bool,
}

impl<D: RawIo> Iterator for Chars<'_, D> {
    type Item = Result<Vec<u8>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.stream.getc() {
            Ok(Some(ch)) => Some(Ok(ch)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

/// Byte iterator returned by [`Stream::bytes`].
pub struct Bytes<'s, D: RawIo> {
    stream: &'s mut Stream<D>,
    done: bool,
}

impl<D: RawIo> Iterator for Bytes<'_, D> {
    type Item = Result<u8>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.stream.getbyte() {
            Ok(Some(b)) => Some(Ok(b)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

impl<D: RawIo> Stream<D> {
    /// Iterate over newline-terminated lines.
    pub fn lines(&mut self) -> Lines<'_, D> {
        self.lines_with(Separator::Default, None)
    }

    /// Iterate over lines under an explicit separator and limit.
    pub fn lines_with(&mut self, sep: Separator<'_>, limit: Option<usize>) -> Lines<'_, D> {
        Lines {
            stream: self,
            sep: sep.resolve().map(<[u8]>::to_vec),
            limit,
            done: false,
        }
    }

    /// Iterate over one-byte characters.
    pub fn chars(&mut self) -> Chars<'_, D> {
        Chars {
            stream: self,
            done: false,
        }
    }

    /// Iterate over bytes.
    pub fn bytes(&mut self) -> Bytes<'_, D> {
        Bytes {
            stream: self,
            done: false,
        }
    }
}
