//! # bufio-core
//!
//! Buffered stream engine over raw, unbuffered descriptor primitives.
//!
//! One read-ahead buffer per stream gives line-, character-, and
//! byte-oriented read access with pushback and position tracking, while
//! writes always pass straight through to the descriptor. The raw layer
//! is reached only through the [`RawIo`] trait; platform backends live
//! in their own crate. No `unsafe` code is permitted at the crate level.

#![deny(unsafe_code)]

pub mod buffer;
pub mod error;
pub mod iter;
pub mod mode;
pub mod raw;
pub mod scan;
pub mod stream;
pub mod testing;

pub use buffer::{BUF_SIZE, ReadBuffer};
pub use error::{Error, Result};
pub use mode::OpenMode;
pub use raw::{RawIo, Whence};
pub use scan::Separator;
pub use stream::Stream;
