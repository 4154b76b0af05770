//! Scoped acquisition wrappers.
//!
//! Each wrapper constructs a stream, hands it to the caller's closure,
//! and guarantees the descriptor is released on every exit path. A
//! failure raised while attempting the cleanup-time close is swallowed;
//! it never masks the closure's own outcome, and never propagates.

use std::path::Path;

use bufio_core::{Result, Stream};

use crate::fd::{FdIo, open};
use crate::process::{ChildPipe, pipe, popen};

/// Open `path`, run `f`, close on every exit path.
pub fn with_open<T, F>(path: impl AsRef<Path>, mode: &str, f: F) -> Result<T>
where
    F: FnOnce(&mut Stream<FdIo>) -> Result<T>,
{
    open(path, mode)?.scoped(f)
}

/// Spawn `command`, run `f`, close (and reap) on every exit path.
pub fn with_popen<T, F>(command: &str, mode: &str, f: F) -> Result<T>
where
    F: FnOnce(&mut Stream<ChildPipe>) -> Result<T>,
{
    popen(command, mode)?.scoped(f)
}

/// Create a pipe pair, run `f`, close both ends on every exit path.
///
/// Ends the closure already closed are left alone; close failures on
/// either end are swallowed like any cleanup-time close failure.
pub fn with_pipe<T, F>(f: F) -> Result<T>
where
    F: FnOnce(&mut Stream<FdIo>, &mut Stream<FdIo>) -> Result<T>,
{
    let (mut reader, mut writer) = pipe()?;
    let result = f(&mut reader, &mut writer);
    if !reader.closed() {
        let _ = reader.close();
    }
    if !writer.closed() {
        let _ = writer.close();
    }
    result
}
