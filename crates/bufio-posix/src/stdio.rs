//! Process standard streams.
//!
//! The three pre-opened descriptors are modeled as an explicitly
//! constructed bundle, built once at process start and passed by
//! reference to whatever needs them — not as ambient globals. Each
//! member sits behind a mutex because the bundle is, by construction,
//! the one stream object shared across owners; everything else in this
//! workspace is single-owner and unlocked.

use bufio_core::{OpenMode, Stream};
use parking_lot::Mutex;

use crate::fd::FdIo;

/// File descriptor for standard input.
pub const STDIN_FILENO: i32 = 0;
/// File descriptor for standard output.
pub const STDOUT_FILENO: i32 = 1;
/// File descriptor for standard error.
pub const STDERR_FILENO: i32 = 2;

/// The three standard streams of this process.
///
/// The descriptors are borrowed: closing or dropping the bundle never
/// closes fds 0–2.
#[derive(Debug)]
pub struct StdStreams {
    pub stdin: Mutex<Stream<FdIo>>,
    pub stdout: Mutex<Stream<FdIo>>,
    pub stderr: Mutex<Stream<FdIo>>,
}

impl StdStreams {
    /// Attach to the process's pre-opened descriptors.
    ///
    /// Build this once near process start and share it by reference.
    #[must_use]
    pub fn attach() -> Self {
        Self {
            stdin: Mutex::new(Stream::new(
                FdIo::borrowed(STDIN_FILENO),
                OpenMode::reading(),
            )),
            stdout: Mutex::new(Stream::new(
                FdIo::borrowed(STDOUT_FILENO),
                OpenMode::writing(),
            )),
            stderr: Mutex::new(Stream::new(
                FdIo::borrowed(STDERR_FILENO),
                OpenMode::writing(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attach_wraps_the_conventional_descriptors() {
        let std = StdStreams::attach();
        assert_eq!(std.stdin.lock().get_ref().fd(), STDIN_FILENO);
        assert_eq!(std.stdout.lock().get_ref().fd(), STDOUT_FILENO);
        assert_eq!(std.stderr.lock().get_ref().fd(), STDERR_FILENO);
    }

    #[test]
    fn dropping_the_bundle_leaves_descriptors_usable() {
        {
            let std = StdStreams::attach();
            std.stderr.lock().flush().unwrap();
        }
        // stderr must still be alive after the bundle is gone.
        let rc = unsafe { libc::write(STDERR_FILENO, b"".as_ptr().cast(), 0) };
        assert_eq!(rc, 0);
    }
}
