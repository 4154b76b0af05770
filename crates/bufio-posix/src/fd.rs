//! File-descriptor backend.
//!
//! Implements the raw descriptor contract over plain POSIX file
//! descriptors. Every method maps to exactly one C library call; no
//! buffering, no retry loops. Short reads and writes pass through to
//! the stream layer untouched.

use std::ffi::CString;
use std::os::unix::ffi::OsStrExt;
use std::path::Path;

use bufio_core::{Error, OpenMode, RawIo, Result, Stream, Whence};

/// Raw POSIX file descriptor.
///
/// Owned descriptors are closed by `raw_close` (or on drop as a safety
/// net); borrowed ones — the process standard streams — are only marked
/// released, never actually closed.
#[derive(Debug)]
pub struct FdIo {
    fd: i32,
    owned: bool,
    open: bool,
}

impl FdIo {
    /// Wrap a descriptor this stream is responsible for closing.
    #[must_use]
    pub fn owned(fd: i32) -> Self {
        Self {
            fd,
            owned: true,
            open: true,
        }
    }

    /// Wrap a descriptor someone else owns (e.g. fd 0/1/2).
    #[must_use]
    pub fn borrowed(fd: i32) -> Self {
        Self {
            fd,
            owned: false,
            open: true,
        }
    }

    /// The descriptor number.
    #[must_use]
    pub fn fd(&self) -> i32 {
        self.fd
    }

    /// Open `path` with the given intent, returning an owned descriptor.
    pub fn open_path(path: &Path, mode: OpenMode) -> Result<Self> {
        let cpath = CString::new(path.as_os_str().as_bytes())
            .map_err(|_| Error::InvalidArgument("path contains a NUL byte".into()))?;
        let oflags = oflags_for(mode);
        // SAFETY: cpath is a valid NUL-terminated string for the duration
        // of the call; the mode argument is only read for O_CREAT.
        let fd = unsafe { libc::open(cpath.as_ptr(), oflags, 0o666 as libc::c_uint) };
        if fd < 0 {
            return Err(last_os_error());
        }
        log::trace!("open: {} -> fd {fd}", path.display());
        Ok(Self::owned(fd))
    }

    fn check_descriptor(&self) -> Result<()> {
        if !self.open {
            return Err(Error::Io(std::io::Error::other("descriptor released")));
        }
        Ok(())
    }
}

/// Map open intent to `O_*` bits.
fn oflags_for(mode: OpenMode) -> i32 {
    let mut oflags = match (mode.read, mode.write) {
        (true, true) => libc::O_RDWR,
        (false, true) => libc::O_WRONLY,
        // O_RDONLY is zero.
        _ => libc::O_RDONLY,
    };
    if mode.create {
        oflags |= libc::O_CREAT;
    }
    if mode.truncate {
        oflags |= libc::O_TRUNC;
    }
    if mode.append {
        oflags |= libc::O_APPEND;
    }
    if mode.exclusive {
        oflags |= libc::O_EXCL;
    }
    oflags
}

pub(crate) fn last_os_error() -> Error {
    Error::Io(std::io::Error::last_os_error())
}

impl RawIo for FdIo {
    fn raw_read(&mut self, max: usize) -> Result<Vec<u8>> {
        self.check_descriptor()?;
        let mut buf = vec![0u8; max];
        // SAFETY: buf is writable for max bytes and outlives the call.
        let n = unsafe { libc::read(self.fd, buf.as_mut_ptr().cast::<libc::c_void>(), max) };
        if n < 0 {
            return Err(last_os_error());
        }
        if n == 0 {
            return Err(Error::EndOfStream);
        }
        buf.truncate(n as usize);
        Ok(buf)
    }

    fn raw_write(&mut self, data: &[u8]) -> Result<usize> {
        self.check_descriptor()?;
        // SAFETY: data is readable for data.len() bytes.
        let n = unsafe {
            libc::write(
                self.fd,
                data.as_ptr().cast::<libc::c_void>(),
                data.len(),
            )
        };
        if n < 0 {
            return Err(last_os_error());
        }
        Ok(n as usize)
    }

    fn raw_seek(&mut self, offset: i64, whence: Whence) -> Result<u64> {
        self.check_descriptor()?;
        // SAFETY: lseek has no pointer arguments.
        let pos = unsafe { libc::lseek(self.fd, offset as libc::off_t, whence.as_raw()) };
        if pos < 0 {
            return Err(last_os_error());
        }
        Ok(pos as u64)
    }

    fn raw_close(&mut self) -> Result<()> {
        self.check_descriptor()?;
        self.open = false;
        if !self.owned {
            return Ok(());
        }
        // SAFETY: fd is a descriptor this instance owns; it is released
        // exactly once because `open` is cleared first.
        let rc = unsafe { libc::close(self.fd) };
        if rc < 0 {
            return Err(last_os_error());
        }
        Ok(())
    }

    fn is_tty(&self) -> bool {
        // SAFETY: isatty has no pointer arguments.
        unsafe { libc::isatty(self.fd) == 1 }
    }
}

impl Drop for FdIo {
    fn drop(&mut self) {
        if self.open && self.owned {
            self.open = false;
            // SAFETY: same ownership argument as raw_close.
            unsafe {
                libc::close(self.fd);
            }
        }
    }
}

/// Open a buffered stream over a file path.
///
/// `mode` is an fopen-style mode string (`"r"`, `"w+"`, `"a"`, ...).
pub fn open(path: impl AsRef<Path>, mode: &str) -> Result<Stream<FdIo>> {
    let mode = OpenMode::parse(mode)?;
    let fd = FdIo::open_path(path.as_ref(), mode)?;
    Ok(Stream::new(fd, mode))
}
