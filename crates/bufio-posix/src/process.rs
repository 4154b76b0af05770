//! Process-pipe descriptors.
//!
//! `popen` runs a shell command with one end of its standard I/O piped
//! into a stream; `pipe` produces a connected reader/writer pair over a
//! kernel pipe. Pipe descriptors are not seekable: the raw layer
//! surfaces `ESPIPE`, and the stream layer passes it through.

use std::io::{Read, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

use bufio_core::{Error, OpenMode, RawIo, Result, Stream, Whence};

use crate::fd::{FdIo, last_os_error};

/// True when this platform can spawn process pipes.
#[must_use]
pub const fn pipes_supported() -> bool {
    cfg!(unix)
}

/// One piped end of a spawned child process.
///
/// Closing reaps the child: the pipe handle is dropped first so the
/// child observes end-of-input, then the process is waited on.
#[derive(Debug)]
pub struct ChildPipe {
    child: Child,
    stdout: Option<ChildStdout>,
    stdin: Option<ChildStdin>,
    open: bool,
}

impl ChildPipe {
    fn check_descriptor(&self) -> Result<()> {
        if !self.open {
            return Err(Error::Io(std::io::Error::other("descriptor released")));
        }
        Ok(())
    }
}

impl RawIo for ChildPipe {
    fn raw_read(&mut self, max: usize) -> Result<Vec<u8>> {
        self.check_descriptor()?;
        let Some(stdout) = self.stdout.as_mut() else {
            return Err(Error::Io(std::io::Error::other(
                "pipe not opened for reading",
            )));
        };
        let mut buf = vec![0u8; max];
        let n = stdout.read(&mut buf)?;
        if n == 0 {
            return Err(Error::EndOfStream);
        }
        buf.truncate(n);
        Ok(buf)
    }

    fn raw_write(&mut self, data: &[u8]) -> Result<usize> {
        self.check_descriptor()?;
        let Some(stdin) = self.stdin.as_mut() else {
            return Err(Error::Io(std::io::Error::other(
                "pipe not opened for writing",
            )));
        };
        Ok(stdin.write(data)?)
    }

    fn raw_seek(&mut self, _offset: i64, _whence: Whence) -> Result<u64> {
        self.check_descriptor()?;
        Err(Error::Io(std::io::Error::from_raw_os_error(libc::ESPIPE)))
    }

    fn raw_close(&mut self) -> Result<()> {
        self.check_descriptor()?;
        self.open = false;
        // Dropping the handles closes the pipe ends, letting the child
        // run to completion before the wait.
        self.stdin.take();
        self.stdout.take();
        let status = self.child.wait()?;
        log::debug!("popen: child exited with {status}");
        Ok(())
    }
}

/// Spawn `command` through the shell with one end piped.
///
/// Mode `"r"` captures the child's standard output; `"w"` feeds its
/// standard input; `"r+"` pipes both.
pub fn popen(command: &str, mode: &str) -> Result<Stream<ChildPipe>> {
    if !pipes_supported() {
        return Err(Error::Unsupported("popen"));
    }
    let mode = OpenMode::parse(mode)?;

    let mut cmd = Command::new("sh");
    cmd.arg("-c").arg(command);
    if mode.read {
        cmd.stdout(Stdio::piped());
    }
    if mode.write {
        cmd.stdin(Stdio::piped());
    }

    let mut child = cmd.spawn()?;
    log::debug!("popen: spawned {command:?}");
    let stdout = child.stdout.take();
    let stdin = child.stdin.take();
    Ok(Stream::new(
        ChildPipe {
            child,
            stdout,
            stdin,
            open: true,
        },
        mode,
    ))
}

/// Create a connected pipe pair: `(reader, writer)`.
pub fn pipe() -> Result<(Stream<FdIo>, Stream<FdIo>)> {
    if !pipes_supported() {
        return Err(Error::Unsupported("pipe"));
    }
    let mut fds = [0i32; 2];
    // SAFETY: fds points at two writable descriptor slots.
    let rc = unsafe { libc::pipe(fds.as_mut_ptr()) };
    if rc < 0 {
        return Err(last_os_error());
    }
    Ok((
        Stream::new(FdIo::owned(fds[0]), OpenMode::reading()),
        Stream::new(FdIo::owned(fds[1]), OpenMode::writing()),
    ))
}
