//! # bufio-posix
//!
//! POSIX backend for the buffered stream engine: fd-backed descriptors
//! via the C library, process-pipe constructors, scoped-acquisition
//! wrappers, and the standard-stream bundle. All platform-specific and
//! `unsafe` code in the workspace lives here; the engine itself stays
//! pure.

pub mod fd;
pub mod process;
pub mod scoped;
pub mod stdio;

pub use fd::{FdIo, open};
pub use process::{ChildPipe, pipe, pipes_supported, popen};
pub use scoped::{with_open, with_pipe, with_popen};
pub use stdio::{STDERR_FILENO, STDIN_FILENO, STDOUT_FILENO, StdStreams};
