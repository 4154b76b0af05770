//! Error taxonomy for stream operations.
//!
//! `EndOfStream` is the only variant that is part of normal control flow:
//! the raw fill primitive reports exhaustion with it, and every
//! non-failing entry point (`gets`, `getc`, `getbyte`, `eof`) converts it
//! to a sentinel value locally. All other variants propagate unchanged.

use thiserror::Error;

/// Result alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, Error>;

/// Stream-level error taxonomy.
#[derive(Debug, Error)]
pub enum Error {
    /// The raw layer had no bytes left to produce.
    #[error("end of stream reached")]
    EndOfStream,

    /// Operation invoked after the stream was closed.
    #[error("stream is closed")]
    Closed,

    /// Malformed caller argument (e.g. an unrecognized open-mode string).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The platform lacks the raw capability backing this constructor.
    #[error("unsupported operation: {0}")]
    Unsupported(&'static str),

    /// Any other failure surfaced by the raw descriptor layer.
    #[error("descriptor error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// True for the end-of-stream condition the sentinel variants absorb.
    #[must_use]
    pub fn is_end_of_stream(&self) -> bool {
        matches!(self, Error::EndOfStream)
    }
}
