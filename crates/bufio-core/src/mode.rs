//! Open-mode strings.
//!
//! Parses fopen-style mode strings (`"r"`, `"w+"`, `"rb"`, `"a+x"`) into
//! a flag set. The stream engine records the mode for routing only; it
//! never enforces it against the raw layer, so writing through a
//! read-only descriptor surfaces the raw layer's own error.

use crate::error::{Error, Result};

/// Parsed open intent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OpenMode {
    pub read: bool,
    pub write: bool,
    pub append: bool,
    pub create: bool,
    pub truncate: bool,
    pub binary: bool,
    pub exclusive: bool,
}

impl OpenMode {
    /// Plain read intent (`"r"`).
    #[must_use]
    pub const fn reading() -> Self {
        Self {
            read: true,
            write: false,
            append: false,
            create: false,
            truncate: false,
            binary: false,
            exclusive: false,
        }
    }

    /// Plain write intent (`"w"`).
    #[must_use]
    pub const fn writing() -> Self {
        Self {
            read: false,
            write: true,
            append: false,
            create: true,
            truncate: true,
            binary: false,
            exclusive: false,
        }
    }

    /// Parse a mode string.
    ///
    /// Base character `r`, `w`, or `a`, followed by `+`, `b`, `x`
    /// modifiers in any order. Anything else is an `InvalidArgument`
    /// error.
    pub fn parse(mode: &str) -> Result<Self> {
        let bytes = mode.as_bytes();
        let Some((&base, modifiers)) = bytes.split_first() else {
            return Err(Error::InvalidArgument("empty open mode".into()));
        };

        let mut flags = OpenMode::default();
        match base {
            b'r' => flags.read = true,
            b'w' => {
                flags.write = true;
                flags.create = true;
                flags.truncate = true;
            }
            b'a' => {
                flags.write = true;
                flags.create = true;
                flags.append = true;
            }
            _ => {
                return Err(Error::InvalidArgument(format!(
                    "unrecognized open mode {mode:?}"
                )));
            }
        }

        for &m in modifiers {
            match m {
                b'+' => {
                    flags.read = true;
                    flags.write = true;
                }
                b'b' => flags.binary = true,
                b'x' => flags.exclusive = true,
                _ => {
                    return Err(Error::InvalidArgument(format!(
                        "unrecognized open mode {mode:?}"
                    )));
                }
            }
        }

        Ok(flags)
    }
}
