//! Separator-and-limit scanning for line reads.
//!
//! The scanner decides, for one buffered window at a time, whether a line
//! terminates inside that window. Matching never spans windows: a
//! separator split across two fills is not found, and both windows land
//! in the accumulator. The limit likewise compares against the current
//! window only, never the accumulated total. Both follow the source
//! semantics this engine reproduces.

/// Line separator argument.
///
/// `Bytes(b"")` selects paragraph mode: the empty separator widens to the
/// double-newline sequence. `None` disables scanning entirely; the line
/// read degrades to an unbounded drain of the stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Separator<'a> {
    /// The default newline separator.
    Default,
    /// An explicit separator byte sequence.
    Bytes(&'a [u8]),
    /// No separator: read everything that remains.
    None,
}

impl<'a> Separator<'a> {
    /// The effective separator bytes, or `None` for the unbounded case.
    pub(crate) fn resolve(self) -> Option<&'a [u8]> {
        match self {
            Separator::Default => Some(b"\n"),
            Separator::Bytes(b) if b.is_empty() => Some(b"\n\n"),
            Separator::Bytes(b) => Some(b),
            Separator::None => None,
        }
    }
}

/// Decision for one buffered window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ScanStep {
    /// The line ends after this many bytes of the window (terminator
    /// bytes included).
    Cut(usize),
    /// No terminator here: take the whole window and refill.
    TakeAll,
}

/// Scan one window under the limit-then-separator rule.
///
/// The limit wins whenever the window already holds `limit` bytes, even
/// if the separator occurs earlier in the window.
pub(crate) fn scan_window(window: &[u8], sep: &[u8], limit: Option<usize>) -> ScanStep {
    if let Some(limit) = limit {
        if limit <= window.len() {
            return ScanStep::Cut(limit);
        }
    }
    match find(window, sep) {
        Some(idx) => ScanStep::Cut(idx + sep.len()),
        None => ScanStep::TakeAll,
    }
}

/// First occurrence of `needle` in `haystack`.
pub(crate) fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() || needle.len() > haystack.len() {
        return None;
    }
    haystack.windows(needle.len()).position(|w| w == needle)
}
