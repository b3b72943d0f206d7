//! The error type shared by every fallible operation in this crate.

use std::fmt;

/// Failure modes a [`crate::string::LogicalString`] operation can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A code path intentionally left unhandled; should be unreachable in a
    /// complete build of this crate.
    Unimplemented,
    /// An internal invariant was violated (e.g. a read reached an empty
    /// handle the caller expected to carry content).
    Unexpected,
    /// An index or range fell outside the addressed segment's length.
    RangeError,
    /// A codec encountered bytes that do not form a valid code point under
    /// its encoding.
    InvalidByteSequence,
    /// `index_of` / `last_index_of` could not locate the needle.
    NotFound,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Error::Unimplemented => "unimplemented code path",
            Error::Unexpected => "unexpected internal state",
            Error::RangeError => "index out of range",
            Error::InvalidByteSequence => "invalid byte sequence for encoding",
            Error::NotFound => "needle not found",
        };
        f.write_str(name)
    }
}

impl std::error::Error for Error {}
