//! Leaf segments: the two ways a logical string adapts a raw byte buffer.
//!
//! One pair of variants (borrowed, owned) covers all four encodings; the
//! per-encoding decode/print logic lives in [`crate::encoding`] and is
//! selected by the `encoding` field rather than by having eight leaf types.

use std::cell::Cell;

use crate::encoding::Encoding;
use crate::error::Error;
use crate::sink::Sink;

/// A leaf over bytes this logical string does not own. `length` is filled on
/// first use and then immutable — the borrow checker, not a caller contract,
/// keeps `bytes` valid for as long as any leaf built over it is reachable.
pub struct LeafBorrowed<'a> {
    pub(crate) encoding: Encoding,
    pub(crate) bytes: &'a [u8],
    length_cache: Cell<Option<usize>>,
}

impl<'a> LeafBorrowed<'a> {
    pub fn new(encoding: Encoding, bytes: &'a [u8]) -> Self {
        LeafBorrowed {
            encoding,
            bytes,
            length_cache: Cell::new(None),
        }
    }

    pub fn length(&self) -> usize {
        if let Some(len) = self.length_cache.get() {
            return len;
        }
        let len = self.encoding.decoded_length(self.bytes);
        self.length_cache.set(Some(len));
        len
    }

    pub fn code_point_at(&self, i: usize) -> Result<i32, Error> {
        self.encoding.code_point_at(self.bytes, i)
    }

    pub fn print(&self, sink: &mut dyn Sink, start: usize, end: usize) -> bool {
        print_range(self.encoding, self.bytes, sink, start, end)
    }

    /// Descriptor size only — a borrowed leaf stores no bytes of its own, so
    /// it is free to keep lazily for as long as needed.
    pub fn keeping_cost(&self) -> usize {
        std::mem::size_of::<Self>()
    }

    pub fn trim_bounds(&self) -> Option<(usize, usize)> {
        self.encoding.trim_bounds(self.bytes, self.length())
    }
}

/// A leaf over bytes this logical string owns. `logical_length`/`memory_length`
/// are computed eagerly at construction, since building the owned copy
/// already requires scanning the source to size the allocation.
pub struct LeafOwned {
    pub(crate) encoding: Encoding,
    pub(crate) buffer: Box<[u8]>,
    logical_length: usize,
}

impl LeafOwned {
    pub fn new(encoding: Encoding, bytes: &[u8]) -> Self {
        let (logical_length, memory_length) = encoding.length_and_byte_size(bytes);
        let buffer = bytes[..memory_length].to_vec().into_boxed_slice();
        LeafOwned {
            encoding,
            buffer,
            logical_length,
        }
    }

    pub fn length(&self) -> usize {
        self.logical_length
    }

    pub fn code_point_at(&self, i: usize) -> Result<i32, Error> {
        self.encoding.code_point_at(&self.buffer, i)
    }

    pub fn print(&self, sink: &mut dyn Sink, start: usize, end: usize) -> bool {
        print_range(self.encoding, &self.buffer, sink, start, end)
    }

    pub fn keeping_cost(&self) -> usize {
        std::mem::size_of::<Self>() + self.buffer.len()
    }

    pub fn trim_bounds(&self) -> Option<(usize, usize)> {
        self.encoding.trim_bounds(&self.buffer, self.logical_length)
    }
}

/// Shared print implementation for both leaf kinds: UTF-8 leaves use
/// `range_byte_indexes` to copy their own bytes unchanged, ASCII leaves write
/// their raw byte slice directly (ASCII is valid UTF-8 byte-for-byte), and
/// UTF-16BE/UTF-32 leaves re-encode each code point as UTF-8 on the fly.
fn print_range(encoding: Encoding, bytes: &[u8], sink: &mut dyn Sink, start: usize, end: usize) -> bool {
    if start > end || end > encoding.decoded_length(bytes) {
        return false;
    }
    match encoding {
        Encoding::Ascii => sink.write(&bytes[start..end]),
        Encoding::Utf8 => match crate::encoding::utf8::range_byte_indexes(bytes, start, end) {
            Ok((s, e)) => sink.write(&bytes[s..e]),
            Err(_) => false,
        },
        Encoding::Utf16Be | Encoding::Utf32 => {
            for i in start..end {
                let cp = match encoding.code_point_at(bytes, i) {
                    Ok(cp) => cp,
                    Err(_) => return false,
                };
                let (utf8, n) = crate::encoding::encode_utf8(cp);
                if !sink.write(&utf8[..n]) {
                    return false;
                }
            }
            true
        }
    }
}
