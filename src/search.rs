//! Generic search, compare, and trim helpers that read only through the
//! `length`/`code_point_at` contract — no segment kind is special-cased here
//! except for the ASCII/UTF-32 byte-index fast path on trim, which the
//! segment graph exposes directly.

use std::cmp::Ordering;

use crate::encoding::is_whitespace;
use crate::segment::Node;

/// Naive scan for `needle` in `haystack`, both addressed through
/// `code_point_at`. An empty needle matches at index 0; a needle longer than
/// the haystack never matches.
pub(crate) fn index_of(haystack: &Node, haystack_len: usize, needle: &Node, needle_len: usize) -> Option<usize> {
    if needle_len == 0 {
        return Some(0);
    }
    if needle_len > haystack_len {
        return None;
    }
    'outer: for start in 0..=(haystack_len - needle_len) {
        for j in 0..needle_len {
            if haystack.code_point_at(start + j) != needle.code_point_at(j) {
                continue 'outer;
            }
        }
        return Some(start);
    }
    None
}

/// Naive reverse scan for `needle` in `haystack`. An empty needle matches at
/// `haystack_len`; a needle longer than the haystack never matches.
pub(crate) fn last_index_of(haystack: &Node, haystack_len: usize, needle: &Node, needle_len: usize) -> Option<usize> {
    if needle_len == 0 {
        return Some(haystack_len);
    }
    if needle_len > haystack_len {
        return None;
    }
    'outer: for start in (0..=(haystack_len - needle_len)).rev() {
        for j in 0..needle_len {
            if haystack.code_point_at(start + j) != needle.code_point_at(j) {
                continue 'outer;
            }
        }
        return Some(start);
    }
    None
}

/// Lexicographic comparison by code point, with a length tie-break: a
/// strict prefix compares as `Less`.
pub(crate) fn compare(a: &Node, a_len: usize, b: &Node, b_len: usize) -> Ordering {
    let shortest = a_len.min(b_len);
    for i in 0..shortest {
        let (ca, cb) = (a.code_point_at(i), b.code_point_at(i));
        match ca.ok().cmp(&cb.ok()) {
            Ordering::Equal => continue,
            other => return other,
        }
    }
    a_len.cmp(&b_len)
}

/// Generic code-point scan for `trim_left`; used whenever the segment has no
/// byte-index fast path (anything that isn't a bare ASCII/UTF-32 leaf).
pub(crate) fn trim_left_generic(node: &Node, len: usize) -> usize {
    let mut start = 0;
    while start < len {
        match node.code_point_at(start) {
            Ok(cp) if is_whitespace(cp) => start += 1,
            _ => break,
        }
    }
    start
}

pub(crate) fn trim_right_generic(node: &Node, len: usize) -> usize {
    let mut end = len;
    while end > 0 {
        match node.code_point_at(end - 1) {
            Ok(cp) if is_whitespace(cp) => end -= 1,
            _ => break,
        }
    }
    end
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::Encoding;
    use crate::segment::leaf::LeafBorrowed;
    use crate::segment::Kind;
    use std::rc::Rc;

    fn leaf<'a>(bytes: &'a [u8]) -> Rc<Node<'a>> {
        Node::new_root(Kind::LeafBorrowed(LeafBorrowed::new(Encoding::Ascii, bytes)))
    }

    #[test]
    fn index_of_finds_needle() {
        let haystack = leaf(b"foobarfoo\0");
        let needle = leaf(b"bar\0");
        assert_eq!(index_of(&haystack, 9, &needle, 3), Some(3));
    }

    #[test]
    fn last_index_of_finds_rightmost_match() {
        let haystack = leaf(b"foobarfoo\0");
        let needle = leaf(b"foo\0");
        assert_eq!(last_index_of(&haystack, 9, &needle, 3), Some(6));
    }

    #[test]
    fn index_of_missing_needle_is_none() {
        let haystack = leaf(b"foobarfoo\0");
        let needle = leaf(b"xyz\0");
        assert_eq!(index_of(&haystack, 9, &needle, 3), None);
    }

    #[test]
    fn empty_needle_matches_at_boundaries() {
        let haystack = leaf(b"foo\0");
        let needle = leaf(b"\0");
        assert_eq!(index_of(&haystack, 3, &needle, 0), Some(0));
        assert_eq!(last_index_of(&haystack, 3, &needle, 0), Some(3));
    }
}
