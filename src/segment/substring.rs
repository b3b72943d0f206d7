//! Substring reference: a lazy `[start, end)` view over one input segment.

use std::rc::Rc;

use crate::config::CODE_POINT_SIZE;
use crate::error::Error;
use crate::sink::Sink;

use super::Node;

pub enum SubstringState<'a> {
    Lazy {
        parent: Rc<Node<'a>>,
        start: usize,
        end: usize,
    },
    Materialized {
        buffer: Box<[i32]>,
    },
}

impl<'a> SubstringState<'a> {
    pub fn lazy(parent: Rc<Node<'a>>, start: usize, end: usize) -> Self {
        SubstringState::Lazy { parent, start, end }
    }

    pub fn length(&self) -> usize {
        match self {
            SubstringState::Lazy { start, end, .. } => end - start,
            SubstringState::Materialized { buffer } => buffer.len(),
        }
    }

    pub fn code_point_at(&self, i: usize) -> Result<i32, Error> {
        match self {
            SubstringState::Lazy { parent, start, end } => {
                if i >= end - start {
                    return Err(Error::RangeError);
                }
                parent.code_point_at(start + i)
            }
            SubstringState::Materialized { buffer } => {
                buffer.get(i).copied().ok_or(Error::RangeError)
            }
        }
    }

    pub fn print(&self, sink: &mut dyn Sink, a: usize, b: usize) -> bool {
        if a > b || b > self.length() {
            return false;
        }
        match self {
            SubstringState::Lazy { parent, start, .. } => parent.print(sink, start + a, start + b),
            SubstringState::Materialized { buffer } => {
                for &cp in &buffer[a..b] {
                    let (utf8, n) = crate::encoding::encode_utf8(cp);
                    if !sink.write(&utf8[..n]) {
                        return false;
                    }
                }
                true
            }
        }
    }

    pub fn keeping_cost(&self) -> usize {
        let self_size = std::mem::size_of::<Self>();
        match self {
            SubstringState::Lazy { parent, .. } => self_size + parent.keeping_cost(),
            SubstringState::Materialized { buffer } => self_size + buffer.len() * CODE_POINT_SIZE,
        }
    }

    /// Bytes to materialize: one code point per index in `[start, end)`.
    pub fn reconstruction_cost(&self) -> usize {
        match self {
            SubstringState::Lazy { start, end, .. } => {
                std::mem::size_of::<Self>() + (end - start) * CODE_POINT_SIZE
            }
            SubstringState::Materialized { .. } => 0,
        }
    }

    /// Transitions `Lazy -> Materialized`, returning the parent `Rc` that was
    /// released so the caller can detach and re-check its eligibility.
    pub fn reconstruct(&mut self) -> Option<Rc<Node<'a>>> {
        match self {
            SubstringState::Lazy { parent, start, end } => {
                let mut buffer = Vec::with_capacity(*end - *start);
                for i in *start..*end {
                    buffer.push(
                        parent
                            .code_point_at(i)
                            .expect("parent segment readable while reconstructing"),
                    );
                }
                let released = parent.clone();
                *self = SubstringState::Materialized {
                    buffer: buffer.into_boxed_slice(),
                };
                Some(released)
            }
            SubstringState::Materialized { .. } => None,
        }
    }

    /// Rc fields currently held by this state — used by [`Node`]'s `Drop` to
    /// detach from inputs and re-check their eligibility when this segment
    /// itself is finally deallocated.
    pub fn inputs(&self) -> Vec<Rc<Node<'a>>> {
        match self {
            SubstringState::Lazy { parent, .. } => vec![parent.clone()],
            SubstringState::Materialized { .. } => vec![],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::Encoding;
    use crate::segment::leaf::LeafBorrowed;
    use crate::segment::Kind;

    fn leaf_node<'a>(bytes: &'a [u8]) -> Rc<Node<'a>> {
        Node::new_root(Kind::LeafBorrowed(LeafBorrowed::new(Encoding::Ascii, bytes)))
    }

    #[test]
    fn lazy_length_is_end_minus_start() {
        let parent = leaf_node(b"hello\0");
        let state = SubstringState::lazy(parent, 1, 4);
        assert_eq!(state.length(), 3);
    }

    #[test]
    fn reconstruct_preserves_code_points() {
        let parent = leaf_node(b"hello\0");
        let mut state = SubstringState::lazy(parent, 1, 4);
        let before: Vec<i32> = (0..state.length())
            .map(|i| state.code_point_at(i).unwrap())
            .collect();
        state.reconstruct();
        let after: Vec<i32> = (0..state.length())
            .map(|i| state.code_point_at(i).unwrap())
            .collect();
        assert_eq!(before, after);
    }
}
