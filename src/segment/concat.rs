//! Concatenation reference: a four-state machine over two input segments.
//!
//! `Lazy{left,right}` can lose either side independently (the side whose
//! owning input is forced to materialize its dependents), landing in
//! `LeftMaterialized`/`RightMaterialized`; losing the remaining lazy side
//! from either of those lands in `Materialized`.

use std::rc::Rc;

use crate::config::CODE_POINT_SIZE;
use crate::error::Error;
use crate::sink::Sink;

use super::Node;

pub enum ConcatState<'a> {
    Lazy {
        left: Rc<Node<'a>>,
        right: Rc<Node<'a>>,
    },
    LeftMaterialized {
        left_data: Box<[i32]>,
        right: Rc<Node<'a>>,
    },
    RightMaterialized {
        left: Rc<Node<'a>>,
        right_data: Box<[i32]>,
    },
    Materialized {
        data: Box<[i32]>,
    },
}

impl<'a> ConcatState<'a> {
    pub fn lazy(left: Rc<Node<'a>>, right: Rc<Node<'a>>) -> Self {
        ConcatState::Lazy { left, right }
    }

    pub fn length(&self) -> usize {
        match self {
            ConcatState::Lazy { left, right } => left.length() + right.length(),
            ConcatState::LeftMaterialized { left_data, right } => left_data.len() + right.length(),
            ConcatState::RightMaterialized { left, right_data } => left.length() + right_data.len(),
            ConcatState::Materialized { data } => data.len(),
        }
    }

    pub fn code_point_at(&self, i: usize) -> Result<i32, Error> {
        match self {
            ConcatState::Lazy { left, right } => {
                let ll = left.length();
                if i < ll {
                    left.code_point_at(i)
                } else if i - ll < right.length() {
                    right.code_point_at(i - ll)
                } else {
                    Err(Error::RangeError)
                }
            }
            ConcatState::LeftMaterialized { left_data, right } => {
                if i < left_data.len() {
                    Ok(left_data[i])
                } else if i - left_data.len() < right.length() {
                    right.code_point_at(i - left_data.len())
                } else {
                    Err(Error::RangeError)
                }
            }
            ConcatState::RightMaterialized { left, right_data } => {
                let ll = left.length();
                if i < ll {
                    left.code_point_at(i)
                } else if i - ll < right_data.len() {
                    Ok(right_data[i - ll])
                } else {
                    Err(Error::RangeError)
                }
            }
            ConcatState::Materialized { data } => data.get(i).copied().ok_or(Error::RangeError),
        }
    }

    pub fn print(&self, sink: &mut dyn Sink, a: usize, b: usize) -> bool {
        if a > b || b > self.length() {
            return false;
        }
        let split = match self {
            ConcatState::Lazy { left, .. } => left.length(),
            ConcatState::LeftMaterialized { left_data, .. } => left_data.len(),
            ConcatState::RightMaterialized { left, .. } => left.length(),
            ConcatState::Materialized { data } => {
                for &cp in &data[a..b] {
                    let (utf8, n) = crate::encoding::encode_utf8(cp);
                    if !sink.write(&utf8[..n]) {
                        return false;
                    }
                }
                return true;
            }
        };
        let mut ok = true;
        if a < split {
            let left_end = split.min(b);
            ok &= self.print_left(sink, a, left_end);
        }
        if b > split {
            let right_start = split.max(a);
            ok &= self.print_right(sink, right_start - split, b - split);
        }
        ok
    }

    fn print_left(&self, sink: &mut dyn Sink, a: usize, b: usize) -> bool {
        match self {
            ConcatState::Lazy { left, .. } => left.print(sink, a, b),
            ConcatState::RightMaterialized { left, .. } => left.print(sink, a, b),
            ConcatState::LeftMaterialized { left_data, .. } => {
                for &cp in &left_data[a..b] {
                    let (utf8, n) = crate::encoding::encode_utf8(cp);
                    if !sink.write(&utf8[..n]) {
                        return false;
                    }
                }
                true
            }
            ConcatState::Materialized { .. } => unreachable!("split only used in Lazy/half states"),
        }
    }

    fn print_right(&self, sink: &mut dyn Sink, a: usize, b: usize) -> bool {
        match self {
            ConcatState::Lazy { right, .. } => right.print(sink, a, b),
            ConcatState::LeftMaterialized { right, .. } => right.print(sink, a, b),
            ConcatState::RightMaterialized { right_data, .. } => {
                for &cp in &right_data[a..b] {
                    let (utf8, n) = crate::encoding::encode_utf8(cp);
                    if !sink.write(&utf8[..n]) {
                        return false;
                    }
                }
                true
            }
            ConcatState::Materialized { .. } => unreachable!("split only used in Lazy/half states"),
        }
    }

    pub fn keeping_cost(&self) -> usize {
        let self_size = std::mem::size_of::<Self>();
        match self {
            ConcatState::Lazy { left, right } => self_size + left.keeping_cost() + right.keeping_cost(),
            ConcatState::LeftMaterialized { left_data, right } => {
                self_size + left_data.len() * CODE_POINT_SIZE + right.keeping_cost()
            }
            ConcatState::RightMaterialized { left, right_data } => {
                self_size + left.keeping_cost() + right_data.len() * CODE_POINT_SIZE
            }
            ConcatState::Materialized { data } => self_size + data.len() * CODE_POINT_SIZE,
        }
    }

    /// Bytes to materialize *one side* — whichever side's input pointer
    /// matches `dying`. Returns 0 if `dying` names a side already detached
    /// (mirrors the source's `reconstructionCost` returning 0 in that case).
    pub fn reconstruction_cost(&self, dying: *const Node<'a>) -> usize {
        let self_size = std::mem::size_of::<Self>();
        match self {
            ConcatState::Lazy { left, right } => {
                if Rc::as_ptr(left) == dying {
                    self_size + left.length() * CODE_POINT_SIZE
                } else if Rc::as_ptr(right) == dying {
                    self_size + right.length() * CODE_POINT_SIZE
                } else {
                    0
                }
            }
            ConcatState::LeftMaterialized { right, .. } => {
                if Rc::as_ptr(right) == dying {
                    self_size + right.length() * CODE_POINT_SIZE
                } else {
                    0
                }
            }
            ConcatState::RightMaterialized { left, .. } => {
                if Rc::as_ptr(left) == dying {
                    self_size + left.length() * CODE_POINT_SIZE
                } else {
                    0
                }
            }
            ConcatState::Materialized { .. } => 0,
        }
    }

    /// Transitions toward `Materialized`, returning the `Rc` that was
    /// released (so the caller can detach and re-check its eligibility), or
    /// `None` if `dying` does not name a side this state still references.
    pub fn reconstruct(&mut self, dying: *const Node<'a>) -> Option<Rc<Node<'a>>> {
        match self {
            ConcatState::Lazy { left, right } => {
                if Rc::as_ptr(left) == dying {
                    let left_len = left.length();
                    let mut left_data = Vec::with_capacity(left_len);
                    for i in 0..left_len {
                        left_data.push(left.code_point_at(i).expect("left readable"));
                    }
                    let released = left.clone();
                    let right = right.clone();
                    *self = ConcatState::LeftMaterialized {
                        left_data: left_data.into_boxed_slice(),
                        right,
                    };
                    Some(released)
                } else if Rc::as_ptr(right) == dying {
                    let right_len = right.length();
                    let mut right_data = Vec::with_capacity(right_len);
                    for i in 0..right_len {
                        right_data.push(right.code_point_at(i).expect("right readable"));
                    }
                    let released = right.clone();
                    let left = left.clone();
                    *self = ConcatState::RightMaterialized {
                        left,
                        right_data: right_data.into_boxed_slice(),
                    };
                    Some(released)
                } else {
                    None
                }
            }
            ConcatState::LeftMaterialized { left_data, right } => {
                if Rc::as_ptr(right) == dying {
                    let right_len = right.length();
                    let mut data = Vec::with_capacity(left_data.len() + right_len);
                    data.extend_from_slice(left_data);
                    for i in 0..right_len {
                        data.push(right.code_point_at(i).expect("right readable"));
                    }
                    let released = right.clone();
                    *self = ConcatState::Materialized {
                        data: data.into_boxed_slice(),
                    };
                    Some(released)
                } else {
                    None
                }
            }
            ConcatState::RightMaterialized { left, right_data } => {
                if Rc::as_ptr(left) == dying {
                    let left_len = left.length();
                    let mut data = Vec::with_capacity(left_len + right_data.len());
                    for i in 0..left_len {
                        data.push(left.code_point_at(i).expect("left readable"));
                    }
                    data.extend_from_slice(right_data);
                    let released = left.clone();
                    *self = ConcatState::Materialized {
                        data: data.into_boxed_slice(),
                    };
                    Some(released)
                } else {
                    None
                }
            }
            ConcatState::Materialized { .. } => None,
        }
    }

    pub fn inputs(&self) -> Vec<Rc<Node<'a>>> {
        match self {
            ConcatState::Lazy { left, right } => vec![left.clone(), right.clone()],
            ConcatState::LeftMaterialized { right, .. } => vec![right.clone()],
            ConcatState::RightMaterialized { left, .. } => vec![left.clone()],
            ConcatState::Materialized { .. } => vec![],
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
    fn lazy_indexing_splits_at_left_length() {
        let left = leaf_node(b"bla\0");
        let right = leaf_node(b"kla\0");
        let state = ConcatState::lazy(left, right);
        assert_eq!(state.length(), 6);
        assert_eq!(state.code_point_at(3), Ok('k' as i32));
    }

    #[test]
    fn reconstructing_left_preserves_indexing() {
        let left = leaf_node(b"bla\0");
        let right = leaf_node(b"kla\0");
        let left_ptr = Rc::as_ptr(&left);
        let mut state = ConcatState::lazy(left, right);
        state.reconstruct(left_ptr);
        assert!(matches!(state, ConcatState::LeftMaterialized { .. }));
        assert_eq!(state.code_point_at(3), Ok('k' as i32));
    }
}
