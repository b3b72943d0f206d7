//! Repetition reference: `inner` repeated `times` times.
//!
//! Only ever materializes to a single unit's worth of code points, not
//! `times` units — printing and indexing replay that one unit modulo its
//! length. See `reconstruction_cost` below for why this matters for the
//! materialization heuristic.

use std::rc::Rc;

use crate::config::CODE_POINT_SIZE;
use crate::error::Error;
use crate::sink::Sink;

use super::Node;

pub enum RepetitionState<'a> {
    Lazy {
        inner: Rc<Node<'a>>,
        times: usize,
    },
    Materialized {
        unit: Box<[i32]>,
        times: usize,
    },
}

impl<'a> RepetitionState<'a> {
    pub fn lazy(inner: Rc<Node<'a>>, times: usize) -> Self {
        RepetitionState::Lazy { inner, times }
    }

    fn unit_length(&self) -> usize {
        match self {
            RepetitionState::Lazy { inner, .. } => inner.length(),
            RepetitionState::Materialized { unit, .. } => unit.len(),
        }
    }

    pub fn length(&self) -> usize {
        let times = match self {
            RepetitionState::Lazy { times, .. } => *times,
            RepetitionState::Materialized { times, .. } => *times,
        };
        self.unit_length() * times
    }

    pub fn code_point_at(&self, i: usize) -> Result<i32, Error> {
        if i >= self.length() {
            return Err(Error::RangeError);
        }
        let unit_len = self.unit_length();
        if unit_len == 0 {
            return Err(Error::RangeError);
        }
        let j = i % unit_len;
        match self {
            RepetitionState::Lazy { inner, .. } => inner.code_point_at(j),
            RepetitionState::Materialized { unit, .. } => Ok(unit[j]),
        }
    }

    pub fn print(&self, sink: &mut dyn Sink, a: usize, b: usize) -> bool {
        if a > b || b > self.length() {
            return false;
        }
        let unit_len = self.unit_length();
        if unit_len == 0 {
            return a == b;
        }
        let mut i = a;
        while i < b {
            let unit_index = i / unit_len;
            let window_start = unit_index * unit_len;
            let window_end = window_start + unit_len;
            let slice_end = b.min(window_end);
            let local_start = i - window_start;
            let local_end = slice_end - window_start;
            let ok = match self {
                RepetitionState::Lazy { inner, .. } => inner.print(sink, local_start, local_end),
                RepetitionState::Materialized { unit, .. } => {
                    for &cp in &unit[local_start..local_end] {
                        let (utf8, n) = crate::encoding::encode_utf8(cp);
                        if !sink.write(&utf8[..n]) {
                            return false;
                        }
                    }
                    true
                }
            };
            if !ok {
                return false;
            }
            i = slice_end;
        }
        true
    }

    pub fn keeping_cost(&self) -> usize {
        let self_size = std::mem::size_of::<Self>();
        match self {
            RepetitionState::Lazy { inner, .. } => self_size + inner.keeping_cost(),
            RepetitionState::Materialized { unit, .. } => self_size + unit.len() * CODE_POINT_SIZE,
        }
    }

    /// One unit's worth of bytes — `reconstruct` below only ever stores one
    /// unit, replayed `times` times on read, so the cost of reconstructing
    /// must match that, not `unit_length * times`.
    pub fn reconstruction_cost(&self) -> usize {
        match self {
            RepetitionState::Lazy { inner, .. } => {
                std::mem::size_of::<Self>() + inner.length() * CODE_POINT_SIZE
            }
            RepetitionState::Materialized { .. } => 0,
        }
    }

    pub fn reconstruct(&mut self) -> Option<Rc<Node<'a>>> {
        match self {
            RepetitionState::Lazy { inner, times } => {
                let unit_len = inner.length();
                let mut unit = Vec::with_capacity(unit_len);
                for i in 0..unit_len {
                    unit.push(inner.code_point_at(i).expect("inner readable while reconstructing"));
                }
                let released = inner.clone();
                *self = RepetitionState::Materialized {
                    unit: unit.into_boxed_slice(),
                    times: *times,
                };
                Some(released)
            }
            RepetitionState::Materialized { .. } => None,
        }
    }

    pub fn inputs(&self) -> Vec<Rc<Node<'a>>> {
        match self {
            RepetitionState::Lazy { inner, .. } => vec![inner.clone()],
            RepetitionState::Materialized { .. } => vec![],
        }
    }
}
