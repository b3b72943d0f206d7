//! A memory-efficient immutable text library.
//!
//! A [`LogicalString`] is a lazy directed acyclic graph of *segments*:
//! literal leaves (borrowed or owned, in one of four encodings) and reference
//! segments (`substring`, `concat`, `repeat`) that view one or two inputs
//! without copying. Reference-counted bookkeeping drives an adaptive
//! materialization policy — when a segment whose live references are
//! expensive to keep indirect would be destroyed, the reference segments
//! depending on it reconstruct themselves into self-contained code-point
//! buffers instead of dangling.

pub mod config;
pub mod encoding;
pub mod error;
mod search;
mod segment;
pub mod sink;
mod string;

pub use encoding::Encoding;
pub use error::Error;
pub use sink::{Sink, WriteSink};
pub use string::LogicalString;
