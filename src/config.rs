// config.rs — tunable constants for the materialization-cost heuristics.

/// Assumed in-memory width, in bytes, of one decoded code point.
///
/// The adaptive-materialization policy (`segment::mod::maybe_destroy`) compares
/// `keeping_cost` against `freeing_cost` in bytes; every reconstructed buffer is
/// a `Box<[i32]>`, so this constant must track `size_of::<i32>()`. Kept as a
/// named constant rather than inlined `size_of` calls so the cost formulas in
/// `segment/*.rs` read the same way the specification states them.
pub const CODE_POINT_SIZE: usize = core::mem::size_of::<i32>();
