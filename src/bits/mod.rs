//! Packed literal bit-vector with two interchangeable backends.
//!
//! Bit `2i` encodes variable `i`'s negative literal, bit `2i + 1` its
//! positive literal. The default backend packs the full literal capacity
//! into eight machine words; the `bigint` cargo feature swaps in an
//! arbitrary-precision backend instead. Both are always compiled and must
//! stay behaviorally identical; the tests below drive them in lockstep.

pub mod big;
pub mod fixed;

#[cfg(not(feature = "bigint"))]
pub use fixed::Bits;

#[cfg(feature = "bigint")]
pub use big::Bits;
