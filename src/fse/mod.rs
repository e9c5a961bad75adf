//! Finite State Entropy coding specialized for 12-bit residual symbols.
//!
//! `hist` builds and normalizes a histogram of residuals; `tables` turns a
//! normalized histogram into encode/decode tables plus the serialized NCount
//! header; `codec` runs the two interleaved state machines over those tables.
//! The split mirrors `coding/hist.rs` and `coding/simple.rs` in the teacher,
//! generalized from a `const ALPHABET`/`const TABLESIZE` pair (fixed at
//! compile time there) to a fixed 4096-symbol alphabet with a table size
//! chosen per tile at runtime.

pub mod codec;
pub mod hist;
pub mod tables;

/// Residuals are 12-bit values; this is `FSE_compressU16`'s `maxSymbolValue`.
pub const MAX_SYMBOL_VALUE: usize = 4095;
pub const ALPHABET_SIZE: usize = MAX_SYMBOL_VALUE + 1;

pub const MIN_TABLE_LOG: u32 = 5;
pub const MAX_TABLE_LOG: u32 = 15;
pub const DEFAULT_TABLE_LOG: u32 = 13;

pub use codec::FseOutcome;
