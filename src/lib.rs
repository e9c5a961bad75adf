//! A lossless codec for 12-bit-per-channel image frames, tiled and
//! predictively coded with a two-state Finite State Entropy (FSE) backend.
//!
//! [`Context`] is the public entry point: create one per frame shape, then
//! call [`Context::pack`]/[`Context::unpack`] (or the fallible
//! [`Context::try_pack`]/[`Context::try_unpack`] variants) as many times as
//! needed. A `Context` is not `Sync` for shared `&self` mutation across
//! threads, since `pack`/`unpack` need `&mut self`; distinct contexts need no
//! synchronization between them.

pub mod bitstream;
pub mod context;
pub mod error;
pub mod frame;
pub mod fse;
pub mod predictor;

pub use context::Context;
pub use error::{PackError, PackResult};
