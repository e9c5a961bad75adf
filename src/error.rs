//! The error taxonomy returned by the fallible, internal half of the API.
//!
//! The public `Context::pack`/`Context::unpack` entry points collapse these
//! down to the sentinel return values (0, or a bool) that the rest of this
//! crate's contract is built around; `PackError` exists so that tests, the
//! CLI demo, and `try_pack`/`try_unpack` can see *why* an operation failed.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum PackError {
    #[error("invalid argument: {reason}")]
    InvalidArgument { reason: &'static str },

    #[error("buffer too small: need {needed} bytes, have {available}")]
    BufferTooSmall { needed: usize, available: usize },

    #[error("corrupted input: {reason}")]
    Corruption { reason: &'static str },

    #[error("internal error: {reason}")]
    Internal { reason: &'static str },
}

pub type PackResult<T> = Result<T, PackError>;
