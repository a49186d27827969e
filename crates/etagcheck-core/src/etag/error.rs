//! Errors from rebuilding or parsing a composite ETag.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EtagError {
    /// Part size of zero (or otherwise unusable input).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// The stream could not be read to completion.
    #[error("read failed: {0}")]
    Io(#[from] std::io::Error),
    /// The abort token was set while digesting.
    #[error("interrupted")]
    Interrupted,
}

/// A reported ETag that is not `<32 hex chars>` or `<32 hex chars>-<parts>`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("not an MD5-based ETag: {0:?}")]
pub struct ParseEtagError(pub String);
