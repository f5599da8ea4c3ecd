//! Base error type.

use thiserror::Error;

/// Errors produced by `tt-core` helpers.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid time {0:?}: expected HH:MM:SS")]
    InvalidTime(String),
}

/// Shorthand result type for `tt-core`.
pub type CoreResult<T> = Result<T, CoreError>;
