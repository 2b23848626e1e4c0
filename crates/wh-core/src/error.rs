//! Shared error type.
//!
//! Sub-crates define their own error enums; this one only covers what lives
//! in `wh-core` itself (configuration).

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("configuration error: {0}")]
    Config(String),
}

/// Shorthand result type for `wh-core`.
pub type CoreResult<T> = Result<T, CoreError>;
