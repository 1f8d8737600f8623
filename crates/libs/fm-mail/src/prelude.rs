//! Common types and utilities.

/// Mail error type.
pub use crate::error::Error;

/// Mail result type.
pub type Result<T> = core::result::Result<T, Error>;
