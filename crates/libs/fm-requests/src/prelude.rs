//! Common types and utilities.

/// HTTP client error type.
pub use crate::error::Error;

/// HTTP client result type.
pub type Result<T> = core::result::Result<T, Error>;
