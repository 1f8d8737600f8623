//! Common types and utilities.

/// Report error type.
pub use crate::error::Error;

/// Report result type.
pub type Result<T> = core::result::Result<T, Error>;
