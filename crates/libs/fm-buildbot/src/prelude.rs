//! Common types and utilities.

/// Buildbot client error type.
pub use crate::error::Error;

/// Buildbot client result type.
pub type Result<T> = core::result::Result<T, Error>;
