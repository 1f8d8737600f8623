//! Mail error types.

use std::path::PathBuf;

/// Mail composition and delivery errors.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// A sender or recipient is not a valid mailbox.
    #[error("invalid mail address '{address}': {source}")]
    Address {
        address: String,
        #[source]
        source: lettre::address::AddressError,
    },

    #[error(transparent)]
    ContentType(#[from] lettre::message::header::ContentTypeErr),

    /// The message could not be assembled.
    #[error("failed to build message: {0}")]
    Message(#[from] lettre::error::Error),

    /// Connecting to the relay failed or the relay rejected the message.
    #[error("SMTP relay {relay}:{port} failed: {source}")]
    Smtp {
        relay: String,
        port: u16,
        #[source]
        source: lettre::transport::smtp::Error,
    },

    /// Writing a dry-run copy of the report failed.
    #[error("failed to write {path}: {source}")]
    IO {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
