//! Buildbot client error types.

/// Buildbot client errors.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// A call to the Buildbot API failed or returned something unusable.
    ///
    /// `context` names what was being fetched; the source carries the URL.
    #[error("failed to {context}: {source}")]
    Fetch {
        context: String,
        branch: Option<String>,
        #[source]
        source: fm_requests::error::Error,
    },
}

impl Error {
    pub(crate) fn fetch(
        context: impl Into<String>,
        branch: Option<&str>,
        source: fm_requests::error::Error,
    ) -> Self {
        Error::Fetch {
            context: context.into(),
            branch: branch.map(str::to_string),
            source,
        }
    }

    /// Branch the failed request was made for, if any.
    pub fn branch(&self) -> Option<&str> {
        match self {
            Error::Fetch { branch, .. } => branch.as_deref(),
        }
    }
}
