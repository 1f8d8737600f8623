//! Report rendering error types.

/// Report rendering errors.
///
/// Rendering works on in-memory data only, so these should not happen for
/// well-formed records.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Writing a CSV record failed.
    #[error("failed to write CSV: {0}")]
    Csv(#[from] csv::Error),

    /// The rendered document could not be finalised.
    #[error("failed to render report: {0}")]
    Render(String),
}
