/// Failures of a report run, one variant per pipeline stage.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] fm_config::error::Error),

    #[error(transparent)]
    Fetch(#[from] fm_buildbot::error::Error),

    #[error(transparent)]
    Render(#[from] fm_report::error::Error),

    #[error(transparent)]
    Mail(#[from] fm_mail::error::Error),
}

impl Error {
    /// Name of the stage that failed, for the final log line.
    pub fn stage(&self) -> &'static str {
        match self {
            Error::Config(_) => "config",
            Error::Fetch(_) => "fetch",
            Error::Render(_) => "render",
            Error::Mail(_) => "mail",
        }
    }
}
