//! Writes the report to disk instead of mailing it.

use std::path::{Path, PathBuf};

use fm_config::MailConfig;
use fm_report::Report;
use tracing::info;

use crate::{ReportMailer, compose::compose, prelude::*};

/// Stores the HTML body, the CSV attachment and the complete message
/// (`report.eml`) in a directory.
#[derive(Debug, Clone)]
pub struct DirectoryMailer {
    dir: PathBuf,
}

impl DirectoryMailer {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn write(&self, name: &str, contents: &[u8]) -> Result<()> {
        let path = self.dir.join(name);
        std::fs::write(&path, contents).map_err(|source| Error::IO { path, source })
    }
}

impl ReportMailer for DirectoryMailer {
    async fn send(&self, report: &Report, settings: &MailConfig) -> Result<()> {
        let message = compose(report, settings)?;

        std::fs::create_dir_all(&self.dir).map_err(|source| Error::IO {
            path: self.dir.clone(),
            source,
        })?;
        self.write("report.html", report.html.as_bytes())?;
        self.write(&settings.attachment_name, &report.csv)?;
        self.write("report.eml", &message.formatted())?;

        info!("Dry run: report written to {}", self.dir.display());
        Ok(())
    }
}
