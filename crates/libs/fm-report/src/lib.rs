//! Failed-build report rendering.
//!
//! Turns the ordered failed-build records into the documents that are
//! mailed out: an HTML summary grouped by branch, a CSV export with one row
//! per failed build, and a plain-text fallback. Rendering is a pure function
//! of its input: the same records in the same order always give
//! byte-identical output.

pub mod csv_export;
pub mod error;
pub mod html_report;
pub mod prelude;

use fm_buildbot::FailedBuild;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::prelude::*;

pub use csv_export::{CSV_HEADER, render_csv};
pub use html_report::{NO_FAILURES_NOTICE, render_html};

/// A branch left out of the report because its builds could not be fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedBranch {
    pub branch: String,
    pub reason: String,
}

/// Rendered report, ready to be mailed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub html: String,
    pub csv: Vec<u8>,
    pub text: String,
    /// Number of failed builds in the report.
    pub failures: usize,
}

impl Report {
    /// Renders all formats from the same ordered records.
    pub fn generate(
        records: &[FailedBuild],
        branches: &[String],
        skipped: &[SkippedBranch],
    ) -> Result<Self> {
        let report = Self {
            html: render_html(records, branches, skipped),
            csv: render_csv(records)?,
            text: render_text(records, branches, skipped),
            failures: records.len(),
        };
        debug!(
            "Rendered report: {} failures, {} bytes HTML, {} bytes CSV",
            report.failures,
            report.html.len(),
            report.csv.len()
        );
        Ok(report)
    }

    /// True when no build failed.
    pub fn is_empty(&self) -> bool {
        self.failures == 0
    }
}

/// Plain-text rendering used as the text alternative of the mail body.
pub fn render_text(
    records: &[FailedBuild],
    branches: &[String],
    skipped: &[SkippedBranch],
) -> String {
    let mut lines = vec![format!("Failed builds: {}", records.len())];
    if records.is_empty() {
        lines.push(NO_FAILURES_NOTICE.to_string());
    }
    for branch in html_report::ordered_branches(records, branches) {
        lines.push(String::new());
        lines.push(format!("Branch: {branch}"));
        for record in records.iter().filter(|r| r.branch == branch) {
            lines.push(format!(
                "  {} #{} [{}] {} {}",
                record.builder, record.number, record.status, record.revision, record.url
            ));
        }
    }
    if !skipped.is_empty() {
        lines.push(String::new());
        lines.push("Skipped branches:".to_string());
        for s in skipped {
            lines.push(format!("  {}: {}", s.branch, s.reason));
        }
    }
    lines.push(String::new());
    lines.join("\n")
}
