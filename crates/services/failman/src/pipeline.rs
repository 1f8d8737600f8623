//! One report run: fetch, filter, render, deliver.

use fm_buildbot::{Build, BuildSource, failed_records, filter};
use fm_config::{BuildbotConfig, FmConfig};
use fm_mail::ReportMailer;
use fm_report::{Report, SkippedBranch};
use tracing::{info, warn};

use crate::prelude::*;

/// What a successful run did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// The report was handed to the mailer.
    Sent { failures: usize, skipped: usize },
    /// Nothing failed and the report was suppressed.
    NothingToReport,
}

/// Latest builds of every branch that could be fetched.
#[derive(Debug, Default)]
pub struct Collected {
    pub builds: Vec<Build>,
    pub skipped: Vec<SkippedBranch>,
}

/// Fetches the latest builds of every configured branch.
///
/// A branch that cannot be fetched is skipped and recorded. The run fails
/// when the builder list cannot be fetched or when no branch could be.
pub async fn collect(source: &impl BuildSource, config: &BuildbotConfig) -> Result<Collected> {
    let builders = source.list_builders().await?;

    let mut collected = Collected::default();
    let mut last_error = None;
    for branch in &config.branches {
        match source.latest_builds_for_branch(branch, &builders).await {
            Ok(builds) => {
                info!("Branch {branch}: {} builds", builds.len());
                collected.builds.extend(builds);
            }
            Err(err) => {
                warn!("Skipping branch {branch}: {err}");
                collected.skipped.push(SkippedBranch {
                    branch: branch.clone(),
                    reason: err.to_string(),
                });
                last_error = Some(err);
            }
        }
    }

    if collected.skipped.len() == config.branches.len()
        && let Some(err) = last_error
    {
        return Err(err.into());
    }
    Ok(collected)
}

/// Runs the whole job once and delivers at most one report.
///
/// A report with no failures and no skipped branch is only delivered when
/// `send_when_green` is set.
pub async fn run(
    config: &FmConfig,
    source: &impl BuildSource,
    mailer: &impl ReportMailer,
) -> Result<RunOutcome> {
    let collected = collect(source, &config.buildbot).await?;

    let failed = filter(
        &collected.builds,
        &config.buildbot.branches,
        &config.buildbot.builder_filter,
    );
    let records = failed_records(&failed);
    let report = Report::generate(&records, &config.buildbot.branches, &collected.skipped)?;

    if report.is_empty() && collected.skipped.is_empty() && !config.mail.send_when_green {
        info!("No failed builds, no report sent");
        return Ok(RunOutcome::NothingToReport);
    }

    mailer.send(&report, &config.mail).await?;
    Ok(RunOutcome::Sent {
        failures: report.failures,
        skipped: collected.skipped.len(),
    })
}
