//! Builders, builds and how a build's outcome is classified.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{BuildApi, BuilderApi, ChangeApi};

/// States reported while a build has not finished yet.
const PENDING_STATES: &[&str] = &[
    "acquiring locks",
    "building",
    "preparing worker",
    "pending",
    "waiting",
];

/// States reported by a build that passed.
const SUCCESS_STATES: &[&str] = &["build successful", "success", "successful", "passed"];

/// Buildbot result codes that count as passing (success, warnings).
const PASSING_RESULTS: &[i64] = &[0, 1];

/// A build configuration on the CI server.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Builder {
    pub id: u32,
    pub name: String,
}

impl From<BuilderApi> for Builder {
    fn from(value: BuilderApi) -> Self {
        Self {
            id: value.builderid,
            name: value.name,
        }
    }
}

/// Outcome of a build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BuildStatus {
    Success,
    /// Still running or queued.
    Pending,
    Failure,
}

impl BuildStatus {
    /// Classifies a build from its state string and result code.
    ///
    /// Unfinished builds are pending. Finished builds pass when their state
    /// is a known success state or their result code is success/warnings;
    /// every other finished build is a failure. A build that reports neither
    /// a state nor a result is treated as pending.
    pub fn classify(state: &str, results: Option<i64>, complete: Option<bool>) -> Self {
        let state = state.trim().to_lowercase();
        if complete == Some(false) || PENDING_STATES.contains(&state.as_str()) {
            return BuildStatus::Pending;
        }
        if SUCCESS_STATES.contains(&state.as_str())
            || results.is_some_and(|code| PASSING_RESULTS.contains(&code))
        {
            return BuildStatus::Success;
        }
        if state.is_empty() && results.is_none() {
            return BuildStatus::Pending;
        }
        BuildStatus::Failure
    }

    pub fn is_failure(&self) -> bool {
        *self == BuildStatus::Failure
    }
}

impl fmt::Display for BuildStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BuildStatus::Success => "success",
            BuildStatus::Pending => "pending",
            BuildStatus::Failure => "failure",
        };
        write!(f, "{name}")
    }
}

/// Latest build of one builder on one branch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Build {
    pub builder_id: u32,
    pub builder_name: String,
    pub branch: String,
    pub number: u32,
    /// Commit the build ran against. Empty when the change has none.
    pub revision: String,
    /// Raw state string as reported by Buildbot.
    pub state: String,
    pub status: BuildStatus,
    pub started_at: Option<DateTime<Utc>>,
    pub complete_at: Option<DateTime<Utc>>,
    /// Link to the build in the Buildbot web UI.
    pub url: String,
}

/// The part of a failed build that ends up in a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedBuild {
    pub branch: String,
    pub builder: String,
    pub number: u32,
    pub revision: String,
    pub status: String,
    pub url: String,
}

impl From<&Build> for FailedBuild {
    fn from(build: &Build) -> Self {
        let status = if build.state.trim().is_empty() {
            build.status.to_string()
        } else {
            build.state.clone()
        };
        Self {
            branch: build.branch.clone(),
            builder: build.builder_name.clone(),
            number: build.number,
            revision: build.revision.clone(),
            status,
            url: build.url.clone(),
        }
    }
}

/// Web UI link of a build. `web_url` must end with `/`.
pub fn build_url(web_url: &str, builder_id: u32, number: u32) -> String {
    format!("{web_url}#/builders/{builder_id}/builds/{number}")
}

/// Pairs the builds of a change with the builders they ran on.
///
/// Builds of builders missing from `builders` are dropped, and builders that
/// have no build in the change are absent from the result. When a builder
/// has several builds the highest build number wins. The result follows the
/// order of `builders`. Builds are labelled with `requested_branch`, the
/// branch the change was queried for, whatever spelling the sourcestamp
/// uses.
pub fn join_builders_with_change(
    builders: &[Builder],
    change: &ChangeApi,
    requested_branch: &str,
    web_url: &str,
) -> Vec<Build> {
    let revision = change.sourcestamp.revision.clone().unwrap_or_default();

    builders
        .iter()
        .filter_map(|builder| {
            let latest = change
                .builds
                .iter()
                .filter(|b| b.builderid == builder.id)
                .max_by_key(|b| b.number)?;
            Some(to_build(builder, latest, requested_branch, &revision, web_url))
        })
        .collect()
}

fn to_build(builder: &Builder, build: &BuildApi, branch: &str, revision: &str, web_url: &str) -> Build {
    let state = build.state_string.clone().unwrap_or_default();
    Build {
        builder_id: builder.id,
        builder_name: builder.name.clone(),
        branch: branch.to_string(),
        number: build.number,
        revision: revision.to_string(),
        status: BuildStatus::classify(&state, build.results, build.complete),
        state,
        started_at: build.started_at.and_then(|ts| DateTime::from_timestamp(ts, 0)),
        complete_at: build.complete_at.and_then(|ts| DateTime::from_timestamp(ts, 0)),
        url: build_url(web_url, builder.id, build.number),
    }
}
