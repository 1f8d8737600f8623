//! Buildbot REST API v2 client.

use std::{future::Future, time::Duration};

use fm_requests::ApiClient;
use tracing::{debug, info};

use crate::{
    build::{Build, Builder, join_builders_with_change},
    models::{BuildersResponse, ChangeApi, ChangesResponse},
    prelude::*,
};

/// Anything that can report the builders and latest builds of a CI server.
pub trait BuildSource {
    /// Lists every builder known to the server.
    fn list_builders(&self) -> impl Future<Output = Result<Vec<Builder>>>;

    /// Returns the latest build of each of `builders` on `branch`.
    fn latest_builds_for_branch(
        &self,
        branch: &str,
        builders: &[Builder],
    ) -> impl Future<Output = Result<Vec<Build>>>;
}

/// Client for one Buildbot instance.
#[derive(Debug, Clone)]
pub struct BuildbotClient {
    api: ApiClient,
    web_url: String,
}

impl BuildbotClient {
    /// Creates a client for the Buildbot web UI at `base_url`.
    ///
    /// The REST API is expected under `{base_url}/api/v2`.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let web_url = format!("{}/", base_url.trim_end_matches('/'));
        let api = ApiClient::new(format!("{web_url}api/v2"), timeout)
            .map_err(|err| Error::fetch("build HTTP client", None, err))?;
        Ok(Self { api, web_url })
    }

    /// Base URL of the web UI, always ending with `/`.
    pub fn web_url(&self) -> &str {
        &self.web_url
    }

    /// Root of the REST API.
    pub fn api_url(&self) -> &str {
        self.api.base_url()
    }

    /// `GET /builders`.
    pub async fn list_builders(&self) -> Result<Vec<Builder>> {
        let response: BuildersResponse = self
            .api
            .get("builders")
            .await
            .map_err(|err| Error::fetch("list builders", None, err))?;
        info!("Found {} builders", response.builders.len());
        Ok(response.builders.into_iter().map(Builder::from).collect())
    }

    /// Latest change on `branch`, with the builds it triggered.
    pub async fn latest_change(&self, branch: &str) -> Result<Option<ChangeApi>> {
        let response: ChangesResponse = self
            .api
            .get_with_params(
                "changes",
                [("branch", branch), ("limit", "1"), ("order", "-changeid")],
            )
            .await
            .map_err(|err| {
                Error::fetch(
                    format!("fetch latest change for branch '{branch}'"),
                    Some(branch),
                    err,
                )
            })?;
        Ok(response.changes.into_iter().next())
    }

    /// Latest build of each of `builders` on `branch`.
    ///
    /// A branch without any change yields no builds.
    pub async fn latest_builds_for_branch(
        &self,
        branch: &str,
        builders: &[Builder],
    ) -> Result<Vec<Build>> {
        let Some(change) = self.latest_change(branch).await? else {
            info!("No changes found on branch {branch}");
            return Ok(Vec::new());
        };
        let builds = join_builders_with_change(builders, &change, branch, &self.web_url);
        debug!(
            "Branch {branch}: change {:?} has {} builds, {} on known builders",
            change.changeid,
            change.builds.len(),
            builds.len()
        );
        Ok(builds)
    }
}

impl BuildSource for BuildbotClient {
    async fn list_builders(&self) -> Result<Vec<Builder>> {
        BuildbotClient::list_builders(self).await
    }

    async fn latest_builds_for_branch(
        &self,
        branch: &str,
        builders: &[Builder],
    ) -> Result<Vec<Build>> {
        BuildbotClient::latest_builds_for_branch(self, branch, builders).await
    }
}
