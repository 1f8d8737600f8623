//! Wire types of the Buildbot REST API v2.
//!
//! Only the fields failman reads are declared; anything else in the
//! responses is ignored. A missing required field fails decoding at the API
//! boundary instead of leaking a half-filled value downstream.

use serde::{Deserialize, Serialize};

/// Response of `GET /builders`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildersResponse {
    #[serde(default)]
    pub builders: Vec<BuilderApi>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuilderApi {
    pub builderid: u32,
    pub name: String,
}

/// Response of `GET /changes`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangesResponse {
    #[serde(default)]
    pub changes: Vec<ChangeApi>,
}

/// A change together with the builds it triggered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeApi {
    #[serde(default)]
    pub changeid: Option<u64>,
    pub sourcestamp: SourceStampApi,
    #[serde(default)]
    pub builds: Vec<BuildApi>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceStampApi {
    #[serde(default)]
    pub branch: Option<String>,
    #[serde(default)]
    pub revision: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildApi {
    pub builderid: u32,
    pub number: u32,
    /// Human readable state, e.g. `build successful` or `failed compile`.
    #[serde(default)]
    pub state_string: Option<String>,
    /// Buildbot result code, `None` while the build runs.
    #[serde(default)]
    pub results: Option<i64>,
    #[serde(default)]
    pub complete: Option<bool>,
    /// Unix timestamps.
    #[serde(default)]
    pub started_at: Option<i64>,
    #[serde(default)]
    pub complete_at: Option<i64>,
}
