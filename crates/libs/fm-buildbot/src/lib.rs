//! Buildbot access for failman.
//!
//! - [`client`] talks to the Buildbot REST API v2 and joins the latest
//!   change of a branch with the builders it ran on
//! - [`build`] holds the typed builders and builds and classifies outcomes
//! - [`failure`] selects and orders the failed builds for a report

pub mod build;
pub mod client;
pub mod error;
pub mod failure;
pub mod models;
pub mod prelude;

pub use build::{Build, BuildStatus, Builder, FailedBuild};
pub use client::{BuildSource, BuildbotClient};
pub use failure::{failed_records, filter};
