//! Report delivery for failman.
//!
//! [`compose`](compose::compose) turns a rendered report into a multipart
//! message; a [`ReportMailer`] delivers it. [`SmtpMailer`] talks to the
//! relay, [`DirectoryMailer`] keeps a local copy for dry runs.

pub mod compose;
pub mod dry_run;
pub mod error;
pub mod prelude;
pub mod smtp;

use std::future::Future;

use fm_config::MailConfig;
use fm_report::Report;

use crate::prelude::*;

pub use dry_run::DirectoryMailer;
pub use smtp::SmtpMailer;

/// Delivers a rendered report.
pub trait ReportMailer {
    fn send(&self, report: &Report, settings: &MailConfig) -> impl Future<Output = Result<()>>;
}
