//! Failman: mails a report of the failed Buildbot builds on a set of
//! monitored branches.
//!
//! The binary wires the configuration, a [`BuildbotClient`] and a mailer
//! into [`pipeline::run`]; the pipeline itself only sees the
//! [`BuildSource`] and [`ReportMailer`] seams.
//!
//! [`BuildbotClient`]: fm_buildbot::BuildbotClient
//! [`BuildSource`]: fm_buildbot::BuildSource
//! [`ReportMailer`]: fm_mail::ReportMailer

pub mod cli;
pub mod error;
pub mod pipeline;
pub mod prelude;

pub use pipeline::{Collected, RunOutcome, collect, run};
