//! Failman service entry point.
//!
//! Loads the configuration, queries Buildbot for the latest builds of the
//! monitored branches and mails the failed ones to the configured
//! recipients through the SMTP relay.
//!
//! ```bash
//! # Send the report using failman.toml and the environment
//! failman
//!
//! # Write the report to ./out instead of mailing it
//! failman --dry-run out
//! ```

use std::process::ExitCode;

use clap::Parser;
use failman::{
    cli::{Cli, env_file_error},
    pipeline::{self, RunOutcome},
    prelude::*,
};
use fm_buildbot::BuildbotClient;
use fm_config::FmConfig;
use fm_mail::{DirectoryMailer, SmtpMailer};
use tracing::{debug, error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let env_error = env_file_error(dotenvy::dotenv());

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "failman=info,fm_buildbot=info,fm_mail=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Some(err) = env_error {
        warn!("Ignoring .env file: {err}");
    }

    let cli = Cli::parse();
    match execute(&cli).await {
        Ok(RunOutcome::Sent { failures, skipped }) => {
            info!("Report delivered: {failures} failed builds, {skipped} skipped branches");
            ExitCode::SUCCESS
        }
        Ok(RunOutcome::NothingToReport) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{} stage failed: {err}", err.stage());
            ExitCode::FAILURE
        }
    }
}

async fn execute(cli: &Cli) -> Result<RunOutcome> {
    let user_config = cli.config_source().load(cli.config_timeout()).await?;
    let config = FmConfig::resolve(user_config, cli.overrides())?;

    let client = BuildbotClient::new(&config.buildbot.url, config.buildbot.timeout)?;
    info!(
        "Checking {} branches on {}",
        config.buildbot.branches.len(),
        client.web_url()
    );
    debug!("Buildbot API root: {}", client.api_url());

    match &cli.dry_run {
        Some(dir) => {
            let mailer = DirectoryMailer::new(dir);
            info!("Dry run, the report goes to {}", mailer.dir().display());
            pipeline::run(&config, &client, &mailer).await
        }
        None => pipeline::run(&config, &client, &SmtpMailer).await,
    }
}
