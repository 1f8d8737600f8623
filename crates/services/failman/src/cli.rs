//! Command-line interface for failman.
//!
//! Every option can also be given through the environment variables the
//! scheduled job has always used (`BASE_BUILDBOT_URL`, `SENDER`, ...).

use clap::Parser;
use fm_config::{ConfigOverrides, ConfigSource};
use std::{path::PathBuf, time::Duration};

/// Command-line interface for failman.
#[derive(Parser, Debug)]
#[command(name = "failman")]
#[command(about = "Failman - mail a report of the failed Buildbot builds on the monitored branches")]
pub struct Cli {
    /// Path to the configuration file (TOML, or YAML with a .yaml/.yml extension)
    #[arg(short, long, env = "FAILMAN_CONFIG", default_value = "failman.toml")]
    pub config: PathBuf,

    /// Fetch the configuration from this URL instead of the local file
    #[arg(long, env = "CONFIG_URL")]
    pub config_url: Option<String>,

    /// Seconds to wait for a remote configuration
    #[arg(long, default_value_t = 30)]
    pub config_timeout: u64,

    /// Buildbot base URL, e.g. https://ci.example.org/
    #[arg(long, env = "BASE_BUILDBOT_URL")]
    pub buildbot_url: Option<String>,

    /// Sender address
    #[arg(long, env = "SENDER")]
    pub sender: Option<String>,

    /// Recipient addresses, comma separated
    #[arg(long, env = "RECIPIENT_EMAIL", value_delimiter = ',')]
    pub recipients: Vec<String>,

    /// SMTP relay host
    #[arg(long, env = "SMTP_RELAY_SERVER")]
    pub smtp_relay: Option<String>,

    /// SMTP relay port
    #[arg(long, env = "SMTP_RELAY_PORT")]
    pub smtp_port: Option<u16>,

    /// Mail subject
    #[arg(long, env = "SUBJECT")]
    pub subject: Option<String>,

    /// Send the report even when no build failed
    #[arg(long, env = "FAILMAN_SEND_WHEN_GREEN")]
    pub send_when_green: bool,

    /// Write the report into this directory instead of sending it
    #[arg(long)]
    pub dry_run: Option<PathBuf>,
}

impl Cli {
    /// Where to read the configuration document from.
    pub fn config_source(&self) -> ConfigSource {
        ConfigSource::select(self.config.clone(), self.config_url.as_deref())
    }

    pub fn config_timeout(&self) -> Duration {
        Duration::from_secs(self.config_timeout.max(1))
    }

    /// Settings that take precedence over the configuration document.
    pub fn overrides(&self) -> ConfigOverrides {
        let recipients: Vec<String> = self
            .recipients
            .iter()
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty())
            .collect();
        ConfigOverrides {
            buildbot_url: self.buildbot_url.clone(),
            sender: self.sender.clone(),
            recipients: (!recipients.is_empty()).then_some(recipients),
            subject: self.subject.clone(),
            relay: self.smtp_relay.clone(),
            port: self.smtp_port,
            send_when_green: self.send_when_green,
        }
    }
}

/// Keeps the error of loading a `.env` file unless the file is simply
/// absent.
pub fn env_file_error<T>(result: core::result::Result<T, dotenvy::Error>) -> Option<dotenvy::Error> {
    match result {
        Err(err) if !err.not_found() => Some(err),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn arguments_become_overrides() {
        let cli = Cli::try_parse_from([
            "failman",
            "--buildbot-url",
            "https://ci.example.org/",
            "--recipients",
            "a@example.org, b@example.org",
            "--smtp-port",
            "587",
            "--send-when-green",
        ])
        .unwrap();
        let overrides = cli.overrides();
        assert_eq!(overrides.buildbot_url.as_deref(), Some("https://ci.example.org/"));
        assert_eq!(
            overrides.recipients,
            Some(vec!["a@example.org".to_string(), "b@example.org".to_string()])
        );
        assert_eq!(overrides.port, Some(587));
        assert!(overrides.send_when_green);
    }

    #[test]
    fn config_url_selects_remote_source() {
        let cli = Cli::try_parse_from([
            "failman",
            "--config",
            "local.toml",
            "--config-url",
            "https://cfg.example.org/config.yaml",
        ])
        .unwrap();
        assert_eq!(
            cli.config_source(),
            ConfigSource::Url("https://cfg.example.org/config.yaml".to_string())
        );
    }

    #[test]
    fn missing_env_file_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = dotenvy::from_path(dir.path().join(".env"));
        assert!(env_file_error(result).is_none());
    }

    #[test]
    fn malformed_env_file_is_reported() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "NOT A VALID LINE").unwrap();
        let result = dotenvy::from_path(file.path());
        assert!(env_file_error(result).is_some());
    }
}
