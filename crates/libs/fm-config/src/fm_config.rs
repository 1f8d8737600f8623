//! Core configuration types for failman.

use crate::prelude::*;
use std::{path::Path, time::Duration};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::source::ConfigFormat;

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_SMTP_PORT: u16 = 465;
const DEFAULT_SUBJECT: &str = "Failed builds report";
const DEFAULT_ATTACHMENT_NAME: &str = "failed_builds.csv";

/// How the connection to the SMTP relay is secured.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SmtpSecurity {
    /// TLS from the first byte (SMTPS, usually port 465).
    #[default]
    Tls,
    /// Plain connection upgraded with STARTTLS.
    StartTls,
    /// Unencrypted. Only sensible for a relay on a trusted network.
    None,
}

/// Buildbot section of the user configuration.
///
/// Also accepted under the `configuration` key used by older YAML files.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserBuildbotConfig {
    /// Base URL of the Buildbot web UI, e.g. `https://ci.example.org/`.
    pub url: Option<String>,
    /// Branches to report on, in report order.
    pub branches: Option<Vec<String>>,
    /// Builder names to include. Empty or absent means every builder.
    pub builder_filter: Option<Vec<String>>,
    /// Per-request timeout in seconds.
    pub timeout_secs: Option<u64>,
}

/// Mail section of the user configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserMailConfig {
    pub sender: Option<String>,
    pub recipients: Option<Vec<String>>,
    pub subject: Option<String>,
    /// SMTP relay host.
    pub relay: Option<String>,
    pub port: Option<u16>,
    pub security: Option<SmtpSecurity>,
    pub timeout_secs: Option<u64>,
    /// File name of the CSV attachment.
    pub attachment_name: Option<String>,
    /// Send a report even when no build failed.
    pub send_when_green: Option<bool>,
}

/// User-provided configuration from a TOML or YAML document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FmUserConfig {
    #[serde(alias = "configuration")]
    pub buildbot: UserBuildbotConfig,
    pub mail: UserMailConfig,
}

impl FmUserConfig {
    /// Load configuration from a local file, picking the parser from the
    /// file extension.
    pub fn from_file(file_path: &Path) -> Result<Self> {
        info!("Loading configuration from {}", file_path.display());
        let contents = std::fs::read_to_string(file_path).map_err(|source| Error::IO {
            path: file_path.to_path_buf(),
            source,
        })?;
        Self::from_str(&contents, ConfigFormat::detect(&file_path.to_string_lossy()))
    }

    /// Parse configuration in the given format.
    pub fn from_str(value: &str, format: ConfigFormat) -> Result<Self> {
        match format {
            ConfigFormat::Toml => Self::from_toml(value),
            ConfigFormat::Yaml => Self::from_yaml(value),
        }
    }

    /// Parse configuration from TOML string.
    pub fn from_toml(value: &str) -> Result<Self> {
        Ok(toml::from_str(value)?)
    }

    /// Parse configuration from YAML string.
    pub fn from_yaml(value: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(value)?)
    }
}

/// Settings supplied by the environment or the command line.
///
/// Every field that is set wins over the configuration document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub buildbot_url: Option<String>,
    pub sender: Option<String>,
    pub recipients: Option<Vec<String>>,
    pub subject: Option<String>,
    pub relay: Option<String>,
    pub port: Option<u16>,
    /// Forces sending an empty report. `false` leaves the file setting alone.
    pub send_when_green: bool,
}

/// Validated Buildbot settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildbotConfig {
    pub url: String,
    /// Unique branch names in configured order.
    pub branches: Vec<String>,
    pub builder_filter: Vec<String>,
    pub timeout: Duration,
}

/// Validated mail settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailConfig {
    pub sender: String,
    pub recipients: Vec<String>,
    pub subject: String,
    pub relay: String,
    pub port: u16,
    pub security: SmtpSecurity,
    pub timeout: Duration,
    pub attachment_name: String,
    pub send_when_green: bool,
}

/// Complete, validated configuration for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FmConfig {
    pub buildbot: BuildbotConfig,
    pub mail: MailConfig,
}

impl FmConfig {
    /// Merge the user configuration with the overrides and validate the
    /// result.
    ///
    /// Fails on the first missing or unusable setting; nothing is returned
    /// for a partially valid configuration.
    pub fn resolve(user: FmUserConfig, overrides: ConfigOverrides) -> Result<Self> {
        let FmUserConfig { buildbot, mail } = user;

        let url = non_empty(overrides.buildbot_url.or(buildbot.url))
            .ok_or(Error::MissingField("buildbot.url"))?;
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(Error::Invalid {
                field: "buildbot.url",
                reason: format!("'{url}' is not an http(s) URL"),
            });
        }

        let branches = clean_list(buildbot.branches.unwrap_or_default());
        if branches.is_empty() {
            return Err(Error::MissingField("buildbot.branches"));
        }
        let builder_filter = clean_list(buildbot.builder_filter.unwrap_or_default());
        let request_timeout = parse_timeout("buildbot.timeout_secs", buildbot.timeout_secs)?;

        let sender = non_empty(overrides.sender.or(mail.sender))
            .ok_or(Error::MissingField("mail.sender"))?;
        let recipients = clean_list(overrides.recipients.or(mail.recipients).unwrap_or_default());
        if recipients.is_empty() {
            return Err(Error::MissingField("mail.recipients"));
        }
        let relay = non_empty(overrides.relay.or(mail.relay))
            .ok_or(Error::MissingField("mail.relay"))?;
        let port = overrides.port.or(mail.port).unwrap_or(DEFAULT_SMTP_PORT);
        if port == 0 {
            return Err(Error::Invalid {
                field: "mail.port",
                reason: "port must not be 0".to_string(),
            });
        }
        let subject = non_empty(overrides.subject.or(mail.subject))
            .unwrap_or_else(|| DEFAULT_SUBJECT.to_string());
        let attachment_name = non_empty(mail.attachment_name)
            .unwrap_or_else(|| DEFAULT_ATTACHMENT_NAME.to_string());

        Ok(Self {
            buildbot: BuildbotConfig {
                url,
                branches,
                builder_filter,
                timeout: request_timeout,
            },
            mail: MailConfig {
                sender,
                recipients,
                subject,
                relay,
                port,
                security: mail.security.unwrap_or_default(),
                timeout: parse_timeout("mail.timeout_secs", mail.timeout_secs)?,
                attachment_name,
                send_when_green: overrides.send_when_green
                    || mail.send_when_green.unwrap_or(false),
            },
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Trims entries, drops empty ones and removes duplicates keeping the first
/// occurrence.
fn clean_list(values: Vec<String>) -> Vec<String> {
    let mut cleaned: Vec<String> = Vec::with_capacity(values.len());
    for value in values {
        let value = value.trim();
        if !value.is_empty() && !cleaned.iter().any(|v| v == value) {
            cleaned.push(value.to_string());
        }
    }
    cleaned
}

fn parse_timeout(field: &'static str, secs: Option<u64>) -> Result<Duration> {
    match secs.unwrap_or(DEFAULT_TIMEOUT_SECS) {
        0 => Err(Error::Invalid {
            field,
            reason: "timeout must be at least one second".to_string(),
        }),
        secs => Ok(Duration::from_secs(secs)),
    }
}
