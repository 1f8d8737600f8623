//! Where the configuration document comes from.

use crate::{fm_config::FmUserConfig, prelude::*};
use std::{path::PathBuf, time::Duration};

use tracing::info;

/// Document format of a configuration source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    Yaml,
}

impl ConfigFormat {
    /// Picks the format from the extension of a path or URL.
    ///
    /// `.yaml` and `.yml` are YAML; anything else is read as TOML.
    pub fn detect(location: &str) -> Self {
        let without_query = location
            .split(['?', '#'])
            .next()
            .unwrap_or(location);
        let file_name = without_query.rsplit('/').next().unwrap_or(without_query);
        match file_name.rsplit_once('.') {
            Some((_, ext)) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                ConfigFormat::Yaml
            }
            _ => ConfigFormat::Toml,
        }
    }
}

/// A local configuration file or a remotely hosted one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    File(PathBuf),
    Url(String),
}

impl ConfigSource {
    /// Treats `http://` and `https://` locations as URLs and everything else
    /// as a path.
    pub fn from_location(location: &str) -> Self {
        if location.starts_with("http://") || location.starts_with("https://") {
            ConfigSource::Url(location.to_string())
        } else {
            ConfigSource::File(PathBuf::from(location))
        }
    }

    /// Chooses the URL override when one is set, the local path otherwise.
    pub fn select(path: PathBuf, url_override: Option<&str>) -> Self {
        match url_override.map(str::trim).filter(|url| !url.is_empty()) {
            Some(url) => Self::from_location(url),
            None => ConfigSource::File(path),
        }
    }

    pub fn format(&self) -> ConfigFormat {
        match self {
            ConfigSource::File(path) => ConfigFormat::detect(&path.to_string_lossy()),
            ConfigSource::Url(url) => ConfigFormat::detect(url),
        }
    }

    /// Reads the document and parses it. Both transports share the parser.
    ///
    /// `timeout` bounds the HTTP request for remote sources.
    pub async fn load(&self, timeout: Duration) -> Result<FmUserConfig> {
        match self {
            ConfigSource::File(path) => FmUserConfig::from_file(path),
            ConfigSource::Url(url) => {
                info!("Fetching configuration from {url}");
                let contents = fm_requests::fetch_text(url, timeout).await?;
                FmUserConfig::from_str(&contents, self.format())
            }
        }
    }
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::File(path) => write!(f, "{}", path.display()),
            ConfigSource::Url(url) => write!(f, "{url}"),
        }
    }
}
