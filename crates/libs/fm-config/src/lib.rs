//! Configuration management for failman.
//!
//! Provides the user-facing configuration document (TOML or YAML, read from
//! disk or fetched over HTTP), the overrides taken from the environment, and
//! the validated [`FmConfig`] every other component receives.
//!
//! # Usage
//!
//! ```rust,no_run
//! use fm_config::{ConfigOverrides, ConfigSource, FmConfig};
//! use std::time::Duration;
//!
//! # async fn example() -> fm_config::prelude::Result<()> {
//! let source = ConfigSource::from_location("failman.toml");
//! let user_config = source.load(Duration::from_secs(30)).await?;
//! let config = FmConfig::resolve(user_config, ConfigOverrides::default())?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod fm_config;
pub mod prelude;
pub mod source;

pub use fm_config::{
    BuildbotConfig, ConfigOverrides, FmConfig, FmUserConfig, MailConfig, SmtpSecurity,
};
pub use source::{ConfigFormat, ConfigSource};
