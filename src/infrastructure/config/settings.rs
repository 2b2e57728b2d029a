//! Application configuration loading and validation.
//!
//! Provides the main [`Config`] struct that aggregates all application settings.
//! Configuration is loaded from a TOML file; the Discord bot token is read
//! from the `DISCORD_BOT_TOKEN` environment variable.
//!
//! # Example
//!
//! ```no_run
//! use autotag::infrastructure::config::settings::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("config.toml")?;
//!     config.init_logging();
//!     Ok(())
//! }
//! ```

use std::path::Path;

use serde::Deserialize;

use super::cluster::{ClusterConfig, ReadinessConfig};
use super::discord::DiscordConfig;
use super::logging::LoggingConfig;
use crate::domain::session::validate_host;
use crate::domain::{GameImage, ImageChoice};
use crate::error::{ConfigError, Result};

/// Main application configuration.
///
/// Every section is optional; omitted values fall back to the production
/// defaults of the tag cluster.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Logging and tracing configuration.
    pub logging: LoggingConfig,

    /// Discord bot settings.
    pub discord: DiscordConfig,

    /// Cluster namespace, routing and sandbox settings.
    pub cluster: ClusterConfig,

    /// Pod readiness polling.
    pub readiness: ReadinessConfig,
}

/// Discord interaction tokens expire after 15 minutes; the deferred reply
/// must be edited before then.
pub const MAX_READINESS_TIMEOUT_SECS: u64 = 900;

fn require_non_empty(value: &str, field: &'static str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ConfigError::MissingField { field }.into());
    }
    Ok(())
}

impl Config {
    /// Parse configuration from TOML content.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML content is malformed or validation fails.
    #[allow(clippy::result_large_err)]
    pub fn parse_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read
    /// - The TOML content is malformed
    /// - Validation fails
    #[allow(clippy::result_large_err)]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse_toml(&content)
    }

    /// Load `path`, or fall back to defaults when `path` is absent and
    /// `allow_missing` is set.
    #[allow(clippy::result_large_err)]
    pub fn load_or_default<P: AsRef<Path>>(path: P, allow_missing: bool) -> Result<Self> {
        let path = path.as_ref();
        if allow_missing && !path.exists() {
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Validate configuration values.
    #[allow(clippy::result_large_err)]
    fn validate(&self) -> Result<()> {
        let cluster = &self.cluster;
        require_non_empty(&cluster.namespace, "cluster.namespace")?;
        require_non_empty(&cluster.host, "cluster.host")?;
        require_non_empty(&cluster.image_registry, "cluster.image_registry")?;
        require_non_empty(&cluster.tls_secret, "cluster.tls_secret")?;

        validate_host(&cluster.host).map_err(|e| ConfigError::InvalidValue {
            field: "cluster.host",
            reason: e.to_string(),
        })?;

        if cluster.nameservers.is_empty() {
            return Err(ConfigError::MissingField {
                field: "cluster.nameservers",
            }
            .into());
        }
        if cluster.images.is_empty() {
            return Err(ConfigError::MissingField {
                field: "cluster.images",
            }
            .into());
        }
        self.image_choices()?;

        if self.discord.admin_role_id == 0 {
            return Err(ConfigError::InvalidValue {
                field: "discord.admin_role_id",
                reason: "must be a role id".to_string(),
            }
            .into());
        }

        if self.readiness.poll_interval_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "readiness.poll_interval_ms",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if self.readiness.timeout_secs.saturating_mul(1000) < self.readiness.poll_interval_ms {
            return Err(ConfigError::InvalidValue {
                field: "readiness.timeout_secs",
                reason: "must be >= poll_interval_ms".to_string(),
            }
            .into());
        }
        if self.readiness.timeout_secs > MAX_READINESS_TIMEOUT_SECS {
            return Err(ConfigError::InvalidValue {
                field: "readiness.timeout_secs",
                reason: format!("must be at most {MAX_READINESS_TIMEOUT_SECS}"),
            }
            .into());
        }

        Ok(())
    }

    /// Validated image choices, in configured order.
    #[allow(clippy::result_large_err)]
    pub fn image_choices(&self) -> Result<Vec<ImageChoice>> {
        let mut choices: Vec<ImageChoice> = Vec::with_capacity(self.cluster.images.len());
        for entry in &self.cluster.images {
            let image = GameImage::parse(&entry.value).map_err(|e| ConfigError::InvalidValue {
                field: "cluster.images",
                reason: e.to_string(),
            })?;
            if entry.name.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: "cluster.images",
                    reason: format!("image `{}` has an empty name", entry.value),
                }
                .into());
            }
            if choices.iter().any(|choice| choice.image == image) {
                return Err(ConfigError::InvalidValue {
                    field: "cluster.images",
                    reason: format!("image `{}` is listed twice", entry.value),
                }
                .into());
            }
            choices.push(ImageChoice {
                name: entry.name.clone(),
                image,
            });
        }
        Ok(choices)
    }

    /// Initialize logging with the configured settings.
    pub fn init_logging(&self) {
        self.logging.init();
    }
}
