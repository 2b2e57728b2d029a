//! Discord bot configuration.

use serde::Deserialize;

use crate::error::ConfigError;

/// Environment variable holding the bot token.
pub const TOKEN_ENV: &str = "DISCORD_BOT_TOKEN";

const fn default_admin_role_id() -> u64 {
    796_887_971_512_320_040
}

/// Discord bot configuration.
///
/// The bot token is never read from the config file, only from
/// `DISCORD_BOT_TOKEN`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DiscordConfig {
    /// Role whose members may run `/tag`.
    pub admin_role_id: u64,
    /// Register commands on this guild only (propagates instantly) instead of
    /// globally.
    pub guild_id: Option<u64>,
}

impl DiscordConfig {
    /// Read the bot token from the environment.
    pub fn token() -> Result<String, ConfigError> {
        std::env::var(TOKEN_ENV)
            .ok()
            .filter(|token| !token.trim().is_empty())
            .ok_or(ConfigError::MissingEnv(TOKEN_ENV))
    }

    /// Whether the bot token is present in the environment.
    #[must_use]
    pub fn token_present() -> bool {
        Self::token().is_ok()
    }
}

impl Default for DiscordConfig {
    fn default() -> Self {
        Self {
            admin_role_id: default_admin_role_id(),
            guild_id: None,
        }
    }
}
