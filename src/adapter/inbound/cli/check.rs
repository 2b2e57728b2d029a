//! Handler for `check config`.

use crate::adapter::inbound::cli::command::ConfigPathArg;
use crate::adapter::inbound::cli::{load_config, output};
use crate::error::Result;
use crate::infrastructure::config::discord::{DiscordConfig, TOKEN_ENV};

/// Validate configuration without connecting to Discord or the cluster.
pub fn execute_config(arg: &ConfigPathArg) -> Result<()> {
    let (path, allow_missing) = arg.resolve();
    let config = load_config(arg)?;

    output::section("Configuration Check");
    if allow_missing && !path.exists() {
        output::field("Config", format!("{} (not found, using defaults)", path.display()));
    } else {
        output::field("Config", path.display());
    }
    output::success("Configuration is valid");

    output::section("Summary");
    output::field("Namespace", &config.cluster.namespace);
    output::field("Host", &config.cluster.host);
    output::field("Registry", &config.cluster.image_registry);
    let images: Vec<String> = config
        .image_choices()?
        .into_iter()
        .map(|choice| format!("{} ({})", choice.name, choice.image))
        .collect();
    output::field("Images", images.join(", "));
    output::field(
        "Readiness",
        format!(
            "poll {}ms, timeout {}s",
            config.readiness.poll_interval_ms, config.readiness.timeout_secs
        ),
    );
    output::field("Admin role", config.discord.admin_role_id);

    if DiscordConfig::token_present() {
        output::success("Discord token detected");
    } else {
        output::warning(&format!("{TOKEN_ENV} is not set; `autotag run` will fail"));
    }

    output::success("Configuration check complete");
    Ok(())
}
