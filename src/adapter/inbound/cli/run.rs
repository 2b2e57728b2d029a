//! Handler for the `run` command.

use crate::adapter::inbound::cli::command::RunArgs;
use crate::adapter::inbound::cli::{load_config, output};
use crate::error::Result;
use crate::infrastructure::config::settings::Config;

/// Execute the run command.
pub async fn execute(args: &RunArgs) -> Result<()> {
    let config = load_config(&args.config)?;
    config
        .logging
        .init_with(args.log_level.as_deref(), args.json_logs || output::is_json());

    if !output::is_quiet() && !output::is_json() {
        output::header(env!("CARGO_PKG_VERSION"));
        print_startup(&config);
    }

    serve(&config).await
}

fn print_startup(config: &Config) {
    output::field("Namespace", &config.cluster.namespace);
    output::field("Host", output::highlight(&config.cluster.host));
    output::field("Admin role", config.discord.admin_role_id);
    match config.discord.guild_id {
        Some(guild) => output::field("Commands", format!("guild {guild}")),
        None => output::field("Commands", "global"),
    }
}

#[cfg(feature = "discord")]
async fn serve(config: &Config) -> Result<()> {
    crate::infrastructure::bootstrap::run_bot(config).await
}

#[cfg(not(feature = "discord"))]
async fn serve(_config: &Config) -> Result<()> {
    Err(crate::error::ConfigError::InvalidValue {
        field: "features",
        reason: "autotag was built without the `discord` feature".to_string(),
    }
    .into())
}
