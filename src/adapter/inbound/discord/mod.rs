//! Discord control surface.
//!
//! Serves the `/tag` slash command over the Discord gateway. Only members
//! holding the configured admin role may start or end games.
//!
//! Requires the `discord` feature to be enabled.

mod auth;
mod command;
mod format;
mod handler;

pub use command::{parse_command, CommandInput, CommandParseError, OptionValue, TagCommand};
pub use handler::TagBot;

use serenity::all::{Client, GatewayIntents};
use tokio::signal;
use tracing::info;

use crate::error::Result;

/// Connect to the gateway and serve interactions until the connection ends
/// or Ctrl-C is received.
pub async fn serve(token: &str, bot: TagBot) -> Result<()> {
    let mut client = Client::builder(token, GatewayIntents::GUILDS)
        .event_handler(bot)
        .await?;
    let shards = client.shard_manager.clone();

    info!("Connecting to Discord gateway");
    tokio::select! {
        result = client.start() => result?,
        _ = signal::ctrl_c() => {
            info!("Shutdown signal received");
            shards.shutdown_all().await;
        }
    }
    info!("autotag stopped");
    Ok(())
}
