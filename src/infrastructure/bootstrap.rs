//! Infrastructure bootstrap helpers for runtime wiring.

use std::sync::Arc;

use tracing::info;

use crate::adapter::outbound::kubernetes::KubeCluster;
use crate::application::TagGame;
use crate::error::Result;
use crate::infrastructure::config::settings::Config;
use crate::port::outbound::cluster::SandboxCluster;

/// Build the game service over an arbitrary cluster adapter.
#[allow(clippy::result_large_err)]
pub fn build_game(config: &Config, cluster: Arc<dyn SandboxCluster>) -> Result<TagGame> {
    Ok(TagGame::new(
        cluster,
        config.cluster.sandbox_profile(),
        config.image_choices()?,
        config.readiness.policy(),
    ))
}

/// Connect to the cluster from the default kubeconfig and build the game
/// service.
pub async fn connect_game(config: &Config) -> Result<TagGame> {
    let cluster = KubeCluster::connect(&config.cluster.namespace).await?;
    info!(
        namespace = %config.cluster.namespace,
        host = %config.cluster.host,
        "Connected to cluster"
    );
    build_game(config, Arc::new(cluster))
}

/// Serve the Discord bot until the gateway connection ends.
#[cfg(feature = "discord")]
pub async fn run_bot(config: &Config) -> Result<()> {
    use crate::adapter::inbound::discord::{serve, TagBot};
    use crate::infrastructure::config::discord::DiscordConfig;

    let token = DiscordConfig::token()?;
    let game = Arc::new(connect_game(config).await?);
    let bot = TagBot::new(game, config.discord.admin_role_id, config.discord.guild_id);
    serve(&token, bot).await
}
