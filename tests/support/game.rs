use std::sync::Arc;

use autotag::adapter::outbound::memory::InMemoryCluster;
use autotag::application::game::TagGame;
use autotag::infrastructure::bootstrap::build_game;
use autotag::infrastructure::config::settings::Config;

use super::config::FAST_READINESS;

pub fn fast_config() -> Config {
    Config::parse_toml(FAST_READINESS).expect("parse fast config")
}

/// A game over a fresh in-memory `tag` namespace.
pub fn memory_game() -> (Arc<InMemoryCluster>, TagGame) {
    memory_game_with(fast_config())
}

/// Same as [`memory_game`] with readiness polled every `poll_ms` for at
/// most `timeout_secs`.
pub fn memory_game_polling(poll_ms: u64, timeout_secs: u64) -> (Arc<InMemoryCluster>, TagGame) {
    let config = Config::parse_toml(&format!(
        "[readiness]\npoll_interval_ms = {poll_ms}\ntimeout_secs = {timeout_secs}\n"
    ))
    .expect("parse readiness config");
    memory_game_with(config)
}

fn memory_game_with(config: Config) -> (Arc<InMemoryCluster>, TagGame) {
    let cluster = Arc::new(InMemoryCluster::new("tag"));
    let game = build_game(&config, cluster.clone()).expect("build game");
    (cluster, game)
}
