//! CLI module graph.

pub mod check;
pub mod command;
pub mod game;
pub mod output;
pub mod paths;
pub mod run;

use command::{CheckCommand, Cli, Commands, ConfigPathArg, GameCommand};

use crate::error::Result;
use crate::infrastructure::config::settings::Config;

/// Load the configuration named by a `--config` argument.
#[allow(clippy::result_large_err)]
pub fn load_config(arg: &ConfigPathArg) -> Result<Config> {
    let (path, allow_missing) = arg.resolve();
    Config::load_or_default(path, allow_missing)
}

/// Dispatch a parsed command line.
pub async fn execute(cli: &Cli) -> Result<()> {
    match &cli.command {
        Commands::Run(args) => run::execute(args).await,
        Commands::Check(CheckCommand::Config(arg)) => check::execute_config(arg),
        Commands::Game(GameCommand::Start(args)) => game::execute_start(args).await,
        Commands::Game(GameCommand::End(arg)) => game::execute_end(arg).await,
    }
}
