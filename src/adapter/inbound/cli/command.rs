//! Command-line interface definitions.
//!
//! Defines the CLI structure for autotag using `clap`: serving the Discord
//! bot, validating configuration, and starting or ending games directly
//! from a terminal.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use super::paths;

/// Discord bot that provisions sandboxed terminals for games of tag
#[derive(Parser, Debug)]
#[command(name = "autotag")]
#[command(version)]
pub struct Cli {
    /// Color output mode [auto, always, never]
    #[arg(
        long,
        global = true,
        default_value = "auto",
        hide_possible_values = true
    )]
    pub color: ColorChoice,

    /// JSON output for scripting
    #[arg(long, global = true)]
    pub json: bool,

    /// Decrease output verbosity
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase output verbosity
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Color output mode for terminal rendering.
#[derive(Clone, Debug, Default, clap::ValueEnum)]
pub enum ColorChoice {
    /// Detect automatically
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

/// Top-level subcommands for the autotag CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Connect to Discord and serve the /tag command
    Run(RunArgs),

    /// Run diagnostic checks
    #[command(subcommand)]
    Check(CheckCommand),

    /// Start or end a game without going through Discord
    #[command(subcommand)]
    Game(GameCommand),
}

/// Subcommands for `autotag check`.
#[derive(Subcommand, Debug)]
pub enum CheckCommand {
    /// Validate the configuration file syntax and semantics.
    Config(ConfigPathArg),
}

/// Subcommands for `autotag game`.
#[derive(Subcommand, Debug)]
pub enum GameCommand {
    /// Provision both player sessions and print their URLs.
    Start(GameStartArgs),
    /// Delete every object created for tag games.
    End(ConfigPathArg),
}

/// Shared argument struct for commands that require only a configuration path.
#[derive(Parser, Debug, Default)]
pub struct ConfigPathArg {
    /// Path to the configuration file [default: ~/.autotag/config.toml]
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

impl ConfigPathArg {
    /// Path to load, and whether a missing file falls back to defaults.
    ///
    /// Only the implicit default path may be missing.
    #[must_use]
    pub fn resolve(&self) -> (PathBuf, bool) {
        match &self.config {
            Some(path) => (path.clone(), false),
            None => (paths::default_config(), true),
        }
    }
}

/// Arguments for the `run` subcommand.
#[derive(Parser, Debug)]
pub struct RunArgs {
    #[command(flatten)]
    pub config: ConfigPathArg,

    /// Override the configured log level (e.g. debug, autotag=trace)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub json_logs: bool,
}

/// Arguments for the `game start` subcommand.
#[derive(Parser, Debug)]
pub struct GameStartArgs {
    /// Image slug to run (one of the configured choices)
    #[arg(long, default_value = "archlinux")]
    pub image: String,

    #[command(flatten)]
    pub config: ConfigPathArg,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_structure_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_name() {
        assert_eq!(Cli::command().get_name(), "autotag");
    }

    #[test]
    fn test_parse_run_command() {
        let cli = Cli::try_parse_from(["autotag", "run"]).unwrap();
        assert!(!cli.json);
        assert!(!cli.quiet);
        assert_eq!(cli.verbose, 0);
        match cli.command {
            Commands::Run(args) => {
                assert!(args.config.config.is_none());
                assert!(args.log_level.is_none());
                assert!(!args.json_logs);
            }
            other => panic!("expected run, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["autotag", "game", "end", "--json", "-vv"]).unwrap();
        assert!(cli.json);
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.command, Commands::Game(GameCommand::End(_))));
    }

    #[test]
    fn test_parse_color_never() {
        let cli = Cli::try_parse_from(["autotag", "--color", "never", "run"]).unwrap();
        assert!(matches!(cli.color, ColorChoice::Never));
    }

    #[test]
    fn test_parse_game_start_with_image_and_config() {
        let cli = Cli::try_parse_from([
            "autotag", "game", "start", "--image", "debian", "-c", "/tmp/tag.toml",
        ])
        .unwrap();
        match cli.command {
            Commands::Game(GameCommand::Start(args)) => {
                assert_eq!(args.image, "debian");
                assert_eq!(
                    args.config.resolve(),
                    (PathBuf::from("/tmp/tag.toml"), false)
                );
            }
            other => panic!("expected game start, got {other:?}"),
        }
    }

    #[test]
    fn test_default_config_may_be_missing() {
        let (path, allow_missing) = ConfigPathArg::default().resolve();
        assert!(allow_missing);
        assert!(path.ends_with("config.toml"));
    }

    #[test]
    fn test_check_config_subcommand() {
        let cli = Cli::try_parse_from(["autotag", "check", "config"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Check(CheckCommand::Config(_))
        ));
    }
}
