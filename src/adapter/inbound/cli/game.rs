//! Handlers for `game start` and `game end`.

use crate::adapter::inbound::cli::command::{ConfigPathArg, GameStartArgs};
use crate::adapter::inbound::cli::{load_config, output};
use crate::domain::PlayerSlot;
use crate::error::Result;
use crate::infrastructure::bootstrap::connect_game;
use crate::infrastructure::config::settings::Config;
use crate::port::inbound::game::{GameStarted, TagGameControl, TeardownReport};

fn init_verbose_logging(config: &Config) {
    if output::verbosity() > 0 {
        config.logging.init_with(Some("autotag=debug"), output::is_json());
    }
}

/// Provision a game from the terminal.
pub async fn execute_start(args: &GameStartArgs) -> Result<()> {
    let config = load_config(&args.config)?;
    init_verbose_logging(&config);

    let game = connect_game(&config).await?;
    let spinner = output::spinner(&format!("Provisioning sessions ({})", args.image));
    match game.start(&args.image).await {
        Ok(started) => {
            output::spinner_success(&spinner, "Sessions running");
            print_started(&started);
            Ok(())
        }
        Err(err) => {
            output::spinner_fail(&spinner, "Provisioning failed");
            output::hint("run `autotag game end` to remove partially created sessions");
            Err(err)
        }
    }
}

/// Tear down every game from the terminal.
pub async fn execute_end(arg: &ConfigPathArg) -> Result<()> {
    let config = load_config(arg)?;
    init_verbose_logging(&config);

    let game = connect_game(&config).await?;
    let spinner = output::spinner("Deleting tag game objects");
    let report = game.end().await?;
    if report.is_clean() {
        output::spinner_success(&spinner, "Ended all tag game sessions");
    } else {
        output::spinner_fail(&spinner, "Some objects could not be removed");
    }
    print_report(&report);
    Ok(())
}

fn print_started(started: &GameStarted) {
    output::section("Tag Game");
    output::field("Spectate", output::highlight(&started.spectate_url));
    for slot in PlayerSlot::ALL {
        if let Some(access) = started.access(slot) {
            output::field(&format!("Player {slot}"), &access.url);
        }
    }
}

fn print_report(report: &TeardownReport) {
    output::section("Deleted");
    if report.deleted.is_empty() {
        output::field("Objects", 0);
    }
    for (kind, count) in &report.deleted {
        output::field(kind.as_str(), count);
    }
    for failure in &report.failures {
        output::warning(&format!(
            "{}/{}: {}",
            failure.kind, failure.name, failure.reason
        ));
    }
}
