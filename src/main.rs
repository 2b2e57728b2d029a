use autotag::adapter::inbound::cli::command::{Cli, ColorChoice};
use autotag::adapter::inbound::cli::output::{self, OutputConfig};
use autotag::adapter::inbound::cli::execute;
use clap::Parser;

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    let _ = rustls::crypto::ring::default_provider().install_default();

    let cli = Cli::parse();
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {}
    }
    output::configure(OutputConfig::new(cli.json, cli.quiet, cli.verbose));

    if let Err(e) = execute(&cli).await {
        output::error(&e.to_string());
        std::process::exit(1);
    }
}
