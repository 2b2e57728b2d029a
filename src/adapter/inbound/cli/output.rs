//! Terminal rendering for autotag commands.
//!
//! Every line goes through [`emit`]: with `--json` it becomes one
//! `{"type": .., "payload": ..}` object per line on stdout, otherwise it is
//! drawn for humans unless `--quiet` hides it. Warnings and errors are never
//! hidden.

use std::fmt::Display;
use std::sync::{OnceLock, RwLock};
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use serde_json::{json, Value};

/// Flags shared by every subcommand.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputConfig {
    pub json: bool,
    pub quiet: bool,
    pub verbose: u8,
}

impl OutputConfig {
    #[must_use]
    pub const fn new(json: bool, quiet: bool, verbose: u8) -> Self {
        Self {
            json,
            quiet,
            verbose,
        }
    }
}

static SETTINGS: OnceLock<RwLock<OutputConfig>> = OnceLock::new();

fn settings() -> OutputConfig {
    let cell = SETTINGS.get_or_init(RwLock::default);
    match cell.read() {
        Ok(guard) => *guard,
        Err(poisoned) => *poisoned.into_inner(),
    }
}

/// Apply the global CLI flags.
pub fn configure(config: OutputConfig) {
    let cell = SETTINGS.get_or_init(RwLock::default);
    match cell.write() {
        Ok(mut guard) => *guard = config,
        Err(poisoned) => *poisoned.into_inner() = config,
    }
}

#[must_use]
pub fn is_json() -> bool {
    settings().json
}

#[must_use]
pub fn is_quiet() -> bool {
    settings().quiet
}

/// Number of `-v` flags given.
#[must_use]
pub fn verbosity() -> u8 {
    settings().verbose
}

/// Whether an unforced human line is hidden by `--quiet`.
fn hidden(config: OutputConfig, forced: bool) -> bool {
    !config.json && config.quiet && !forced
}

fn emit(kind: &str, payload: Value, forced: bool, human: impl FnOnce()) {
    let config = settings();
    if config.json {
        println!("{}", json!({ "type": kind, "payload": payload }));
    } else if !hidden(config, forced) {
        human();
    }
}

pub fn header(version: &str) {
    emit(
        "header",
        json!({ "app": "autotag", "version": version }),
        false,
        || println!("{} {}\n", "autotag".bold(), version.dimmed()),
    );
}

/// Print `label` and `value` aligned in two columns.
pub fn field(label: &str, value: impl Display) {
    let value = value.to_string();
    emit(
        "field",
        json!({ "label": label, "value": value }),
        false,
        || println!("  {:<12} {value}", label.dimmed()),
    );
}

pub fn section(title: &str) {
    emit("section", json!({ "title": title }), false, || {
        println!("\n{}", title.bold());
    });
}

pub fn success(message: &str) {
    emit("success", json!({ "message": message }), false, || {
        println!("  {} {message}", "✓".green());
    });
}

pub fn warning(message: &str) {
    emit("warning", json!({ "message": message }), true, || {
        println!("  {} {message}", "⚠".yellow());
    });
}

pub fn hint(message: &str) {
    emit("hint", json!({ "message": message }), false, || {
        println!("  {}: {}", "hint".cyan().dimmed(), message.dimmed());
    });
}

/// Print a fatal error on stderr.
pub fn error(message: &str) {
    if is_json() {
        eprintln!("{}", json!({ "type": "error", "payload": { "message": message } }));
    } else {
        eprintln!("  {} {message}", "×".red());
    }
}

/// Color a value for emphasis; plain text in JSON mode.
pub fn highlight(value: impl Display) -> String {
    if is_json() {
        value.to_string()
    } else {
        value.cyan().to_string()
    }
}

const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Start a spinner for a long cluster operation. Hidden in JSON or quiet mode.
pub fn spinner(message: &str) -> ProgressBar {
    let config = settings();
    let pb = if config.json || config.quiet {
        ProgressBar::hidden()
    } else {
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner()
            .tick_strings(SPINNER_FRAMES)
            .template("  {spinner:.cyan} {msg}")
        {
            pb.set_style(style);
        }
        pb.enable_steady_tick(Duration::from_millis(80));
        pb
    };
    pb.set_message(message.to_string());
    pb
}

fn finish(pb: &ProgressBar, kind: &str, mark: String, message: &str, forced: bool) {
    let config = settings();
    if config.json {
        println!("{}", json!({ "type": kind, "payload": { "message": message } }));
        pb.finish_and_clear();
    } else if hidden(config, forced) {
        pb.finish_and_clear();
    } else {
        pb.finish_with_message(format!("{mark} {message}"));
    }
}

pub fn spinner_success(pb: &ProgressBar, message: &str) {
    finish(pb, "spinner_success", "✓".green().to_string(), message, false);
}

pub fn spinner_fail(pb: &ProgressBar, message: &str) {
    finish(pb, "spinner_fail", "×".red().to_string(), message, true);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quiet_hides_only_unforced_human_lines() {
        assert!(hidden(OutputConfig::new(false, true, 0), false));
        assert!(!hidden(OutputConfig::new(false, true, 0), true));
        assert!(!hidden(OutputConfig::new(true, true, 0), false));
        assert!(!hidden(OutputConfig::new(false, false, 2), false));
    }
}
