//! Path utilities for autotag.
//!
//! Configuration lives under `~/.autotag/`:
//! - `~/.autotag/config.toml` - main configuration

use std::path::PathBuf;

/// Returns the autotag home directory (`~/.autotag/`).
pub fn home_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".autotag")
}

/// Returns the default config file path (`~/.autotag/config.toml`).
pub fn default_config() -> PathBuf {
    home_dir().join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_are_under_autotag_home() {
        assert!(home_dir().to_string_lossy().contains(".autotag"));
        assert!(default_config().starts_with(home_dir()));
    }
}
