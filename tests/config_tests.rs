mod support;

use autotag::error::{ConfigError, Error};
use autotag::infrastructure::config::settings::Config;

use support::config::write_temp_config;

#[test]
fn config_loads_full_file() {
    let file = write_temp_config(
        r#"
[logging]
level = "debug"
format = "json"

[discord]
admin_role_id = 42
guild_id = 7

[cluster]
namespace = "games"
host = "tag.example.com"
nameservers = ["9.9.9.9"]

[cluster.resources]
cpu_limit = "2"
memory_limit = "2Gi"

[[cluster.images]]
name = "Debian"
value = "debian"

[readiness]
poll_interval_ms = 500
timeout_secs = 30
"#,
    );

    let config = Config::load(file.path()).unwrap();

    assert_eq!(config.logging.format, "json");
    assert_eq!(config.discord.admin_role_id, 42);
    assert_eq!(config.discord.guild_id, Some(7));

    let profile = config.cluster.sandbox_profile();
    assert_eq!(profile.host, "tag.example.com");
    assert_eq!(profile.nameservers, vec!["9.9.9.9"]);
    assert_eq!(profile.resources.cpu_limit, "2");
    assert_eq!(profile.resources.cpu_request, "10m");

    let images = config.image_choices().unwrap();
    assert_eq!(images.len(), 1);
    assert_eq!(images[0].image.as_str(), "debian");

    let policy = config.readiness.policy();
    assert_eq!(policy.poll_interval.as_millis(), 500);
    assert_eq!(policy.timeout.as_secs(), 30);
}

#[test]
fn config_rejects_invalid_image_slug() {
    let file = write_temp_config(
        r#"
[[cluster.images]]
name = "Bad"
value = "Arch Linux"
"#,
    );

    match Config::load(file.path()) {
        Err(Error::Config(ConfigError::InvalidValue {
            field: "cluster.images",
            ..
        })) => {}
        Err(err) => panic!("Expected invalid image error, got {err}"),
        Ok(_) => panic!("Expected invalid image to be rejected"),
    }
}

#[test]
fn config_rejects_empty_image_list() {
    let file = write_temp_config("[cluster]\nimages = []\n");

    assert!(matches!(
        Config::load(file.path()),
        Err(Error::Config(ConfigError::MissingField {
            field: "cluster.images"
        }))
    ));
}

#[test]
fn config_rejects_timeout_shorter_than_poll() {
    let file = write_temp_config("[readiness]\npoll_interval_ms = 5000\ntimeout_secs = 1\n");

    assert!(matches!(
        Config::load(file.path()),
        Err(Error::Config(ConfigError::InvalidValue {
            field: "readiness.timeout_secs",
            ..
        }))
    ));
}

#[test]
fn config_reports_malformed_toml() {
    let file = write_temp_config("[cluster\nnamespace = ");

    assert!(matches!(
        Config::load(file.path()),
        Err(Error::Config(ConfigError::Parse(_)))
    ));
}

#[test]
fn config_explicit_missing_path_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.toml");

    assert!(matches!(
        Config::load_or_default(&path, false),
        Err(Error::Config(ConfigError::ReadFile(_)))
    ));
    assert_eq!(
        Config::load_or_default(&path, true).unwrap().cluster.namespace,
        "tag"
    );
}
