//! Integration tests for Settings config loading with layered precedence.
//!
//! Note: These tests run with explicit global config paths (temp directories
//! only) and never touch the user's XDG config.

use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

use skyrim_atlas::config::{local_config_path, Settings, DEFAULT_DATA_PATH};
use skyrim_atlas::domain::{GroupingAttribute, StatAttribute};

/// Write a config file and return its path.
fn write_config(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).expect("write config");
    path
}

#[test]
fn given_local_config_when_load_then_overrides_defaults() {
    // Arrange
    let local = TempDir::new().unwrap();
    write_config(
        &local,
        ".skyrim-atlas.toml",
        r#"
grouping = "morality"
stat = "stamina"
"#,
    );

    // Act
    let settings = Settings::load_from(None, Some(local.path())).expect("load settings");

    // Assert
    assert_eq!(settings.grouping, GroupingAttribute::Morality);
    assert_eq!(settings.stat, StatAttribute::Stamina);
    assert_eq!(settings.data_path, PathBuf::from(DEFAULT_DATA_PATH));
}

#[test]
fn given_global_only_when_load_then_global_values_apply() {
    let global = TempDir::new().unwrap();
    let global_path = write_config(
        &global,
        "skyrim-atlas.toml",
        r#"
data_path = "/srv/skyrim/SkyrimGraph.json"
include_unconfirmed_settlements = true
"#,
    );

    let settings = Settings::load_from(Some(&global_path), None).expect("load settings");

    assert_eq!(
        settings.data_path,
        PathBuf::from("/srv/skyrim/SkyrimGraph.json")
    );
    assert!(settings.include_unconfirmed_settlements);
    assert_eq!(settings.grouping, GroupingAttribute::Race);
}

#[test]
fn given_local_without_key_when_load_then_global_value_survives() {
    let global = TempDir::new().unwrap();
    let global_path = write_config(&global, "skyrim-atlas.toml", "stat = \"magicka\"\n");
    let local = TempDir::new().unwrap();
    write_config(&local, ".skyrim-atlas.toml", "grouping = \"class\"\n");

    let settings = Settings::load_from(Some(&global_path), Some(local.path())).unwrap();

    assert_eq!(settings.stat, StatAttribute::Magicka);
    assert_eq!(settings.grouping, GroupingAttribute::Class);
}

#[test]
fn given_missing_global_file_when_load_then_ignored() {
    let global = TempDir::new().unwrap();
    let missing = global.path().join("nope.toml");

    let settings = Settings::load_from(Some(&missing), None).unwrap();

    assert_eq!(settings, Settings::default());
}

#[test]
fn given_invalid_toml_when_load_then_config_error_names_file() {
    let local = TempDir::new().unwrap();
    write_config(&local, ".skyrim-atlas.toml", "grouping = [unclosed");

    let err = Settings::load_from(None, Some(local.path())).unwrap_err();

    assert!(err.to_string().contains(".skyrim-atlas.toml"));
}

#[test]
fn given_dir_when_asking_local_path_then_uses_dotfile_name() {
    let local = TempDir::new().unwrap();
    assert_eq!(
        local_config_path(local.path()),
        local.path().join(".skyrim-atlas.toml")
    );
}
