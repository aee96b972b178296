//! Integration tests for layered Settings loading.
//!
//! These tests run without a global config (temp directories only), so they
//! exercise local config merging over compiled defaults.

use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

use orgchart::config::{local_config_path, Settings};
use orgchart::domain::{CyclePolicy, RedoPolicy};

#[test]
fn given_no_local_config_when_load_then_uses_defaults() {
    let dir = TempDir::new().unwrap();

    let settings = Settings::load(Some(dir.path())).expect("load settings");

    assert_eq!(settings.chart_file, None);
    assert_eq!(settings.history.redo, RedoPolicy::Inert);
    assert_eq!(settings.history.cycle_guard, CyclePolicy::Allow);
}

#[test]
fn given_local_history_section_when_load_then_overrides_defaults() {
    // Arrange
    let dir = TempDir::new().unwrap();
    let config = r#"
[history]
redo = "symmetric"
cycle_guard = "reject"
"#;
    fs::write(local_config_path(dir.path()), config).unwrap();

    // Act
    let settings = Settings::load(Some(dir.path())).expect("load settings");

    // Assert
    assert_eq!(settings.history.redo, RedoPolicy::Symmetric);
    assert_eq!(settings.history.cycle_guard, CyclePolicy::Reject);
}

#[test]
fn given_partial_history_section_when_load_then_keeps_other_defaults() {
    let dir = TempDir::new().unwrap();
    fs::write(
        local_config_path(dir.path()),
        "[history]\ncycle_guard = \"reject\"\n",
    )
    .unwrap();

    let settings = Settings::load(Some(dir.path())).expect("load settings");

    assert_eq!(settings.history.redo, RedoPolicy::Inert);
    assert_eq!(settings.history.cycle_guard, CyclePolicy::Reject);
}

#[test]
fn given_relative_chart_file_when_load_then_resolves_against_config_dir() {
    let dir = TempDir::new().unwrap();
    fs::write(
        local_config_path(dir.path()),
        "chart_file = \"charts/org.json\"\n",
    )
    .unwrap();

    let settings = Settings::load(Some(dir.path())).expect("load settings");

    assert_eq!(
        settings.chart_file,
        Some(dir.path().join("charts/org.json"))
    );
}

#[test]
fn given_absolute_chart_file_when_load_then_kept_as_is() {
    let dir = TempDir::new().unwrap();
    fs::write(
        local_config_path(dir.path()),
        "chart_file = \"/srv/org.toml\"\n",
    )
    .unwrap();

    let settings = Settings::load(Some(dir.path())).expect("load settings");

    assert_eq!(settings.chart_file, Some(PathBuf::from("/srv/org.toml")));
}

#[test]
fn given_unknown_policy_value_when_load_then_fails_with_config_error() {
    let dir = TempDir::new().unwrap();
    fs::write(
        local_config_path(dir.path()),
        "[history]\nredo = \"sometimes\"\n",
    )
    .unwrap();

    let err = Settings::load(Some(dir.path())).unwrap_err();

    assert!(err.to_string().starts_with("config error:"), "{err}");
    assert!(err.to_string().contains(".orgchart.toml"), "{err}");
}

#[test]
fn given_loaded_settings_when_rendered_then_round_trips_through_toml() {
    let dir = TempDir::new().unwrap();
    fs::write(
        local_config_path(dir.path()),
        "[history]\nredo = \"symmetric\"\n",
    )
    .unwrap();
    let settings = Settings::load(Some(dir.path())).unwrap();

    let rendered = settings.to_toml().unwrap();
    let parsed: Settings = toml::from_str(&rendered).unwrap();

    assert_eq!(parsed, settings);
}
