//! Environment overrides for Settings.
//!
//! Kept in its own test binary: it mutates process environment, which would
//! race with the other config tests.

use std::env;
use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

use orgchart::config::{local_config_path, Settings};
use orgchart::domain::{CyclePolicy, RedoPolicy};

#[test]
fn given_env_overrides_when_load_then_env_wins_over_local_config() {
    // Arrange
    let dir = TempDir::new().unwrap();
    fs::write(
        local_config_path(dir.path()),
        "chart_file = \"org.json\"\n[history]\nredo = \"inert\"\n",
    )
    .unwrap();
    env::set_var("ORGCHART_CHART_FILE", "/tmp/override.toml");
    env::set_var("ORGCHART_HISTORY__REDO", "Symmetric");
    env::set_var("ORGCHART_HISTORY__CYCLE_GUARD", "reject");

    // Act
    let loaded = Settings::load(Some(dir.path()));

    env::remove_var("ORGCHART_CHART_FILE");
    env::remove_var("ORGCHART_HISTORY__REDO");
    env::remove_var("ORGCHART_HISTORY__CYCLE_GUARD");

    // Assert
    let settings = loaded.expect("load settings");
    assert_eq!(settings.chart_file, Some(PathBuf::from("/tmp/override.toml")));
    assert_eq!(settings.history.redo, RedoPolicy::Symmetric);
    assert_eq!(settings.history.cycle_guard, CyclePolicy::Reject);

    // Invalid values are reported instead of silently ignored
    env::set_var("ORGCHART_HISTORY__REDO", "backwards");
    let invalid = Settings::load(Some(dir.path()));
    env::remove_var("ORGCHART_HISTORY__REDO");
    let err = invalid.unwrap_err();
    assert!(err.to_string().contains("history.redo"), "{err}");
}
