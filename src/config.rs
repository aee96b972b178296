//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/orgchart/orgchart.toml`
//! 3. Local config: `<dir>/.orgchart.toml` (usually the working directory)
//! 4. Environment variables: `ORGCHART_*` prefix, `__` as section separator
//!    (`ORGCHART_HISTORY__REDO=symmetric`)

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::de::value::{Error as ValueError, StrDeserializer};
use serde::de::{DeserializeOwned, IntoDeserializer};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::ApplicationError;
use crate::domain::{ChartOptions, CyclePolicy, RedoPolicy};

/// Unified configuration for orgchart.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Chart file used when `--chart` is not given
    pub chart_file: Option<PathBuf>,
    /// Undo/redo and cycle handling
    pub history: ChartOptions,
}

/// Raw history section; `None` means "inherit from the layer below".
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawHistory {
    pub redo: Option<RedoPolicy>,
    pub cycle_guard: Option<CyclePolicy>,
}

/// Raw settings for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub chart_file: Option<PathBuf>,
    pub history: RawHistory,
}

/// Get the XDG config directory for orgchart.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "orgchart").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("orgchart.toml"))
}

/// Get the path to the local config file in `dir`.
pub fn local_config_path(dir: &Path) -> PathBuf {
    dir.join(".orgchart.toml")
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

impl Settings {
    /// Overlay wins where it specifies a value.
    ///
    /// A relative `chart_file` is resolved against `base`, the directory of
    /// the file it came from.
    fn merge_with(&self, overlay: &RawSettings, base: Option<&Path>) -> Self {
        let chart_file = match (&overlay.chart_file, base) {
            (Some(file), Some(dir)) if file.is_relative() => Some(dir.join(file)),
            (Some(file), _) => Some(file.clone()),
            (None, _) => self.chart_file.clone(),
        };
        Self {
            chart_file,
            history: ChartOptions {
                redo: overlay.history.redo.unwrap_or(self.history.redo),
                cycle_guard: overlay
                    .history
                    .cycle_guard
                    .unwrap_or(self.history.cycle_guard),
            },
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `local_dir` - Optional directory holding a `.orgchart.toml`
    pub fn load(local_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        // 1. Start with defaults
        let mut current = Self::default();

        // 2. Global config
        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                let raw = load_raw_settings(&global_path)?;
                current = current.merge_with(&raw, global_path.parent());
                debug!(path = %global_path.display(), "applied global config");
            }
        }

        // 3. Local config
        if let Some(dir) = local_dir {
            let local_path = local_config_path(dir);
            if local_path.exists() {
                let raw = load_raw_settings(&local_path)?;
                current = current.merge_with(&raw, Some(dir));
                debug!(path = %local_path.display(), "applied local config");
            }
        }

        // 4. Environment variables (explicit override)
        Self::apply_env_overrides(current)
    }

    /// Apply ORGCHART_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("ORGCHART")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("chart_file") {
            settings.chart_file = Some(PathBuf::from(val));
        }
        if let Ok(val) = config.get_string("history.redo") {
            settings.history.redo = parse_enum(&val, "history.redo")?;
        }
        if let Ok(val) = config.get_string("history.cycle_guard") {
            settings.history.cycle_guard = parse_enum(&val, "history.cycle_guard")?;
        }

        Ok(settings)
    }

    /// Render settings as TOML (for `orgchart config show`).
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: e.to_string(),
        })
    }
}

/// Parse a lowercase enum value the same way the TOML layers do.
fn parse_enum<T: DeserializeOwned>(value: &str, key: &str) -> Result<T, ApplicationError> {
    let lowered = value.to_ascii_lowercase();
    let de: StrDeserializer<'_, ValueError> = lowered.as_str().into_deserializer();
    T::deserialize(de).map_err(|e| ApplicationError::Config {
        message: format!("{key}: {e}"),
    })
}
