//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/skyrim-atlas/skyrim-atlas.toml`
//! 3. Local config: `<dir>/.skyrim-atlas.toml`
//! 4. Environment variables: `SKYRIM_ATLAS_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::ApplicationError;
use crate::domain::{GroupingAttribute, StatAttribute};
use crate::util::path::{expand_env_vars, resolve_path};

const APP_NAME: &str = "skyrim-atlas";
const ENV_PREFIX: &str = "SKYRIM_ATLAS";
const LOCAL_CONFIG_FILE: &str = ".skyrim-atlas.toml";

/// Default location of the character dataset.
pub const DEFAULT_DATA_PATH: &str = "resources/SkyrimGraph.json";

/// Raw settings for intermediate parsing (`None` → not specified, inherit).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub data_path: Option<PathBuf>,
    pub grouping: Option<GroupingAttribute>,
    pub stat: Option<StatAttribute>,
    pub include_unconfirmed_settlements: Option<bool>,
}

/// Unified configuration for skyrim-atlas.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// JSON array of character records
    pub data_path: PathBuf,
    /// Initial grouping dimension
    pub grouping: GroupingAttribute,
    /// Initial stat dimension
    pub stat: StatAttribute,
    /// Keep Stonehills and Shor's Stone instead of excluding them
    pub include_unconfirmed_settlements: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            grouping: GroupingAttribute::Race,
            stat: StatAttribute::Health,
            include_unconfirmed_settlements: false,
        }
    }
}

/// Get the XDG config directory for skyrim-atlas.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", APP_NAME).map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join(format!("{APP_NAME}.toml")))
}

/// Get the path to the local config file in a directory.
pub fn local_config_path(dir: &Path) -> PathBuf {
    dir.join(LOCAL_CONFIG_FILE)
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

impl Settings {
    /// Expand shell variables and tilde in `data_path`.
    fn expand_paths(&mut self) {
        let expanded = expand_env_vars(self.data_path.to_string_lossy().as_ref());
        self.data_path = PathBuf::from(expanded);
    }

    /// Overlay wins where it specifies a value.
    ///
    /// A relative `data_path` from a config file is anchored at `base`, the
    /// directory holding that file.
    fn merge_with(&self, overlay: &RawSettings, base: Option<&Path>) -> Self {
        Self {
            data_path: overlay
                .data_path
                .as_deref()
                .map(|p| resolve_path(p, base))
                .unwrap_or_else(|| self.data_path.clone()),
            grouping: overlay.grouping.unwrap_or(self.grouping),
            stat: overlay.stat.unwrap_or(self.stat),
            include_unconfirmed_settlements: overlay
                .include_unconfirmed_settlements
                .unwrap_or(self.include_unconfirmed_settlements),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `local_dir` - Optional directory holding a `.skyrim-atlas.toml`
    pub fn load(local_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        let global = global_config_path();
        Self::load_from(global.as_deref(), local_dir)
    }

    /// Same as [`Settings::load`] with an explicit global config path.
    pub fn load_from(
        global_path: Option<&Path>,
        local_dir: Option<&Path>,
    ) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global_path.filter(|p| p.exists()) {
            debug!("load: global config {}", global_path.display());
            let raw = load_raw_settings(global_path)?;
            current = current.merge_with(&raw, global_path.parent());
        }

        if let Some(dir) = local_dir {
            let local_path = local_config_path(dir);
            if local_path.exists() {
                debug!("load: local config {}", local_path.display());
                let raw = load_raw_settings(&local_path)?;
                current = current.merge_with(&raw, Some(dir));
            }
        }

        current = Self::apply_env_overrides(current)?;
        current.expand_paths();

        Ok(current)
    }

    /// Apply `SKYRIM_ATLAS_*` environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("data_path") {
            settings.data_path = PathBuf::from(val);
        }
        if let Ok(val) = config.get_string("grouping") {
            settings.grouping = val.parse().map_err(|e| env_err("grouping", e))?;
        }
        if let Ok(val) = config.get_string("stat") {
            settings.stat = val.parse().map_err(|e| env_err("stat", e))?;
        }
        if config.get_string("include_unconfirmed_settlements").is_ok() {
            settings.include_unconfirmed_settlements = config
                .get_bool("include_unconfirmed_settlements")
                .map_err(|e| env_err("include_unconfirmed_settlements", e))?;
        }

        Ok(settings)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        format!(
            r#"# skyrim-atlas configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/skyrim-atlas/skyrim-atlas.toml
#   Local:  <dir>/.skyrim-atlas.toml
#   Env:    SKYRIM_ATLAS_* environment variables
#
# Relative data paths in a config file are resolved against that file's directory.

# JSON array of character records
# data_path = "{DEFAULT_DATA_PATH}"

# Grouping dimension: race | class | skill | aggression | morality
# grouping = "race"

# Stat dimension: health | magicka | stamina
# stat = "health"

# Keep Stonehills and Shor's Stone as settlements instead of excluding them
# include_unconfirmed_settlements = false
"#
        )
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

fn env_err(key: &str, e: impl std::fmt::Display) -> ApplicationError {
    ApplicationError::Config {
        message: format!("{ENV_PREFIX}_{}: {e}", key.to_uppercase()),
    }
}
