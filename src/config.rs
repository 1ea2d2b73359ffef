//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/autobind/autobind.toml`
//! 3. Local config: `<project_dir>/.autobind.toml`
//! 4. Environment variables: `AUTOBIND_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;
use crate::domain::BindOptions;

/// Unified configuration for autobind.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Asset directory, relative paths resolve against the project directory
    pub assets_dir: PathBuf,
    /// Leading character marking private fields (default: `_`)
    pub private_prefix: char,
    /// Field-name suffix of asset fields (default: `Prefab`)
    pub asset_suffix: String,
    /// Extension of indexed asset files (default: `prefab`)
    pub asset_extension: String,
}

impl Default for Settings {
    fn default() -> Self {
        let options = BindOptions::default();
        Self {
            assets_dir: PathBuf::from("Assets"),
            private_prefix: options.private_prefix,
            asset_suffix: options.asset_suffix,
            asset_extension: options.asset_extension,
        }
    }
}

/// Raw settings for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub assets_dir: Option<PathBuf>,
    pub private_prefix: Option<String>,
    pub asset_suffix: Option<String>,
    pub asset_extension: Option<String>,
}

/// Get the XDG config directory for autobind.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "autobind").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("autobind.toml"))
}

/// Get the path to the local config file in a project directory.
pub fn project_config_path(project_dir: &Path) -> PathBuf {
    project_dir.join(".autobind.toml")
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

/// A prefix must be exactly one character.
fn parse_prefix(value: &str) -> Result<char, ApplicationError> {
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(ApplicationError::Config {
            message: format!("private_prefix must be a single character, got {value:?}"),
        }),
    }
}

/// An asset suffix must not be empty.
fn parse_suffix(value: &str) -> Result<String, ApplicationError> {
    if value.is_empty() {
        return Err(ApplicationError::Config {
            message: "asset_suffix must not be empty".to_string(),
        });
    }
    Ok(value.to_string())
}

/// An asset extension is given without the leading dot.
fn parse_extension(value: &str) -> Result<String, ApplicationError> {
    if value.is_empty() || value.starts_with('.') {
        return Err(ApplicationError::Config {
            message: format!("asset_extension must be non-empty and without leading dot, got {value:?}"),
        });
    }
    Ok(value.to_string())
}

impl Settings {
    /// Naming conventions for the binder.
    pub fn bind_options(&self) -> BindOptions {
        BindOptions {
            private_prefix: self.private_prefix,
            asset_suffix: self.asset_suffix.clone(),
            asset_extension: self.asset_extension.clone(),
        }
    }

    /// Asset directory resolved against `project_dir`.
    pub fn resolved_assets_dir(&self, project_dir: &Path) -> PathBuf {
        if self.assets_dir.is_absolute() {
            self.assets_dir.clone()
        } else {
            project_dir.join(&self.assets_dir)
        }
    }

    /// Expand shell variables and tilde in path-like fields.
    fn expand_paths(&mut self) {
        let raw = self.assets_dir.to_string_lossy().to_string();
        let expanded = shellexpand::full(&raw)
            .map(|s| s.into_owned())
            .unwrap_or(raw);
        self.assets_dir = PathBuf::from(expanded);
    }

    /// Overlay wins for every field it specifies.
    fn merge_with(&self, overlay: &RawSettings) -> Result<Self, ApplicationError> {
        let private_prefix = match &overlay.private_prefix {
            Some(p) => parse_prefix(p)?,
            None => self.private_prefix,
        };
        let asset_suffix = match &overlay.asset_suffix {
            Some(s) => parse_suffix(s)?,
            None => self.asset_suffix.clone(),
        };
        let asset_extension = match &overlay.asset_extension {
            Some(e) => parse_extension(e)?,
            None => self.asset_extension.clone(),
        };
        Ok(Self {
            assets_dir: overlay
                .assets_dir
                .clone()
                .unwrap_or_else(|| self.assets_dir.clone()),
            private_prefix,
            asset_suffix,
            asset_extension,
        })
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `project_dir` - Optional project directory for local config
    pub fn load(project_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        // 1. Start with defaults
        let mut current = Self::default();

        // 2. Global config
        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                let raw = load_raw_settings(&global_path)?;
                current = current.merge_with(&raw)?;
            }
        }

        // 3. Project config
        if let Some(project) = project_dir {
            let local_path = project_config_path(project);
            if local_path.exists() {
                let raw = load_raw_settings(&local_path)?;
                current = current.merge_with(&raw)?;
            }
        }

        // 4. Environment variables
        current = Self::apply_env_overrides(current)?;

        current.expand_paths();

        Ok(current)
    }

    /// Apply AUTOBIND_* environment variables as explicit overrides.
    fn apply_env_overrides(settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(Environment::with_prefix("AUTOBIND"))
            .build()
            .map_err(config_err)?;

        let raw = RawSettings {
            assets_dir: config.get_string("assets_dir").ok().map(PathBuf::from),
            private_prefix: config.get_string("private_prefix").ok(),
            asset_suffix: config.get_string("asset_suffix").ok(),
            asset_extension: config.get_string("asset_extension").ok(),
        };
        settings.merge_with(&raw)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# autobind configuration
#
# Locations (by precedence, lowest to highest):
#   Global:  ~/.config/autobind/autobind.toml
#   Project: <project_dir>/.autobind.toml
#   Env:     AUTOBIND_* environment variables

# Directory scanned for assets (relative to the project directory)
# assets_dir = "Assets"

# Leading character stripped from private field names (_target -> target)
# private_prefix = "_"

# Fields whose name ends with this suffix are bound to assets (heroPrefab -> hero)
# asset_suffix = "Prefab"

# Only files with this extension are indexed as assets
# asset_extension = "prefab"
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
