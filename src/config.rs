//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/cattree/cattree.toml`
//! 3. Local config: `<working_dir>/.cattree.toml`
//! 4. Explicit config file passed with `--config`
//! 5. Environment variables: `CATTREE_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment, Map};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::{ApplicationError, OutputFormat, RenderOptions};

/// Raw settings for intermediate parsing (`None` means "not specified, inherit").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub format: Option<OutputFormat>,
    pub indent: Option<String>,
    pub orphan_marker: Option<String>,
    pub tree_root: Option<String>,
    pub keep_ancestors: Option<bool>,
    pub color: Option<bool>,
}

/// Unified configuration for cattree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Default output format (default: indented)
    pub format: OutputFormat,
    /// Prefix repeated per depth level in indented output
    pub indent: String,
    /// Suffix appended to orphan entries in indented output
    pub orphan_marker: String,
    /// Label of the synthetic root in tree output
    pub tree_root: String,
    /// Keep ancestors of search matches (default: false)
    pub keep_ancestors: bool,
    /// Colored terminal output (NO_COLOR still wins)
    pub color: bool,
}

impl Default for Settings {
    fn default() -> Self {
        let render = RenderOptions::default();
        Self {
            format: OutputFormat::default(),
            indent: render.indent,
            orphan_marker: render.orphan_marker,
            tree_root: render.root_label,
            keep_ancestors: false,
            color: true,
        }
    }
}

/// Get the XDG config directory for cattree.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "cattree").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("cattree.toml"))
}

/// Get the path to the local config file in a working directory.
pub fn local_config_path(dir: &Path) -> PathBuf {
    dir.join(".cattree.toml")
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
    /// Overlay wins for every field it specifies.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            format: overlay.format.unwrap_or(self.format),
            indent: overlay
                .indent
                .clone()
                .unwrap_or_else(|| self.indent.clone()),
            orphan_marker: overlay
                .orphan_marker
                .clone()
                .unwrap_or_else(|| self.orphan_marker.clone()),
            tree_root: overlay
                .tree_root
                .clone()
                .unwrap_or_else(|| self.tree_root.clone()),
            keep_ancestors: overlay.keep_ancestors.unwrap_or(self.keep_ancestors),
            color: overlay.color.unwrap_or(self.color),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `local_dir` - Directory searched for `.cattree.toml` (usually cwd)
    /// * `explicit` - Config file given on the command line; must exist
    pub fn load(local_dir: Option<&Path>, explicit: Option<&Path>) -> Result<Self, ApplicationError> {
        Self::load_layers(global_config_path().as_deref(), local_dir, explicit, None)
    }

    /// Load settings from explicitly named layers.
    ///
    /// `global` replaces the XDG location; a missing file is skipped.
    /// `env` replaces the process environment as the `CATTREE_*` source.
    pub fn load_layers(
        global: Option<&Path>,
        local_dir: Option<&Path>,
        explicit: Option<&Path>,
        env: Option<Map<String, String>>,
    ) -> Result<Self, ApplicationError> {
        // 1. Start with defaults
        let mut current = Self::default();

        // 2. Global config
        if let Some(global_path) = global {
            if global_path.exists() {
                debug!("load: global config {}", global_path.display());
                current = current.merge_with(&load_raw_settings(global_path)?);
            }
        }

        // 3. Local config
        if let Some(dir) = local_dir {
            let local_path = local_config_path(dir);
            if local_path.exists() {
                debug!("load: local config {}", local_path.display());
                current = current.merge_with(&load_raw_settings(&local_path)?);
            }
        }

        // 4. Explicit config
        if let Some(path) = explicit {
            if !path.exists() {
                return Err(ApplicationError::Config {
                    message: format!("config file not found: {}", path.display()),
                });
            }
            debug!("load: explicit config {}", path.display());
            current = current.merge_with(&load_raw_settings(path)?);
        }

        // 5. Environment variables
        Self::apply_env_overrides(current, env)
    }

    /// Apply CATTREE_* environment variables as explicit overrides.
    fn apply_env_overrides(
        mut settings: Self,
        env: Option<Map<String, String>>,
    ) -> Result<Self, ApplicationError> {
        // Use config crate just for env var parsing
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("CATTREE")
                    .prefix_separator("_")
                    .separator("__")
                    .source(env),
            )
            .build()
            .map_err(config_err)?;

        if let Some(val) = env_value(config.get_string("format"))? {
            settings.format = val.parse()?;
        }
        if let Some(val) = env_value(config.get_string("indent"))? {
            settings.indent = val;
        }
        if let Some(val) = env_value(config.get_string("orphan_marker"))? {
            settings.orphan_marker = val;
        }
        if let Some(val) = env_value(config.get_string("tree_root"))? {
            settings.tree_root = val;
        }
        if let Some(val) = env_value(config.get_bool("keep_ancestors"))? {
            settings.keep_ancestors = val;
        }
        if let Some(val) = env_value(config.get_bool("color"))? {
            settings.color = val;
        }

        Ok(settings)
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            indent: self.indent.clone(),
            orphan_marker: self.orphan_marker.clone(),
            root_label: self.tree_root.clone(),
        }
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# cattree configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/cattree/cattree.toml
#   Local:  ./.cattree.toml
#   Flag:   --config <file>
#   Env:    CATTREE_* environment variables

# Output format: list, indented, tree, json
# format = "indented"

# Prefix repeated once per depth level
# indent = "  "

# Suffix for categories no root reaches
# orphan_marker = " (orphan)"

# Label of the top node in tree output
# tree_root = "categories"

# Keep the parent chain of search matches
# keep_ancestors = false

# Colored output
# color = true
"#
        .to_string()
    }
}

/// Unset variables are `None`; values of the wrong type are errors.
fn env_value<T>(result: Result<T, ConfigError>) -> Result<Option<T>, ApplicationError> {
    match result {
        Ok(val) => Ok(Some(val)),
        Err(ConfigError::NotFound(_)) => Ok(None),
        Err(e) => Err(config_err(e)),
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
