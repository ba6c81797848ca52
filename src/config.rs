//! Host configuration module.
//!
//! Handles loading and validating `layout-styles.toml` from the application
//! root. The file tells the resolver which theme is active and where its
//! directory lives; everything else about layouts comes from the theme's own
//! `<theme>.responsive_image_layouts.yml`.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [theme]
//! name = "default"           # Active theme machine name
//! path = "themes/default"    # Theme directory, relative to the root
//!
//! [diagnostics]
//! administrator = false      # Report unmatched lookups
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse; override just the values you want:
//!
//! ```toml
//! [theme]
//! name = "northwind"
//! path = "themes/custom/northwind"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// File name of the host configuration, looked up in the application root.
pub const CONFIG_FILENAME: &str = "layout-styles.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Host configuration loaded from `layout-styles.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HostConfig {
    /// The active theme.
    pub theme: ThemeConfig,
    /// Who gets told about unmatched lookups.
    pub diagnostics: DiagnosticsConfig,
}

impl HostConfig {
    /// Validate config values are usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let name = self.theme.name.trim();
        if name.is_empty() {
            return Err(ConfigError::Validation(
                "theme.name must not be empty".into(),
            ));
        }
        if name.contains(['/', '\\']) {
            return Err(ConfigError::Validation(
                "theme.name must not contain path separators".into(),
            ));
        }
        if self.theme.path.trim().is_empty() {
            return Err(ConfigError::Validation(
                "theme.path must not be empty".into(),
            ));
        }
        if Path::new(&self.theme.path).is_absolute() {
            return Err(ConfigError::Validation(
                "theme.path must be relative to the application root".into(),
            ));
        }
        Ok(())
    }
}

/// Active theme settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThemeConfig {
    /// Theme machine name; also the prefix of its layout file.
    pub name: String,
    /// Theme directory relative to the application root.
    pub path: String,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            path: "themes/default".to_string(),
        }
    }
}

/// Diagnostic reporting settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DiagnosticsConfig {
    /// Treat every caller as an administrator, so unmatched lookups are
    /// reported. The CLI's `--admin` flag turns this on for one call.
    pub administrator: bool,
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    toml::Value::try_from(HostConfig::default())
        .map_err(|e| ConfigError::Validation(format!("default config must serialize: {e}")))
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `layout-styles.toml` from the root as a raw TOML value.
///
/// Returns `Ok(None)` if the file doesn't exist.
pub fn load_raw_config(root: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = root.join(CONFIG_FILENAME);
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Load the host config from the application root.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result.
pub fn load_config(root: &Path) -> Result<HostConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let merged = match load_raw_config(root)? {
        Some(overlay) => merge_toml(base, overlay),
        None => base,
    };
    let config: HostConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Returns a fully-commented stock `layout-styles.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Layout Styles Configuration
# ===========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Active theme
# ---------------------------------------------------------------------------
[theme]
# Theme machine name. The layout file is <name>.responsive_image_layouts.yml
# inside the theme directory.
name = "default"

# Theme directory, relative to the application root.
path = "themes/default"

# ---------------------------------------------------------------------------
# Diagnostics
# ---------------------------------------------------------------------------
[diagnostics]
# Report lookups that match no responsive image style. Meant for theme
# authors; leave off for ordinary rendering.
administrator = false
"##
}
