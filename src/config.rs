//! Viewer configuration.
//!
//! An optional `config.toml` in the library root tunes the viewer. Stock
//! defaults are the base layer; the file only needs the keys it overrides:
//!
//! ```toml
//! [listing]
//! page_size = 30            # Collections per grid page
//!
//! [search]
//! text_match = "title"      # "title" or "facets"
//!
//! [scan]
//! follow_links = false      # Descend into symlinked directories
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::catalog::WalkOptions;
use crate::query::TextMatch;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Name of the config file looked up in the library root.
pub const CONFIG_FILENAME: &str = "config.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ViewerConfig {
    /// Collection grid settings.
    pub listing: ListingConfig,
    /// Search form settings.
    pub search: SearchConfig,
    /// Discovery walk settings.
    pub scan: ScanConfig,
}

impl ViewerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.listing.page_size == 0 {
            return Err(ConfigError::Validation(
                "listing.page_size must be at least 1".into(),
            ));
        }
        Ok(())
    }

    pub fn walk_options(&self) -> WalkOptions {
        WalkOptions {
            follow_links: self.scan.follow_links,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ListingConfig {
    pub page_size: usize,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self { page_size: 30 }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SearchConfig {
    pub text_match: TextMatch,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScanConfig {
    pub follow_links: bool,
}

/// Stock defaults as a TOML table, the base layer for merging.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    Ok(toml::Value::try_from(ViewerConfig::default())?)
}

/// Recursively merge `overlay` on top of `base`.
///
/// Tables merge key by key; any other overlay value replaces the base value.
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

/// Read `config.toml` from `dir` as a raw value, `None` when absent.
pub fn load_raw_config(dir: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = dir.join(CONFIG_FILENAME);
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto `base`, deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<ViewerConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: ViewerConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load the config for a library rooted at `root`.
pub fn load_config(root: &Path) -> Result<ViewerConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let overlay = load_raw_config(root)?;
    resolve_config(base, overlay)
}

/// Fully commented stock `config.toml`, printed by `gen-config`.
pub fn stock_config_toml() -> &'static str {
    r##"# Collection Viewer Configuration
# ===============================
# Place this file in the library root. All settings are optional;
# values shown are the defaults. Unknown keys are an error.

# ---------------------------------------------------------------------------
# Collection grid
# ---------------------------------------------------------------------------
[listing]
# Collections shown per page.
page_size = 30

# ---------------------------------------------------------------------------
# Search form
# ---------------------------------------------------------------------------
[search]
# How the free-text term matches a collection:
#   "title"  - case-insensitive substring of the title
#   "facets" - every word must be a whole word of an artist, character,
#              genre or group value
text_match = "title"

# ---------------------------------------------------------------------------
# Library discovery
# ---------------------------------------------------------------------------
[scan]
# Descend into symlinked directories while walking the library.
follow_links = false
"##
}
