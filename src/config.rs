//! Adapter configuration.
//!
//! Every well-known name the pipeline touches lives here, so an export with a
//! slightly different layout can be handled without code changes. With no
//! config file the stock defaults describe a standard `next export` bundle.
//!
//! ## Config File
//!
//! A config file is only read when passed explicitly with `--config`. The
//! target directory is never searched for one.
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [layout]
//! next_dir = "_next"                # Top-level directory to un-prefix
//! static_dir = "static"             # Known sibling of the chunk-ID directory
//! chunk_id_min_len = 7              # Chunk-ID names are at least this long
//! pages_dir = "static/chunks/pages" # Page bundles, relative to next_dir
//!
//! [rename]
//! manifests = ["_buildManifest.js", "_ssgManifest.js"]
//! page_prefixes = ["_app-", "_error-"]
//!
//! [rewrite]
//! extensions = ["html", "js"]
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse. Override just the values you want:
//!
//! ```toml
//! [rewrite]
//! extensions = ["html", "js", "json"]
//! ```
//!
//! User values are merged on top of the stock defaults, unknown keys are
//! rejected, and the result is validated before any file is touched.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Full adapter configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AdaptConfig {
    /// Where things live inside the export.
    pub layout: LayoutConfig,
    /// Which files get their underscore stripped.
    pub rename: RenameConfig,
    /// Which files get their references rewritten.
    pub rewrite: RewriteConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LayoutConfig {
    /// Top-level asset directory, renamed by stripping its leading underscore.
    pub next_dir: String,
    /// Sibling of the chunk-ID directory that is never mistaken for it.
    pub static_dir: String,
    /// Minimum length, in bytes, of the chunk-ID directory name.
    pub chunk_id_min_len: usize,
    /// Directory holding the page bundles, relative to the asset directory.
    pub pages_dir: String,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            next_dir: "_next".into(),
            static_dir: "static".into(),
            chunk_id_min_len: 7,
            pages_dir: "static/chunks/pages".into(),
        }
    }
}

impl LayoutConfig {
    /// Asset directory name after the rename.
    pub fn renamed_next_dir(&self) -> &str {
        strip_underscore(&self.next_dir)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenameConfig {
    /// Manifest files inside `static/<chunk id>/`, renamed in this order.
    pub manifests: Vec<String>,
    /// Prefixes of page bundles inside the pages directory, renamed in this order.
    pub page_prefixes: Vec<String>,
}

impl Default for RenameConfig {
    fn default() -> Self {
        Self {
            manifests: vec!["_buildManifest.js".into(), "_ssgManifest.js".into()],
            page_prefixes: vec!["_app-".into(), "_error-".into()],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RewriteConfig {
    /// File extensions (without the dot) whose content is rewritten. Case-sensitive.
    pub extensions: Vec<String>,
}

impl Default for RewriteConfig {
    fn default() -> Self {
        Self {
            extensions: vec!["html".into(), "js".into()],
        }
    }
}

/// Drop the single leading underscore from a name.
pub fn strip_underscore(name: &str) -> &str {
    name.strip_prefix('_').unwrap_or(name)
}

impl AdaptConfig {
    /// Validate that every name can actually be un-prefixed and the walk has
    /// something to look at.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let renamed = std::iter::once(("layout.next_dir", &self.layout.next_dir))
            .chain(
                self.rename
                    .manifests
                    .iter()
                    .map(|m| ("rename.manifests", m)),
            )
            .chain(
                self.rename
                    .page_prefixes
                    .iter()
                    .map(|p| ("rename.page_prefixes", p)),
            );
        for (key, name) in renamed {
            if !name.starts_with('_') || name.len() < 2 {
                return Err(ConfigError::Validation(format!(
                    "{key} entry `{name}` must start with `_` and have a name after it"
                )));
            }
        }
        if self.layout.chunk_id_min_len == 0 {
            return Err(ConfigError::Validation(
                "layout.chunk_id_min_len must be at least 1".into(),
            ));
        }
        if self.layout.static_dir.is_empty() {
            return Err(ConfigError::Validation(
                "layout.static_dir must not be empty".into(),
            ));
        }
        if self.layout.pages_dir.is_empty() {
            return Err(ConfigError::Validation(
                "layout.pages_dir must not be empty".into(),
            ));
        }
        if self.rewrite.extensions.is_empty() {
            return Err(ConfigError::Validation(
                "rewrite.extensions must not be empty".into(),
            ));
        }
        if let Some(ext) = self
            .rewrite
            .extensions
            .iter()
            .find(|e| e.is_empty() || e.contains('.'))
        {
            return Err(ConfigError::Validation(format!(
                "rewrite.extensions entry `{ext}` must be a bare extension like `js`"
            )));
        }
        Ok(())
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    toml::Value::try_from(AdaptConfig::default())
        .map_err(|e| ConfigError::Validation(format!("stock defaults do not serialize: {e}")))
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

/// Merge an optional overlay onto the stock defaults, then deserialize and validate.
pub fn resolve_config(overlay: Option<toml::Value>) -> Result<AdaptConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: AdaptConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from an explicit TOML file, or the stock defaults when `None`.
pub fn load_config(path: Option<&Path>) -> Result<AdaptConfig, ConfigError> {
    let overlay = match path {
        Some(path) => {
            let content = fs::read_to_string(path)?;
            Some(toml::from_str::<toml::Value>(&content)?)
        }
        None => None,
    };
    resolve_config(overlay)
}

/// Returns a fully-commented stock config with all keys and explanations.
///
/// Used by `--gen-config`.
pub fn stock_config_toml() -> &'static str {
    r##"# next-unscore configuration
# ==========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults and match a standard `next export`.
#
# Pass this file with `next-unscore --config <FILE> <DIR>`.
# Unknown keys will cause an error.

[layout]
# Top-level asset directory. Renamed by stripping its leading underscore,
# and every "/<name>/" reference is rewritten to match.
next_dir = "_next"
# Sibling of the build-specific chunk-ID directory inside next_dir.
static_dir = "static"
# The chunk-ID directory is the first other entry at least this many bytes long.
chunk_id_min_len = 7
# Directory holding the page bundles, relative to next_dir.
pages_dir = "static/chunks/pages"

[rename]
# Manifests inside static/<chunk id>/, renamed in order.
manifests = ["_buildManifest.js", "_ssgManifest.js"]
# Each prefix must match exactly one page bundle; renamed in order.
page_prefixes = ["_app-", "_error-"]

[rewrite]
# Extensions (case-sensitive, no dot) whose content is rewritten.
extensions = ["html", "js"]
"##
}
