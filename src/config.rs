//! Site configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. The file lives in
//! the site root and is sparse: stock defaults are the base layer and user
//! values are merged on top key by key.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! content = "content.json"  # CMS export, relative to the site root
//! base_path = "/"           # Base path handed to every page context
//! page_length = 4           # Articles per listing page
//!
//! [site]
//! title = "0xfe.dev"
//! url = "https://www.yourdomain.tld"
//! description = "Lorem ipsum"
//!
//! [routing]
//! root_locale = "en-US"     # Locale served from "/" instead of "/<path>/"
//!
//! [[locales]]
//! default = true
//! path = "en"
//! label = "EN"
//! locale = "en-US"
//!
//! [[locales]]
//! path = "it"
//! label = "IT"
//! locale = "it-IT"
//!
//! [content_sort]
//! by_date = true            # Newest first, by dateForSEO
//!
//! [processing]
//! max_processes = 4         # Max parallel render workers (omit for auto = CPU cores)
//! ```
//!
//! The locale list is the single source of truth for both routing and the
//! language selector. Declaring `[[locales]]` replaces the stock list as a
//! whole; arrays are never merged element-wise.
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
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

/// Site configuration loaded from `config.toml`.
///
/// All fields have sensible defaults. User config files need only specify
/// the values they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Path to the exported CMS query result, relative to the site root.
    pub content: String,
    /// Base path passed through to every page context.
    pub base_path: String,
    /// Number of articles per listing page.
    pub page_length: usize,
    /// Site metadata used by the renderer (titles, canonical URLs).
    pub site: SiteMetadata,
    /// Root-locale selection.
    pub routing: RoutingConfig,
    /// Configured locales, in display order.
    pub locales: Vec<LocaleConfig>,
    /// Ordering applied to articles after normalization.
    pub content_sort: SortConfig,
    /// Parallel rendering settings.
    pub processing: ProcessingConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            content: "content.json".to_string(),
            base_path: "/".to_string(),
            page_length: 4,
            site: SiteMetadata::default(),
            routing: RoutingConfig::default(),
            locales: vec![
                LocaleConfig {
                    default: true,
                    path: "en".to_string(),
                    label: "EN".to_string(),
                    locale: "en-US".to_string(),
                },
                LocaleConfig {
                    default: false,
                    path: "it".to_string(),
                    label: "IT".to_string(),
                    locale: "it-IT".to_string(),
                },
            ],
            content_sort: SortConfig::default(),
            processing: ProcessingConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.page_length == 0 {
            return Err(ConfigError::Validation(
                "page_length must be greater than 0".into(),
            ));
        }
        if !self.base_path.starts_with('/') {
            return Err(ConfigError::Validation(
                "base_path must start with '/'".into(),
            ));
        }
        if self.locales.is_empty() {
            return Err(ConfigError::Validation(
                "at least one [[locales]] entry is required".into(),
            ));
        }

        let defaults = self.locales.iter().filter(|l| l.default).count();
        if defaults != 1 {
            return Err(ConfigError::Validation(format!(
                "exactly one locale must set default = true (found {defaults})"
            )));
        }

        let mut tags = HashSet::new();
        let mut paths = HashSet::new();
        for locale in &self.locales {
            if locale.locale.is_empty() {
                return Err(ConfigError::Validation(
                    "locales.locale must not be empty".into(),
                ));
            }
            if locale.path.is_empty() || locale.path.contains('/') {
                return Err(ConfigError::Validation(format!(
                    "locales.path for {} must be a single non-empty path segment",
                    locale.locale
                )));
            }
            if !tags.insert(locale.locale.to_lowercase()) {
                return Err(ConfigError::Validation(format!(
                    "duplicate locale {}",
                    locale.locale
                )));
            }
            if !paths.insert(locale.path.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "duplicate locale path {}",
                    locale.path
                )));
            }
        }
        Ok(())
    }
}

/// Site-wide metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteMetadata {
    pub title: String,
    /// Absolute site URL without trailing slash, used for canonical links.
    pub url: String,
    pub description: String,
}

impl Default for SiteMetadata {
    fn default() -> Self {
        Self {
            title: "0xfe.dev".to_string(),
            url: "https://www.yourdomain.tld".to_string(),
            description: "Lorem ipsum".to_string(),
        }
    }
}

/// Which locale is served from the site root.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RoutingConfig {
    /// Locale tag (compared case-insensitively) whose prefix is `/`.
    /// Every other locale lives under `/<path>/`. This is independent of
    /// the `default` flag on the locale entries.
    pub root_locale: String,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            root_locale: "en-US".to_string(),
        }
    }
}

/// One configured locale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LocaleConfig {
    /// Marks the language selector's home entry. Exactly one per config.
    #[serde(default)]
    pub default: bool,
    /// URL path segment, e.g. `"it"` for `/it/`.
    pub path: String,
    /// Short label shown in the language selector.
    pub label: String,
    /// Locale tag as reported by the CMS, e.g. `"it-IT"`.
    pub locale: String,
}

/// Ordering applied to normalized articles.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SortConfig {
    /// Stable sort newest-first by `dateForSEO`. Disable when the export is
    /// already in the order the listings should show.
    pub by_date: bool,
}

impl Default for SortConfig {
    fn default() -> Self {
        Self { by_date: true }
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel render workers.
    /// When absent or null, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config
        .max_processes
        .map(|n| n.clamp(1, cores))
        .unwrap_or(cores)
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    toml::Value::try_from(SiteConfig::default())
        .map_err(|e| ConfigError::Validation(format!("default config must serialize: {e}")))
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values (arrays included) in overlay replace base values entirely.
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

/// Load a `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if no `config.toml` exists in the directory.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = path.join("config.toml");
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<SiteConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `config.toml` in the given site root.
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let overlay = load_raw_config(root)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Polyblog Configuration
# ======================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
# Unknown keys will cause an error.

# Exported CMS query result, relative to the site root.
# Shape: { "data": { "articles": { "edges": [ { "node": { ... } } ] } } }
content = "content.json"

# Base path passed through to every page context.
base_path = "/"

# Number of articles per listing page.
page_length = 4

# ---------------------------------------------------------------------------
# Site metadata
# ---------------------------------------------------------------------------
[site]
title = "0xfe.dev"
# Absolute URL without trailing slash, used for canonical links.
url = "https://www.yourdomain.tld"
description = "Lorem ipsum"

# ---------------------------------------------------------------------------
# Routing
# ---------------------------------------------------------------------------
[routing]
# Locale served from "/". All other locales are served from "/<path>/".
# Compared case-insensitively against each locale tag.
root_locale = "en-US"

# ---------------------------------------------------------------------------
# Locales
# ---------------------------------------------------------------------------
# Exactly one entry must set default = true; it is the home link of the
# language selector. Declaring any [[locales]] replaces this whole list.
[[locales]]
default = true
path = "en"
label = "EN"
locale = "en-US"

[[locales]]
path = "it"
label = "IT"
locale = "it-IT"

# ---------------------------------------------------------------------------
# Ordering
# ---------------------------------------------------------------------------
[content_sort]
# Sort articles newest-first by dateForSEO. Ties keep export order.
by_date = true

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel render workers.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4
"##
}
