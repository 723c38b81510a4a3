//! Content loading and manifest generation.
//!
//! Stage 1 of the build pipeline. Reads the site configuration, runs the
//! articles query once against the content source, and normalizes the
//! result into a [`ContentManifest`] that the plan stage consumes.
//!
//! ## Site Layout
//!
//! ```text
//! site/
//! ├── config.toml       # Site configuration (optional)
//! ├── content.json      # Exported articles query (path set by `content`)
//! └── static/           # Copied verbatim to the output root (optional)
//! ```
//!
//! ## Validation
//!
//! Loading fails when the config is invalid, the content source cannot be
//! read, or an edge is missing a required field. Nothing is written in that
//! case.

use crate::config::{self, SiteConfig};
use crate::content::{self, ContentError, ContentSource, JsonFileSource};
use crate::types::Article;
use log::info;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Content error: {0}")]
    Content(#[from] ContentError),
}

/// Manifest output from the load stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentManifest {
    pub articles: Vec<Article>,
    pub config: SiteConfig,
}

/// Load `config.toml` and the content export from a site root.
pub fn load(root: &Path) -> Result<ContentManifest, LoadError> {
    let config = config::load_config(root)?;
    let source = JsonFileSource::new(root.join(&config.content));
    info!("fetching articles from {}", source.path().display());
    load_from(&source, config)
}

/// Fetch and normalize articles from any content source.
pub fn load_from(
    source: &impl ContentSource,
    config: SiteConfig,
) -> Result<ContentManifest, LoadError> {
    let mut articles = content::load_articles(source)?;
    if config.content_sort.by_date {
        content::sort_by_date(&mut articles);
    }
    info!("normalized {} articles", articles.len());
    Ok(ContentManifest { articles, config })
}
