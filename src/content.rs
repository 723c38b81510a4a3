//! Content source access and article normalization.
//!
//! The CMS is an opaque collaborator: all this module sees is the result of
//! one articles query, shaped the way the CMS's GraphQL layer returns it:
//!
//! ```json
//! { "data": { "articles": { "edges": [
//!     { "node": {
//!         "id": "c1", "slug": "hello", "node_locale": "en-US",
//!         "title": "Hello", "author": "Jane", "excerpt": "...",
//!         "body": { "childMdx": { "body": "# Hello", "timeToRead": 3 } },
//!         "date": "March 4, 2021", "dateForSEO": "2021-03-04",
//!         "secret": false
//!     } }
//! ] } } }
//! ```
//!
//! [`normalize_edges`] maps every edge to exactly one [`Article`], keeping
//! order. It never filters: locale selection belongs to the page generator.

use crate::paths::slugify;
use crate::types::Article;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Deserialize;
use std::cmp::Ordering;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Reading speed used to estimate `time_to_read` when the CMS omits it.
const WORDS_PER_MINUTE: usize = 200;

#[derive(Error, Debug)]
pub enum ContentError {
    #[error("IO error reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Malformed content response: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Normalize(#[from] NormalizeError),
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum NormalizeError {
    #[error("edge {index}: required field `{field}` is missing")]
    MissingField { index: usize, field: &'static str },
}

// ============================================================================
// Raw CMS shapes
// ============================================================================

/// Top-level response of the articles query.
#[derive(Debug, Deserialize)]
pub struct QueryResponse {
    pub data: QueryData,
}

#[derive(Debug, Deserialize)]
pub struct QueryData {
    pub articles: EdgeList,
}

#[derive(Debug, Deserialize)]
pub struct EdgeList {
    pub edges: Vec<RawEdge>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawEdge {
    pub node: RawArticle,
}

/// An article node as the CMS returns it. Everything is optional here;
/// [`normalize_edge`] decides what is required.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawArticle {
    pub id: Option<String>,
    pub slug: Option<String>,
    #[serde(rename = "node_locale")]
    pub node_locale: Option<String>,
    pub title: Option<String>,
    pub author: Option<String>,
    pub excerpt: Option<String>,
    pub body: Option<RawBody>,
    pub date: Option<String>,
    #[serde(rename = "dateForSEO")]
    pub date_for_seo: Option<String>,
    pub secret: Option<bool>,
    #[serde(rename = "canonical_url")]
    pub canonical_url: Option<String>,
}

/// Article body: either plain markdown or a long-text node processed by MDX.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawBody {
    Markdown(String),
    Node {
        #[serde(rename = "childMdx")]
        child_mdx: RawMdx,
    },
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMdx {
    pub body: String,
    pub time_to_read: Option<u32>,
}

// ============================================================================
// Content sources
// ============================================================================

/// Something that can run the articles query.
///
/// Fetching happens once per build. Errors abort the run; nothing retries.
pub trait ContentSource {
    fn fetch(&self) -> Result<QueryResponse, ContentError>;
}

/// Reads a query result previously exported from the CMS to a JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ContentSource for JsonFileSource {
    fn fetch(&self) -> Result<QueryResponse, ContentError> {
        let content = fs::read_to_string(&self.path).map_err(|source| ContentError::Io {
            path: self.path.clone(),
            source,
        })?;
        Ok(serde_json::from_str(&content)?)
    }
}

/// Fetch from `source` and normalize every edge.
pub fn load_articles(source: &impl ContentSource) -> Result<Vec<Article>, ContentError> {
    let response = source.fetch()?;
    Ok(normalize_edges(&response.data.articles.edges)?)
}

// ============================================================================
// Normalization
// ============================================================================

/// Normalize all edges, order-preserving. Fails on the first edge missing a
/// required field.
pub fn normalize_edges(edges: &[RawEdge]) -> Result<Vec<Article>, NormalizeError> {
    edges
        .iter()
        .enumerate()
        .map(|(index, edge)| normalize_edge(index, &edge.node))
        .collect()
}

/// Normalize one article node. `index` is only used for error reporting.
///
/// Required: `id`, `node_locale`, `title`, `dateForSEO`. A missing slug is
/// derived from the title.
pub fn normalize_edge(index: usize, raw: &RawArticle) -> Result<Article, NormalizeError> {
    let require = |value: &Option<String>, field: &'static str| {
        value
            .clone()
            .ok_or(NormalizeError::MissingField { index, field })
    };

    let id = require(&raw.id, "id")?;
    let node_locale = require(&raw.node_locale, "node_locale")?;
    let title = require(&raw.title, "title")?;
    let date_for_seo = require(&raw.date_for_seo, "dateForSEO")?;

    let slug = match &raw.slug {
        Some(slug) => slug.trim_matches('/').to_string(),
        None => slugify(&title, "").trim_start_matches('/').to_string(),
    };

    let (body, cms_time_to_read) = match &raw.body {
        Some(RawBody::Markdown(text)) => (text.clone(), None),
        Some(RawBody::Node { child_mdx }) => (child_mdx.body.clone(), child_mdx.time_to_read),
        None => (String::new(), None),
    };
    let time_to_read = cms_time_to_read.unwrap_or_else(|| estimate_time_to_read(&body));

    Ok(Article {
        id,
        slug,
        node_locale,
        title,
        author: raw.author.clone().unwrap_or_default(),
        excerpt: raw.excerpt.clone().unwrap_or_default(),
        date: raw.date.clone().unwrap_or_else(|| date_for_seo.clone()),
        date_for_seo,
        body,
        secret: raw.secret.unwrap_or(false),
        time_to_read,
        canonical_url: raw.canonical_url.clone(),
    })
}

/// Minutes to read `body`, rounded up, never less than one.
pub fn estimate_time_to_read(body: &str) -> u32 {
    let words = body.split_whitespace().count();
    words.div_ceil(WORDS_PER_MINUTE).max(1) as u32
}

// ============================================================================
// Ordering
// ============================================================================

/// Parse a `dateForSEO` value: RFC 3339 timestamps or plain `YYYY-MM-DD`.
pub fn parse_date(value: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_utc());
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Stable sort, newest first. Articles whose date cannot be parsed go last,
/// keeping their relative order.
pub fn sort_by_date(articles: &mut [Article]) {
    articles.sort_by(|a, b| {
        match (parse_date(&a.date_for_seo), parse_date(&b.date_for_seo)) {
            (Some(da), Some(db)) => db.cmp(&da),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    });
}
