//! Shared types used across all pipeline stages.
//!
//! These types are serialized to JSON between stages (load → plan → render)
//! and handed to page templates as part of their context.

use serde::{Deserialize, Serialize};

/// A normalized article, one per CMS edge.
///
/// Field names serialize the way page templates expect them: camelCase,
/// except `node_locale` and `dateForSEO` which keep the CMS spelling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub id: String,
    pub slug: String,
    #[serde(rename = "node_locale")]
    pub node_locale: String,
    pub title: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub excerpt: String,
    /// Markdown source of the article body.
    #[serde(default)]
    pub body: String,
    /// Human-readable publication date, as the CMS formats it.
    #[serde(default)]
    pub date: String,
    /// Machine-readable publication date (RFC 3339 or `YYYY-MM-DD`).
    #[serde(rename = "dateForSEO")]
    pub date_for_seo: String,
    /// Secret articles are published but asked not to be indexed.
    #[serde(default)]
    pub secret: bool,
    /// Estimated reading time in minutes.
    pub time_to_read: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub canonical_url: Option<String>,
}

impl Article {
    /// Whether this article belongs to `locale` (tags compare case-insensitively).
    pub fn is_in_locale(&self, locale: &str) -> bool {
        self.node_locale.eq_ignore_ascii_case(locale)
    }
}
