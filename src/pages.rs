//! Page generation.
//!
//! Stage 2 of the build pipeline. Turns the normalized articles into page
//! bindings: a path, the template that renders it, and the context handed
//! to that template. Nothing is rendered here.
//!
//! ## Generated Pages
//!
//! For every configured locale, in config order:
//!
//! - **Listing pages**: the locale's articles split into windows of
//!   `page_length`, served from the locale prefix (`/`, `/page/2`, …).
//! - **Article pages**: one per article at `prefix + slug`, carrying up to
//!   two "next" suggestions (see [`crate::related`]).
//!
//! ```text
//! /                 listing 1 (en-US)
//! /page/2           listing 2 (en-US)
//! /hello-world      article  (en-US)
//! /it/              listing 1 (it-IT)
//! /it/ciao-mondo    article  (it-IT)
//! ```
//!
//! Articles keep the order they arrive in; this stage never re-sorts. A
//! locale without articles produces no pages.
//!
//! ## Sinks
//!
//! Bindings are handed one at a time to a [`PageSink`]. `Vec<PageRequest>`
//! is the collecting sink used to write `pages.json`.

use crate::config::SiteConfig;
use crate::load::ContentManifest;
use crate::paths::build_paginated_path;
use crate::related::select_next;
use crate::routing::Locales;
use crate::types::Article;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use std::convert::Infallible;

/// Which template renders a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Template {
    Listing,
    Article,
}

/// One page binding: where it lives, what renders it, and with what data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageRequest {
    pub path: String,
    pub template: Template,
    pub context: PageContext,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PageContext {
    Listing(ListingContext),
    Article(ArticleContext),
}

/// Context of a listing page.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingContext {
    /// Articles shown on this page.
    pub group: Vec<Article>,
    /// 1-based page index.
    pub index: usize,
    pub first: bool,
    pub last: bool,
    pub page_count: usize,
    pub path_prefix: String,
    pub previous_path: Option<String>,
    pub next_path: Option<String>,
    pub additional_context: ListingExtras,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingExtras {
    /// Always empty; kept so templates can rely on the key.
    pub authors: Vec<String>,
    pub base_path: String,
    pub prefix: String,
    pub skip: usize,
    pub limit: usize,
    /// Lowercased locale tag.
    pub locale: String,
}

/// Context of an article page.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleContext {
    pub slug: String,
    pub id: String,
    pub node_locale: String,
    pub article: Article,
    pub next: Vec<Article>,
    pub base_path: String,
    pub path_prefix: String,
    /// Lowercased locale tag.
    pub locale: String,
}

/// Receives page bindings as they are generated.
pub trait PageSink {
    type Error;

    fn create_page(&mut self, page: PageRequest) -> Result<(), Self::Error>;
}

impl PageSink for Vec<PageRequest> {
    type Error = Infallible;

    fn create_page(&mut self, page: PageRequest) -> Result<(), Self::Error> {
        self.push(page);
        Ok(())
    }
}

/// Per-locale counts of what was generated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocaleSummary {
    pub locale: String,
    pub prefix: String,
    pub articles: usize,
    pub listing_pages: usize,
}

/// Output of the plan stage, written to `pages.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageManifest {
    pub pages: Vec<PageRequest>,
    pub locales: Vec<LocaleSummary>,
    pub config: SiteConfig,
}

/// Run the generator over a loaded content manifest and collect every page.
pub fn plan(content: &ContentManifest) -> PageManifest {
    let mut pages: Vec<PageRequest> = Vec::new();
    let locales = match generate_pages(&content.articles, &content.config, &mut pages) {
        Ok(summary) => summary,
        Err(never) => match never {},
    };
    PageManifest {
        pages,
        locales,
        config: content.config.clone(),
    }
}

/// Generate every listing and article page for every configured locale.
pub fn generate_pages<S: PageSink>(
    articles: &[Article],
    config: &SiteConfig,
    sink: &mut S,
) -> Result<Vec<LocaleSummary>, S::Error> {
    let locales = Locales::from_config(config);
    let mut summaries = Vec::with_capacity(locales.len());
    if !locales.has_root() {
        warn!(
            "no configured locale matches root locale {}; every locale gets a /<path>/ prefix",
            locales.root_locale()
        );
    }

    for locale in locales.iter() {
        let prefix = locales.prefix_for(locale);
        let tag = locale.locale.to_lowercase();
        // Other locales' prefixes live under the root one.
        let reserved: HashSet<String> = if locales.is_root(locale) {
            locales
                .iter()
                .filter(|l| !locales.is_root(l))
                .map(|l| l.path.clone())
                .collect()
        } else {
            HashSet::new()
        };
        let localized = route_articles(articles, &locale.locale, &reserved);

        if localized.is_empty() {
            warn!("locale {} has no articles; no pages generated", locale.locale);
        }

        let windows = paginate(&localized, config.page_length);
        let page_count = windows.len();
        for (i, group) in windows.into_iter().enumerate() {
            let index = i + 1;
            let path = build_paginated_path(index, &prefix, &locales);
            debug!("listing {path} ({} articles)", group.len());
            sink.create_page(PageRequest {
                path,
                template: Template::Listing,
                context: PageContext::Listing(ListingContext {
                    group: group.to_vec(),
                    index,
                    first: index == 1,
                    last: index == page_count,
                    page_count,
                    path_prefix: prefix.clone(),
                    previous_path: (index > 1)
                        .then(|| build_paginated_path(index - 1, &prefix, &locales)),
                    next_path: (index < page_count)
                        .then(|| build_paginated_path(index + 1, &prefix, &locales)),
                    additional_context: ListingExtras {
                        authors: Vec::new(),
                        base_path: config.base_path.clone(),
                        prefix: prefix.clone(),
                        skip: config.page_length,
                        limit: config.page_length,
                        locale: tag.clone(),
                    },
                }),
            })?;
        }

        for (i, article) in localized.iter().enumerate() {
            let next = select_next(&localized, i).into_iter().cloned().collect();
            let path = format!("{prefix}{}", article.slug);
            debug!("article {path}");
            sink.create_page(PageRequest {
                path,
                template: Template::Article,
                context: PageContext::Article(ArticleContext {
                    slug: article.slug.clone(),
                    id: article.id.clone(),
                    node_locale: article.node_locale.clone(),
                    article: article.clone(),
                    next,
                    base_path: config.base_path.clone(),
                    path_prefix: prefix.clone(),
                    locale: tag.clone(),
                }),
            })?;
        }

        info!(
            "{}: {} articles, {} listing pages under {}",
            locale.locale,
            localized.len(),
            page_count,
            prefix
        );
        summaries.push(LocaleSummary {
            locale: locale.locale.clone(),
            prefix,
            articles: localized.len(),
            listing_pages: page_count,
        });
    }

    Ok(summaries)
}

/// Split `items` into consecutive windows of `per_page`. Empty input gives
/// no windows.
pub fn paginate<T>(items: &[T], per_page: usize) -> Vec<&[T]> {
    items.chunks(per_page.max(1)).collect()
}

/// The articles of one locale, in input order, with slugs made routable.
///
/// Every slug becomes a single non-empty path segment: `/`-separated parts
/// are joined with `-`, and a slug with nothing left falls back to
/// `article-<suffix>`. A slug in `reserved` or already claimed is a
/// collision: the first article keeps the slug, later ones get a suffix of
/// six hex digits from the SHA-256 of their id, plus a counter in the
/// unlikely case that is taken too.
fn route_articles(articles: &[Article], locale: &str, reserved: &HashSet<String>) -> Vec<Article> {
    let mut seen: HashSet<String> = reserved.clone();
    articles
        .iter()
        .filter(|a| a.is_in_locale(locale))
        .map(|article| {
            let mut routed = article.clone();
            let segment = path_segment(&routed);
            if segment != routed.slug {
                warn!(
                    "article {} in {locale}: slug {:?} is not a single path segment, using {segment}",
                    routed.id, routed.slug
                );
                routed.slug = segment;
            }
            if !seen.insert(routed.slug.clone()) {
                let base = format!("{}-{}", routed.slug, id_suffix(&routed.id));
                let mut candidate = base.clone();
                let mut counter = 2;
                while seen.contains(&candidate) {
                    candidate = format!("{base}-{counter}");
                    counter += 1;
                }
                warn!(
                    "slug collision in {locale}: article {} moved from {} to {candidate}",
                    routed.id, routed.slug
                );
                seen.insert(candidate.clone());
                routed.slug = candidate;
            }
            routed
        })
        .collect()
}

/// Collapse a slug into one path segment. `.` and `..` parts are dropped.
fn path_segment(article: &Article) -> String {
    let segment = article
        .slug
        .split(['/', '\\'])
        .filter(|part| !matches!(*part, "" | "." | ".."))
        .collect::<Vec<_>>()
        .join("-");
    if segment.is_empty() {
        format!("article-{}", id_suffix(&article.id))
    } else {
        segment
    }
}

fn id_suffix(id: &str) -> String {
    let digest = Sha256::digest(id.as_bytes());
    digest
        .iter()
        .take(3)
        .map(|b| format!("{b:02x}"))
        .collect()
}
