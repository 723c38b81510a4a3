//! Shared test utilities for the polyblog test suite.
//!
//! Provides article builders, a fixture-site loader, and extractors that
//! split a generated page list into listing and article pages.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let mut pages = Vec::new();
//! generate_pages(&articles_for("en-US", 5), &SiteConfig::default(), &mut pages).unwrap();
//!
//! let listings = listing_pages(&pages);
//! assert_eq!(listings[0].0, "/");
//! ```

use std::path::Path;
use tempfile::TempDir;

use crate::content::{RawArticle, RawBody, RawEdge};
use crate::pages::{ArticleContext, ListingContext, PageContext, PageRequest};
use crate::types::Article;

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/site/` to a temp directory and return it.
///
/// Tests get an isolated copy they can mutate without affecting other tests
/// or the source fixtures.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/site");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            std::fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

// =========================================================================
// Builders
// =========================================================================

/// A raw CMS edge with every required field set.
pub fn raw_edge(id: &str, slug: &str, locale: &str, date: &str) -> RawEdge {
    RawEdge {
        node: RawArticle {
            id: Some(id.to_string()),
            slug: Some(slug.to_string()),
            node_locale: Some(locale.to_string()),
            title: Some(format!("Title {id}")),
            date_for_seo: Some(date.to_string()),
            body: Some(RawBody::Markdown(String::new())),
            ..RawArticle::default()
        },
    }
}

/// A normalized article.
pub fn article(id: &str, slug: &str, locale: &str) -> Article {
    Article {
        id: id.to_string(),
        slug: slug.to_string(),
        node_locale: locale.to_string(),
        title: format!("Title {id}"),
        author: "Jane Doe".to_string(),
        excerpt: format!("Excerpt of {id}"),
        body: format!("# Title {id}\n\nBody of **{id}**."),
        date: "January 1, 2021".to_string(),
        date_for_seo: "2021-01-01".to_string(),
        secret: false,
        time_to_read: 1,
        canonical_url: None,
    }
}

/// `n` articles of one locale with distinct ids and slugs, in list order.
pub fn articles_for(locale: &str, n: usize) -> Vec<Article> {
    let tag = locale.to_lowercase();
    (0..n)
        .map(|i| article(&format!("{tag}-{i}"), &format!("{tag}-post-{i}"), locale))
        .collect()
}

// =========================================================================
// Page extractors
// =========================================================================

/// All listing pages as `(path, context)`, in generation order.
pub fn listing_pages(pages: &[PageRequest]) -> Vec<(&str, &ListingContext)> {
    pages
        .iter()
        .filter_map(|p| match &p.context {
            PageContext::Listing(ctx) => Some((p.path.as_str(), ctx)),
            PageContext::Article(_) => None,
        })
        .collect()
}

/// All article pages as `(path, context)`, in generation order.
pub fn article_pages(pages: &[PageRequest]) -> Vec<(&str, &ArticleContext)> {
    pages
        .iter()
        .filter_map(|p| match &p.context {
            PageContext::Article(ctx) => Some((p.path.as_str(), ctx)),
            PageContext::Listing(_) => None,
        })
        .collect()
}
