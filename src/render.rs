//! HTML rendering.
//!
//! Stage 3 of the build pipeline. Takes the page manifest written by the
//! plan stage and renders every page binding to a static HTML file.
//!
//! ## Output Structure
//!
//! Each page path becomes a directory holding an `index.html`, so the site
//! serves clean URLs from any static host:
//!
//! ```text
//! dist/
//! ├── index.html              # /
//! ├── page/2/index.html       # /page/2
//! ├── hello-world/index.html  # /hello-world
//! ├── it/
//! │   ├── index.html          # /it/
//! │   └── ciao-mondo/index.html
//! └── robots.txt              # copied from site/static/
//! ```
//!
//! ## HTML Generation
//!
//! Uses [maud](https://maud.lambda.xyz/) for compile-time HTML templating, so
//! every CMS-provided string is escaped unless explicitly marked as
//! pre-rendered markdown. Pages render in parallel on the global rayon pool.

use crate::config::SiteMetadata;
use crate::pages::{ArticleContext, ListingContext, PageContext, PageManifest, PageRequest};
use crate::routing::{LanguageLink, Locales};
use crate::types::Article;
use log::{debug, info};
use maud::{DOCTYPE, Markup, PreEscaped, html};
use pulldown_cmark::{Options, Parser, html as md_html};
use rayon::prelude::*;
use std::fs;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to walk static directory: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Page path escapes the output directory: {0}")]
    UnsafePath(String),
}

/// What the render stage wrote.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderSummary {
    pub listing_pages: usize,
    pub article_pages: usize,
    pub static_files: usize,
}

impl RenderSummary {
    pub fn pages(&self) -> usize {
        self.listing_pages + self.article_pages
    }
}

const CSS: &str = include_str!("../static/style.css");

/// Shared page chrome: site metadata and the language selector.
struct Chrome<'a> {
    site: &'a SiteMetadata,
    languages: Vec<LanguageLink>,
}

/// Render every page in the manifest into `output_dir` and copy the site's
/// `static/` directory next to them.
pub fn render(
    manifest: &PageManifest,
    site_root: &Path,
    output_dir: &Path,
) -> Result<RenderSummary, RenderError> {
    fs::create_dir_all(output_dir)?;

    let static_files = copy_static(&site_root.join("static"), output_dir)?;

    let chrome = Chrome {
        site: &manifest.config.site,
        languages: Locales::from_config(&manifest.config).language_links(),
    };

    manifest
        .pages
        .par_iter()
        .try_for_each(|page| write_page(page, &chrome, output_dir))?;

    let listing_pages = manifest
        .pages
        .iter()
        .filter(|p| matches!(p.context, PageContext::Listing(_)))
        .count();
    let summary = RenderSummary {
        listing_pages,
        article_pages: manifest.pages.len() - listing_pages,
        static_files,
    };
    info!(
        "rendered {} pages into {}",
        summary.pages(),
        output_dir.display()
    );
    Ok(summary)
}

fn write_page(page: &PageRequest, chrome: &Chrome, output_dir: &Path) -> Result<(), RenderError> {
    let markup = match &page.context {
        PageContext::Listing(ctx) => render_listing_page(&page.path, ctx, chrome),
        PageContext::Article(ctx) => render_article_page(&page.path, ctx, chrome),
    };
    let target = page_output_path(output_dir, &page.path)?;
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&target, markup.into_string())?;
    debug!("wrote {}", target.display());
    Ok(())
}

/// Map a page path to its `index.html` under `output_dir`.
///
/// Rejects paths containing `.` or `..` segments.
pub fn page_output_path(output_dir: &Path, page_path: &str) -> Result<PathBuf, RenderError> {
    let mut target = output_dir.to_path_buf();
    for segment in page_path.split('/').filter(|s| !s.is_empty()) {
        match Path::new(segment).components().next() {
            Some(Component::Normal(_)) if !segment.contains('\\') => target.push(segment),
            _ => return Err(RenderError::UnsafePath(page_path.to_string())),
        }
    }
    target.push("index.html");
    Ok(target)
}

/// Copy `static_dir` into `output_dir`, preserving structure.
///
/// A missing directory copies nothing.
fn copy_static(static_dir: &Path, output_dir: &Path) -> Result<usize, RenderError> {
    if !static_dir.is_dir() {
        return Ok(0);
    }
    let mut copied = 0;
    for entry in WalkDir::new(static_dir).min_depth(1) {
        let entry = entry?;
        let relative = entry
            .path()
            .strip_prefix(static_dir)
            .map_err(|_| RenderError::UnsafePath(entry.path().display().to_string()))?;
        let target = output_dir.join(relative);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else {
            fs::copy(entry.path(), &target)?;
            copied += 1;
        }
    }
    Ok(copied)
}

/// Convert an article body to HTML.
pub fn markdown_to_html(body: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_FOOTNOTES);
    let parser = Parser::new_ext(body, options);
    let mut out = String::new();
    md_html::push_html(&mut out, parser);
    out
}

/// `site.url` joined with a page path.
fn absolute_url(site: &SiteMetadata, path: &str) -> String {
    format!("{}{}", site.url.trim_end_matches('/'), path)
}

// ============================================================================
// HTML Components
// ============================================================================

/// Head metadata for a page.
struct Seo<'a> {
    title: &'a str,
    description: &'a str,
    canonical: String,
    og_type: &'static str,
    noindex: bool,
}

/// Renders the base HTML document structure
fn base_document(lang: &str, seo: &Seo, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang=(lang) {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (seo.title) }
                meta name="description" content=(seo.description);
                link rel="canonical" href=(seo.canonical);
                meta property="og:title" content=(seo.title);
                meta property="og:description" content=(seo.description);
                meta property="og:type" content=(seo.og_type);
                meta property="og:url" content=(seo.canonical);
                @if seo.noindex {
                    meta name="robots" content="noindex";
                }
                style { (PreEscaped(CSS)) }
            }
            body {
                (content)
            }
        }
    }
}

/// Renders the site header: title linking to the locale home, plus the
/// language selector.
fn site_header(chrome: &Chrome, home: &str, locale: &str) -> Markup {
    html! {
        header.site-header {
            a.site-title href=(home) { (chrome.site.title) }
            (render_language_selector(&chrome.languages, locale))
        }
    }
}

/// Renders the language selector, marking the entry for `current_locale`.
fn render_language_selector(links: &[LanguageLink], current_locale: &str) -> Markup {
    html! {
        nav.lang-selector aria-label="Language" {
            ul {
                @for link in links {
                    @let is_current = link.locale.eq_ignore_ascii_case(current_locale);
                    li class=[is_current.then_some("current")] {
                        a href=(link.href) hreflang=(link.locale.to_lowercase()) { (link.label) }
                    }
                }
            }
        }
    }
}

/// Renders an article summary card linking to `href`.
fn article_card(article: &Article, href: &str) -> Markup {
    html! {
        a.article-card href=(href) {
            h2 { (article.title) }
            p.article-meta {
                time datetime=(article.date_for_seo) { (article.date) }
                " · " (article.time_to_read) " min read"
            }
            @if !article.excerpt.is_empty() {
                p.article-excerpt { (article.excerpt) }
            }
        }
    }
}

fn render_paginator(ctx: &ListingContext) -> Markup {
    html! {
        nav.paginator aria-label="Pagination" {
            @if let Some(previous) = &ctx.previous_path {
                a rel="prev" href=(previous) { "← Newer" }
            } @else {
                span {}
            }
            span.page-count { (ctx.index) " / " (ctx.page_count) }
            @if let Some(next) = &ctx.next_path {
                a rel="next" href=(next) { "Older →" }
            } @else {
                span {}
            }
        }
    }
}

// ============================================================================
// Page Renderers
// ============================================================================

/// Renders a listing page: one card per article in the window, plus a
/// paginator when the locale has more than one page.
fn render_listing_page(path: &str, ctx: &ListingContext, chrome: &Chrome) -> Markup {
    let title = if ctx.first {
        chrome.site.title.clone()
    } else {
        format!("{} - Page {}", chrome.site.title, ctx.index)
    };
    let seo = Seo {
        title: &title,
        description: &chrome.site.description,
        canonical: absolute_url(chrome.site, path),
        og_type: "website",
        noindex: false,
    };
    let locale = &ctx.additional_context.locale;

    let content = html! {
        (site_header(chrome, &ctx.path_prefix, locale))
        main.listing-page {
            div.article-list {
                @for article in &ctx.group {
                    (article_card(article, &format!("{}{}", ctx.path_prefix, article.slug)))
                }
            }
            @if ctx.page_count > 1 {
                (render_paginator(ctx))
            }
        }
    };

    base_document(locale, &seo, content)
}

/// Renders an article page with its body and "next" suggestions.
fn render_article_page(path: &str, ctx: &ArticleContext, chrome: &Chrome) -> Markup {
    let article = &ctx.article;
    let title = format!("{} - {}", article.title, chrome.site.title);
    let description = if article.excerpt.is_empty() {
        chrome.site.description.as_str()
    } else {
        article.excerpt.as_str()
    };
    let seo = Seo {
        title: &title,
        description,
        canonical: article
            .canonical_url
            .clone()
            .unwrap_or_else(|| absolute_url(chrome.site, path)),
        og_type: "article",
        noindex: article.secret,
    };

    let content = html! {
        (site_header(chrome, &ctx.path_prefix, &ctx.locale))
        main.article-page {
            article {
                header.article-header {
                    h1 { (article.title) }
                    p.article-meta {
                        @if !article.author.is_empty() {
                            span.author { (article.author) }
                            " · "
                        }
                        time datetime=(article.date_for_seo) { (article.date) }
                        " · " (article.time_to_read) " min read"
                    }
                }
                div.article-body {
                    (PreEscaped(markdown_to_html(&article.body)))
                }
            }
            @if !ctx.next.is_empty() {
                section.next-articles {
                    div.article-list {
                        @for next in &ctx.next {
                            (article_card(next, &format!("{}{}", ctx.path_prefix, next.slug)))
                        }
                    }
                }
            }
        }
    };

    base_document(&ctx.locale, &seo, content)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use crate::load::ContentManifest;
    use crate::pages::plan;
    use crate::test_helpers::{article, article_pages, articles_for, listing_pages};
    use tempfile::TempDir;

    fn chrome(site: &SiteMetadata) -> Chrome<'_> {
        Chrome {
            site,
            languages: Locales::from_config(&SiteConfig::default()).language_links(),
        }
    }

    fn manifest_for(articles: Vec<Article>, page_length: usize) -> PageManifest {
        let config = SiteConfig {
            page_length,
            ..SiteConfig::default()
        };
        plan(&ContentManifest { articles, config })
    }

    // =========================================================================
    // Output paths
    // =========================================================================

    #[test]
    fn root_path_maps_to_top_level_index() {
        let out = Path::new("/out");
        assert_eq!(
            page_output_path(out, "/").unwrap(),
            PathBuf::from("/out/index.html")
        );
    }

    #[test]
    fn nested_paths_map_to_directories() {
        let out = Path::new("/out");
        assert_eq!(
            page_output_path(out, "/it/page/2").unwrap(),
            PathBuf::from("/out/it/page/2/index.html")
        );
        assert_eq!(
            page_output_path(out, "/it/").unwrap(),
            PathBuf::from("/out/it/index.html")
        );
    }

    #[test]
    fn parent_segments_rejected() {
        let out = Path::new("/out");
        assert!(matches!(
            page_output_path(out, "/../etc/passwd"),
            Err(RenderError::UnsafePath(_))
        ));
        assert!(matches!(
            page_output_path(out, "/it/./x"),
            Err(RenderError::UnsafePath(_))
        ));
    }

    // =========================================================================
    // Components
    // =========================================================================

    #[test]
    fn base_document_includes_doctype_and_lang() {
        let seo = Seo {
            title: "Test",
            description: "",
            canonical: "https://x.dev/".to_string(),
            og_type: "website",
            noindex: false,
        };
        let doc = base_document("it-it", &seo, html! { p { "test" } }).into_string();
        assert!(doc.starts_with("<!DOCTYPE html>"));
        assert!(doc.contains(r#"<html lang="it-it">"#));
        assert!(doc.contains(r#"<link rel="canonical" href="https://x.dev/">"#));
        assert!(!doc.contains("noindex"));
    }

    #[test]
    fn language_selector_marks_current() {
        let links = Locales::from_config(&SiteConfig::default()).language_links();
        let html = render_language_selector(&links, "it-it").into_string();
        assert!(html.contains(r#"<li class="current"><a href="/it""#));
        assert!(html.contains(r#"<a href="/" hreflang="en-us">"#));
    }

    #[test]
    fn markdown_body_converted() {
        let html = markdown_to_html("# Hi\n\nSome **bold** text.");
        assert!(html.contains("<h1>Hi</h1>"));
        assert!(html.contains("<strong>bold</strong>"));
    }

    // =========================================================================
    // Page renderers
    // =========================================================================

    #[test]
    fn listing_links_articles_under_prefix() {
        let manifest = manifest_for(articles_for("it-IT", 3), 4);
        let site = SiteMetadata::default();
        let listings = listing_pages(&manifest.pages);
        let (path, ctx) = listings[0];

        let html = render_listing_page(path, ctx, &chrome(&site)).into_string();
        assert!(html.contains(r#"href="/it/it-it-post-0""#));
        assert!(html.contains(r#"href="/it/it-it-post-2""#));
        assert!(html.contains(r#"<html lang="it-it">"#));
    }

    #[test]
    fn paginator_only_with_multiple_pages() {
        let site = SiteMetadata::default();

        let single = manifest_for(articles_for("en-US", 2), 4);
        let (path, ctx) = listing_pages(&single.pages)[0];
        let html = render_listing_page(path, ctx, &chrome(&site)).into_string();
        assert!(!html.contains(r#"class="paginator""#));

        let multi = manifest_for(articles_for("en-US", 5), 2);
        let listings = listing_pages(&multi.pages);
        let (path, ctx) = listings[1];
        let html = render_listing_page(path, ctx, &chrome(&site)).into_string();
        assert!(html.contains(r#"class="paginator""#));
        assert!(html.contains(r#"rel="prev" href="/""#));
        assert!(html.contains(r#"rel="next" href="/page/3""#));
        assert!(html.contains("2 / 3"));
    }

    #[test]
    fn article_page_renders_body_and_next() {
        let manifest = manifest_for(articles_for("en-US", 3), 4);
        let site = SiteMetadata::default();
        let articles = article_pages(&manifest.pages);
        let (path, ctx) = articles[0];

        let html = render_article_page(path, ctx, &chrome(&site)).into_string();
        assert!(html.contains("<strong>en-us-0</strong>"));
        assert!(html.contains(r#"href="/en-us-post-1""#));
        assert!(html.contains(r#"href="/en-us-post-2""#));
        assert!(html.contains(r#"<link rel="canonical" href="https://www.yourdomain.tld/en-us-post-0">"#));
    }

    #[test]
    fn secret_article_is_noindex() {
        let mut secret = article("s", "hidden", "en-US");
        secret.secret = true;
        let manifest = manifest_for(vec![secret], 4);
        let site = SiteMetadata::default();
        let (path, ctx) = article_pages(&manifest.pages)[0];

        let html = render_article_page(path, ctx, &chrome(&site)).into_string();
        assert!(html.contains(r#"<meta name="robots" content="noindex">"#));
    }

    #[test]
    fn canonical_url_override_wins() {
        let mut a = article("c", "moved", "en-US");
        a.canonical_url = Some("https://elsewhere.dev/moved".to_string());
        let manifest = manifest_for(vec![a], 4);
        let site = SiteMetadata::default();
        let (path, ctx) = article_pages(&manifest.pages)[0];

        let html = render_article_page(path, ctx, &chrome(&site)).into_string();
        assert!(html.contains(r#"href="https://elsewhere.dev/moved""#));
    }

    #[test]
    fn cms_strings_are_escaped() {
        let mut a = article("x", "xss", "en-US");
        a.title = "<script>alert(1)</script>".to_string();
        let manifest = manifest_for(vec![a], 4);
        let site = SiteMetadata::default();
        let (path, ctx) = listing_pages(&manifest.pages)[0];

        let html = render_listing_page(path, ctx, &chrome(&site)).into_string();
        assert!(!html.contains("<script>alert(1)</script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    // =========================================================================
    // Full render
    // =========================================================================

    #[test]
    fn render_writes_every_page() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("dist");
        let manifest = manifest_for(articles_for("en-US", 3), 2);

        let summary = render(&manifest, tmp.path(), &out).unwrap();
        assert_eq!(summary.listing_pages, 2);
        assert_eq!(summary.article_pages, 3);
        assert_eq!(summary.static_files, 0);

        assert!(out.join("index.html").exists());
        assert!(out.join("page/2/index.html").exists());
        assert!(out.join("en-us-post-0/index.html").exists());
        assert!(out.join("en-us-post-2/index.html").exists());
    }

    #[test]
    fn render_copies_static_files() {
        let tmp = TempDir::new().unwrap();
        let static_dir = tmp.path().join("static/img");
        fs::create_dir_all(&static_dir).unwrap();
        fs::write(tmp.path().join("static/robots.txt"), "User-agent: *\n").unwrap();
        fs::write(static_dir.join("logo.svg"), "<svg/>").unwrap();

        let out = tmp.path().join("dist");
        let summary = render(&manifest_for(vec![], 4), tmp.path(), &out).unwrap();

        assert_eq!(summary.static_files, 2);
        assert!(out.join("robots.txt").exists());
        assert!(out.join("img/logo.svg").exists());
    }
}
