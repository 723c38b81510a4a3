//! CLI output formatting for all pipeline stages.
//!
//! # Information-First Display
//!
//! Output is **information-centric, not file-centric**. The primary display
//! for every article is its positional index and title, with slugs, dates
//! and output paths shown as secondary context. This makes the output read
//! as a content inventory per locale.
//!
//! # Output Format
//!
//! ## Load
//!
//! ```text
//! Articles
//! en-US (2 articles)
//!     001 Hello world
//!         Slug: hello-world
//!         Date: 2021-05-01 · 3 min read
//!     002 Draft post (secret)
//!         Slug: draft-post
//!         Date: 2021-04-01 · 1 min read
//!
//! Config
//!     config.toml
//!     content.json
//!     static/
//! ```
//!
//! ## Plan
//!
//! ```text
//! en-US → /
//!     Page 1 of 1 → /
//!         001 Hello world
//!         002 Draft post
//!     001 Hello world → /hello-world
//!         Next: draft-post
//!
//! Planned 3 pages (1 listing, 2 article)
//! ```
//!
//! ## Render
//!
//! ```text
//! / → index.html
//! /hello-world → hello-world/index.html
//!
//! Rendered 3 pages (1 listing, 2 article), copied 1 static file
//! ```
//!
//! # Architecture
//!
//! Each stage has a `format_*` function (returns `Vec<String>`) for testability
//! and a `print_*` wrapper that writes to stdout. Format functions are pure:
//! no I/O, no side effects.

use crate::load::ContentManifest;
use crate::pages::{PageContext, PageManifest};
use crate::render::RenderSummary;
use crate::routing::Locales;
use crate::types::Article;

// ============================================================================
// Shared display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{} {}", n, word)
    } else {
        format!("{} {}s", n, word)
    }
}

/// Format an article line: positional index + title, flagged when secret.
///
/// ```text
/// 001 Hello world
/// 002 Draft post (secret)
/// ```
fn article_line(index: usize, article: &Article) -> String {
    let marker = if article.secret { " (secret)" } else { "" };
    format!("{} {}{}", format_index(index), article.title, marker)
}

/// Output file for a page path, relative to the output directory.
fn output_file(path: &str) -> String {
    let trimmed = path.trim_matches('/');
    if trimmed.is_empty() {
        "index.html".to_string()
    } else {
        format!("{}/index.html", trimmed)
    }
}

// ============================================================================
// Stage 1: Load output
// ============================================================================

/// Format load stage output: normalized articles grouped by locale.
///
/// `has_config` and `has_static` describe the site root; the caller checks
/// the filesystem so this stays pure.
pub fn format_load_output(
    manifest: &ContentManifest,
    has_config: bool,
    has_static: bool,
) -> Vec<String> {
    let mut lines = vec!["Articles".to_string()];
    let locales = Locales::from_config(&manifest.config);

    for locale in locales.iter() {
        let articles: Vec<&Article> = manifest
            .articles
            .iter()
            .filter(|a| a.is_in_locale(&locale.locale))
            .collect();
        lines.push(format!(
            "{} ({})",
            locale.locale,
            plural(articles.len(), "article")
        ));
        for (i, article) in articles.iter().enumerate() {
            lines.push(format!("{}{}", indent(1), article_line(i + 1, article)));
            lines.push(format!("{}Slug: {}", indent(2), article.slug));
            lines.push(format!(
                "{}Date: {} \u{b7} {} min read",
                indent(2),
                article.date_for_seo,
                article.time_to_read
            ));
        }
    }

    let unrouted: Vec<&Article> = manifest
        .articles
        .iter()
        .filter(|a| locales.find(&a.node_locale).is_none())
        .collect();
    if !unrouted.is_empty() {
        lines.push(format!(
            "Unrouted ({})",
            plural(unrouted.len(), "article")
        ));
        for article in unrouted {
            lines.push(format!(
                "{}{} [{}]",
                indent(1),
                article.title,
                article.node_locale
            ));
        }
    }

    lines.push(String::new());
    lines.push("Config".to_string());
    if has_config {
        lines.push(format!("{}config.toml", indent(1)));
    }
    lines.push(format!("{}{}", indent(1), manifest.config.content));
    if has_static {
        lines.push(format!("{}static/", indent(1)));
    }

    lines
}

/// Print load output to stdout.
pub fn print_load_output(manifest: &ContentManifest, has_config: bool, has_static: bool) {
    for line in format_load_output(manifest, has_config, has_static) {
        println!("{}", line);
    }
}

// ============================================================================
// Stage 2: Plan output
// ============================================================================

/// Format plan stage output: every page binding, grouped by locale.
pub fn format_plan_output(manifest: &PageManifest) -> Vec<String> {
    let mut lines = Vec::new();
    let mut listing_count = 0;
    let mut article_count = 0;

    for summary in &manifest.locales {
        lines.push(format!("{} \u{2192} {}", summary.locale, summary.prefix));
        let pages = manifest.pages.iter().filter(|p| match &p.context {
            PageContext::Listing(ctx) => {
                ctx.additional_context
                    .locale
                    .eq_ignore_ascii_case(&summary.locale)
            }
            PageContext::Article(ctx) => ctx.locale.eq_ignore_ascii_case(&summary.locale),
        });
        let mut article_index = 0;
        for page in pages {
            match &page.context {
                PageContext::Listing(ctx) => {
                    listing_count += 1;
                    lines.push(format!(
                        "{}Page {} of {} \u{2192} {}",
                        indent(1),
                        ctx.index,
                        ctx.page_count,
                        page.path
                    ));
                    let offset = ctx.index.saturating_sub(1) * ctx.additional_context.limit;
                    for (i, article) in ctx.group.iter().enumerate() {
                        lines.push(format!(
                            "{}{}",
                            indent(2),
                            article_line(offset + i + 1, article)
                        ));
                    }
                }
                PageContext::Article(ctx) => {
                    article_count += 1;
                    article_index += 1;
                    lines.push(format!(
                        "{}{} \u{2192} {}",
                        indent(1),
                        article_line(article_index, &ctx.article),
                        page.path
                    ));
                    if !ctx.next.is_empty() {
                        let next: Vec<&str> = ctx.next.iter().map(|a| a.slug.as_str()).collect();
                        lines.push(format!("{}Next: {}", indent(2), next.join(", ")));
                    }
                }
            }
        }
    }

    if !lines.is_empty() {
        lines.push(String::new());
    }
    lines.push(format!(
        "Planned {} ({} listing, {} article)",
        plural(listing_count + article_count, "page"),
        listing_count,
        article_count
    ));
    lines
}

/// Print plan output to stdout.
pub fn print_plan_output(manifest: &PageManifest) {
    for line in format_plan_output(manifest) {
        println!("{}", line);
    }
}

// ============================================================================
// Stage 3: Render output
// ============================================================================

/// Format render stage output: page path to output file, then totals.
pub fn format_render_output(manifest: &PageManifest, summary: &RenderSummary) -> Vec<String> {
    let mut lines: Vec<String> = manifest
        .pages
        .iter()
        .map(|p| format!("{} \u{2192} {}", p.path, output_file(&p.path)))
        .collect();

    if !lines.is_empty() {
        lines.push(String::new());
    }
    lines.push(format!(
        "Rendered {} ({} listing, {} article), copied {}",
        plural(summary.pages(), "page"),
        summary.listing_pages,
        summary.article_pages,
        plural(summary.static_files, "static file")
    ));
    lines
}

/// Print render output to stdout.
pub fn print_render_output(manifest: &PageManifest, summary: &RenderSummary) {
    for line in format_render_output(manifest, summary) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================
