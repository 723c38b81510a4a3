//! # Polyblog
//!
//! A static site generator for localized, paginated blogs. Articles come from
//! a headless CMS as the exported result of a single articles query; every
//! configured locale gets its own paginated listing and one page per article.
//!
//! # Architecture: Three-Stage Pipeline
//!
//! Polyblog processes content through three independent stages, each producing
//! a JSON manifest that the next stage consumes:
//!
//! ```text
//! 1. Load    config.toml + content.json  →  articles.json  (CMS edges → articles)
//! 2. Plan    articles.json               →  pages.json     (articles → page bindings)
//! 3. Render  pages.json                  →  dist/          (final HTML site)
//! ```
//!
//! Each manifest is human-readable JSON you can inspect, and each stage is a
//! function from manifest to manifest, so unit tests exercise routing and
//! pagination without rendering anything.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`load`] | Stage 1: reads config and the content export, produces the content manifest |
//! | [`pages`] | Stage 2: turns articles into listing and article page bindings |
//! | [`render`] | Stage 3: renders page bindings to HTML using Maud |
//! | [`config`] | `config.toml` loading, validation and merging over stock defaults |
//! | [`content`] | Content source trait, CMS edge normalization, date sorting |
//! | [`routing`] | Which path prefix each locale is served from |
//! | [`paths`] | Paginated listing paths and slug generation |
//! | [`related`] | "Next articles" suggestions for article pages |
//! | [`types`] | The normalized [`types::Article`] shared between stages |
//! | [`output`] | CLI output formatting of pipeline results |
//! | [`logging`] | `env_logger` setup for the binary |
//!
//! # Design Decisions
//!
//! ## Root Locale
//!
//! One locale is served from `/`, the others from `/<path>/`. The root locale
//! is chosen by tag (`routing.root_locale`, `en-US` by default), not by the
//! `default` flag, which only marks the language selector's home entry. This
//! keeps existing English URLs stable when the default language changes.
//!
//! ## Ordering Lives in Load
//!
//! Articles are sorted newest-first once, when the content manifest is built.
//! Planning keeps whatever order it is given, so a pre-ordered export can opt
//! out with `content_sort.by_date = false`.
//!
//! ## Maud Over Template Engines
//!
//! HTML is generated with [Maud](https://maud.lambda.xyz/), a compile-time HTML
//! macro system. Every CMS string is escaped on interpolation; only the
//! markdown body, rendered by `pulldown-cmark`, is inserted as raw HTML.

pub mod config;
pub mod content;
pub mod load;
pub mod logging;
pub mod output;
pub mod pages;
pub mod paths;
pub mod related;
pub mod render;
pub mod routing;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
