//! URL path construction: paginated listing paths and title slugs.
//!
//! ## Paginated paths
//!
//! Page 1 of a listing is always served from its base path. Later pages
//! append `page/N`, and whether a separating slash is needed depends on the
//! base path being a locale root (which already ends in `/`):
//!
//! - `/` → `/`, `/page/2`, `/page/3`
//! - `/it/` → `/it/`, `/it/page/2`
//! - `/authors/jane` → `/authors/jane`, `/authors/jane/page/2`
//!
//! ## Slugs
//!
//! [`slugify`] folds a title to `[a-z0-9-]`: lowercase, strip diacritics
//! (NFD decomposition, combining marks dropped), collapse every other run of
//! characters into one dash. Identical titles produce identical slugs; the
//! page generator is responsible for disambiguating collisions.

use crate::routing::Locales;
use unicode_normalization::UnicodeNormalization;

/// Build the path of listing page `index` (1-based) under `base_path`.
///
/// Locale roots are recognised via [`Locales::root_prefixes`]. Any other
/// base path is treated as a plain directory and gets a `/` separator.
pub fn build_paginated_path(index: usize, base_path: &str, locales: &Locales) -> String {
    if index <= 1 {
        return base_path.to_string();
    }
    let is_root = locales.root_prefixes().iter().any(|root| root == base_path);
    if is_root {
        format!("{base_path}page/{index}")
    } else {
        format!("{base_path}/page/{index}")
    }
}

/// Combining diacritical marks block, the range NFD splits accents into.
fn is_diacritic(c: char) -> bool {
    ('\u{0300}'..='\u{036F}').contains(&c)
}

/// Fold `text` into a slug and join it onto `base`.
///
/// ```
/// use polyblog::paths::slugify;
/// assert_eq!(slugify("Café Münchën!", "/authors"), "/authors/cafe-munchen");
/// assert_eq!(slugify("Hello, World", "/"), "/hello-world");
/// ```
pub fn slugify(text: &str, base: &str) -> String {
    let folded: String = text
        .to_lowercase()
        .nfd()
        .filter(|c| !is_diacritic(*c))
        .collect();

    let mut slug = String::with_capacity(folded.len());
    let mut pending_dash = false;
    for c in folded.chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c);
        } else {
            pending_dash = true;
        }
    }

    collapse_slashes(&format!("{base}/{slug}"))
}

/// Replace every run of `/` with a single `/`.
fn collapse_slashes(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    let mut prev_slash = false;
    for c in path.chars() {
        if c == '/' {
            if !prev_slash {
                out.push(c);
            }
            prev_slash = true;
        } else {
            out.push(c);
            prev_slash = false;
        }
    }
    out
}
