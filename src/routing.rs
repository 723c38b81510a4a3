//! Locale routing: which path prefix each configured locale is served from.
//!
//! One locale (selected by `routing.root_locale`, default `en-US`) lives at
//! the site root `/`; every other locale lives under `/<path>/`:
//!
//! ```text
//! en-US  →  /            /my-post    /page/2
//! it-IT  →  /it/         /it/my-post /it/page/2
//! ```
//!
//! The root locale is matched by tag, not by the `default` flag. The flag only
//! decides which entry the language selector treats as "home".

use crate::config::{LocaleConfig, SiteConfig};

/// The configured locales plus the root-locale predicate.
#[derive(Debug, Clone)]
pub struct Locales {
    locales: Vec<LocaleConfig>,
    root_locale: String,
}

/// A language selector entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageLink {
    pub label: String,
    pub href: String,
    pub locale: String,
}

impl Locales {
    pub fn new(locales: Vec<LocaleConfig>, root_locale: impl Into<String>) -> Self {
        Self {
            locales,
            root_locale: root_locale.into(),
        }
    }

    pub fn from_config(config: &SiteConfig) -> Self {
        Self::new(config.locales.clone(), config.routing.root_locale.clone())
    }

    pub fn iter(&self) -> impl Iterator<Item = &LocaleConfig> {
        self.locales.iter()
    }

    pub fn len(&self) -> usize {
        self.locales.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locales.is_empty()
    }

    pub fn root_locale(&self) -> &str {
        &self.root_locale
    }

    /// Whether any configured locale is served from `/`.
    pub fn has_root(&self) -> bool {
        self.locales.iter().any(|l| self.is_root(l))
    }

    /// Whether `locale` is served from `/`.
    pub fn is_root(&self, locale: &LocaleConfig) -> bool {
        locale.locale.eq_ignore_ascii_case(&self.root_locale)
    }

    /// `/` for the root locale, `/<path>/` otherwise.
    pub fn prefix_for(&self, locale: &LocaleConfig) -> String {
        if self.is_root(locale) {
            "/".to_string()
        } else {
            format!("/{}/", locale.path)
        }
    }

    /// Find a configured locale by tag, case-insensitively.
    pub fn find(&self, tag: &str) -> Option<&LocaleConfig> {
        self.locales
            .iter()
            .find(|l| l.locale.eq_ignore_ascii_case(tag))
    }

    /// Every path that counts as a locale root for pagination.
    ///
    /// Includes `/` for the `default` entry and `/<path>/` for the others,
    /// plus each locale's routed prefix, so a root prefix is recognised
    /// whichever rule produced it.
    pub fn root_prefixes(&self) -> Vec<String> {
        let mut roots: Vec<String> = Vec::with_capacity(self.locales.len() * 2);
        let by_flag = self.locales.iter().map(|l| {
            if l.default {
                "/".to_string()
            } else {
                format!("/{}/", l.path)
            }
        });
        let routed = self.locales.iter().map(|l| self.prefix_for(l));
        for root in by_flag.chain(routed) {
            if !roots.contains(&root) {
                roots.push(root);
            }
        }
        roots
    }

    /// Language selector entries: the default locale links to `/`, the
    /// others to `/<path>`.
    pub fn language_links(&self) -> Vec<LanguageLink> {
        self.locales
            .iter()
            .map(|l| LanguageLink {
                label: l.label.clone(),
                href: if l.default {
                    "/".to_string()
                } else {
                    format!("/{}", l.path)
                },
                locale: l.locale.clone(),
            })
            .collect()
    }
}
