// ── Site naming ──
//
// A site is identified by a slug that doubles as the folder name and the
// subdomain of the local URL. Title and database name are derived from
// the slug and offered as editable defaults.

use std::fmt;

use crate::error::CoreError;

/// Message shown when the folder name is left empty.
pub const REQUIRED_MESSAGE: &str = "Value is required!";

// ── SiteSlug ────────────────────────────────────────────────────────

/// Lowercase, hyphen-separated site identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SiteSlug(String);

impl SiteSlug {
    /// Normalize free-form input into a slug.
    ///
    /// Surrounding whitespace is trimmed, the rest is lowercased and every
    /// space or underscore becomes a hyphen. Empty input is rejected.
    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(CoreError::validation(REQUIRED_MESSAGE));
        }
        let slug = trimmed
            .to_lowercase()
            .chars()
            .map(|c| if c == ' ' || c == '_' { '-' } else { c })
            .collect();
        Ok(Self(slug))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SiteSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for SiteSlug {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// ── Derived defaults ────────────────────────────────────────────────

/// Title-case a slug: `my-blog` → `My Blog`.
///
/// Only the first character of each word is upper-cased; the remainder
/// is kept as typed (`my-blogSite` → `My BlogSite`).
pub fn default_title(slug: &str) -> String {
    slug.split(['-', '_'])
        .filter(|word| !word.is_empty())
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Database name suggested for a slug: `my-blog` → `my_blog`.
pub fn default_database_name(slug: &str) -> String {
    slug.replace('-', "_")
}

// ── SiteRequest ─────────────────────────────────────────────────────

/// The three values collected before provisioning starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteRequest {
    pub slug: SiteSlug,
    pub title: String,
    pub database: String,
}

impl SiteRequest {
    pub fn new(slug: SiteSlug, title: impl Into<String>, database: impl Into<String>) -> Self {
        Self {
            slug,
            title: title.into(),
            database: database.into(),
        }
    }

    /// Build a request using the derived title and database name.
    pub fn with_defaults(slug: SiteSlug) -> Self {
        let title = default_title(slug.as_str());
        let database = default_database_name(slug.as_str());
        Self {
            slug,
            title,
            database,
        }
    }

    /// Local HTTPS URL the site is installed under.
    pub fn site_url(&self, tld: &str) -> String {
        format!("https://{}.{tld}", self.slug)
    }
}
