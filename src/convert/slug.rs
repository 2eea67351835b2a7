//! Anchor slug generation
//!
//! Heading anchors must be unique across the whole assembled document, so a
//! single [`Slugger`] is shared by every page conversion in a run.

use std::collections::HashMap;

/// Derives a URL-safe slug from heading text
///
/// Lowercases, converts whitespace runs to hyphens, and strips every
/// character outside `[a-z0-9-]`. Text that strips to nothing slugs to
/// `"section"`.
///
/// # Example
///
/// ```
/// use docstitch::convert::slugify;
///
/// assert_eq!(slugify("Border Styles"), "border-styles");
/// assert_eq!(slugify("What's New?"), "whats-new");
/// ```
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());

    for word in text.to_lowercase().split_whitespace() {
        if !slug.is_empty() {
            slug.push('-');
        }
        slug.extend(word.chars().filter(|c| c.is_ascii_alphanumeric() || *c == '-'));
    }

    // Collapse hyphen runs left by stripped punctuation between hyphens
    let mut cleaned = String::with_capacity(slug.len());
    for c in slug.chars() {
        if c == '-' && cleaned.ends_with('-') {
            continue;
        }
        cleaned.push(c);
    }
    let cleaned = cleaned.trim_matches('-').to_string();

    if cleaned.is_empty() {
        "section".to_string()
    } else {
        cleaned
    }
}

/// Assigns document-unique anchors to heading slugs
///
/// The first occurrence of a slug keeps it unchanged; later occurrences get
/// `-2`, `-3`, ... suffixes in first-seen order. [`Slugger::reserve`] lets
/// the driver claim page-level anchors up front so body headings dedupe
/// against them.
#[derive(Debug, Default)]
pub struct Slugger {
    seen: HashMap<String, u32>,
}

impl Slugger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a unique anchor for the given heading text
    pub fn anchor(&mut self, text: &str) -> String {
        let slug = slugify(text);
        self.claim(slug)
    }

    /// Reserves an already-computed slug, returning the unique anchor
    pub fn reserve(&mut self, slug: &str) -> String {
        self.claim(slug.to_string())
    }

    fn claim(&mut self, slug: String) -> String {
        let count = self.seen.entry(slug.clone()).or_insert(0);
        *count += 1;

        if *count == 1 {
            slug
        } else {
            let suffixed = format!("{}-{}", slug, count);
            // The suffixed form could itself collide with a literal heading
            // like "Color 2"; claim it recursively so it stays unique.
            self.claim(suffixed)
        }
    }
}
