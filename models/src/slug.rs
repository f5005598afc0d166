// models/src/slug.rs

use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::{ValidationError, ValidationResult};

static NON_ALNUM_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-z0-9]+").expect("static slug pattern"));

/// Apostrophes vanish instead of becoming hyphens so possessives stay one
/// word ("Mary's" -> "marys", not "mary-s").
static APOSTROPHES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"['\u{2019}]").expect("static slug pattern"));

/// Derives a URL-safe slug from a display name: lowercase, apostrophes
/// dropped, runs of remaining non-alphanumeric characters collapsed to a
/// single hyphen, edge hyphens trimmed. Uniqueness is the caller's concern;
/// an empty result is not.
pub fn derive_slug(name: &str) -> ValidationResult<String> {
    let lowered = name.to_lowercase();
    let lowered = APOSTROPHES.replace_all(&lowered, "");
    let slug = NON_ALNUM_RUN
        .replace_all(&lowered, "-")
        .trim_matches('-')
        .to_string();
    if slug.is_empty() {
        return Err(ValidationError::UnusableSlug(name.to_string()));
    }
    Ok(slug)
}
