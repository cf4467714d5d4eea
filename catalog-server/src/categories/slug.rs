//! Slug generation
//!
//! A slug is the lowercase `[a-z0-9-]+` form of a display name. Collisions
//! with existing slugs are resolved by appending `-1`, `-2`, ...

use std::collections::HashSet;

/// Base used when a name has no ASCII alphanumerics at all
pub const FALLBACK_SLUG: &str = "category";

/// Lower-case `name` and collapse every run of characters outside
/// `[a-z0-9]` into a single hyphen, without leading/trailing hyphens.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_hyphen = false;

    for ch in name.chars().flat_map(char::to_lowercase) {
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(ch);
        } else {
            pending_hyphen = true;
        }
    }

    slug
}

/// Derive a slug from `name` that is not in `existing`.
pub fn generate_slug(name: &str, existing: &HashSet<String>) -> String {
    let base = slugify(name);
    let base = if base.is_empty() {
        FALLBACK_SLUG.to_string()
    } else {
        base
    };
    unique_slug(base, existing)
}

/// Append the first free numeric suffix to `base` if it is taken.
pub fn unique_slug(base: String, existing: &HashSet<String>) -> String {
    if !existing.contains(&base) {
        return base;
    }

    // Terminates: `existing` is finite
    (1u64..)
        .map(|n| format!("{base}-{n}"))
        .find(|candidate| !existing.contains(candidate))
        .unwrap_or(base)
}

/// Whether `slug` matches `[a-z0-9-]+`
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-')
}
