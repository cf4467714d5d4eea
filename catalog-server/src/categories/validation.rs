//! Input validation for category payloads
//!
//! Validation runs in the service before any storage call and reports every
//! violated constraint at once, per field.

use super::slug::is_valid_slug;
use serde::{Deserialize, Serialize};
use shared::models::{CategoryCreate, CategoryUpdate};

// ── Text length limits (characters) ─────────────────────────────────

pub const MAX_NAME_LEN: usize = 200;
pub const MAX_SLUG_LEN: usize = 200;
pub const MAX_DESCRIPTION_LEN: usize = 1000;
/// URLs / image paths
pub const MAX_URL_LEN: usize = 2048;
pub const MAX_SEO_TITLE_LEN: usize = 60;
pub const MAX_SEO_DESCRIPTION_LEN: usize = 160;
pub const MAX_SEO_KEYWORD_LEN: usize = 100;

/// A single violated constraint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

#[derive(Default)]
struct Collector {
    errors: Vec<FieldError>,
}

impl Collector {
    fn push(&mut self, field: &str, message: String) {
        self.errors.push(FieldError::new(field, message));
    }

    /// Measured after trimming, which is what gets stored
    fn required_text(&mut self, value: &str, field: &str, max_len: usize) {
        let value = value.trim();
        if value.is_empty() {
            self.push(field, format!("{field} must not be empty"));
        } else {
            self.max_len(value, field, max_len);
        }
    }

    fn optional_text(&mut self, value: Option<&str>, field: &str, max_len: usize) {
        if let Some(v) = value {
            self.max_len(v, field, max_len);
        }
    }

    fn max_len(&mut self, value: &str, field: &str, max_len: usize) {
        let len = value.chars().count();
        if len > max_len {
            self.push(
                field,
                format!("{field} is too long ({len} chars, max {max_len})"),
            );
        }
    }

    /// Blank slugs are allowed: they mean "derive from name"
    fn slug(&mut self, value: Option<&str>) {
        if let Some(slug) = value.map(str::trim)
            && !slug.is_empty()
        {
            if !is_valid_slug(slug) {
                self.push(
                    "slug",
                    "slug may only contain lowercase letters, digits and hyphens".to_string(),
                );
            }
            self.max_len(slug, "slug", MAX_SLUG_LEN);
        }
    }

    fn sort_order(&mut self, value: Option<i32>) {
        if let Some(v) = value
            && v < 0
        {
            self.push("sort_order", format!("sort_order must be >= 0 (got {v})"));
        }
    }

    fn seo_keywords(&mut self, keywords: &[String]) {
        for keyword in keywords {
            if keyword.trim().is_empty() {
                self.push("seo_keywords", "seo_keywords must not contain blanks".to_string());
            } else {
                self.max_len(keyword, "seo_keywords", MAX_SEO_KEYWORD_LEN);
            }
        }
    }

    fn finish(self) -> Vec<FieldError> {
        self.errors
    }
}

/// Validate a create payload. Empty result means valid.
pub fn validate_create(data: &CategoryCreate) -> Vec<FieldError> {
    let mut c = Collector::default();
    c.required_text(&data.name, "name", MAX_NAME_LEN);
    c.slug(data.slug.as_deref());
    c.optional_text(data.description.as_deref(), "description", MAX_DESCRIPTION_LEN);
    c.optional_text(data.image.as_deref(), "image", MAX_URL_LEN);
    c.sort_order(data.sort_order);
    c.optional_text(data.seo_title.as_deref(), "seo_title", MAX_SEO_TITLE_LEN);
    c.optional_text(
        data.seo_description.as_deref(),
        "seo_description",
        MAX_SEO_DESCRIPTION_LEN,
    );
    c.seo_keywords(&data.seo_keywords);
    c.finish()
}

/// Validate an update payload. Only fields present in the payload are checked.
pub fn validate_update(data: &CategoryUpdate) -> Vec<FieldError> {
    let mut c = Collector::default();
    if let Some(name) = &data.name {
        c.required_text(name, "name", MAX_NAME_LEN);
    }
    c.slug(data.slug.as_deref());
    c.optional_text(flat(&data.description), "description", MAX_DESCRIPTION_LEN);
    c.optional_text(flat(&data.image), "image", MAX_URL_LEN);
    c.sort_order(data.sort_order);
    c.optional_text(flat(&data.seo_title), "seo_title", MAX_SEO_TITLE_LEN);
    c.optional_text(
        flat(&data.seo_description),
        "seo_description",
        MAX_SEO_DESCRIPTION_LEN,
    );
    if let Some(keywords) = &data.seo_keywords {
        c.seo_keywords(keywords);
    }
    c.finish()
}

fn flat(value: &Option<Option<String>>) -> Option<&str> {
    value.as_ref().and_then(|v| v.as_deref())
}
