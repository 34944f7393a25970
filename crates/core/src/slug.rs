//! URL slug generation and validation.
//!
//! Slugs identify categories, tags, posts and pages in public URLs and are
//! unique per table.

use crate::error::CoreError;

/// Maximum slug length accepted for posts and pages.
pub const MAX_SLUG_LEN: usize = 200;

/// Generate a URL-safe slug from a title or name.
///
/// Lowercases the input, keeps ASCII alphanumerics, underscores and hyphens,
/// turns whitespace into hyphens, drops everything else, collapses runs of
/// hyphens and trims leading/trailing hyphens and underscores.
pub fn slugify(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut prev_hyphen = false;

    for c in text.to_lowercase().chars() {
        if c.is_ascii_alphanumeric() || c == '_' {
            result.push(c);
            prev_hyphen = false;
        } else if c == '-' || c.is_whitespace() {
            if !prev_hyphen {
                result.push('-');
            }
            prev_hyphen = true;
        }
    }

    result.trim_matches(|c| c == '-' || c == '_').to_string()
}

/// Return `slug` when it is non-blank, otherwise a slug derived from `source`.
pub fn slug_or_derive(slug: Option<&str>, source: &str) -> String {
    match slug.map(str::trim) {
        Some(s) if !s.is_empty() => s.to_string(),
        _ => slugify(source),
    }
}

/// Validate a slug: non-empty, bounded, only `[a-z0-9_-]`.
pub fn validate_slug(slug: &str) -> Result<(), CoreError> {
    if slug.is_empty() {
        return Err(CoreError::Validation("Slug must not be empty".into()));
    }
    if slug.len() > MAX_SLUG_LEN {
        return Err(CoreError::Validation(format!(
            "Slug must be at most {MAX_SLUG_LEN} characters"
        )));
    }
    if !slug
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_')
    {
        return Err(CoreError::Validation(
            "Slug may only contain lowercase letters, digits, hyphens and underscores".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_basic_title() {
        assert_eq!(slugify("Henry Danger S1 EP20"), "henry-danger-s1-ep20");
    }

    #[test]
    fn slugify_drops_punctuation() {
        assert_eq!(slugify("What's New? (2024 Edition)"), "whats-new-2024-edition");
    }

    #[test]
    fn slugify_collapses_whitespace_and_hyphens() {
        assert_eq!(slugify("foo -- bar   baz"), "foo-bar-baz");
    }

    #[test]
    fn slugify_trims_edges() {
        assert_eq!(slugify("  _hello-world_ - "), "hello-world");
    }

    #[test]
    fn slugify_keeps_underscores_inside() {
        assert_eq!(slugify("snake_case name"), "snake_case-name");
    }

    #[test]
    fn slugify_drops_non_ascii() {
        assert_eq!(slugify("Café Nollywood"), "caf-nollywood");
    }

    #[test]
    fn slug_or_derive_prefers_explicit() {
        assert_eq!(slug_or_derive(Some("custom"), "Some Title"), "custom");
    }

    #[test]
    fn slug_or_derive_falls_back_on_blank() {
        assert_eq!(slug_or_derive(Some("   "), "Some Title"), "some-title");
        assert_eq!(slug_or_derive(None, "Some Title"), "some-title");
    }

    #[test]
    fn validate_slug_accepts_generated_slugs() {
        assert!(validate_slug(&slugify("Movies & TV")).is_ok());
    }

    #[test]
    fn validate_slug_rejects_empty_and_uppercase() {
        assert!(validate_slug("").is_err());
        assert!(validate_slug("Hello").is_err());
        assert!(validate_slug("a b").is_err());
    }

    #[test]
    fn validate_slug_rejects_too_long() {
        assert!(validate_slug(&"a".repeat(MAX_SLUG_LEN + 1)).is_err());
    }
}
