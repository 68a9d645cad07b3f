//! The `(business, location)` slug pair that routes a minisite publicly.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Maximum length of each slug half, matching the column width.
pub const MAX_SLUG_LENGTH: usize = 120;

/// Unique-together routing pair for a minisite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlugPair {
    pub business: String,
    pub location: String,
}

impl SlugPair {
    /// Build a pair, validating both halves.
    pub fn new(business: impl Into<String>, location: impl Into<String>) -> Result<Self, CoreError> {
        let business = business.into();
        let location = location.into();
        validate_slug(&business)?;
        validate_slug(&location)?;
        Ok(Self { business, location })
    }

    /// Reassemble a pair from nullable storage columns.
    pub fn from_columns(business: Option<String>, location: Option<String>) -> Option<Self> {
        match (business, location) {
            (Some(business), Some(location)) => Some(Self { business, location }),
            _ => None,
        }
    }

    /// The combined path form, e.g. `acme-plumbing/downtown`.
    pub fn path(&self) -> String {
        format!("{}/{}", self.business, self.location)
    }
}

/// Validate a single slug half: non-empty, lowercase alphanumeric plus
/// hyphens, no leading/trailing hyphen, within [`MAX_SLUG_LENGTH`].
pub fn validate_slug(slug: &str) -> Result<(), CoreError> {
    if slug.is_empty() {
        return Err(CoreError::Validation("Slug must not be empty".to_string()));
    }
    if slug.len() > MAX_SLUG_LENGTH {
        return Err(CoreError::Validation(format!(
            "Slug must not exceed {MAX_SLUG_LENGTH} characters, got {}",
            slug.len()
        )));
    }
    if slug.starts_with('-') || slug.ends_with('-') {
        return Err(CoreError::Validation(
            "Slug must not start or end with a hyphen".to_string(),
        ));
    }
    if !slug
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        return Err(CoreError::Validation(format!(
            "Slug may only contain lowercase letters, digits, and hyphens: {slug:?}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_pair() {
        let pair = SlugPair::new("acme-plumbing", "downtown").unwrap();
        assert_eq!(pair.path(), "acme-plumbing/downtown");
    }

    #[test]
    fn rejects_empty_half() {
        assert!(SlugPair::new("", "downtown").is_err());
        assert!(SlugPair::new("acme", "").is_err());
    }

    #[test]
    fn rejects_uppercase_and_spaces() {
        assert!(validate_slug("Acme").is_err());
        assert!(validate_slug("acme plumbing").is_err());
    }

    #[test]
    fn rejects_edge_hyphens() {
        assert!(validate_slug("-acme").is_err());
        assert!(validate_slug("acme-").is_err());
    }

    #[test]
    fn rejects_overlong_slug() {
        let slug = "a".repeat(MAX_SLUG_LENGTH + 1);
        assert!(validate_slug(&slug).is_err());
    }

    #[test]
    fn from_columns_requires_both() {
        assert!(SlugPair::from_columns(Some("a".into()), None).is_none());
        let pair = SlugPair::from_columns(Some("a".into()), Some("b".into())).unwrap();
        assert_eq!(pair.business, "a");
        assert_eq!(pair.location, "b");
    }
}
