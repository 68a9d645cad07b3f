//! Pure helpers for the draft/publish/rollback workflow.
//!
//! Limits match the history-table column widths; labels and comments follow
//! the wording the editing UI expects.

use crate::error::CoreError;

/// Maximum allowed length for a version label.
pub const MAX_LABEL_LENGTH: usize = 120;

/// Maximum allowed length for a version comment.
pub const MAX_COMMENT_LENGTH: usize = 2000;

/// Validate an optional version label against [`MAX_LABEL_LENGTH`].
pub fn validate_label(label: Option<&str>) -> Result<(), CoreError> {
    if let Some(label) = label {
        if label.len() > MAX_LABEL_LENGTH {
            return Err(CoreError::Validation(format!(
                "Version label must not exceed {MAX_LABEL_LENGTH} characters, got {}",
                label.len()
            )));
        }
    }
    Ok(())
}

/// Validate an optional version comment against [`MAX_COMMENT_LENGTH`].
pub fn validate_comment(comment: Option<&str>) -> Result<(), CoreError> {
    if let Some(comment) = comment {
        if comment.len() > MAX_COMMENT_LENGTH {
            return Err(CoreError::Validation(format!(
                "Version comment must not exceed {MAX_COMMENT_LENGTH} characters, got {}",
                comment.len()
            )));
        }
    }
    Ok(())
}

/// Default label for a version created by rolling back to `source_number`.
pub fn rollback_label(source_number: i32) -> String {
    format!("Rollback to v{source_number}")
}

/// Default comment for a version created by rolling back to `source_number`.
pub fn rollback_comment(source_number: i32) -> String {
    format!("Rollback from version {source_number}")
}

/// Default label for a draft copied from `source_number` for editing.
pub fn draft_copy_label(source_number: i32) -> String {
    format!("Draft from v{source_number}")
}

/// Default comment for a draft copied from `source_number` for editing.
pub fn draft_copy_comment(source_number: i32) -> String {
    format!("Created from version {source_number} for editing")
}

/// Build the normalized search-terms string for the live projection from
/// its denormalized content fields.
pub fn build_search_terms(parts: &[Option<&str>]) -> String {
    let joined = parts
        .iter()
        .filter_map(|p| *p)
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    joined.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    // -- labels and comments -------------------------------------------------

    #[test]
    fn label_at_max_length_is_ok() {
        let label = "a".repeat(MAX_LABEL_LENGTH);
        assert!(validate_label(Some(&label)).is_ok());
    }

    #[test]
    fn rejects_overlong_label() {
        let label = "a".repeat(MAX_LABEL_LENGTH + 1);
        assert!(validate_label(Some(&label)).is_err());
    }

    #[test]
    fn missing_label_is_ok() {
        assert!(validate_label(None).is_ok());
    }

    #[test]
    fn rejects_overlong_comment() {
        let comment = "a".repeat(MAX_COMMENT_LENGTH + 1);
        assert!(validate_comment(Some(&comment)).is_err());
    }

    #[test]
    fn rollback_wording() {
        assert_eq!(rollback_label(3), "Rollback to v3");
        assert_eq!(rollback_comment(3), "Rollback from version 3");
    }

    #[test]
    fn draft_copy_wording() {
        assert_eq!(draft_copy_label(7), "Draft from v7");
        assert_eq!(draft_copy_comment(7), "Created from version 7 for editing");
    }

    // -- search terms --------------------------------------------------------

    #[test]
    fn search_terms_lowercases_and_joins() {
        let terms = build_search_terms(&[
            Some("Acme Plumbing"),
            Some("Portland"),
            Some("services"),
            None,
            Some("Blue"),
        ]);
        assert_eq!(terms, "acme plumbing portland services blue");
    }

    #[test]
    fn search_terms_skips_empty_parts() {
        let terms = build_search_terms(&[Some(""), Some("Acme"), None]);
        assert_eq!(terms, "acme");
    }

    #[test]
    fn search_terms_empty_input() {
        assert_eq!(build_search_terms(&[]), "");
    }
}
