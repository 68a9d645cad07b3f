//! Command inputs for the version workflow.
//!
//! Commands carry the acting user id supplied by the caller; the core
//! records it and performs no authentication. Each command validates its
//! own shape before any transaction is opened.

use serde::Deserialize;

use minisite_core::error::CoreError;
use minisite_core::ids::is_valid_minisite_id;
use minisite_core::types::{DbId, UserId};
use minisite_core::versioning::{validate_comment, validate_label};

use crate::models::minisite::MinisitePatch;

fn validate_minisite_id(id: &str) -> Result<(), CoreError> {
    if !is_valid_minisite_id(id) {
        return Err(CoreError::Validation(format!(
            "Malformed minisite id: {id:?}"
        )));
    }
    Ok(())
}

/// Capture the current edit as a new draft version.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateDraft {
    pub minisite_id: String,
    pub user_id: UserId,
    pub label: Option<String>,
    pub comment: Option<String>,
    /// New content; anything unspecified falls back to the minisite's
    /// current fields.
    pub content: MinisitePatch,
}

impl CreateDraft {
    pub fn validate(&self) -> Result<(), CoreError> {
        validate_minisite_id(&self.minisite_id)?;
        validate_label(self.label.as_deref())?;
        validate_comment(self.comment.as_deref())?;
        Ok(())
    }
}

/// Make a specific version the live content of its minisite.
#[derive(Debug, Clone, Deserialize)]
pub struct PublishVersion {
    pub minisite_id: String,
    pub version_id: DbId,
    pub user_id: UserId,
}

impl PublishVersion {
    pub fn validate(&self) -> Result<(), CoreError> {
        validate_minisite_id(&self.minisite_id)
    }
}

/// Stage a new draft whose content is copied from an earlier version.
#[derive(Debug, Clone, Deserialize)]
pub struct RollbackVersion {
    pub minisite_id: String,
    /// The version to roll back *to*; its snapshot is copied forward.
    pub source_version_id: DbId,
    pub user_id: UserId,
    /// Overrides the default "Rollback to v{n}" label.
    pub label: Option<String>,
    /// Overrides the default "Rollback from version {n}" comment.
    pub comment: Option<String>,
}

impl RollbackVersion {
    pub fn validate(&self) -> Result<(), CoreError> {
        validate_minisite_id(&self.minisite_id)?;
        validate_label(self.label.as_deref())?;
        validate_comment(self.comment.as_deref())?;
        Ok(())
    }
}

/// Page through a minisite's version history.
#[derive(Debug, Clone, Deserialize)]
pub struct ListVersions {
    pub minisite_id: String,
    pub user_id: UserId,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl ListVersions {
    pub fn validate(&self) -> Result<(), CoreError> {
        validate_minisite_id(&self.minisite_id)?;
        if let Some(limit) = self.limit {
            if limit < 1 {
                return Err(CoreError::Validation(format!(
                    "Limit must be positive, got {limit}"
                )));
            }
        }
        if let Some(offset) = self.offset {
            if offset < 0 {
                return Err(CoreError::Validation(format!(
                    "Offset must not be negative, got {offset}"
                )));
            }
        }
        Ok(())
    }
}
