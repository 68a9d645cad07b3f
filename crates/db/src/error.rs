//! Storage-level error type for the versioning core.
//!
//! Repository methods translate low-level sqlx failures into this taxonomy;
//! the service adds the not-found and integrity cases. Retryable conflicts
//! (optimistic-lock and version-number races) are distinguishable from
//! terminal failures so callers can re-read and resubmit.

use minisite_core::error::CoreError;

/// Errors produced by the repositories and the version service.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// A domain-level error from `minisite-core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The minisite or version does not exist (or belongs to a different
    /// minisite). Terminal; maps to a 404-equivalent upstream.
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: String },

    /// A concurrent writer won the conditional update on `site_version`.
    /// Retryable; re-read and resubmit.
    #[error("Concurrent modification detected for minisite {minisite_id} (expected site_version {expected})")]
    OptimisticLock { minisite_id: String, expected: i32 },

    /// Two drafts raced for the same `(minisite_id, version_number)` slot.
    /// Retryable; re-read and resubmit.
    #[error("Version number conflict for minisite {minisite_id}")]
    VersionNumberConflict { minisite_id: String },

    /// Stored state violates an invariant (e.g. more than one published
    /// version). Fatal; must not be silently repaired.
    #[error("Data integrity violation: {0}")]
    DataIntegrity(String),

    /// A database error from sqlx.
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

impl DbError {
    /// Whether the caller should re-read current state and retry the
    /// transition.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            DbError::OptimisticLock { .. } | DbError::VersionNumberConflict { .. }
        )
    }
}

/// Check whether a sqlx error is a Postgres unique-constraint violation
/// (SQLSTATE 23505) on the named constraint.
pub(crate) fn is_unique_violation(err: &sqlx::Error, constraint: &str) -> bool {
    match err {
        sqlx::Error::Database(db_err) => {
            db_err.code().as_deref() == Some("23505")
                && db_err.constraint() == Some(constraint)
        }
        _ => false,
    }
}
