//! Repository for the `minisite_versions` table.

use sqlx::PgExecutor;

use minisite_core::types::DbId;

use crate::error::{is_unique_violation, DbError};
use crate::models::version::{NewVersion, Version};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, minisite_id, version_number, status, label, comment, \
    created_by, created_at, published_at, source_version_id, \
    business_slug, location_slug, title, name, city, region, country_code, postal_code, \
    lat, lng, site_template, palette, industry, default_locale, \
    schema_version, site_version, site_json, search_terms";

/// Name of the unique constraint guarding `(minisite_id, version_number)`.
const UQ_VERSION_NUMBER: &str = "uq_minisite_versions_number";

/// Provides append and query operations for minisite versions.
pub struct VersionRepo;

impl VersionRepo {
    /// Insert a new draft version, auto-assigning the next version number.
    ///
    /// The number is computed inside the insert itself; a concurrent draft
    /// that claims the same slot hits the unique constraint and gets
    /// [`DbError::VersionNumberConflict`].
    pub async fn create(
        executor: impl PgExecutor<'_>,
        input: &NewVersion,
    ) -> Result<Version, DbError> {
        let query = format!(
            "INSERT INTO minisite_versions
                (minisite_id, version_number, status, label, comment, created_by,
                 source_version_id, business_slug, location_slug, title, name, city,
                 region, country_code, postal_code, lat, lng, site_template, palette,
                 industry, default_locale, schema_version, site_version, site_json,
                 search_terms)
             VALUES (
                $1,
                (SELECT COALESCE(MAX(version_number), 0) + 1
                   FROM minisite_versions WHERE minisite_id = $1),
                'draft', $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13,
                $14, $15, $16, $17, $18, $19, $20, $21, $22, $23
             )
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Version>(&query)
            .bind(&input.minisite_id)
            .bind(&input.label)
            .bind(&input.comment)
            .bind(input.created_by)
            .bind(input.source_version_id)
            .bind(&input.business_slug)
            .bind(&input.location_slug)
            .bind(&input.title)
            .bind(&input.name)
            .bind(&input.city)
            .bind(&input.region)
            .bind(&input.country_code)
            .bind(&input.postal_code)
            .bind(input.geo.map(|g| g.lat))
            .bind(input.geo.map(|g| g.lng))
            .bind(&input.site_template)
            .bind(&input.palette)
            .bind(&input.industry)
            .bind(&input.default_locale)
            .bind(input.schema_version)
            .bind(input.site_version)
            .bind(&input.site_json)
            .bind(&input.search_terms)
            .fetch_one(executor)
            .await
            .map_err(|e| {
                if is_unique_violation(&e, UQ_VERSION_NUMBER) {
                    DbError::VersionNumberConflict {
                        minisite_id: input.minisite_id.clone(),
                    }
                } else {
                    DbError::Sqlx(e)
                }
            })
    }

    /// Find a version by its internal ID.
    pub async fn find_by_id(
        executor: impl PgExecutor<'_>,
        id: DbId,
    ) -> Result<Option<Version>, DbError> {
        let query = format!("SELECT {COLUMNS} FROM minisite_versions WHERE id = $1");
        sqlx::query_as::<_, Version>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
            .map_err(DbError::from)
    }

    /// Find the currently live version for a minisite, resolved through
    /// `minisites.current_version_id`.
    ///
    /// Superseded versions keep their historical `published` status, so
    /// liveness is defined by the pointer alone. The pointed-to row must
    /// belong to the same minisite and carry `status = 'published'`; a
    /// violation is reported as [`DbError::DataIntegrity`], never silently
    /// repaired.
    pub async fn find_published(
        executor: impl PgExecutor<'_>,
        minisite_id: &str,
    ) -> Result<Option<Version>, DbError> {
        let query = format!(
            "SELECT {COLUMNS} FROM minisite_versions
             WHERE id = (SELECT current_version_id FROM minisites WHERE id = $1)"
        );
        let row = sqlx::query_as::<_, Version>(&query)
            .bind(minisite_id)
            .fetch_optional(executor)
            .await?;
        if let Some(version) = &row {
            if version.minisite_id != minisite_id || !version.is_published() {
                tracing::error!(
                    minisite_id,
                    version_id = version.id,
                    version_minisite_id = %version.minisite_id,
                    status = ?version.status,
                    "current_version_id points at an invalid version row"
                );
                return Err(DbError::DataIntegrity(format!(
                    "minisite {minisite_id} current_version_id references version {} \
                     which is not its published version",
                    version.id
                )));
            }
        }
        Ok(row)
    }

    /// Get the next version number for a minisite (max existing + 1, or 1 if
    /// none). Display-only: inserts compute their own number atomically.
    pub async fn next_version_number(
        executor: impl PgExecutor<'_>,
        minisite_id: &str,
    ) -> Result<i32, DbError> {
        let row: (i32,) = sqlx::query_as(
            "SELECT COALESCE(MAX(version_number), 0) + 1 \
             FROM minisite_versions WHERE minisite_id = $1",
        )
        .bind(minisite_id)
        .fetch_one(executor)
        .await?;
        Ok(row.0)
    }

    /// List versions for a minisite, newest version number first.
    pub async fn list_for_minisite(
        executor: impl PgExecutor<'_>,
        minisite_id: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Version>, DbError> {
        let query = format!(
            "SELECT {COLUMNS} FROM minisite_versions
             WHERE minisite_id = $1
             ORDER BY version_number DESC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Version>(&query)
            .bind(minisite_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(executor)
            .await
            .map_err(DbError::from)
    }

    /// Find the latest version (any status) for a minisite.
    pub async fn find_latest(
        executor: impl PgExecutor<'_>,
        minisite_id: &str,
    ) -> Result<Option<Version>, DbError> {
        let query = format!(
            "SELECT {COLUMNS} FROM minisite_versions
             WHERE minisite_id = $1
             ORDER BY version_number DESC
             LIMIT 1"
        );
        sqlx::query_as::<_, Version>(&query)
            .bind(minisite_id)
            .fetch_optional(executor)
            .await
            .map_err(DbError::from)
    }

    /// Find the latest draft version for a minisite.
    pub async fn find_latest_draft(
        executor: impl PgExecutor<'_>,
        minisite_id: &str,
    ) -> Result<Option<Version>, DbError> {
        let query = format!(
            "SELECT {COLUMNS} FROM minisite_versions
             WHERE minisite_id = $1 AND status = 'draft'
             ORDER BY version_number DESC
             LIMIT 1"
        );
        sqlx::query_as::<_, Version>(&query)
            .bind(minisite_id)
            .fetch_optional(executor)
            .await
            .map_err(DbError::from)
    }

    /// Transition a version to `published`, stamping `published_at` only on
    /// the first publish. The sole legal in-place update on a version row.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn mark_published(
        executor: impl PgExecutor<'_>,
        id: DbId,
    ) -> Result<Option<Version>, DbError> {
        let query = format!(
            "UPDATE minisite_versions
             SET status = 'published',
                 published_at = COALESCE(published_at, NOW())
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Version>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
            .map_err(DbError::from)
    }
}
