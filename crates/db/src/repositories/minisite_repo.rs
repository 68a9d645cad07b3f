//! Repository for the `minisites` table.
//!
//! Every mutation of the live projection goes through the optimistic-lock
//! contract: the caller supplies the `site_version` it read, the UPDATE is
//! conditional on it, and the row comes back with the incremented token.
//! Zero affected rows means a concurrent writer won.

use sqlx::PgExecutor;

use minisite_core::error::CoreError;
use minisite_core::geo::GeoPoint;
use minisite_core::types::UserId;

use crate::error::{is_unique_violation, DbError};
use crate::models::minisite::{BusinessInfoPatch, Minisite, MinisitePatch, NewMinisite};
use crate::models::status::PublishStatus;
use crate::models::version::Version;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, business_slug, location_slug, title, name, city, region, \
    country_code, postal_code, lat, lng, site_template, palette, industry, \
    default_locale, schema_version, site_version, site_json, search_terms, \
    status, publish_status, created_at, updated_at, published_at, \
    created_by, updated_by, current_version_id";

/// Name of the unique constraint guarding `(business_slug, location_slug)`.
const UQ_BUSINESS_LOCATION: &str = "uq_minisites_business_location";

/// Provides CRUD and optimistic-lock-protected updates for minisites.
pub struct MinisiteRepo;

impl MinisiteRepo {
    /// Insert a new minisite with `site_version = 1` and draft status.
    ///
    /// Omitted template/palette/industry/locale fields fall back to the
    /// standard defaults. A taken slug pair surfaces as a conflict.
    pub async fn create(
        executor: impl PgExecutor<'_>,
        input: &NewMinisite,
    ) -> Result<Minisite, DbError> {
        let query = format!(
            "INSERT INTO minisites
                (id, business_slug, location_slug, title, name, city, region,
                 country_code, postal_code, lat, lng, site_template, palette,
                 industry, default_locale, site_json, search_terms, created_by,
                 updated_by)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11,
                 COALESCE($12, 'v2025'), COALESCE($13, 'blue'),
                 COALESCE($14, 'services'), COALESCE($15, 'en-US'),
                 $16, $17, $18, $18)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Minisite>(&query)
            .bind(&input.id)
            .bind(input.slugs.as_ref().map(|s| s.business.clone()))
            .bind(input.slugs.as_ref().map(|s| s.location.clone()))
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
            .bind(&input.site_json)
            .bind(&input.search_terms)
            .bind(input.created_by)
            .fetch_one(executor)
            .await
            .map_err(|e| {
                if is_unique_violation(&e, UQ_BUSINESS_LOCATION) {
                    DbError::Core(CoreError::Conflict(format!(
                        "slug pair already taken for minisite {}",
                        input.id
                    )))
                } else {
                    DbError::Sqlx(e)
                }
            })
    }

    /// Find a minisite by its opaque ID.
    pub async fn find_by_id(
        executor: impl PgExecutor<'_>,
        id: &str,
    ) -> Result<Option<Minisite>, DbError> {
        let query = format!("SELECT {COLUMNS} FROM minisites WHERE id = $1");
        sqlx::query_as::<_, Minisite>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
            .map_err(DbError::from)
    }

    /// Find a minisite by its public routing slug pair.
    pub async fn find_by_slugs(
        executor: impl PgExecutor<'_>,
        business_slug: &str,
        location_slug: &str,
    ) -> Result<Option<Minisite>, DbError> {
        let query = format!(
            "SELECT {COLUMNS} FROM minisites
             WHERE business_slug = $1 AND location_slug = $2"
        );
        sqlx::query_as::<_, Minisite>(&query)
            .bind(business_slug)
            .bind(location_slug)
            .fetch_optional(executor)
            .await
            .map_err(DbError::from)
    }

    /// List minisites owned by a user, most recently updated first.
    pub async fn list_by_owner(
        executor: impl PgExecutor<'_>,
        user_id: UserId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Minisite>, DbError> {
        let query = format!(
            "SELECT {COLUMNS} FROM minisites
             WHERE created_by = $1
             ORDER BY updated_at DESC, id DESC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Minisite>(&query)
            .bind(user_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(executor)
            .await
            .map_err(DbError::from)
    }

    /// Count minisites owned by a user.
    pub async fn count_by_owner(
        executor: impl PgExecutor<'_>,
        user_id: UserId,
    ) -> Result<i64, DbError> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM minisites WHERE created_by = $1")
            .bind(user_id)
            .fetch_one(executor)
            .await?;
        Ok(row.0)
    }

    /// Full-row conditional save of the live projection.
    ///
    /// Writes every content field of `minisite` and increments
    /// `site_version`, guarded by `expected_site_version`. The returned row
    /// carries the incremented token.
    pub async fn save(
        executor: impl PgExecutor<'_>,
        minisite: &Minisite,
        expected_site_version: i32,
    ) -> Result<Minisite, DbError> {
        let query = format!(
            "UPDATE minisites SET
                title = $3, name = $4, city = $5, region = $6,
                country_code = $7, postal_code = $8, lat = $9, lng = $10,
                site_template = $11, palette = $12, industry = $13,
                default_locale = $14, schema_version = $15, site_json = $16,
                search_terms = $17, status = $18, updated_by = $19,
                updated_at = NOW(),
                site_version = site_version + 1
             WHERE id = $1 AND site_version = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Minisite>(&query)
            .bind(&minisite.id)
            .bind(expected_site_version)
            .bind(&minisite.title)
            .bind(&minisite.name)
            .bind(&minisite.city)
            .bind(&minisite.region)
            .bind(&minisite.country_code)
            .bind(&minisite.postal_code)
            .bind(minisite.lat)
            .bind(minisite.lng)
            .bind(&minisite.site_template)
            .bind(&minisite.palette)
            .bind(&minisite.industry)
            .bind(&minisite.default_locale)
            .bind(minisite.schema_version)
            .bind(&minisite.site_json)
            .bind(&minisite.search_terms)
            .bind(minisite.status)
            .bind(minisite.updated_by)
            .fetch_optional(executor)
            .await?
            .ok_or(DbError::OptimisticLock {
                minisite_id: minisite.id.clone(),
                expected: expected_site_version,
            })
    }

    /// Patch any subset of content fields under the optimistic lock. Only
    /// non-`None` fields in `patch` are applied.
    pub async fn update_fields(
        executor: impl PgExecutor<'_>,
        id: &str,
        patch: &MinisitePatch,
        updated_by: UserId,
        expected_site_version: i32,
    ) -> Result<Minisite, DbError> {
        let query = format!(
            "UPDATE minisites SET
                title = COALESCE($3, title),
                name = COALESCE($4, name),
                city = COALESCE($5, city),
                region = COALESCE($6, region),
                country_code = COALESCE($7, country_code),
                postal_code = COALESCE($8, postal_code),
                lat = COALESCE($9, lat),
                lng = COALESCE($10, lng),
                site_template = COALESCE($11, site_template),
                palette = COALESCE($12, palette),
                industry = COALESCE($13, industry),
                default_locale = COALESCE($14, default_locale),
                site_json = COALESCE($15, site_json),
                search_terms = COALESCE($16, search_terms),
                updated_by = $17,
                updated_at = NOW(),
                site_version = site_version + 1
             WHERE id = $1 AND site_version = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Minisite>(&query)
            .bind(id)
            .bind(expected_site_version)
            .bind(&patch.title)
            .bind(&patch.name)
            .bind(&patch.city)
            .bind(&patch.region)
            .bind(&patch.country_code)
            .bind(&patch.postal_code)
            .bind(patch.geo.map(|g| g.lat))
            .bind(patch.geo.map(|g| g.lng))
            .bind(&patch.site_template)
            .bind(&patch.palette)
            .bind(&patch.industry)
            .bind(&patch.default_locale)
            .bind(&patch.site_json)
            .bind(&patch.search_terms)
            .bind(updated_by)
            .fetch_optional(executor)
            .await?
            .ok_or(DbError::OptimisticLock {
                minisite_id: id.to_string(),
                expected: expected_site_version,
            })
    }

    /// Patch the business-profile subset under the optimistic lock.
    pub async fn update_business_info(
        executor: impl PgExecutor<'_>,
        id: &str,
        patch: &BusinessInfoPatch,
        updated_by: UserId,
        expected_site_version: i32,
    ) -> Result<Minisite, DbError> {
        let query = format!(
            "UPDATE minisites SET
                name = COALESCE($3, name),
                city = COALESCE($4, city),
                region = COALESCE($5, region),
                country_code = COALESCE($6, country_code),
                postal_code = COALESCE($7, postal_code),
                updated_by = $8,
                updated_at = NOW(),
                site_version = site_version + 1
             WHERE id = $1 AND site_version = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Minisite>(&query)
            .bind(id)
            .bind(expected_site_version)
            .bind(&patch.name)
            .bind(&patch.city)
            .bind(&patch.region)
            .bind(&patch.country_code)
            .bind(&patch.postal_code)
            .bind(updated_by)
            .fetch_optional(executor)
            .await?
            .ok_or(DbError::OptimisticLock {
                minisite_id: id.to_string(),
                expected: expected_site_version,
            })
    }

    /// Update only the geo coordinates under the optimistic lock.
    pub async fn update_coordinates(
        executor: impl PgExecutor<'_>,
        id: &str,
        geo: GeoPoint,
        updated_by: UserId,
        expected_site_version: i32,
    ) -> Result<Minisite, DbError> {
        let query = format!(
            "UPDATE minisites SET
                lat = $3, lng = $4, updated_by = $5, updated_at = NOW(),
                site_version = site_version + 1
             WHERE id = $1 AND site_version = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Minisite>(&query)
            .bind(id)
            .bind(expected_site_version)
            .bind(geo.lat)
            .bind(geo.lng)
            .bind(updated_by)
            .fetch_optional(executor)
            .await?
            .ok_or(DbError::OptimisticLock {
                minisite_id: id.to_string(),
                expected: expected_site_version,
            })
    }

    /// Update only the title under the optimistic lock.
    pub async fn update_title(
        executor: impl PgExecutor<'_>,
        id: &str,
        title: &str,
        updated_by: UserId,
        expected_site_version: i32,
    ) -> Result<Minisite, DbError> {
        let query = format!(
            "UPDATE minisites SET
                title = $3, updated_by = $4, updated_at = NOW(),
                site_version = site_version + 1
             WHERE id = $1 AND site_version = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Minisite>(&query)
            .bind(id)
            .bind(expected_site_version)
            .bind(title)
            .bind(updated_by)
            .fetch_optional(executor)
            .await?
            .ok_or(DbError::OptimisticLock {
                minisite_id: id.to_string(),
                expected: expected_site_version,
            })
    }

    /// Update the slug-reservation flag under the optimistic lock.
    pub async fn update_publish_status(
        executor: impl PgExecutor<'_>,
        id: &str,
        publish_status: PublishStatus,
        expected_site_version: i32,
    ) -> Result<Minisite, DbError> {
        let query = format!(
            "UPDATE minisites SET
                publish_status = $3, updated_at = NOW(),
                site_version = site_version + 1
             WHERE id = $1 AND site_version = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Minisite>(&query)
            .bind(id)
            .bind(expected_site_version)
            .bind(publish_status)
            .fetch_optional(executor)
            .await?
            .ok_or(DbError::OptimisticLock {
                minisite_id: id.to_string(),
                expected: expected_site_version,
            })
    }

    /// Publish-time projection update: copy the version's full content
    /// snapshot onto the live row, point `current_version_id` at it, and
    /// mark the minisite published. `published_at` is stamped on the first
    /// publish only. Runs under the optimistic lock like every other write.
    pub async fn apply_published_version(
        executor: impl PgExecutor<'_>,
        version: &Version,
        published_by: UserId,
        expected_site_version: i32,
    ) -> Result<Minisite, DbError> {
        let query = format!(
            "UPDATE minisites SET
                title = COALESCE($3, title),
                name = COALESCE($4, name),
                city = COALESCE($5, city),
                region = $6,
                country_code = COALESCE($7, country_code),
                postal_code = $8,
                lat = $9,
                lng = $10,
                site_template = COALESCE($11, site_template),
                palette = COALESCE($12, palette),
                industry = COALESCE($13, industry),
                default_locale = COALESCE($14, default_locale),
                schema_version = COALESCE($15, schema_version),
                site_json = $16,
                search_terms = $17,
                status = 'published',
                publish_status = 'published',
                current_version_id = $18,
                published_at = COALESCE(published_at, NOW()),
                updated_by = $19,
                updated_at = NOW(),
                site_version = site_version + 1
             WHERE id = $1 AND site_version = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Minisite>(&query)
            .bind(&version.minisite_id)
            .bind(expected_site_version)
            .bind(&version.title)
            .bind(&version.name)
            .bind(&version.city)
            .bind(&version.region)
            .bind(&version.country_code)
            .bind(&version.postal_code)
            .bind(version.lat)
            .bind(version.lng)
            .bind(&version.site_template)
            .bind(&version.palette)
            .bind(&version.industry)
            .bind(&version.default_locale)
            .bind(version.schema_version)
            .bind(&version.site_json)
            .bind(&version.search_terms)
            .bind(version.id)
            .bind(published_by)
            .fetch_optional(executor)
            .await?
            .ok_or(DbError::OptimisticLock {
                minisite_id: version.minisite_id.clone(),
                expected: expected_site_version,
            })
    }
}
