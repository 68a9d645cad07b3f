//! The publish/draft/rollback state machine.
//!
//! Each transition runs inside one transaction: the version insert and any
//! live-projection update succeed or fail together. The previously published
//! version row is never mutated when a newer version is published; liveness
//! is tracked solely by `minisites.current_version_id`, and a version's
//! `published` status is a permanent historical label.
//!
//! The service performs no internal retries. Optimistic-lock and
//! version-number conflicts come back as retryable errors
//! ([`DbError::is_retryable`]) for the caller to re-read and resubmit.

use sqlx::PgPool;

use minisite_core::types::UserId;
use minisite_core::versioning::{
    draft_copy_comment, draft_copy_label, rollback_comment, rollback_label,
};

use crate::error::DbError;
use crate::models::minisite::Minisite;
use crate::models::version::{NewVersion, Version};
use crate::repositories::{MinisiteRepo, VersionRepo};
use crate::services::commands::{CreateDraft, ListVersions, PublishVersion, RollbackVersion};

/// Default page size for version listings.
const DEFAULT_LIST_LIMIT: i64 = 50;

/// Orchestrates version transitions over the two repositories.
///
/// Stateless between calls; holds only the injected connection pool.
#[derive(Clone)]
pub struct VersionService {
    pool: PgPool,
}

impl VersionService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List a minisite's version history, newest first.
    pub async fn list_versions(&self, cmd: ListVersions) -> Result<Vec<Version>, DbError> {
        cmd.validate()?;
        let minisite = MinisiteRepo::find_by_id(&self.pool, &cmd.minisite_id)
            .await?
            .ok_or_else(|| not_found_minisite(&cmd.minisite_id))?;
        VersionRepo::list_for_minisite(
            &self.pool,
            &minisite.id,
            cmd.limit.unwrap_or(DEFAULT_LIST_LIMIT),
            cmd.offset.unwrap_or(0),
        )
        .await
    }

    /// Capture the supplied content as a new draft version.
    ///
    /// The snapshot is the supplied patch with fallback to the minisite's
    /// current fields, so every version row renders on its own. While the
    /// minisite has never been published, the same patch is also applied to
    /// the live projection so its preview always reflects the latest draft;
    /// once published, live content changes only at publish time.
    pub async fn create_draft(&self, cmd: CreateDraft) -> Result<Version, DbError> {
        cmd.validate()?;
        tracing::debug!(minisite_id = %cmd.minisite_id, user_id = cmd.user_id, "creating draft version");

        let mut tx = self.pool.begin().await?;

        let minisite = MinisiteRepo::find_by_id(&mut *tx, &cmd.minisite_id)
            .await?
            .ok_or_else(|| not_found_minisite(&cmd.minisite_id))?;

        let published = VersionRepo::find_published(&mut *tx, &minisite.id).await?;

        let mut input = draft_snapshot(&minisite, &cmd);
        input.label = cmd.label.clone();
        input.comment = cmd.comment.clone();
        let version = VersionRepo::create(&mut *tx, &input).await?;

        if published.is_none() {
            MinisiteRepo::update_fields(
                &mut *tx,
                &minisite.id,
                &cmd.content,
                cmd.user_id,
                minisite.site_version,
            )
            .await?;
        }

        tx.commit().await?;
        tracing::debug!(
            minisite_id = %cmd.minisite_id,
            version_id = version.id,
            version_number = version.version_number,
            "draft version created"
        );
        Ok(version)
    }

    /// Make the given version the live content of its minisite.
    ///
    /// Idempotent on content: republishing the current version only ticks
    /// `site_version` and `updated_at`. The previously published version row
    /// is left untouched; only `current_version_id` is repointed.
    pub async fn publish_version(&self, cmd: PublishVersion) -> Result<Minisite, DbError> {
        cmd.validate()?;
        tracing::debug!(
            minisite_id = %cmd.minisite_id,
            version_id = cmd.version_id,
            user_id = cmd.user_id,
            "publishing version"
        );

        let mut tx = self.pool.begin().await?;

        let minisite = MinisiteRepo::find_by_id(&mut *tx, &cmd.minisite_id)
            .await?
            .ok_or_else(|| not_found_minisite(&cmd.minisite_id))?;

        let version = VersionRepo::find_by_id(&mut *tx, cmd.version_id)
            .await?
            .filter(|v| v.minisite_id == minisite.id)
            .ok_or_else(|| not_found_version(cmd.version_id))?;

        // Validates the live-pointer invariant before repointing it.
        VersionRepo::find_published(&mut *tx, &minisite.id).await?;

        let published = VersionRepo::mark_published(&mut *tx, version.id)
            .await?
            .ok_or_else(|| not_found_version(version.id))?;

        let minisite = MinisiteRepo::apply_published_version(
            &mut *tx,
            &published,
            cmd.user_id,
            minisite.site_version,
        )
        .await?;

        tx.commit().await?;
        tracing::debug!(
            minisite_id = %minisite.id,
            version_id = published.id,
            version_number = published.version_number,
            "version published"
        );
        Ok(minisite)
    }

    /// Stage a new draft whose content is a full copy of an earlier
    /// version's snapshot.
    ///
    /// The new draft records the source via `source_version_id` and does not
    /// alter the source version or the live projection; a subsequent
    /// [`Self::publish_version`] makes it live.
    pub async fn rollback(&self, cmd: RollbackVersion) -> Result<Version, DbError> {
        cmd.validate()?;
        tracing::debug!(
            minisite_id = %cmd.minisite_id,
            source_version_id = cmd.source_version_id,
            user_id = cmd.user_id,
            "creating rollback version"
        );

        let mut tx = self.pool.begin().await?;

        let minisite = MinisiteRepo::find_by_id(&mut *tx, &cmd.minisite_id)
            .await?
            .ok_or_else(|| not_found_minisite(&cmd.minisite_id))?;

        let source = VersionRepo::find_by_id(&mut *tx, cmd.source_version_id)
            .await?
            .filter(|v| v.minisite_id == minisite.id)
            .ok_or_else(|| not_found_version(cmd.source_version_id))?;

        let mut input = NewVersion::copied_from(&source, cmd.user_id);
        input.label = Some(
            cmd.label
                .clone()
                .unwrap_or_else(|| rollback_label(source.version_number)),
        );
        input.comment = Some(
            cmd.comment
                .clone()
                .unwrap_or_else(|| rollback_comment(source.version_number)),
        );
        let version = VersionRepo::create(&mut *tx, &input).await?;

        tx.commit().await?;
        tracing::debug!(
            minisite_id = %cmd.minisite_id,
            version_id = version.id,
            source_version_id = source.id,
            "rollback version created"
        );
        Ok(version)
    }

    /// Return the latest draft for editing, creating one from the latest
    /// version when that version is already published, so an editor always
    /// has a mutable draft to work on.
    pub async fn latest_draft_for_editing(
        &self,
        minisite_id: &str,
        user_id: UserId,
    ) -> Result<Version, DbError> {
        let mut tx = self.pool.begin().await?;

        MinisiteRepo::find_by_id(&mut *tx, minisite_id)
            .await?
            .ok_or_else(|| not_found_minisite(minisite_id))?;

        let latest = VersionRepo::find_latest(&mut *tx, minisite_id)
            .await?
            .ok_or(DbError::NotFound {
                entity: "Version",
                id: format!("latest for minisite {minisite_id}"),
            })?;

        let draft = if latest.is_draft() {
            latest
        } else {
            let mut input = NewVersion::copied_from(&latest, user_id);
            input.label = Some(draft_copy_label(latest.version_number));
            input.comment = Some(draft_copy_comment(latest.version_number));
            VersionRepo::create(&mut *tx, &input).await?
        };

        tx.commit().await?;
        Ok(draft)
    }
}

fn not_found_minisite(id: &str) -> DbError {
    DbError::NotFound {
        entity: "Minisite",
        id: id.to_string(),
    }
}

fn not_found_version(id: i64) -> DbError {
    DbError::NotFound {
        entity: "Version",
        id: id.to_string(),
    }
}

/// Build the full content snapshot for a new draft: the supplied patch with
/// fallback to the minisite's current fields.
fn draft_snapshot(minisite: &Minisite, cmd: &CreateDraft) -> NewVersion {
    let content = &cmd.content;
    NewVersion {
        minisite_id: minisite.id.clone(),
        label: None,
        comment: None,
        created_by: cmd.user_id,
        source_version_id: None,
        business_slug: minisite.business_slug.clone(),
        location_slug: minisite.location_slug.clone(),
        title: Some(content.title.clone().unwrap_or_else(|| minisite.title.clone())),
        name: Some(content.name.clone().unwrap_or_else(|| minisite.name.clone())),
        city: Some(content.city.clone().unwrap_or_else(|| minisite.city.clone())),
        region: content.region.clone().or_else(|| minisite.region.clone()),
        country_code: Some(
            content
                .country_code
                .clone()
                .unwrap_or_else(|| minisite.country_code.clone()),
        ),
        postal_code: content
            .postal_code
            .clone()
            .or_else(|| minisite.postal_code.clone()),
        geo: content.geo.or_else(|| minisite.geo()),
        site_template: Some(
            content
                .site_template
                .clone()
                .unwrap_or_else(|| minisite.site_template.clone()),
        ),
        palette: Some(
            content
                .palette
                .clone()
                .unwrap_or_else(|| minisite.palette.clone()),
        ),
        industry: Some(
            content
                .industry
                .clone()
                .unwrap_or_else(|| minisite.industry.clone()),
        ),
        default_locale: Some(
            content
                .default_locale
                .clone()
                .unwrap_or_else(|| minisite.default_locale.clone()),
        ),
        schema_version: Some(minisite.schema_version),
        site_version: Some(minisite.site_version),
        site_json: content
            .site_json
            .clone()
            .unwrap_or_else(|| minisite.site_json.clone()),
        search_terms: content
            .search_terms
            .clone()
            .or_else(|| minisite.search_terms.clone()),
    }
}
