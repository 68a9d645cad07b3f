//! Version entity model and DTOs.
//!
//! Each version row is a complete, independently renderable snapshot of a
//! minisite's content, not a diff. Rows are append-only: the only legal
//! in-place mutation is the draft-to-published transition.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use minisite_core::geo::GeoPoint;
use minisite_core::slugs::SlugPair;
use minisite_core::types::{DbId, Timestamp, UserId};

use crate::models::status::VersionStatus;

/// A row from the `minisite_versions` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Version {
    pub id: DbId,
    pub minisite_id: String,
    pub version_number: i32,
    pub status: VersionStatus,
    pub label: Option<String>,
    pub comment: Option<String>,
    pub created_by: UserId,
    pub created_at: Timestamp,
    pub published_at: Option<Timestamp>,
    /// Set exactly when this version was produced by a rollback; points at
    /// the version whose content was copied forward.
    pub source_version_id: Option<DbId>,
    pub business_slug: Option<String>,
    pub location_slug: Option<String>,
    pub title: Option<String>,
    pub name: Option<String>,
    pub city: Option<String>,
    pub region: Option<String>,
    pub country_code: Option<String>,
    pub postal_code: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub site_template: Option<String>,
    pub palette: Option<String>,
    pub industry: Option<String>,
    pub default_locale: Option<String>,
    pub schema_version: Option<i16>,
    pub site_version: Option<i32>,
    pub site_json: serde_json::Value,
    pub search_terms: Option<String>,
}

impl Version {
    /// Geo coordinates as a value type; `None` unless both columns are set.
    pub fn geo(&self) -> Option<GeoPoint> {
        GeoPoint::from_columns(self.lat, self.lng)
    }

    /// Slug pair captured in this snapshot, if any.
    pub fn slugs(&self) -> Option<SlugPair> {
        SlugPair::from_columns(self.business_slug.clone(), self.location_slug.clone())
    }

    pub fn is_published(&self) -> bool {
        self.status == VersionStatus::Published
    }

    pub fn is_draft(&self) -> bool {
        self.status == VersionStatus::Draft
    }

    /// A version is a rollback iff it carries a source version reference.
    pub fn is_rollback(&self) -> bool {
        self.source_version_id.is_some()
    }
}

/// DTO for inserting a new draft version. The version number is assigned by
/// the repository inside the insert; the status is always `draft`.
#[derive(Debug, Clone, Deserialize)]
pub struct NewVersion {
    pub minisite_id: String,
    pub label: Option<String>,
    pub comment: Option<String>,
    pub created_by: UserId,
    pub source_version_id: Option<DbId>,
    pub business_slug: Option<String>,
    pub location_slug: Option<String>,
    pub title: Option<String>,
    pub name: Option<String>,
    pub city: Option<String>,
    pub region: Option<String>,
    pub country_code: Option<String>,
    pub postal_code: Option<String>,
    pub geo: Option<GeoPoint>,
    pub site_template: Option<String>,
    pub palette: Option<String>,
    pub industry: Option<String>,
    pub default_locale: Option<String>,
    pub schema_version: Option<i16>,
    pub site_version: Option<i32>,
    pub site_json: serde_json::Value,
    pub search_terms: Option<String>,
}

impl NewVersion {
    /// Snapshot builder: copy every content field from an existing version,
    /// recording it as the rollback/copy source.
    pub fn copied_from(source: &Version, created_by: UserId) -> Self {
        Self {
            minisite_id: source.minisite_id.clone(),
            label: None,
            comment: None,
            created_by,
            source_version_id: Some(source.id),
            business_slug: source.business_slug.clone(),
            location_slug: source.location_slug.clone(),
            title: source.title.clone(),
            name: source.name.clone(),
            city: source.city.clone(),
            region: source.region.clone(),
            country_code: source.country_code.clone(),
            postal_code: source.postal_code.clone(),
            geo: source.geo(),
            site_template: source.site_template.clone(),
            palette: source.palette.clone(),
            industry: source.industry.clone(),
            default_locale: source.default_locale.clone(),
            schema_version: source.schema_version,
            site_version: source.site_version,
            site_json: source.site_json.clone(),
            search_terms: source.search_terms.clone(),
        }
    }
}
