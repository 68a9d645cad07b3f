//! Minisite entity model and DTOs.
//!
//! The minisite row is the live, publicly-routable projection of whichever
//! version is currently published. `site_version` is the optimistic-lock
//! token; every write must supply the value it read.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use minisite_core::geo::GeoPoint;
use minisite_core::slugs::SlugPair;
use minisite_core::types::{DbId, Timestamp, UserId};

use crate::models::status::{MinisiteStatus, PublishStatus};

/// A row from the `minisites` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Minisite {
    pub id: String,
    pub business_slug: Option<String>,
    pub location_slug: Option<String>,
    pub title: String,
    pub name: String,
    pub city: String,
    pub region: Option<String>,
    pub country_code: String,
    pub postal_code: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub site_template: String,
    pub palette: String,
    pub industry: String,
    pub default_locale: String,
    pub schema_version: i16,
    pub site_version: i32,
    pub site_json: serde_json::Value,
    pub search_terms: Option<String>,
    pub status: MinisiteStatus,
    pub publish_status: PublishStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub published_at: Option<Timestamp>,
    pub created_by: Option<UserId>,
    pub updated_by: Option<UserId>,
    pub current_version_id: Option<DbId>,
}

impl Minisite {
    /// Geo coordinates as a value type; `None` unless both columns are set.
    pub fn geo(&self) -> Option<GeoPoint> {
        GeoPoint::from_columns(self.lat, self.lng)
    }

    /// Routing slug pair; `None` until both slugs are reserved.
    pub fn slugs(&self) -> Option<SlugPair> {
        SlugPair::from_columns(self.business_slug.clone(), self.location_slug.clone())
    }

    /// Whether any version of this minisite has ever been published.
    pub fn has_been_published(&self) -> bool {
        self.current_version_id.is_some()
    }
}

/// DTO for creating a new minisite.
///
/// Omitted fields fall back to the same defaults the original records carry
/// (`v2025` template, `blue` palette, `services` industry, `en-US` locale).
#[derive(Debug, Clone, Deserialize)]
pub struct NewMinisite {
    pub id: String,
    pub slugs: Option<SlugPair>,
    pub title: String,
    pub name: String,
    pub city: String,
    pub region: Option<String>,
    pub country_code: String,
    pub postal_code: Option<String>,
    pub geo: Option<GeoPoint>,
    pub site_template: Option<String>,
    pub palette: Option<String>,
    pub industry: Option<String>,
    pub default_locale: Option<String>,
    pub site_json: serde_json::Value,
    pub search_terms: Option<String>,
    pub created_by: Option<UserId>,
}

/// Partial update of the live projection's content fields. All fields are
/// optional; `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MinisitePatch {
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
    pub site_json: Option<serde_json::Value>,
    pub search_terms: Option<String>,
}

/// Partial update of the business-profile subset only.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BusinessInfoPatch {
    pub name: Option<String>,
    pub city: Option<String>,
    pub region: Option<String>,
    pub country_code: Option<String>,
    pub postal_code: Option<String>,
}
