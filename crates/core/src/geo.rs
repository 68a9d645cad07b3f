//! Geographic coordinates as a first-class value type.
//!
//! The persistence layer owns the physical encoding (two `DOUBLE PRECISION`
//! columns); callers only ever see [`GeoPoint`].

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// A latitude/longitude pair in decimal degrees (WGS 84).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    /// Build a point, rejecting out-of-range coordinates.
    pub fn new(lat: f64, lng: f64) -> Result<Self, CoreError> {
        if !(-90.0..=90.0).contains(&lat) {
            return Err(CoreError::Validation(format!(
                "Latitude must be between -90 and 90, got {lat}"
            )));
        }
        if !(-180.0..=180.0).contains(&lng) {
            return Err(CoreError::Validation(format!(
                "Longitude must be between -180 and 180, got {lng}"
            )));
        }
        Ok(Self { lat, lng })
    }

    /// Reassemble a point from nullable storage columns.
    ///
    /// Returns `None` unless both coordinates are present.
    pub fn from_columns(lat: Option<f64>, lng: Option<f64>) -> Option<Self> {
        match (lat, lng) {
            (Some(lat), Some(lng)) => Some(Self { lat, lng }),
            _ => None,
        }
    }
}
