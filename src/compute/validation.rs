//! Validation for input points and viewports.
//!
//! The index expects callers to drop entities without a usable location
//! before building. These helpers do that filtering.

use crate::error::{ClusterError, Result};
use rustc_hash::FxHashSet;
use vibecluster_types::point::GeoPoint;
use vibecluster_types::viewport::Viewport;

/// Validates a point has finite, in-range longitude and latitude.
///
/// Longitude: [-180.0, 180.0], Latitude: [-90.0, 90.0]
///
/// # Examples
///
/// ```
/// use vibecluster::validation::validate_geo_point;
/// use vibecluster::{GeoPoint, VibeCategory};
///
/// let rome = GeoPoint::new("rome", 12.4964, 41.9028, VibeCategory::Cultural, "");
/// assert!(validate_geo_point(&rome).is_ok());
///
/// let invalid = GeoPoint::new("nowhere", 200.0, 41.9, VibeCategory::Cultural, "");
/// assert!(validate_geo_point(&invalid).is_err());
/// ```
pub fn validate_geo_point(point: &GeoPoint) -> Result<()> {
    let (lon, lat) = (point.lon, point.lat);

    if !lon.is_finite() {
        return Err(ClusterError::InvalidInput(format!(
            "Longitude of '{}' must be finite, got: {}",
            point.id, lon
        )));
    }

    if !lat.is_finite() {
        return Err(ClusterError::InvalidInput(format!(
            "Latitude of '{}' must be finite, got: {}",
            point.id, lat
        )));
    }

    if !(-180.0..=180.0).contains(&lon) {
        return Err(ClusterError::InvalidInput(format!(
            "Longitude of '{}' out of range [-180.0, 180.0]: {}",
            point.id, lon
        )));
    }

    if !(-90.0..=90.0).contains(&lat) {
        return Err(ClusterError::InvalidInput(format!(
            "Latitude of '{}' out of range [-90.0, 90.0]: {}",
            point.id, lat
        )));
    }

    Ok(())
}

/// Validates every point and that ids are unique.
pub fn validate_points(points: &[GeoPoint]) -> Result<()> {
    let mut seen = FxHashSet::default();
    for (idx, point) in points.iter().enumerate() {
        validate_geo_point(point)
            .map_err(|e| ClusterError::InvalidInput(format!("Point at index {}: {}", idx, e)))?;
        if !seen.insert(point.id.as_str()) {
            return Err(ClusterError::InvalidInput(format!(
                "Point at index {}: duplicate id '{}'",
                idx, point.id
            )));
        }
    }
    Ok(())
}

/// Keep only points that pass [`validate_geo_point`], preserving order.
pub fn retain_valid(points: impl IntoIterator<Item = GeoPoint>) -> Vec<GeoPoint> {
    let mut dropped = 0usize;
    let kept: Vec<GeoPoint> = points
        .into_iter()
        .filter(|point| {
            let ok = validate_geo_point(point).is_ok();
            if !ok {
                dropped += 1;
            }
            ok
        })
        .collect();

    if dropped > 0 {
        log::debug!("Dropped {} points with unusable coordinates", dropped);
    }
    kept
}

/// Validates a viewport has finite edges and a sane latitude range.
pub fn validate_viewport(viewport: &Viewport) -> Result<()> {
    if !viewport.is_finite() {
        return Err(ClusterError::InvalidInput(format!(
            "Viewport edges must be finite: {:?}",
            viewport
        )));
    }
    if viewport.south > viewport.north {
        return Err(ClusterError::InvalidInput(format!(
            "Viewport south ({}) is above north ({})",
            viewport.south, viewport.north
        )));
    }
    Ok(())
}
