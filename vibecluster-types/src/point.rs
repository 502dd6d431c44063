use crate::category::VibeCategory;
use bytes::Bytes;
use geo::Point;
use serde::{Deserialize, Serialize};

/// A geolocated destination.
///
/// The payload is opaque to the clustering engine: it is carried through
/// every query untouched so callers can recover the original entity.
///
/// # Examples
///
/// ```
/// use vibecluster_types::category::VibeCategory;
/// use vibecluster_types::point::GeoPoint;
///
/// let bali = GeoPoint::new("bali", 115.1889, -8.4095, VibeCategory::Beach, "Bali");
/// assert_eq!(bali.point().x(), 115.1889);
/// assert_eq!(bali.payload.as_ref(), b"Bali");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Identifier, unique across one input set
    pub id: String,
    /// Longitude in WGS84 degrees
    pub lon: f64,
    /// Latitude in WGS84 degrees
    pub lat: f64,
    /// Vibe category of the destination
    pub category: VibeCategory,
    /// Original entity, untouched by the engine
    pub payload: Bytes,
}

impl GeoPoint {
    /// Create a new point.
    ///
    /// # Arguments
    ///
    /// * `id` - Identifier, unique across the input set
    /// * `lon` - Longitude in degrees
    /// * `lat` - Latitude in degrees
    /// * `category` - Vibe category
    /// * `payload` - Opaque payload carried through queries
    pub fn new(
        id: impl Into<String>,
        lon: f64,
        lat: f64,
        category: VibeCategory,
        payload: impl Into<Bytes>,
    ) -> Self {
        Self {
            id: id.into(),
            lon,
            lat,
            category,
            payload: payload.into(),
        }
    }

    /// Create a point from possibly-missing coordinates.
    ///
    /// Returns `None` when either coordinate is absent, which is how entities
    /// without a resolved location are dropped before indexing.
    ///
    /// # Examples
    ///
    /// ```
    /// use vibecluster_types::category::VibeCategory;
    /// use vibecluster_types::point::GeoPoint;
    ///
    /// assert!(GeoPoint::from_parts("a", Some(1.0), None, VibeCategory::Nature, "").is_none());
    /// assert!(GeoPoint::from_parts("b", Some(1.0), Some(2.0), VibeCategory::Nature, "").is_some());
    /// ```
    pub fn from_parts(
        id: impl Into<String>,
        lon: Option<f64>,
        lat: Option<f64>,
        category: VibeCategory,
        payload: impl Into<Bytes>,
    ) -> Option<Self> {
        Some(Self::new(id, lon?, lat?, category, payload))
    }

    /// Position as a `geo::Point` (x = longitude, y = latitude).
    pub fn point(&self) -> Point<f64> {
        Point::new(self.lon, self.lat)
    }

    /// Whether both coordinates are finite numbers.
    pub fn has_finite_coordinates(&self) -> bool {
        self.lon.is_finite() && self.lat.is_finite()
    }
}
