use geo::Rect;
use serde::{Deserialize, Serialize};

/// A map viewport: a bounding box in degrees plus an integer zoom level.
///
/// Zoom 0 shows the whole world; each step doubles the level of detail.
/// A viewport whose `west` edge is greater than its `east` edge crosses the
/// antimeridian.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Western longitude edge
    pub west: f64,
    /// Southern latitude edge
    pub south: f64,
    /// Eastern longitude edge
    pub east: f64,
    /// Northern latitude edge
    pub north: f64,
    /// Zoom level (0 = whole world)
    pub zoom: i32,
}

impl Viewport {
    /// Create a new viewport.
    ///
    /// # Examples
    ///
    /// ```
    /// use vibecluster_types::viewport::Viewport;
    ///
    /// let manhattan = Viewport::new(-74.0479, 40.6829, -73.9067, 40.8820, 12);
    /// assert!(!manhattan.crosses_antimeridian());
    /// ```
    pub fn new(west: f64, south: f64, east: f64, north: f64, zoom: i32) -> Self {
        Self {
            west,
            south,
            east,
            north,
            zoom,
        }
    }

    /// A viewport covering the whole world at the given zoom.
    pub fn world(zoom: i32) -> Self {
        Self::new(-180.0, -90.0, 180.0, 90.0, zoom)
    }

    /// Build a viewport from a `geo::Rect` (never crosses the antimeridian).
    pub fn from_rect(rect: Rect, zoom: i32) -> Self {
        Self::new(rect.min().x, rect.min().y, rect.max().x, rect.max().y, zoom)
    }

    /// Same bounds at another zoom level.
    pub fn with_zoom(self, zoom: i32) -> Self {
        Self { zoom, ..self }
    }

    /// Whether the box wraps across the 180th meridian.
    pub fn crosses_antimeridian(&self) -> bool {
        self.west > self.east
    }

    /// Check if a coordinate lies within the viewport, edges included.
    ///
    /// # Examples
    ///
    /// ```
    /// use vibecluster_types::viewport::Viewport;
    ///
    /// let pacific = Viewport::new(170.0, -20.0, -170.0, 20.0, 3);
    /// assert!(pacific.contains(175.0, 0.0));
    /// assert!(pacific.contains(-175.0, 0.0));
    /// assert!(!pacific.contains(0.0, 0.0));
    /// ```
    pub fn contains(&self, lon: f64, lat: f64) -> bool {
        if lat < self.south || lat > self.north {
            return false;
        }
        if self.crosses_antimeridian() {
            lon >= self.west || lon <= self.east
        } else {
            lon >= self.west && lon <= self.east
        }
    }

    /// Check that every edge is a finite number.
    pub fn is_finite(&self) -> bool {
        [self.west, self.south, self.east, self.north]
            .iter()
            .all(|v| v.is_finite())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edges_are_inclusive() {
        let vp = Viewport::new(-10.0, -5.0, 10.0, 5.0, 4);
        assert!(vp.contains(-10.0, -5.0));
        assert!(vp.contains(10.0, 5.0));
        assert!(!vp.contains(10.000001, 0.0));
    }

    #[test]
    fn test_from_rect_normalizes_corners() {
        let rect = Rect::new(geo::coord! { x: 5.0, y: 8.0 }, geo::coord! { x: -5.0, y: -8.0 });
        let vp = Viewport::from_rect(rect, 2);
        assert_eq!((vp.west, vp.south, vp.east, vp.north), (-5.0, -8.0, 5.0, 8.0));
    }

    #[test]
    fn test_non_finite_edges() {
        assert!(Viewport::world(0).is_finite());
        assert!(!Viewport::new(f64::NAN, 0.0, 1.0, 1.0, 0).is_finite());
    }
}
