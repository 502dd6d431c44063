//! Shared, rebuildable cluster layer.
//!
//! `ClusterLayer` holds the current `ClusterIndex` behind
//! `Arc<RwLock<Arc<ClusterIndex>>>`. Readers grab the current index and
//! query it without holding the lock; a rebuild swaps in a fresh index, after
//! which handles issued by the old one are rejected.
//!
//! # Examples
//!
//! ```rust
//! use vibecluster::{ClusterLayer, GeoPoint, VibeCategory, Viewport};
//! use std::thread;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let layer = ClusterLayer::new(vec![
//!     GeoPoint::new("a", -0.1276, 51.5072, VibeCategory::Nightlife, ""),
//!     GeoPoint::new("b", -0.1300, 51.5100, VibeCategory::Cultural, ""),
//! ])?;
//!
//! let reader = layer.clone();
//! let handle = thread::spawn(move || reader.query(&Viewport::world(2)).len());
//!
//! assert_eq!(handle.join().unwrap(), layer.query(&Viewport::world(2)).len());
//! # Ok(())
//! # }
//! ```

use crate::error::Result;
use crate::index::{ClusterHandle, ClusterIndex, ClusterResult, ClusterSummary};
use crate::types::Config;
use parking_lot::RwLock;
use std::sync::Arc;
use vibecluster_types::point::GeoPoint;
use vibecluster_types::viewport::Viewport;

/// Thread-safe holder of the current cluster index.
///
/// Cloning is cheap and clones share the same index.
#[derive(Clone)]
pub struct ClusterLayer {
    inner: Arc<RwLock<Arc<ClusterIndex>>>,
    config: Config,
}

impl ClusterLayer {
    /// Build a layer over `points` with the default configuration.
    pub fn new(points: Vec<GeoPoint>) -> Result<Self> {
        Self::with_config(points, Config::default())
    }

    pub fn with_config(points: Vec<GeoPoint>, config: Config) -> Result<Self> {
        let index = ClusterIndex::with_config(points, config.clone())?;
        Ok(Self {
            inner: Arc::new(RwLock::new(Arc::new(index))),
            config,
        })
    }

    /// The current index. Holding it keeps that build alive across rebuilds.
    pub fn snapshot(&self) -> Arc<ClusterIndex> {
        Arc::clone(&*self.inner.read())
    }

    /// Generation of the current index.
    pub fn generation(&self) -> u64 {
        self.inner.read().generation()
    }

    /// Rebuild from `points` unless they equal the current point set.
    ///
    /// Points the index would skip (non-finite coordinates) are left out of
    /// the comparison. Returns `true` if a new index was built.
    pub fn update(&self, points: Vec<GeoPoint>) -> Result<bool> {
        let unchanged = self
            .snapshot()
            .points()
            .iter()
            .eq(points.iter().filter(|p| p.has_finite_coordinates()));
        if unchanged {
            log::debug!("Cluster input unchanged, keeping current index");
            return Ok(false);
        }
        self.rebuild(points)?;
        Ok(true)
    }

    /// Rebuild from `points` unconditionally.
    ///
    /// The new index is built before the lock is taken, so readers are only
    /// blocked for the swap. On error the current index stays in place.
    pub fn rebuild(&self, points: Vec<GeoPoint>) -> Result<()> {
        let index = Arc::new(ClusterIndex::with_config(points, self.config.clone())?);
        *self.inner.write() = index;
        Ok(())
    }

    /// Primitives in the viewport, from the current index.
    pub fn query(&self, viewport: &Viewport) -> Vec<ClusterResult> {
        self.snapshot().query_viewport(viewport)
    }

    pub fn get_cluster(&self, handle: ClusterHandle) -> Result<ClusterSummary> {
        self.snapshot().get_cluster(handle)
    }

    /// Leaves of a cluster; fails if the handle predates the current index.
    pub fn get_leaves(&self, handle: ClusterHandle) -> Result<Vec<GeoPoint>> {
        self.snapshot().get_leaves(handle)
    }

    pub fn get_children(&self, handle: ClusterHandle) -> Result<Vec<ClusterResult>> {
        self.snapshot().get_children(handle)
    }

    pub fn expansion_zoom(&self, handle: ClusterHandle) -> Result<Option<u8>> {
        self.snapshot().expansion_zoom(handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClusterError;
    use vibecluster_types::category::VibeCategory;

    fn points() -> Vec<GeoPoint> {
        vec![
            GeoPoint::new("a", 100.0, 13.75, VibeCategory::Nightlife, ""),
            GeoPoint::new("b", 100.01, 13.76, VibeCategory::Cultural, ""),
            GeoPoint::new("c", 98.3, 7.88, VibeCategory::Beach, ""),
        ]
    }

    fn first_cluster(layer: &ClusterLayer) -> ClusterHandle {
        layer
            .query(&Viewport::world(0))
            .iter()
            .find_map(|r| r.as_cluster().map(|c| c.handle))
            .expect("a cluster at zoom 0")
    }

    #[test]
    fn test_update_skips_identical_input() {
        let layer = ClusterLayer::new(points()).unwrap();
        let generation = layer.generation();

        assert!(!layer.update(points()).unwrap());
        assert_eq!(layer.generation(), generation);
    }

    #[test]
    fn test_update_ignores_skipped_points() {
        let mut input = points();
        input.push(GeoPoint::new("lost", f64::NAN, 0.0, VibeCategory::Adventure, ""));
        let layer = ClusterLayer::new(input.clone()).unwrap();
        let generation = layer.generation();
        let handle = first_cluster(&layer);

        assert!(!layer.update(input).unwrap());
        assert_eq!(layer.generation(), generation);
        assert!(layer.get_leaves(handle).is_ok());
    }

    #[test]
    fn test_update_rebuilds_on_change() {
        let layer = ClusterLayer::new(points()).unwrap();
        let generation = layer.generation();

        let mut changed = points();
        changed[2].category = VibeCategory::Nature;
        assert!(layer.update(changed).unwrap());
        assert_ne!(layer.generation(), generation);
    }

    #[test]
    fn test_handles_invalid_after_rebuild() {
        let layer = ClusterLayer::new(points()).unwrap();
        let handle = first_cluster(&layer);
        assert_eq!(layer.get_leaves(handle).unwrap().len(), 3);

        layer.rebuild(points()).unwrap();
        assert!(matches!(
            layer.get_leaves(handle),
            Err(ClusterError::InvalidHandle { .. })
        ));
    }

    #[test]
    fn test_snapshot_outlives_rebuild() {
        let layer = ClusterLayer::new(points()).unwrap();
        let old = layer.snapshot();
        let handle = first_cluster(&layer);

        layer.rebuild(points()).unwrap();

        // the old build still answers for its own handles
        assert!(old.get_leaves(handle).is_ok());
        assert!(layer.get_leaves(handle).is_err());
    }

    #[test]
    fn test_rebuild_to_empty_set() {
        let layer = ClusterLayer::new(points()).unwrap();
        let generation = layer.generation();

        assert!(layer.update(Vec::new()).unwrap());
        assert_ne!(layer.generation(), generation);
        assert!(layer.query(&Viewport::world(0)).is_empty());
    }

    #[test]
    fn test_clones_share_index() {
        let layer = ClusterLayer::new(points()).unwrap();
        let clone = layer.clone();
        layer.rebuild(points()).unwrap();
        assert_eq!(clone.generation(), layer.generation());
    }
}
