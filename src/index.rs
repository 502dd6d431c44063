//! Hierarchical cluster index.
//!
//! `ClusterIndex` is built once from a point set and then answers viewport
//! queries at any zoom in its configured range. Building runs a greedy
//! clustering pass per zoom, from the finest level down to the coarsest:
//!
//! 1. The raw points form the level just above `max_zoom`.
//! 2. For zoom `z`, every node of level `z + 1` that has not been claimed yet
//!    collects its unclaimed neighbours within `radius` pixels (converted to
//!    projected units at `z`).
//! 3. If the group holds at least `min_points` points it becomes a cluster,
//!    whose aggregate is the merge of its members' aggregates; otherwise its
//!    nodes pass through to level `z` unchanged.
//!
//! Nodes are visited in input order and each group is folded in ascending
//! slot order, so the same input and configuration always produce the same
//! hierarchy.
//!
//! Cluster handles carry the generation of the build that issued them. Every
//! build draws a fresh generation, so a handle can never resolve against an
//! index it did not come from.

use crate::compute::aggregate::{ClusterAggregate, VibeCounts};
use crate::compute::projection::{lat_y, lng_x, pixels_to_units, wrap_lng, x_lng};
use crate::error::{ClusterError, Result};
use crate::spatial_index::{NodeRef, ZoomLevel};
use crate::types::{Config, IndexStats};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use smallvec::{SmallVec, smallvec};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use vibecluster_types::category::VibeCategory;
use vibecluster_types::point::GeoPoint;
use vibecluster_types::viewport::Viewport;

static NEXT_GENERATION: AtomicU64 = AtomicU64::new(1);

/// Opaque reference to a cluster, valid only for the build that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClusterHandle {
    generation: u64,
    slot: u32,
}

impl ClusterHandle {
    /// Generation of the index build this handle came from.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl fmt::Display for ClusterHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.generation, self.slot)
    }
}

/// An aggregated primitive standing in for several nearby points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterSummary {
    /// Synthetic id, unique within one build
    pub id: u64,
    /// Handle for expanding this cluster later
    pub handle: ClusterHandle,
    /// Centroid longitude
    pub lon: f64,
    /// Centroid latitude
    pub lat: f64,
    /// Number of points in the cluster (at least 2)
    pub count: u32,
    /// Members per category; sums to `count`
    pub vibes: VibeCounts,
}

impl ClusterSummary {
    /// Category with the most members, ties broken by canonical order.
    pub fn dominant_vibe(&self) -> Option<VibeCategory> {
        self.vibes.dominant()
    }
}

/// A render primitive returned by a query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClusterResult {
    Cluster(ClusterSummary),
    Leaf(GeoPoint),
}

impl ClusterResult {
    /// Number of input points this primitive stands for.
    pub fn count(&self) -> u32 {
        match self {
            ClusterResult::Cluster(cluster) => cluster.count,
            ClusterResult::Leaf(_) => 1,
        }
    }

    /// Per-category counts; a leaf counts once in its own category.
    pub fn vibes(&self) -> VibeCounts {
        match self {
            ClusterResult::Cluster(cluster) => cluster.vibes,
            ClusterResult::Leaf(point) => VibeCounts::single(point.category),
        }
    }

    /// Longitude and latitude of the primitive.
    pub fn position(&self) -> (f64, f64) {
        match self {
            ClusterResult::Cluster(cluster) => (cluster.lon, cluster.lat),
            ClusterResult::Leaf(point) => (point.lon, point.lat),
        }
    }

    pub fn as_cluster(&self) -> Option<&ClusterSummary> {
        match self {
            ClusterResult::Cluster(cluster) => Some(cluster),
            ClusterResult::Leaf(_) => None,
        }
    }

    pub fn as_leaf(&self) -> Option<&GeoPoint> {
        match self {
            ClusterResult::Cluster(_) => None,
            ClusterResult::Leaf(point) => Some(point),
        }
    }
}

struct ClusterNode {
    x: f64,
    y: f64,
    /// Mean member latitude in degrees
    lat: f64,
    /// Finest zoom at which the cluster is visible
    zoom: u8,
    num_points: u32,
    vibes: VibeCounts,
    children: SmallVec<[NodeRef; 4]>,
}

/// Immutable multi-zoom cluster index over a point set.
///
/// # Examples
///
/// ```
/// use vibecluster::{ClusterIndex, GeoPoint, VibeCategory, Viewport};
///
/// let points = vec![
///     GeoPoint::new("a", 2.35, 48.85, VibeCategory::Romantic, "Paris"),
///     GeoPoint::new("b", 2.36, 48.86, VibeCategory::Cultural, "Marais"),
/// ];
/// let index = ClusterIndex::new(points)?;
///
/// let results = index.query_viewport(&Viewport::world(0));
/// assert_eq!(results.len(), 1);
/// assert_eq!(results[0].count(), 2);
/// # Ok::<(), vibecluster::ClusterError>(())
/// ```
pub struct ClusterIndex {
    config: Config,
    generation: u64,
    points: Vec<GeoPoint>,
    projected: Vec<[f64; 2]>,
    clusters: Vec<ClusterNode>,
    /// `levels[z - min_zoom]` for `z` in `min_zoom..=max_zoom`, then the raw points
    levels: Vec<ZoomLevel>,
}

impl ClusterIndex {
    /// Build an index with the default configuration.
    pub fn new(points: Vec<GeoPoint>) -> Result<Self> {
        Self::with_config(points, Config::default())
    }

    /// Build an index with a custom configuration.
    ///
    /// Points with non-finite coordinates are skipped with a warning; callers
    /// are expected to filter them out beforehand. Longitudes outside
    /// [-180, 180] are wrapped for placement, and the point itself is
    /// returned unchanged.
    pub fn with_config(points: Vec<GeoPoint>, config: Config) -> Result<Self> {
        config.validate()?;

        let input_len = points.len();
        let points: Vec<GeoPoint> = points
            .into_iter()
            .filter(GeoPoint::has_finite_coordinates)
            .collect();
        if points.len() < input_len {
            log::warn!(
                "Skipping {} points with non-finite coordinates",
                input_len - points.len()
            );
        }
        if u32::try_from(points.len()).is_err() {
            return Err(ClusterError::InvalidInput(format!(
                "Too many points to index: {}",
                points.len()
            )));
        }

        let mut seen = FxHashSet::default();
        for point in &points {
            if !seen.insert(point.id.as_str()) {
                log::warn!("Duplicate point id '{}' in cluster input", point.id);
            }
        }

        let projected = points
            .iter()
            .map(|p| [lng_x(normalize_lng(p.lon)), lat_y(p.lat)])
            .collect();

        let mut index = Self {
            config,
            generation: NEXT_GENERATION.fetch_add(1, Ordering::Relaxed),
            points,
            projected,
            clusters: Vec::new(),
            levels: Vec::new(),
        };
        index.build_levels();

        log::debug!(
            "Built cluster index generation {} over {} points: {} clusters across zooms {}..={}",
            index.generation,
            index.points.len(),
            index.clusters.len(),
            index.config.min_zoom,
            index.config.max_zoom
        );

        Ok(index)
    }

    fn build_levels(&mut self) {
        let leaves = (0..self.points.len() as u32).map(NodeRef::Leaf).collect();
        let mut level = self.make_level(leaves);

        let mut levels = Vec::with_capacity(usize::from(self.config.max_zoom - self.config.min_zoom) + 2);
        for zoom in (self.config.min_zoom..=self.config.max_zoom).rev() {
            let coarser = self.cluster_level(&level, zoom);
            levels.push(level);
            level = coarser;
        }
        levels.push(level);
        levels.reverse();

        self.levels = levels;
    }

    fn make_level(&self, nodes: Vec<NodeRef>) -> ZoomLevel {
        let positions: Vec<[f64; 2]> = nodes.iter().map(|node| self.position(*node)).collect();
        ZoomLevel::new(nodes, &positions)
    }

    /// Cluster the nodes of the next finer level into the level for `zoom`.
    fn cluster_level(&mut self, finer: &ZoomLevel, zoom: u8) -> ZoomLevel {
        let radius = pixels_to_units(self.config.radius, self.config.extent, zoom);
        let mut claimed = vec![false; finer.len()];
        let mut nodes = Vec::with_capacity(finer.len());

        for slot in 0..finer.len() {
            if claimed[slot] {
                continue;
            }
            claimed[slot] = true;

            let node = finer.node(slot);
            let neighbors: SmallVec<[usize; 8]> = finer
                .within_distance(self.position(node), radius)
                .into_iter()
                .filter(|&other| !claimed[other])
                .collect();
            for &other in &neighbors {
                claimed[other] = true;
            }

            let num_points = self.weight(node)
                + neighbors
                    .iter()
                    .map(|&other| self.weight(finer.node(other)))
                    .sum::<u32>();

            if neighbors.is_empty() || num_points < self.config.min_points {
                nodes.push(node);
                nodes.extend(neighbors.iter().map(|&other| finer.node(other)));
                continue;
            }

            let aggregate = neighbors
                .iter()
                .fold(self.aggregate(node), |acc, &other| {
                    acc.merge(self.aggregate(finer.node(other)))
                });
            let (x, y) = aggregate.centroid();

            let mut children: SmallVec<[NodeRef; 4]> = smallvec![node];
            children.extend(neighbors.iter().map(|&other| finer.node(other)));

            let id = self.clusters.len() as u32;
            self.clusters.push(ClusterNode {
                x,
                y,
                lat: aggregate.mean_lat(),
                zoom,
                num_points: aggregate.num_points(),
                vibes: aggregate.vibes(),
                children,
            });
            nodes.push(NodeRef::Cluster(id));
        }

        self.make_level(nodes)
    }

    fn position(&self, node: NodeRef) -> [f64; 2] {
        match node {
            NodeRef::Leaf(i) => self.projected[i as usize],
            NodeRef::Cluster(i) => {
                let cluster = &self.clusters[i as usize];
                [cluster.x, cluster.y]
            }
        }
    }

    fn weight(&self, node: NodeRef) -> u32 {
        match node {
            NodeRef::Leaf(_) => 1,
            NodeRef::Cluster(i) => self.clusters[i as usize].num_points,
        }
    }

    fn aggregate(&self, node: NodeRef) -> ClusterAggregate {
        let [x, y] = self.position(node);
        let (lat, vibes) = match node {
            NodeRef::Leaf(i) => {
                let point = &self.points[i as usize];
                (point.lat, VibeCounts::single(point.category))
            }
            NodeRef::Cluster(i) => {
                let cluster = &self.clusters[i as usize];
                (cluster.lat, cluster.vibes)
            }
        };
        ClusterAggregate::of_node(x, y, lat, self.weight(node), vibes)
    }

    fn level(&self, zoom: u8) -> &ZoomLevel {
        &self.levels[usize::from(zoom - self.config.min_zoom)]
    }

    /// Primitives intersecting a bounding box at `zoom`.
    ///
    /// The zoom is clamped into the configured range. The box is widened by
    /// the configured padding, so primitives on or just past an edge are
    /// kept. `west > east` selects a box crossing the antimeridian; a span of
    /// 360° or more covers every longitude. Non-finite bounds yield nothing.
    pub fn query(&self, west: f64, south: f64, east: f64, north: f64, zoom: i32) -> Vec<ClusterResult> {
        if ![west, south, east, north].iter().all(|v| v.is_finite()) {
            log::warn!("Rejecting cluster query with non-finite bounds");
            return Vec::new();
        }

        let zoom = self.config.clamp_zoom(zoom);
        let level = self.level(zoom);
        let pad = pixels_to_units(self.config.padding, self.config.extent, zoom);

        let (mut south, mut north) = (south.clamp(-90.0, 90.0), north.clamp(-90.0, 90.0));
        if south > north {
            std::mem::swap(&mut south, &mut north);
        }
        let min_y = lat_y(north) - pad;
        let max_y = lat_y(south) + pad;

        let mut slots: Vec<usize> = if east - west >= 360.0 {
            level.in_box([-pad, min_y], [1.0 + pad, max_y]).collect()
        } else {
            let (west, east) = (normalize_lng(west), normalize_lng(east));
            if west > east {
                level
                    .in_box([lng_x(west) - pad, min_y], [1.0 + pad, max_y])
                    .chain(level.in_box([-pad, min_y], [lng_x(east) + pad, max_y]))
                    .collect()
            } else {
                level
                    .in_box([lng_x(west) - pad, min_y], [lng_x(east) + pad, max_y])
                    .collect()
            }
        };
        slots.sort_unstable();
        slots.dedup();

        slots
            .into_iter()
            .map(|slot| self.materialize(level.node(slot)))
            .collect()
    }

    /// Primitives intersecting a viewport.
    pub fn query_viewport(&self, viewport: &Viewport) -> Vec<ClusterResult> {
        self.query(
            viewport.west,
            viewport.south,
            viewport.east,
            viewport.north,
            viewport.zoom,
        )
    }

    /// Every primitive at `zoom`, regardless of position.
    pub fn query_all(&self, zoom: i32) -> Vec<ClusterResult> {
        let level = self.level(self.config.clamp_zoom(zoom));
        level
            .nodes()
            .iter()
            .map(|node| self.materialize(*node))
            .collect()
    }

    fn materialize(&self, node: NodeRef) -> ClusterResult {
        match node {
            NodeRef::Leaf(i) => ClusterResult::Leaf(self.points[i as usize].clone()),
            NodeRef::Cluster(i) => ClusterResult::Cluster(self.summary(i)),
        }
    }

    fn summary(&self, slot: u32) -> ClusterSummary {
        let cluster = &self.clusters[slot as usize];
        ClusterSummary {
            id: u64::from(slot),
            handle: ClusterHandle {
                generation: self.generation,
                slot,
            },
            lon: x_lng(cluster.x),
            lat: cluster.lat,
            count: cluster.num_points,
            vibes: cluster.vibes,
        }
    }

    fn resolve(&self, handle: ClusterHandle) -> Result<&ClusterNode> {
        if handle.generation != self.generation {
            return Err(ClusterError::InvalidHandle {
                handle,
                current: self.generation,
            });
        }
        self.clusters
            .get(handle.slot as usize)
            .ok_or(ClusterError::InvalidHandle {
                handle,
                current: self.generation,
            })
    }

    /// Whether `handle` was issued by this build.
    pub fn owns(&self, handle: ClusterHandle) -> bool {
        self.resolve(handle).is_ok()
    }

    /// Summary for a cluster handle.
    pub fn get_cluster(&self, handle: ClusterHandle) -> Result<ClusterSummary> {
        self.resolve(handle)?;
        Ok(self.summary(handle.slot))
    }

    /// All original points under a cluster, depth-first in child order.
    pub fn get_leaves(&self, handle: ClusterHandle) -> Result<Vec<GeoPoint>> {
        let cluster = self.resolve(handle)?;
        Ok(self
            .leaf_indices(cluster)
            .into_iter()
            .map(|i| self.points[i as usize].clone())
            .collect())
    }

    /// A page of [`get_leaves`](Self::get_leaves): `limit` points after skipping `offset`.
    pub fn get_leaves_page(
        &self,
        handle: ClusterHandle,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<GeoPoint>> {
        let cluster = self.resolve(handle)?;
        Ok(self
            .leaf_indices(cluster)
            .into_iter()
            .skip(offset)
            .take(limit)
            .map(|i| self.points[i as usize].clone())
            .collect())
    }

    fn leaf_indices(&self, cluster: &ClusterNode) -> Vec<u32> {
        let mut leaves = Vec::with_capacity(cluster.num_points as usize);
        let mut stack: Vec<NodeRef> = cluster.children.iter().rev().copied().collect();
        while let Some(node) = stack.pop() {
            match node {
                NodeRef::Leaf(i) => leaves.push(i),
                NodeRef::Cluster(i) => {
                    stack.extend(self.clusters[i as usize].children.iter().rev().copied());
                }
            }
        }
        leaves
    }

    /// Immediate children of a cluster, one zoom level finer.
    pub fn get_children(&self, handle: ClusterHandle) -> Result<Vec<ClusterResult>> {
        let cluster = self.resolve(handle)?;
        Ok(cluster
            .children
            .iter()
            .map(|node| self.materialize(*node))
            .collect())
    }

    /// Zoom at which the cluster breaks up into its children.
    ///
    /// `None` when the cluster still exists at `max_zoom`, the finest zoom
    /// queries can reach.
    pub fn expansion_zoom(&self, handle: ClusterHandle) -> Result<Option<u8>> {
        let cluster = self.resolve(handle)?;
        Ok((cluster.zoom < self.config.max_zoom).then(|| cluster.zoom + 1))
    }

    /// Display size for a primitive under the configured size policy.
    pub fn display_size(&self, result: &ClusterResult) -> f64 {
        self.config.size.display_size(result.count())
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Points the index was built over, in input order.
    pub fn points(&self) -> &[GeoPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn stats(&self) -> IndexStats {
        IndexStats {
            generation: self.generation,
            num_points: self.points.len(),
            num_clusters: self.clusters.len(),
            primitives_per_zoom: (self.config.min_zoom..=self.config.max_zoom)
                .map(|zoom| (zoom, self.level(zoom).len()))
                .collect(),
        }
    }
}

/// Bring a longitude into [-180, 180], leaving in-range values untouched.
fn normalize_lng(lng: f64) -> f64 {
    if (-180.0..=180.0).contains(&lng) {
        lng
    } else {
        wrap_lng(lng)
    }
}

impl fmt::Debug for ClusterIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClusterIndex")
            .field("generation", &self.generation)
            .field("points", &self.points.len())
            .field("clusters", &self.clusters.len())
            .field("config", &self.config)
            .finish()
    }
}
