//! Per-zoom R-tree over projected node positions.
//!
//! Each zoom level of a cluster index holds the primitives visible at that
//! zoom (unclustered points and clusters) together with an R-tree keyed by
//! their projected position. The tree payload is the node's slot in the
//! level, so query results can be put back in level order.

use rstar::primitives::GeomWithData;
use rstar::{AABB, RTree};

/// A primitive stored in a zoom level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum NodeRef {
    /// Index into the indexed points
    Leaf(u32),
    /// Index into the cluster arena
    Cluster(u32),
}

type IndexedNode = GeomWithData<[f64; 2], usize>;

/// Primitives present at one zoom level.
pub(crate) struct ZoomLevel {
    nodes: Vec<NodeRef>,
    tree: RTree<IndexedNode>,
}

impl ZoomLevel {
    /// Bulk-load a level. `positions[i]` is the projected position of `nodes[i]`.
    pub(crate) fn new(nodes: Vec<NodeRef>, positions: &[[f64; 2]]) -> Self {
        debug_assert_eq!(nodes.len(), positions.len());
        let entries = positions
            .iter()
            .enumerate()
            .map(|(slot, pos)| IndexedNode::new(*pos, slot))
            .collect();
        Self {
            nodes,
            tree: RTree::bulk_load(entries),
        }
    }

    pub(crate) fn nodes(&self) -> &[NodeRef] {
        &self.nodes
    }

    pub(crate) fn node(&self, slot: usize) -> NodeRef {
        self.nodes[slot]
    }

    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Slots within `radius` of `center` (inclusive), in ascending slot order.
    pub(crate) fn within_distance(&self, center: [f64; 2], radius: f64) -> Vec<usize> {
        let mut slots: Vec<usize> = self
            .tree
            .locate_within_distance(center, radius * radius)
            .map(|entry| entry.data)
            .collect();
        slots.sort_unstable();
        slots
    }

    /// Slots inside the box `[min, max]` (edges included), in tree order.
    pub(crate) fn in_box(&self, min: [f64; 2], max: [f64; 2]) -> impl Iterator<Item = usize> + '_ {
        let envelope = AABB::from_corners(min, max);
        self.tree
            .locate_in_envelope(&envelope)
            .map(|entry| entry.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn level(positions: &[[f64; 2]]) -> ZoomLevel {
        let nodes = (0..positions.len() as u32).map(NodeRef::Leaf).collect();
        ZoomLevel::new(nodes, positions)
    }

    #[test]
    fn test_within_distance_is_sorted_and_inclusive() {
        let lvl = level(&[[0.5, 0.5], [0.1, 0.1], [0.5, 0.6], [0.5, 0.4]]);
        assert_eq!(lvl.within_distance([0.5, 0.5], 0.1), vec![0, 2, 3]);
        assert_eq!(lvl.within_distance([0.1, 0.1], 0.0), vec![1]);
    }

    #[test]
    fn test_in_box_includes_edges() {
        let lvl = level(&[[0.25, 0.25], [0.75, 0.75], [0.9, 0.1]]);
        let mut slots: Vec<_> = lvl.in_box([0.25, 0.25], [0.75, 0.75]).collect();
        slots.sort_unstable();
        assert_eq!(slots, vec![0, 1]);
    }

    #[test]
    fn test_empty_level() {
        let lvl = level(&[]);
        assert_eq!(lvl.len(), 0);
        assert!(lvl.within_distance([0.5, 0.5], 1.0).is_empty());
        assert_eq!(lvl.in_box([0.0, 0.0], [1.0, 1.0]).count(), 0);
    }
}
