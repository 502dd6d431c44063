//! Cluster aggregation.
//!
//! Aggregates are immutable values combined with a pure, associative
//! [`ClusterAggregate::merge`]. A cluster's aggregate is the merge of its
//! children's aggregates, so category counts and member totals are conserved
//! at every level of the hierarchy.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use vibecluster_types::category::VibeCategory;

/// Per-category member counts, stored in canonical category order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(
    from = "BTreeMap<VibeCategory, u32>",
    into = "BTreeMap<VibeCategory, u32>"
)]
pub struct VibeCounts([u32; VibeCategory::COUNT]);

impl VibeCounts {
    /// Counts for a single member of `category`.
    pub fn single(category: VibeCategory) -> Self {
        let mut counts = [0; VibeCategory::COUNT];
        counts[category.index()] = 1;
        Self(counts)
    }

    pub fn get(&self, category: VibeCategory) -> u32 {
        self.0[category.index()]
    }

    /// Sum over all categories.
    pub fn total(&self) -> u32 {
        self.0.iter().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Entrywise sum.
    #[must_use]
    pub fn merge(self, other: Self) -> Self {
        let mut counts = self.0;
        for (slot, add) in counts.iter_mut().zip(other.0) {
            *slot += add;
        }
        Self(counts)
    }

    /// Category with the highest count.
    ///
    /// Ties go to the category that comes first in canonical order. Returns
    /// `None` when every count is zero.
    ///
    /// # Examples
    ///
    /// ```
    /// use vibecluster::VibeCounts;
    /// use vibecluster::VibeCategory;
    ///
    /// let counts: VibeCounts = [VibeCategory::Nature, VibeCategory::Beach].into_iter().collect();
    /// assert_eq!(counts.dominant(), Some(VibeCategory::Beach));
    /// ```
    pub fn dominant(&self) -> Option<VibeCategory> {
        let mut best: Option<(VibeCategory, u32)> = None;
        for (category, count) in self.iter() {
            if count == 0 {
                continue;
            }
            match best {
                Some((_, best_count)) if best_count >= count => {}
                _ => best = Some((category, count)),
            }
        }
        best.map(|(category, _)| category)
    }

    /// Iterate `(category, count)` pairs in canonical order, zeros included.
    pub fn iter(&self) -> impl Iterator<Item = (VibeCategory, u32)> + '_ {
        VibeCategory::ALL
            .iter()
            .map(move |category| (*category, self.0[category.index()]))
    }
}

impl FromIterator<VibeCategory> for VibeCounts {
    fn from_iter<I: IntoIterator<Item = VibeCategory>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::default(), |acc, category| acc.merge(Self::single(category)))
    }
}

impl From<BTreeMap<VibeCategory, u32>> for VibeCounts {
    fn from(map: BTreeMap<VibeCategory, u32>) -> Self {
        let mut counts = [0; VibeCategory::COUNT];
        for (category, count) in map {
            counts[category.index()] = count;
        }
        Self(counts)
    }
}

impl From<VibeCounts> for BTreeMap<VibeCategory, u32> {
    fn from(counts: VibeCounts) -> Self {
        counts.iter().filter(|(_, count)| *count > 0).collect()
    }
}

/// Running aggregate for a group of nodes merged into one cluster.
///
/// Positions are held as count-weighted sums so merging stays associative;
/// the centroid is only divided out at the end.
///
/// Latitude is summed in degrees next to the projected position. Mercator
/// clamps everything poleward of about 85.05° to the edge of the unit square,
/// so the reported latitude cannot be recovered from the projected centroid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClusterAggregate {
    weighted_x: f64,
    weighted_y: f64,
    weighted_lat: f64,
    num_points: u32,
    vibes: VibeCounts,
}

impl ClusterAggregate {
    /// Aggregate of one node at projected position `(x, y)` and latitude `lat`.
    pub fn of_node(x: f64, y: f64, lat: f64, num_points: u32, vibes: VibeCounts) -> Self {
        let weight = f64::from(num_points);
        Self {
            weighted_x: x * weight,
            weighted_y: y * weight,
            weighted_lat: lat * weight,
            num_points,
            vibes,
        }
    }

    /// Combine two aggregates into a new one.
    #[must_use]
    pub fn merge(self, other: Self) -> Self {
        Self {
            weighted_x: self.weighted_x + other.weighted_x,
            weighted_y: self.weighted_y + other.weighted_y,
            weighted_lat: self.weighted_lat + other.weighted_lat,
            num_points: self.num_points + other.num_points,
            vibes: self.vibes.merge(other.vibes),
        }
    }

    /// Count-weighted mean position in projected units.
    pub fn centroid(&self) -> (f64, f64) {
        let weight = f64::from(self.num_points.max(1));
        (self.weighted_x / weight, self.weighted_y / weight)
    }

    /// Count-weighted mean latitude in degrees.
    pub fn mean_lat(&self) -> f64 {
        self.weighted_lat / f64::from(self.num_points.max(1))
    }

    pub fn num_points(&self) -> u32 {
        self.num_points
    }

    pub fn vibes(&self) -> VibeCounts {
        self.vibes
    }
}
