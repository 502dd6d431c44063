//! Zoom-aware point clustering for map rendering.
//!
//! Build a [`ClusterIndex`] once per point set, then ask it for the render
//! primitives (individual points or aggregated clusters) visible in a
//! viewport at any zoom. Every cluster carries a per-vibe breakdown of its
//! members for coloring and labeling.
//!
//! ```rust
//! use vibecluster::{ClusterIndex, GeoPoint, VibeCategory, Viewport};
//!
//! let index = ClusterIndex::new(vec![
//!     GeoPoint::new("cancun", -86.8515, 21.1619, VibeCategory::Beach, ""),
//!     GeoPoint::new("tulum", -87.4654, 20.2114, VibeCategory::Beach, ""),
//!     GeoPoint::new("cdmx", -99.1332, 19.4326, VibeCategory::Cultural, ""),
//! ])?;
//!
//! let world = index.query_viewport(&Viewport::world(0));
//! let total: u32 = world.iter().map(|r| r.count()).sum();
//! assert_eq!(total, 3);
//!
//! if let Some(cluster) = world[0].as_cluster() {
//!     let leaves = index.get_leaves(cluster.handle)?;
//!     assert_eq!(leaves.len() as u32, cluster.count);
//! }
//! # Ok::<(), vibecluster::ClusterError>(())
//! ```

pub mod builder;
pub mod compute;
pub mod error;
pub mod index;
pub mod layer;
mod spatial_index;
pub mod types;

pub use builder::ClusterIndexBuilder;
pub use error::{ClusterError, Result};
pub use index::{ClusterHandle, ClusterIndex, ClusterResult, ClusterSummary};
pub use layer::ClusterLayer;
pub use types::{Config, IndexStats, MAX_ZOOM_LIMIT};

pub use compute::aggregate::{ClusterAggregate, VibeCounts};
pub use compute::size::SizePolicy;
pub use compute::{geojson, validation};

pub use vibecluster_types::category::{UnknownCategory, VibeCategory};
pub use vibecluster_types::point::GeoPoint;
pub use vibecluster_types::viewport::Viewport;

pub use bytes::Bytes;
pub use geo::Rect;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common imports
pub mod prelude {

    pub use crate::{ClusterError, ClusterIndex, ClusterIndexBuilder, ClusterLayer, Result};

    pub use crate::{ClusterHandle, ClusterResult, ClusterSummary};

    pub use crate::{GeoPoint, VibeCategory, VibeCounts, Viewport};

    pub use crate::{Config, SizePolicy};

    pub use crate::{geojson, validation};
}
