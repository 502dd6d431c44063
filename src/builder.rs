//! Index builder for flexible configuration
//!
//! This module provides a builder pattern for creating cluster indexes,
//! starting from defaults or from a configuration file.

use crate::compute::size::SizePolicy;
use crate::compute::validation::retain_valid;
use crate::error::Result;
use crate::index::ClusterIndex;
use crate::types::Config;
use std::path::Path;
use vibecluster_types::point::GeoPoint;

/// Builder for cluster index configuration.
#[derive(Debug, Clone, Default)]
pub struct ClusterIndexBuilder {
    config: Config,
    drop_invalid: bool,
}

impl ClusterIndexBuilder {
    /// Create a new builder with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a configuration file (JSON, or TOML with the `toml` feature).
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self::new().config(Config::from_path(path)?))
    }

    /// Replace the whole configuration.
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Merge radius in pixels.
    pub fn radius(mut self, radius: f64) -> Self {
        self.config.radius = radius;
        self
    }

    /// Tile size in pixels.
    pub fn extent(mut self, extent: f64) -> Self {
        self.config.extent = extent;
        self
    }

    pub fn min_zoom(mut self, zoom: u8) -> Self {
        self.config.min_zoom = zoom;
        self
    }

    pub fn max_zoom(mut self, zoom: u8) -> Self {
        self.config.max_zoom = zoom;
        self
    }

    /// Minimum group size that forms a cluster.
    pub fn min_points(mut self, min_points: u32) -> Self {
        self.config.min_points = min_points;
        self
    }

    /// Query padding in pixels.
    pub fn padding(mut self, padding: f64) -> Self {
        self.config.padding = padding;
        self
    }

    pub fn size_policy(mut self, size: SizePolicy) -> Self {
        self.config.size = size;
        self
    }

    /// Drop points with out-of-range or non-finite coordinates before building.
    pub fn drop_invalid_points(mut self, enabled: bool) -> Self {
        self.drop_invalid = enabled;
        self
    }

    /// Build the index. Fails if the configuration does not validate.
    pub fn build(self, points: Vec<GeoPoint>) -> Result<ClusterIndex> {
        let points = if self.drop_invalid {
            retain_valid(points)
        } else {
            points
        };
        ClusterIndex::with_config(points, self.config)
    }
}
