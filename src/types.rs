//! Configuration and statistics types.
//!
//! `Config` is serializable so it can be loaded from JSON or TOML alongside
//! the rest of an application's settings.

use crate::compute::size::SizePolicy;
use crate::error::{ClusterError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Highest zoom level an index may be configured for.
pub const MAX_ZOOM_LIMIT: u8 = 24;

/// Clustering configuration.
///
/// # Example
///
/// ```rust
/// use vibecluster::Config;
///
/// // Create default config
/// let config = Config::default();
/// assert_eq!(config.radius, 75.0);
///
/// // Load from JSON
/// let json = r#"{
///     "radius": 60,
///     "max_zoom": 14
/// }"#;
/// let config = Config::from_json(json).unwrap();
/// assert_eq!(config.max_zoom, 14);
/// assert_eq!(config.min_points, 2);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Merge radius in pixels
    #[serde(default = "Config::default_radius")]
    pub radius: f64,

    /// Tile size in pixels; the world spans `extent * 2^zoom` pixels at a zoom
    #[serde(default = "Config::default_extent")]
    pub extent: f64,

    /// Coarsest zoom level that gets a cluster level
    #[serde(default)]
    pub min_zoom: u8,

    /// Finest zoom level that gets a cluster level
    #[serde(default = "Config::default_max_zoom")]
    pub max_zoom: u8,

    /// Minimum number of points that may form a cluster
    #[serde(default = "Config::default_min_points")]
    pub min_points: u32,

    /// Margin in pixels added around query bounds
    #[serde(default = "Config::default_padding")]
    pub padding: f64,

    /// Display size derivation for rendering
    #[serde(default)]
    pub size: SizePolicy,
}

impl Config {
    const fn default_radius() -> f64 {
        75.0
    }

    const fn default_extent() -> f64 {
        256.0
    }

    const fn default_max_zoom() -> u8 {
        16
    }

    const fn default_min_points() -> u32 {
        2
    }

    const fn default_padding() -> f64 {
        75.0
    }

    pub fn with_radius(mut self, radius: f64) -> Self {
        self.radius = radius;
        self
    }

    pub fn with_extent(mut self, extent: f64) -> Self {
        self.extent = extent;
        self
    }

    pub fn with_zoom_range(mut self, min_zoom: u8, max_zoom: u8) -> Self {
        self.min_zoom = min_zoom;
        self.max_zoom = max_zoom;
        self
    }

    pub fn with_min_points(mut self, min_points: u32) -> Self {
        self.min_points = min_points;
        self
    }

    pub fn with_padding(mut self, padding: f64) -> Self {
        self.padding = padding;
        self
    }

    pub fn with_size_policy(mut self, size: SizePolicy) -> Self {
        self.size = size;
        self
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if !self.radius.is_finite() || self.radius < 0.0 {
            return Err(ClusterError::InvalidConfig(format!(
                "Radius must be finite and non-negative, got: {}",
                self.radius
            )));
        }

        if !self.extent.is_finite() || self.extent <= 0.0 {
            return Err(ClusterError::InvalidConfig(format!(
                "Extent must be finite and positive, got: {}",
                self.extent
            )));
        }

        if !self.padding.is_finite() || self.padding < 0.0 {
            return Err(ClusterError::InvalidConfig(format!(
                "Padding must be finite and non-negative, got: {}",
                self.padding
            )));
        }

        if self.min_zoom > self.max_zoom {
            return Err(ClusterError::InvalidConfig(format!(
                "min_zoom ({}) exceeds max_zoom ({})",
                self.min_zoom, self.max_zoom
            )));
        }

        if self.max_zoom > MAX_ZOOM_LIMIT {
            return Err(ClusterError::InvalidConfig(format!(
                "max_zoom must be at most {}, got: {}",
                MAX_ZOOM_LIMIT, self.max_zoom
            )));
        }

        if self.min_points < 2 {
            return Err(ClusterError::InvalidConfig(
                "min_points must be at least 2".to_string(),
            ));
        }

        self.size.validate()
    }

    /// Clamp a requested zoom into `[min_zoom, max_zoom]`.
    pub fn clamp_zoom(&self, zoom: i32) -> u8 {
        let clamped = zoom.clamp(i32::from(self.min_zoom), i32::from(self.max_zoom));
        if clamped != zoom {
            log::debug!(
                "Zoom {} outside [{}, {}], clamped to {}",
                zoom,
                self.min_zoom,
                self.max_zoom,
                clamped
            );
        }
        // in range of u8 after the clamp above
        clamped as u8
    }

    /// Load configuration from JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration as JSON string
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load configuration from TOML string (requires toml feature)
    #[cfg(feature = "toml")]
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let config: Config = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration as TOML string (requires toml feature)
    #[cfg(feature = "toml")]
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Load configuration from a file, picking the format by extension.
    ///
    /// `.toml` files need the `toml` feature; anything else is read as JSON.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;

        match path.extension().and_then(|ext| ext.to_str()) {
            #[cfg(feature = "toml")]
            Some("toml") => Self::from_toml(&contents),
            #[cfg(not(feature = "toml"))]
            Some("toml") => Err(ClusterError::InvalidConfig(format!(
                "{} is TOML but the `toml` feature is disabled",
                path.display()
            ))),
            _ => Self::from_json(&contents),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            radius: Self::default_radius(),
            extent: Self::default_extent(),
            min_zoom: 0,
            max_zoom: Self::default_max_zoom(),
            min_points: Self::default_min_points(),
            padding: Self::default_padding(),
            size: SizePolicy::default(),
        }
    }
}

/// Summary of a built index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexStats {
    /// Build generation of the index
    pub generation: u64,
    /// Number of points indexed
    pub num_points: usize,
    /// Number of clusters across all zoom levels
    pub num_clusters: usize,
    /// Primitives (clusters plus unclustered points) per zoom, coarsest first
    pub primitives_per_zoom: Vec<(u8, usize)>,
}
