//! # vibecluster-types
//!
//! Core data types for the vibecluster engine:
//!
//! - **Categories**: `VibeCategory` and its canonical ordering
//! - **Points**: `GeoPoint`, a geolocated destination with an opaque payload
//! - **Viewports**: `Viewport`, a bounding box plus zoom level
//!
//! All types are serializable with Serde and interoperate with the `geo`
//! crate's geometric primitives.
//!
//! ## Examples
//!
//! ```rust
//! use vibecluster_types::category::VibeCategory;
//! use vibecluster_types::point::GeoPoint;
//! use vibecluster_types::viewport::Viewport;
//!
//! let lisbon = GeoPoint::new("lisbon", -9.1393, 38.7223, VibeCategory::Cultural, "{}");
//! let europe = Viewport::new(-25.0, 34.0, 45.0, 72.0, 4);
//! assert!(europe.contains(lisbon.lon, lisbon.lat));
//! ```

pub mod category;
pub mod point;
pub mod viewport;
