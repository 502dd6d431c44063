//! Pure computations used by the index: projection, aggregation, sizing,
//! validation, and GeoJSON output.

pub mod aggregate;
pub mod geojson;
pub mod projection;
pub mod size;
pub mod validation;
