//! GeoJSON conversion for query results.
//!
//! Clusters become point features with the property names map renderers
//! conventionally use for clustered sources (`cluster`, `cluster_id`,
//! `point_count`, `point_count_abbreviated`), plus the vibe breakdown.

use crate::error::Result;
use crate::index::ClusterResult;
use geojson::feature::Id;
use geojson::{Feature, FeatureCollection, Geometry, JsonObject, Value};
use serde_json::json;

/// Short label for a member count, e.g. `1.2k` or `15k`.
pub fn abbreviate_count(count: u32) -> String {
    if count >= 10_000 {
        format!("{}k", (f64::from(count) / 1000.0).round())
    } else if count >= 1_000 {
        format!("{}k", (f64::from(count) / 100.0).round() / 10.0)
    } else {
        count.to_string()
    }
}

/// Converts one result into a GeoJSON point feature.
pub fn to_feature(result: &ClusterResult) -> Feature {
    let (lon, lat) = result.position();
    let mut properties = JsonObject::new();

    let id = match result {
        ClusterResult::Cluster(cluster) => {
            properties.insert("cluster".to_string(), json!(true));
            properties.insert("cluster_id".to_string(), json!(cluster.id));
            properties.insert("point_count".to_string(), json!(cluster.count));
            properties.insert(
                "point_count_abbreviated".to_string(),
                json!(abbreviate_count(cluster.count)),
            );
            properties.insert(
                "dominant_vibe".to_string(),
                json!(cluster.dominant_vibe().map(|vibe| vibe.as_str())),
            );
            properties.insert("vibe_counts".to_string(), json!(cluster.vibes));
            Id::Number(cluster.id.into())
        }
        ClusterResult::Leaf(point) => {
            properties.insert("cluster".to_string(), json!(false));
            properties.insert("id".to_string(), json!(point.id));
            properties.insert("vibe".to_string(), json!(point.category.as_str()));
            Id::String(point.id.clone())
        }
    };

    Feature {
        bbox: None,
        geometry: Some(Geometry::new(Value::Point(vec![lon, lat]))),
        id: Some(id),
        properties: Some(properties),
        foreign_members: None,
    }
}

/// Converts results into a feature collection, preserving order.
pub fn to_feature_collection(results: &[ClusterResult]) -> FeatureCollection {
    FeatureCollection {
        bbox: None,
        features: results.iter().map(to_feature).collect(),
        foreign_members: None,
    }
}

/// Serializes results as a GeoJSON `FeatureCollection` string.
pub fn to_geojson_string(results: &[ClusterResult]) -> Result<String> {
    Ok(serde_json::to_string(&to_feature_collection(results))?)
}
