//! Getting started with vibecluster.
//!
//! Builds a cluster index over a handful of travel destinations, walks it from
//! the world view down to street level, and prints GeoJSON for one zoom.
//!
//! Run with: cargo run --example getting_started

use vibecluster::{
    ClusterIndex, ClusterIndexBuilder, ClusterResult, GeoPoint, VibeCategory, Viewport, geojson,
};

fn destinations() -> Vec<GeoPoint> {
    vec![
        GeoPoint::new("sagrada", 2.1744, 41.4036, VibeCategory::Cultural, "Sagrada Familia"),
        GeoPoint::new("barceloneta", 2.1894, 41.3784, VibeCategory::Beach, "Barceloneta"),
        GeoPoint::new("razzmatazz", 2.1915, 41.3976, VibeCategory::Nightlife, "Razzmatazz"),
        GeoPoint::new("montjuic", 2.1658, 41.3633, VibeCategory::Nature, "Montjuic"),
        GeoPoint::new("bunkers", 2.1619, 41.4194, VibeCategory::Romantic, "Bunkers del Carmel"),
        GeoPoint::new("louvre", 2.3376, 48.8606, VibeCategory::Cultural, "Louvre"),
        GeoPoint::new("orsay", 2.3266, 48.8600, VibeCategory::Cultural, "Musee d'Orsay"),
        GeoPoint::new("pont-des-arts", 2.3375, 48.8583, VibeCategory::Romantic, "Pont des Arts"),
        GeoPoint::new("kilimanjaro", 37.3556, -3.0674, VibeCategory::Adventure, "Kilimanjaro"),
        GeoPoint::new("bora-bora", -151.7415, -16.5004, VibeCategory::Beach, "Bora Bora"),
    ]
}

fn describe(index: &ClusterIndex, result: &ClusterResult) -> String {
    match result {
        ClusterResult::Cluster(cluster) => format!(
            "cluster #{} of {} ({}), size {:.0}px",
            cluster.id,
            cluster.count,
            cluster.dominant_vibe().map_or("none", |v| v.as_str()),
            index.display_size(result),
        ),
        ClusterResult::Leaf(point) => format!(
            "{} [{}] {}",
            point.id,
            point.category,
            String::from_utf8_lossy(&point.payload)
        ),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    println!("=== vibecluster: getting started ===\n");

    let index = ClusterIndexBuilder::new()
        .radius(60.0)
        .max_zoom(16)
        .build(destinations())?;

    let stats = index.stats();
    println!(
        "Indexed {} points into {} clusters (generation {})\n",
        stats.num_points, stats.num_clusters, stats.generation
    );

    for zoom in [0, 3, 6, 10, 14] {
        let results = index.query_viewport(&Viewport::world(zoom));
        println!("Zoom {zoom}: {} primitives", results.len());
        for result in &results {
            println!("   {}", describe(&index, result));
        }
    }

    // Drill into the biggest cluster at the world view
    let biggest = index
        .query_all(0)
        .into_iter()
        .filter_map(|r| r.as_cluster().cloned())
        .max_by_key(|c| c.count);

    if let Some(cluster) = biggest {
        println!("\nExpanding cluster #{} ({} points)", cluster.id, cluster.count);
        match index.expansion_zoom(cluster.handle)? {
            Some(zoom) => println!("   splits at zoom {zoom}"),
            None => println!("   never splits within the zoom range"),
        }
        for child in index.get_children(cluster.handle)? {
            println!("   child: {}", describe(&index, &child));
        }
        let leaves = index.get_leaves(cluster.handle)?;
        let names: Vec<&str> = leaves.iter().map(|p| p.id.as_str()).collect();
        println!("   leaves: {}", names.join(", "));
    }

    println!("\nGeoJSON at zoom 4:");
    println!("{}", geojson::to_geojson_string(&index.query_all(4))?);

    Ok(())
}
