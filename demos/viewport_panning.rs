//! Sharing a cluster layer between a render thread and a data feed.
//!
//! One thread pans a viewport across the Pacific (crossing the antimeridian)
//! while the main thread swaps in refreshed point sets. Handles taken from a
//! previous build are rejected once the layer has been rebuilt.
//!
//! Run with: cargo run --example viewport_panning --release

use std::thread;
use std::time::Duration;
use vibecluster::{ClusterError, ClusterLayer, GeoPoint, VibeCategory, Viewport};

fn island_hops(round: usize) -> Vec<GeoPoint> {
    let mut points = Vec::new();
    for i in 0..200 {
        let lon = 150.0 + (i as f64 * 0.3) + round as f64 * 0.01;
        let lon = if lon > 180.0 { lon - 360.0 } else { lon };
        let lat = -25.0 + (i % 40) as f64 * 0.5;
        let vibe = VibeCategory::ALL[(i + round) % VibeCategory::COUNT];
        points.push(GeoPoint::new(format!("isle-{i}"), lon, lat, vibe, ""));
    }
    points
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    println!("=== ClusterLayer viewport panning ===\n");

    let layer = ClusterLayer::new(island_hops(0))?;

    let renderer = {
        let layer = layer.clone();
        thread::spawn(move || {
            for step in 0..8 {
                let west = 140.0 + step as f64 * 10.0;
                let east = west + 40.0;
                let east = if east > 180.0 { east - 360.0 } else { east };
                let viewport = Viewport::new(west, -30.0, east, 0.0, 4);

                let results = layer.query(&viewport);
                let points: u32 = results.iter().map(|r| r.count()).sum();
                println!(
                    "   [render] west {west:>6.1} east {east:>6.1}: {} primitives covering {points} points{}",
                    results.len(),
                    if viewport.crosses_antimeridian() { " (wraps)" } else { "" },
                );
                thread::sleep(Duration::from_millis(20));
            }
        })
    };

    for round in 1..=3 {
        thread::sleep(Duration::from_millis(40));
        let rebuilt = layer.update(island_hops(round))?;
        println!("   [feed] round {round}: rebuilt = {rebuilt}, generation {}", layer.generation());
    }

    renderer
        .join()
        .map_err(|_| "render thread panicked")?;

    // Unchanged data does not trigger a rebuild
    println!("\nUnchanged update rebuilt: {}", layer.update(island_hops(3))?);

    // A handle from this build stops working after the next one
    let handle = layer
        .query(&Viewport::world(0))
        .iter()
        .find_map(|r| r.as_cluster().map(|c| c.handle));

    if let Some(handle) = handle {
        println!("Leaves before rebuild: {}", layer.get_leaves(handle)?.len());
        layer.rebuild(island_hops(4))?;
        match layer.get_leaves(handle) {
            Err(ClusterError::InvalidHandle { handle, current }) => {
                println!("Handle {handle} rejected, layer is now at generation {current}")
            }
            other => println!("Unexpected: {other:?}"),
        }
    }

    Ok(())
}
