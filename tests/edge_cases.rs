use vibecluster::{
    ClusterIndex, ClusterIndexBuilder, ClusterResult, Config, GeoPoint, VibeCategory, Viewport,
    validation,
};

fn total_count(results: &[ClusterResult]) -> u32 {
    results.iter().map(ClusterResult::count).sum()
}

/// Test 1: Empty input
#[test]
fn test_empty_index() {
    let index = ClusterIndex::new(Vec::new()).expect("empty input builds");

    assert!(index.is_empty());
    for zoom in 0..=16 {
        assert!(index.query_viewport(&Viewport::world(zoom)).is_empty());
    }
    let stats = index.stats();
    assert_eq!(stats.num_points, 0);
    assert_eq!(stats.num_clusters, 0);
}

/// Test 2: A lone point is never clustered
#[test]
fn test_single_point_is_always_a_leaf() {
    let point = GeoPoint::new("solo", 24.9384, 60.1699, VibeCategory::Nature, "Helsinki");
    let index = ClusterIndex::new(vec![point.clone()]).unwrap();

    for zoom in 0..=16 {
        let results = index.query_viewport(&Viewport::world(zoom));
        assert_eq!(results, vec![ClusterResult::Leaf(point.clone())]);
    }
}

/// Test 3: Many points at the exact same coordinates
#[test]
fn test_coincident_points_stay_clustered_at_max_zoom() {
    let points: Vec<GeoPoint> = (0..50)
        .map(|i| GeoPoint::new(format!("dup{i}"), -3.7038, 40.4168, VibeCategory::Nightlife, ""))
        .collect();
    let index = ClusterIndex::new(points).unwrap();

    let results = index.query_viewport(&Viewport::world(16));
    assert_eq!(results.len(), 1);

    let cluster = results[0].as_cluster().expect("coincident points cluster");
    assert_eq!(cluster.count, 50);
    assert_eq!(cluster.vibes.get(VibeCategory::Nightlife), 50);
    assert_eq!(index.get_leaves(cluster.handle).unwrap().len(), 50);

    // never splits within the zoom range
    assert_eq!(index.expansion_zoom(cluster.handle).unwrap(), None);
}

/// Test 4: Viewports crossing the antimeridian
#[test]
fn test_antimeridian_viewport() {
    let points = vec![
        GeoPoint::new("fiji", 179.9, -17.7, VibeCategory::Beach, ""),
        GeoPoint::new("samoa", -179.9, -13.8, VibeCategory::Beach, ""),
        GeoPoint::new("ghana", 0.0, 5.6, VibeCategory::Cultural, ""),
    ];
    let index = ClusterIndex::new(points).unwrap();

    let pacific = index.query(170.0, -30.0, -170.0, 0.0, 5);
    assert_eq!(total_count(&pacific), 2);
    assert!(pacific.iter().all(|r| r.as_leaf().is_some_and(|p| p.id != "ghana")));

    let atlantic = index.query(-10.0, -30.0, 10.0, 10.0, 5);
    assert_eq!(total_count(&atlantic), 1);
}

/// Test 5: Longitudes outside [-180, 180] wrap around
#[test]
fn test_wrapped_longitudes() {
    let point = GeoPoint::new("greenwich", 0.0, 51.48, VibeCategory::Cultural, "");
    let index = ClusterIndex::new(vec![point]).unwrap();

    assert_eq!(index.query(350.0, 50.0, 370.0, 53.0, 6).len(), 1);
    assert_eq!(index.query(-370.0, 50.0, -350.0, 53.0, 6).len(), 1);
}

/// Test 6: A span of 360 degrees or more covers everything
#[test]
fn test_full_world_span() {
    let points = vec![
        GeoPoint::new("w", -179.0, 0.0, VibeCategory::Adventure, ""),
        GeoPoint::new("e", 179.0, 0.0, VibeCategory::Adventure, ""),
    ];
    let index = ClusterIndex::new(points).unwrap();
    assert_eq!(total_count(&index.query(-200.0, -90.0, 200.0, 90.0, 10)), 2);
}

/// Test 7: Extreme latitudes
#[test]
fn test_polar_points() {
    let points = vec![
        GeoPoint::new("north", 0.0, 90.0, VibeCategory::Adventure, ""),
        GeoPoint::new("south", 0.0, -90.0, VibeCategory::Adventure, ""),
        GeoPoint::new("svalbard", 15.6, 78.2, VibeCategory::Nature, ""),
    ];
    let index = ClusterIndex::new(points).unwrap();

    for zoom in 0..=16 {
        assert_eq!(total_count(&index.query_viewport(&Viewport::world(zoom))), 3);
    }
}

/// Test 8: Invalid bounds
#[test]
fn test_non_finite_bounds_return_nothing() {
    let index = ClusterIndex::new(vec![GeoPoint::new("x", 1.0, 1.0, VibeCategory::Beach, "")]).unwrap();

    assert!(index.query(f64::NAN, 0.0, 10.0, 10.0, 3).is_empty());
    assert!(index.query(0.0, 0.0, f64::INFINITY, 10.0, 3).is_empty());

    // the index keeps working afterwards
    assert_eq!(index.query(0.0, 0.0, 10.0, 10.0, 3).len(), 1);
}

/// Test 9: South and north given the wrong way round
#[test]
fn test_inverted_latitudes_are_swapped() {
    let index = ClusterIndex::new(vec![GeoPoint::new("x", 5.0, 5.0, VibeCategory::Beach, "")]).unwrap();
    assert_eq!(
        index.query(0.0, 10.0, 10.0, 0.0, 4),
        index.query(0.0, 0.0, 10.0, 10.0, 4)
    );
}

/// Test 10: Zoom outside the configured range is clamped
#[test]
fn test_zoom_is_clamped() {
    let points: Vec<GeoPoint> = (0..20)
        .map(|i| GeoPoint::new(format!("z{i}"), f64::from(i) * 0.01, 0.0, VibeCategory::Romantic, ""))
        .collect();
    let index = ClusterIndex::with_config(points, Config::default().with_zoom_range(2, 12)).unwrap();

    assert_eq!(index.query_all(-3), index.query_all(2));
    assert_eq!(index.query_all(0), index.query_all(2));
    assert_eq!(index.query_all(40), index.query_all(12));
}

/// Test 11: Payloads pass through untouched
#[test]
fn test_payload_round_trip() {
    let payload = br#"{"name":"Machu Picchu","tags":["hike","ruins"]}"#.to_vec();
    let point = GeoPoint::new("mp", -72.545, -13.163, VibeCategory::Adventure, payload.clone());
    let index = ClusterIndex::new(vec![point]).unwrap();

    let results = index.query_viewport(&Viewport::world(12));
    let leaf = results[0].as_leaf().unwrap();
    assert_eq!(leaf.payload.as_ref(), payload.as_slice());
}

/// Test 12: Non-finite points that slip past the caller are skipped
#[test]
fn test_non_finite_points_do_not_crash() {
    let points = vec![
        GeoPoint::new("ok", 10.0, 10.0, VibeCategory::Beach, ""),
        GeoPoint::new("nan", f64::NAN, 10.0, VibeCategory::Beach, ""),
        GeoPoint::new("inf", 10.0, f64::NEG_INFINITY, VibeCategory::Beach, ""),
    ];
    let index = ClusterIndex::new(points).unwrap();
    assert_eq!(index.len(), 1);
    assert_eq!(total_count(&index.query_viewport(&Viewport::world(0))), 1);
}

/// Test 13: Entities without a location are dropped before indexing
#[test]
fn test_caller_side_filtering() {
    let raw = vec![
        ("lisbon", Some(-9.14), Some(38.72)),
        ("unknown", None, Some(1.0)),
        ("porto", Some(-8.61), Some(41.15)),
        ("bad", Some(500.0), Some(0.0)),
    ];
    let points = raw
        .into_iter()
        .filter_map(|(id, lon, lat)| GeoPoint::from_parts(id, lon, lat, VibeCategory::Cultural, ""));
    let points = validation::retain_valid(points);
    assert_eq!(points.len(), 2);

    let index = ClusterIndexBuilder::new().build(points).unwrap();
    assert_eq!(total_count(&index.query_viewport(&Viewport::world(0))), 2);
}

/// Test 14: Duplicate ids are tolerated
#[test]
fn test_duplicate_ids_still_indexed() {
    let points = vec![
        GeoPoint::new("same", 1.0, 1.0, VibeCategory::Beach, ""),
        GeoPoint::new("same", 80.0, 1.0, VibeCategory::Nature, ""),
    ];
    let index = ClusterIndex::new(points).unwrap();
    assert_eq!(total_count(&index.query_all(16)), 2);
}

/// Test 15: Clusters of polar points stay between their members
#[test]
fn test_polar_cluster_centroid_within_members() {
    let points = vec![
        GeoPoint::new("pole", 0.0, 90.0, VibeCategory::Adventure, ""),
        GeoPoint::new("camp", 0.001, 89.999, VibeCategory::Nature, ""),
        GeoPoint::new("south", 0.0, -90.0, VibeCategory::Adventure, ""),
        GeoPoint::new("base", 0.001, -89.999, VibeCategory::Nature, ""),
    ];
    let index = ClusterIndex::new(points).unwrap();

    for zoom in [0, 8, 16] {
        let results = index.query_viewport(&Viewport::world(zoom));
        assert_eq!(total_count(&results), 4);

        for cluster in results.iter().filter_map(ClusterResult::as_cluster) {
            let leaves = index.get_leaves(cluster.handle).unwrap();
            let min_lat = leaves.iter().map(|p| p.lat).fold(f64::INFINITY, f64::min);
            let max_lat = leaves.iter().map(|p| p.lat).fold(f64::NEG_INFINITY, f64::max);
            assert!(
                cluster.lat >= min_lat && cluster.lat <= max_lat,
                "zoom {zoom}: centroid {} outside [{min_lat}, {max_lat}]",
                cluster.lat
            );
        }
    }

    let north = index.query(-1.0, 80.0, 1.0, 90.0, 16);
    let cluster = north[0].as_cluster().expect("north pair clusters at max zoom");
    assert_eq!(cluster.count, 2);
    assert!(cluster.lat > 89.99);
}

/// Test 16: Points stored with longitudes past 180 are still found
#[test]
fn test_out_of_range_longitude_is_queryable() {
    let point = GeoPoint::new("dateline", 181.0, 0.0, VibeCategory::Beach, "");
    let index = ClusterIndex::new(vec![point.clone()]).unwrap();
    assert_eq!(index.len(), 1);

    for zoom in [0, 7, 12, 16] {
        assert_eq!(
            index.query_viewport(&Viewport::world(zoom)),
            vec![ClusterResult::Leaf(point.clone())],
            "zoom {zoom}"
        );
    }

    // placed at -179 after wrapping
    assert_eq!(index.query(-180.0, -1.0, -178.0, 1.0, 16).len(), 1);
    assert!(index.query(170.0, -1.0, 179.0, 1.0, 16).is_empty());
}
