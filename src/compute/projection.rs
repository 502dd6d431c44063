//! Web-Mercator projection into the unit square.
//!
//! Longitude maps linearly onto `x` in `[0, 1]`; latitude maps onto `y` in
//! `[0, 1]` with north at `y = 0`. At zoom `z` one projected unit spans
//! `extent * 2^z` pixels, which is how pixel radii become projected radii.

use std::f64::consts::PI;

/// Project a longitude in degrees to `x` in `[0, 1]`.
pub fn lng_x(lng: f64) -> f64 {
    lng / 360.0 + 0.5
}

/// Project a latitude in degrees to `y` in `[0, 1]`.
///
/// Latitudes beyond the Mercator limit (about ±85.05°) clamp to the edges.
pub fn lat_y(lat: f64) -> f64 {
    let sin = (lat * PI / 180.0).sin();
    let y = 0.5 - 0.25 * ((1.0 + sin) / (1.0 - sin)).ln() / PI;
    y.clamp(0.0, 1.0)
}

/// Inverse of [`lng_x`].
pub fn x_lng(x: f64) -> f64 {
    (x - 0.5) * 360.0
}

/// Inverse of [`lat_y`].
pub fn y_lat(y: f64) -> f64 {
    let y2 = (180.0 - y * 360.0) * PI / 180.0;
    360.0 * y2.exp().atan() / PI - 90.0
}

/// Convert a distance in pixels to projected units at `zoom`.
pub fn pixels_to_units(pixels: f64, extent: f64, zoom: u8) -> f64 {
    pixels / (extent * 2f64.powi(i32::from(zoom)))
}

/// Normalize a longitude into `[-180, 180)`.
pub fn wrap_lng(lng: f64) -> f64 {
    ((lng + 180.0) % 360.0 + 360.0) % 360.0 - 180.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_origin_projects_to_center() {
        assert_eq!(lng_x(0.0), 0.5);
        assert!((lat_y(0.0) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_north_is_up() {
        assert!(lat_y(45.0) < lat_y(0.0));
        assert!(lat_y(-45.0) > lat_y(0.0));
    }

    #[test]
    fn test_poles_clamp_to_unit_square() {
        assert_eq!(lat_y(90.0), 0.0);
        assert_eq!(lat_y(-90.0), 1.0);
        assert_eq!(lat_y(89.9), 0.0);
    }

    #[test]
    fn test_inverse_projection() {
        for lng in [-179.5, -74.006, 0.0, 12.5, 179.9] {
            assert!((x_lng(lng_x(lng)) - lng).abs() < 1e-9);
        }
        for lat in [-80.0, -33.9, 0.0, 40.7128, 84.0] {
            assert!((y_lat(lat_y(lat)) - lat).abs() < 1e-9);
        }
    }

    #[test]
    fn test_pixel_radius_halves_per_zoom() {
        let z0 = pixels_to_units(75.0, 512.0, 0);
        let z1 = pixels_to_units(75.0, 512.0, 1);
        assert!((z0 / z1 - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_wrap_lng() {
        assert_eq!(wrap_lng(190.0), -170.0);
        assert_eq!(wrap_lng(-190.0), 170.0);
        assert_eq!(wrap_lng(180.0), -180.0);
        assert_eq!(wrap_lng(45.0), 45.0);
    }
}
