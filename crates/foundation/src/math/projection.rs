/// WGS84 semi-major axis (meters).
pub const WGS84_A: f64 = 6_378_137.0;

/// Half the width of the EPSG:3857 square (meters).
pub const MERCATOR_HALF_EXTENT_M: f64 = 20_037_508.34;

/// EPSG:3857 meters to `(lng_deg, lat_deg)`.
pub fn inverse_web_mercator(x_m: f64, y_m: f64) -> (f64, f64) {
    let lng = x_m / MERCATOR_HALF_EXTENT_M * 180.0;
    let lat = (2.0 * (y_m / WGS84_A).exp().atan() - std::f64::consts::FRAC_PI_2).to_degrees();
    (lng, lat)
}

#[cfg(test)]
mod tests {
    use super::{MERCATOR_HALF_EXTENT_M, inverse_web_mercator};

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    #[test]
    fn origin_maps_to_null_island() {
        let (lng, lat) = inverse_web_mercator(0.0, 0.0);
        assert_close(lng, 0.0, 1e-12);
        assert_close(lat, 0.0, 1e-12);
    }

    #[test]
    fn half_extent_is_antimeridian() {
        let (lng, lat) = inverse_web_mercator(MERCATOR_HALF_EXTENT_M, MERCATOR_HALF_EXTENT_M);
        assert_close(lng, 180.0, 1e-9);
        // The square is cut at ~85.0511 degrees.
        assert_close(lat, 85.0511, 1e-3);
    }

    #[test]
    fn known_city_coordinates() {
        // Albuquerque-area lidar tile centre.
        let (lng, lat) = inverse_web_mercator(-11_590_279.0, 4_052_173.0);
        assert_close(lng, -104.117, 1e-3);
        assert_close(lat, 34.174, 1e-3);
    }
}
