/// Longitude span (degrees) above which an extent is treated as global.
pub const GLOBAL_LNG_SPAN_DEG: f64 = 300.0;
/// Latitude span (degrees) above which an extent is treated as global.
pub const GLOBAL_LAT_SPAN_DEG: f64 = 150.0;

/// Geographic bounding box in WGS84 degrees.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GeoBounds {
    pub min_lng: f64,
    pub min_lat: f64,
    pub max_lng: f64,
    pub max_lat: f64,
}

impl GeoBounds {
    pub fn new(min_lng: f64, min_lat: f64, max_lng: f64, max_lat: f64) -> Self {
        GeoBounds {
            min_lng,
            min_lat,
            max_lng,
            max_lat,
        }
    }

    pub fn from_point(lng: f64, lat: f64) -> Self {
        GeoBounds::new(lng, lat, lng, lat)
    }

    pub fn lng_span(&self) -> f64 {
        self.max_lng - self.min_lng
    }

    pub fn lat_span(&self) -> f64 {
        self.max_lat - self.min_lat
    }

    /// Centroid of the box as `[lng, lat]`.
    pub fn center(&self) -> [f64; 2] {
        [
            (self.min_lng + self.max_lng) / 2.0,
            (self.min_lat + self.max_lat) / 2.0,
        ]
    }

    /// True when the box is too wide to be fitted meaningfully.
    ///
    /// Antimeridian-wrapping collections and whole-world catalogs both land
    /// here; callers should fall back to a fixed world view.
    pub fn is_global_extent(&self) -> bool {
        self.lng_span() > GLOBAL_LNG_SPAN_DEG || self.lat_span() > GLOBAL_LAT_SPAN_DEG
    }

    pub fn union(&self, other: &GeoBounds) -> GeoBounds {
        GeoBounds::new(
            self.min_lng.min(other.min_lng),
            self.min_lat.min(other.min_lat),
            self.max_lng.max(other.max_lng),
            self.max_lat.max(other.max_lat),
        )
    }
}

/// Incremental bounds accumulator.
///
/// Non-finite coordinates are ignored so a single malformed vertex cannot
/// poison the result.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct BoundsBuilder {
    bounds: Option<GeoBounds>,
}

impl BoundsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_point(&mut self, lng: f64, lat: f64) {
        if !lng.is_finite() || !lat.is_finite() {
            return;
        }
        let p = GeoBounds::from_point(lng, lat);
        self.bounds = Some(match self.bounds {
            Some(b) => b.union(&p),
            None => p,
        });
    }

    pub fn push_bounds(&mut self, other: GeoBounds) {
        self.push_point(other.min_lng, other.min_lat);
        self.push_point(other.max_lng, other.max_lat);
    }

    pub fn is_empty(&self) -> bool {
        self.bounds.is_none()
    }

    pub fn finish(self) -> Option<GeoBounds> {
        self.bounds
    }
}

#[cfg(test)]
mod tests {
    use super::{BoundsBuilder, GeoBounds};

    #[test]
    fn empty_builder_has_no_bounds() {
        assert_eq!(BoundsBuilder::new().finish(), None);
    }

    #[test]
    fn single_point_is_degenerate_box() {
        let mut b = BoundsBuilder::new();
        b.push_point(-86.8, 32.9);
        assert_eq!(b.finish(), Some(GeoBounds::new(-86.8, 32.9, -86.8, 32.9)));
    }

    #[test]
    fn ignores_non_finite_vertices() {
        let mut b = BoundsBuilder::new();
        b.push_point(f64::NAN, 1.0);
        b.push_point(10.0, f64::INFINITY);
        assert!(b.is_empty());
        b.push_point(1.0, 2.0);
        b.push_point(-3.0, 4.0);
        assert_eq!(b.finish(), Some(GeoBounds::new(-3.0, 2.0, 1.0, 4.0)));
    }

    #[test]
    fn global_extent_guard() {
        assert!(GeoBounds::new(-175.0, -10.0, 175.0, 10.0).is_global_extent());
        assert!(GeoBounds::new(0.0, -80.0, 10.0, 80.0).is_global_extent());
        assert!(!GeoBounds::new(-100.0, 20.0, -60.0, 50.0).is_global_extent());
    }

    #[test]
    fn center_is_midpoint() {
        let b = GeoBounds::new(-10.0, 0.0, 10.0, 20.0);
        assert_eq!(b.center(), [0.0, 10.0]);
    }
}
