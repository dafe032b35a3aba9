use serde::{Deserialize, Serialize};

/// Deepest zoom a tile coordinate is derived for.
pub const MAX_TILE_ZOOM: u8 = 24;

/// Tile coordinate in the WebMercatorQuad ZXY scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileCoord {
    pub z: u8,
    pub x: u32,
    pub y: u32,
}

impl TileCoord {
    pub fn new(z: u8, x: u32, y: u32) -> Self {
        Self { z, x, y }
    }

    /// Tile containing `(lng, lat)` at zoom `z`. Latitude is clamped to the
    /// Mercator square and `z` to [`MAX_TILE_ZOOM`].
    pub fn containing(lng: f64, lat: f64, z: u8) -> Self {
        let z = z.min(MAX_TILE_ZOOM);
        let n = (1u64 << z) as f64;
        let lat = lat.clamp(-85.051_128_78, 85.051_128_78).to_radians();
        let x = ((lng + 180.0) / 360.0 * n).floor();
        let y = ((1.0 - (lat.tan() + 1.0 / lat.cos()).ln() / std::f64::consts::PI) / 2.0 * n)
            .floor();
        let max = n - 1.0;
        Self {
            z,
            x: x.clamp(0.0, max) as u32,
            y: y.clamp(0.0, max) as u32,
        }
    }

    /// Tile under `(lng, lat)` for a fractional map zoom.
    pub fn at_map_zoom(lng: f64, lat: f64, zoom: f64) -> Self {
        let z = zoom.floor().clamp(0.0, MAX_TILE_ZOOM as f64) as u8;
        Self::containing(lng, lat, z)
    }
}
