use foundation::math::inverse_web_mercator;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 3D Tiles tileset manifest (`tileset.json`), reduced to what camera
/// framing needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TilesetManifest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset: Option<Value>,
    pub root: TileNode,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileNode {
    #[serde(rename = "boundingVolume")]
    pub bounding_volume: BoundingVolume,
    #[serde(rename = "geometricError", default)]
    pub geometric_error: f64,
}

/// Exactly one of the three forms is normally present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BoundingVolume {
    /// `[cx, cy, cz, xx, xy, xz, yx, yy, yz, zx, zy, zz]`, projected meters.
    #[serde(rename = "box", default, skip_serializing_if = "Option::is_none")]
    pub bbox: Option<Vec<f64>>,
    /// `[west, south, east, north, min_h, max_h]`, radians.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<Vec<f64>>,
    /// `[cx, cy, cz, radius]`, projected meters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sphere: Option<Vec<f64>>,
}

impl TilesetManifest {
    pub fn from_json_str(payload: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(payload)
    }

    /// Centre of the root bounding volume as `[lng, lat]` degrees.
    ///
    /// Box and sphere centres are taken to be EPSG:3857 meters (how the lidar
    /// tilesets we serve are produced); regions are already geographic.
    pub fn center_lng_lat(&self) -> Option<[f64; 2]> {
        let bv = &self.root.bounding_volume;
        if let Some(region) = bv.region.as_deref().filter(|r| r.len() >= 4) {
            let lng = ((region[0] + region[2]) / 2.0).to_degrees();
            let lat = ((region[1] + region[3]) / 2.0).to_degrees();
            return Some([lng, lat]);
        }
        let center = bv
            .bbox
            .as_deref()
            .filter(|b| b.len() >= 12)
            .or_else(|| bv.sphere.as_deref().filter(|s| s.len() >= 4))?;
        let (lng, lat) = inverse_web_mercator(center[0], center[1]);
        if lng.is_finite() && lat.is_finite() {
            Some([lng, lat])
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::TilesetManifest;

    #[test]
    fn box_centre_is_unprojected() {
        let json = r#"{
            "asset": {"version": "1.0"},
            "geometricError": 500,
            "root": {
                "boundingVolume": {"box": [-11590279.0, 4052173.0, 1500.0,
                    800.0, 0, 0, 0, 800.0, 0, 0, 0, 120.0]},
                "geometricError": 100
            }
        }"#;
        let m = TilesetManifest::from_json_str(json).expect("parse");
        let [lng, lat] = m.center_lng_lat().expect("centre");
        assert!((lng - -104.117).abs() < 1e-3, "lng {lng}");
        assert!((lat - 34.174).abs() < 1e-3, "lat {lat}");
    }

    #[test]
    fn region_centre_is_in_degrees() {
        let json = r#"{"root": {"boundingVolume": {"region": [
            -0.2, 0.6, -0.1, 0.7, 0, 100]}}}"#;
        let m = TilesetManifest::from_json_str(json).expect("parse");
        let [lng, lat] = m.center_lng_lat().expect("centre");
        assert!((lng - (-0.15f64).to_degrees()).abs() < 1e-9);
        assert!((lat - 0.65f64.to_degrees()).abs() < 1e-9);
    }

    #[test]
    fn truncated_volume_has_no_centre() {
        let json = r#"{"root": {"boundingVolume": {"box": [1.0, 2.0]}}}"#;
        let m = TilesetManifest::from_json_str(json).expect("parse");
        assert_eq!(m.center_lng_lat(), None);
    }
}
