use foundation::bounds::{BoundsBuilder, GeoBounds};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Feature ids may be strings or numbers in the wild (OGC API Features
/// returns both).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeatureId {
    String(String),
    Number(serde_json::Number),
}

impl std::fmt::Display for FeatureId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FeatureId::String(s) => write!(f, "{s}"),
            FeatureId::Number(n) => write!(f, "{n}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    Point { coordinates: Vec<f64> },
    MultiPoint { coordinates: Vec<Vec<f64>> },
    LineString { coordinates: Vec<Vec<f64>> },
    MultiLineString { coordinates: Vec<Vec<Vec<f64>>> },
    Polygon { coordinates: Vec<Vec<Vec<f64>>> },
    MultiPolygon { coordinates: Vec<Vec<Vec<Vec<f64>>>> },
    GeometryCollection { geometries: Vec<Geometry> },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<FeatureId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bbox: Option<Vec<f64>>,
    /// Geometry that does not decode is kept as `None`, so one bad feature
    /// does not sink the whole page.
    #[serde(default, deserialize_with = "lenient_geometry")]
    pub geometry: Option<Geometry>,
    #[serde(default)]
    pub properties: Option<Map<String, Value>>,
    /// STAC items carry their owning collection.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection: Option<String>,
}

impl Feature {
    pub fn property(&self, key: &str) -> Option<&Value> {
        self.properties.as_ref()?.get(key)
    }

    /// String-ish property lookup; numbers are rendered to text.
    pub fn property_text(&self, key: &str) -> Option<String> {
        match self.property(key)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    pub fn property_f64(&self, key: &str) -> Option<f64> {
        match self.property(key)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Position used for point symbols: the `Point` geometry, else
    /// `longitude`/`latitude` properties (AQS station metadata carries both).
    pub fn point_position(&self) -> Option<[f64; 2]> {
        if let Some(Geometry::Point { coordinates }) = &self.geometry {
            if coordinates.len() >= 2 {
                return Some([coordinates[0], coordinates[1]]);
            }
        }
        let lng = self.property_f64("longitude")?;
        let lat = self.property_f64("latitude")?;
        Some([lng, lat])
    }

    /// Outer rings of every polygonal part of this feature.
    pub fn outer_rings(&self) -> Vec<&[Vec<f64>]> {
        match &self.geometry {
            Some(Geometry::Polygon { coordinates }) => {
                coordinates.first().map(|r| vec![r.as_slice()]).unwrap_or_default()
            }
            Some(Geometry::MultiPolygon { coordinates }) => coordinates
                .iter()
                .filter_map(|poly| poly.first().map(|r| r.as_slice()))
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Bounds from the precomputed `bbox`, else from geometry.
    ///
    /// Only `Point` and the outer ring of a `Polygon` contribute; anything else
    /// (or a malformed geometry) yields `None`.
    pub fn bounds(&self) -> Option<GeoBounds> {
        if let Some(bbox) = &self.bbox {
            // 2D bbox is [w, s, e, n]; 3D is [w, s, zmin, e, n, zmax].
            let b = match bbox.len() {
                4 => Some(GeoBounds::new(bbox[0], bbox[1], bbox[2], bbox[3])),
                6 => Some(GeoBounds::new(bbox[0], bbox[1], bbox[3], bbox[4])),
                _ => None,
            };
            if b.is_some() {
                return b;
            }
        }

        let mut builder = BoundsBuilder::new();
        match self.geometry.as_ref()? {
            Geometry::Point { coordinates } => {
                if coordinates.len() >= 2 {
                    builder.push_point(coordinates[0], coordinates[1]);
                }
            }
            Geometry::Polygon { coordinates } => {
                for c in coordinates.first()? {
                    if c.len() >= 2 {
                        builder.push_point(c[0], c[1]);
                    }
                }
            }
            _ => {}
        }
        builder.finish()
    }
}

fn feature_collection_tag() -> String {
    "FeatureCollection".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureCollection {
    #[serde(rename = "type", default = "feature_collection_tag")]
    pub kind: String,
    #[serde(default)]
    pub features: Vec<Feature>,
}

impl Default for FeatureCollection {
    fn default() -> Self {
        Self {
            kind: feature_collection_tag(),
            features: Vec::new(),
        }
    }
}

impl FeatureCollection {
    pub fn new(features: Vec<Feature>) -> Self {
        Self {
            kind: feature_collection_tag(),
            features,
        }
    }

    pub fn from_json_str(payload: &str) -> Result<Self, GeoJsonError> {
        serde_json::from_str(payload).map_err(|e| GeoJsonError::Parse(e.to_string()))
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn bounds(&self) -> Option<GeoBounds> {
        compute_bounds(&self.features)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeoJsonError {
    Parse(String),
}

impl std::fmt::Display for GeoJsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GeoJsonError::Parse(msg) => write!(f, "GeoJSON parse error: {msg}"),
        }
    }
}

impl std::error::Error for GeoJsonError {}

fn lenient_geometry<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Geometry>, D::Error> {
    let value = Option::<Value>::deserialize(d)?;
    Ok(value.and_then(|v| serde_json::from_value(v).ok()))
}

/// Union of per-feature bounds. `None` for an empty slice or when no feature
/// has usable coordinates.
pub fn compute_bounds(features: &[Feature]) -> Option<GeoBounds> {
    let mut builder = BoundsBuilder::new();
    for feature in features {
        if let Some(b) = feature.bounds() {
            builder.push_bounds(b);
        }
    }
    builder.finish()
}

#[cfg(test)]
mod tests {
    use super::{Feature, FeatureCollection, FeatureId, Geometry, compute_bounds};
    use foundation::bounds::GeoBounds;
    use serde_json::json;

    fn point(lng: f64, lat: f64) -> Feature {
        Feature {
            geometry: Some(Geometry::Point {
                coordinates: vec![lng, lat],
            }),
            ..Feature::default()
        }
    }

    #[test]
    fn empty_collection_has_no_bounds() {
        assert_eq!(compute_bounds(&[]), None);
    }

    #[test]
    fn single_point_bounds() {
        assert_eq!(
            compute_bounds(&[point(-86.82, 32.96)]),
            Some(GeoBounds::new(-86.82, 32.96, -86.82, 32.96))
        );
    }

    #[test]
    fn polygon_uses_outer_ring_only() {
        let f = Feature {
            geometry: Some(Geometry::Polygon {
                coordinates: vec![
                    vec![vec![0.0, 0.0], vec![4.0, 0.0], vec![4.0, 3.0], vec![0.0, 0.0]],
                    vec![vec![-50.0, -50.0], vec![50.0, 50.0], vec![-50.0, -50.0]],
                ],
            }),
            ..Feature::default()
        };
        assert_eq!(compute_bounds(&[f]), Some(GeoBounds::new(0.0, 0.0, 4.0, 3.0)));
    }

    #[test]
    fn bbox_takes_precedence_over_geometry() {
        let mut f = point(100.0, 10.0);
        f.bbox = Some(vec![-1.0, -2.0, 3.0, 4.0]);
        assert_eq!(compute_bounds(&[f]), Some(GeoBounds::new(-1.0, -2.0, 3.0, 4.0)));
    }

    #[test]
    fn malformed_geometry_is_skipped() {
        let broken = Feature {
            geometry: Some(Geometry::Point {
                coordinates: vec![1.0],
            }),
            ..Feature::default()
        };
        let missing = Feature::default();
        assert_eq!(compute_bounds(&[broken.clone(), missing.clone()]), None);
        assert_eq!(
            compute_bounds(&[broken, missing, point(5.0, 6.0)]),
            Some(GeoBounds::new(5.0, 6.0, 5.0, 6.0))
        );
    }

    #[test]
    fn undecodable_geometry_does_not_fail_the_collection() {
        let payload = json!({"type": "FeatureCollection", "features": [
            {"type": "Feature", "geometry": {"type": "Point", "coordinates": [10.0, 20.0]},
             "properties": {"station_code": "a"}},
            {"type": "Feature", "geometry": {"type": "Point", "coordinates": [null, null]},
             "properties": {"station_code": "b"}}
        ]});
        let fc = FeatureCollection::from_json_str(&payload.to_string()).expect("parse");
        assert_eq!(fc.len(), 2);
        assert_eq!(fc.features[1].geometry, None);
        assert_eq!(fc.features[1].property_text("station_code").as_deref(), Some("b"));
        assert_eq!(fc.bounds(), Some(GeoBounds::new(10.0, 20.0, 10.0, 20.0)));
    }

    #[test]
    fn parses_ogc_features_page() {
        let payload = json!({
            "type": "FeatureCollection",
            "numberMatched": 2,
            "features": [
                {
                    "type": "Feature",
                    "id": 17,
                    "geometry": {"type": "Point", "coordinates": [-86.8, 33.5]},
                    "properties": {"station_code": "010730023", "city": "Birmingham"}
                },
                {
                    "type": "Feature",
                    "id": "item-2",
                    "collection": "no2-monthly",
                    "bbox": [-180.0, -90.0, 180.0, 90.0],
                    "geometry": null,
                    "properties": {"datetime": "2024-01-01T00:00:00Z"},
                    "assets": {"cog_default": {"href": "s3://bucket/a.tif"}}
                }
            ]
        })
        .to_string();

        let fc = FeatureCollection::from_json_str(&payload).expect("parse");
        assert_eq!(fc.len(), 2);
        assert_eq!(fc.features[0].id, Some(FeatureId::Number(17.into())));
        assert_eq!(fc.features[0].property_text("city").as_deref(), Some("Birmingham"));
        assert_eq!(fc.features[0].point_position(), Some([-86.8, 33.5]));
        assert_eq!(fc.features[1].collection.as_deref(), Some("no2-monthly"));
        assert_eq!(fc.features[1].id.as_ref().map(|i| i.to_string()).as_deref(), Some("item-2"));
    }

    #[test]
    fn position_falls_back_to_lat_lng_properties() {
        let f = Feature {
            properties: Some(
                json!({"longitude": "-104.5", "latitude": 39.1})
                    .as_object()
                    .cloned()
                    .unwrap(),
            ),
            ..Feature::default()
        };
        assert_eq!(f.point_position(), Some([-104.5, 39.1]));
    }
}
